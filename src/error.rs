//! Error types for tourcraft.
//!
//! Every fallible operation returns `Result<T, TourError>` instead of
//! panicking. Tour-command errors are recoverable: the caller surfaces them as
//! a UI no-op and the engine state is left exactly as it was.

use thiserror::Error;

/// Result type alias for tourcraft operations.
pub type TourResult<T> = Result<T, TourError>;

/// Unified error type for all tourcraft operations.
#[derive(Debug, Error)]
pub enum TourError {
    // ===== Tour Commands =====
    /// Point index outside `[0, count)`.
    #[error("invalid point index {index} (instance has {count} points)")]
    InvalidIndex {
        /// The rejected index.
        index: usize,
        /// Number of points in the instance.
        count: usize,
    },

    /// Point already visited and this is not the closing append.
    #[error("point {index} is already part of the tour")]
    DuplicateIndex {
        /// The rejected index.
        index: usize,
    },

    /// Mutation attempted on a closed tour.
    #[error("tour is already closed")]
    TourComplete,

    /// Pop attempted on an empty tour.
    #[error("tour is empty")]
    EmptyTour,

    /// Pop attempted on an empty history stack.
    #[error("history is empty")]
    EmptyHistory,

    /// Undo requested with neither history nor tour entries left.
    #[error("nothing to undo")]
    NothingToUndo,

    /// A command or heuristic was started while its predicate was false.
    #[error("precondition not met: {reason}")]
    PreconditionNotMet {
        /// Which predicate failed.
        reason: String,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration or instance data.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TourError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a precondition error with a reason.
    #[must_use]
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::PreconditionNotMet {
            reason: reason.into(),
        }
    }

    /// Check if this error is a rejected tour command (a UI no-op, never fatal).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidIndex { .. }
                | Self::DuplicateIndex { .. }
                | Self::TourComplete
                | Self::EmptyTour
                | Self::EmptyHistory
                | Self::NothingToUndo
                | Self::PreconditionNotMet { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_detection() {
        assert!(TourError::InvalidIndex { index: 9, count: 4 }.is_recoverable());
        assert!(TourError::DuplicateIndex { index: 1 }.is_recoverable());
        assert!(TourError::TourComplete.is_recoverable());
        assert!(TourError::EmptyTour.is_recoverable());
        assert!(TourError::EmptyHistory.is_recoverable());
        assert!(TourError::NothingToUndo.is_recoverable());
        assert!(TourError::precondition("running").is_recoverable());

        assert!(!TourError::config("bad").is_recoverable());
        assert!(!TourError::Io(std::io::Error::other("gone")).is_recoverable());
    }

    #[test]
    fn test_invalid_index_display() {
        let msg = TourError::InvalidIndex { index: 7, count: 4 }.to_string();
        assert!(msg.contains("invalid point index 7"));
        assert!(msg.contains("4 points"));
    }

    #[test]
    fn test_precondition_display() {
        let msg = TourError::precondition("tour is not closed").to_string();
        assert!(msg.contains("precondition not met"));
        assert!(msg.contains("tour is not closed"));
    }

    #[test]
    fn test_config_display() {
        let msg = TourError::config("history_capacity must be positive").to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("history_capacity"));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let parse: Result<Vec<u32>, _> = serde_yaml::from_str("[1, 2");
        let err: TourError = parse.err().map(TourError::from).unwrap_or(TourError::TourComplete);
        assert!(matches!(err, TourError::YamlParse(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_error_debug() {
        let err = TourError::EmptyHistory;
        let debug = format!("{err:?}");
        assert!(debug.contains("EmptyHistory"));
    }
}
