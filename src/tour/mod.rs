//! Tour state and its undo history.

pub mod history;
pub mod state;

pub use history::{HistoryStack, DEFAULT_HISTORY_CAPACITY};
pub use state::{AppendKind, HistorySnapshot, TourSnapshot, TourState};
