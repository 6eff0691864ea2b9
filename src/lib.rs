//! # tourcraft
//!
//! Interactive tour-construction engine for the Euclidean travelling salesman
//! problem.
//!
//! A user builds a tour one click at a time, undoes steps, and hands the open
//! tour to a completion heuristic or the closed tour to 2-opt. Heuristics run
//! as cancellable, stepwise processes in virtual time:
//! - Bounded undo history (`HistoryStack`)
//! - Nearest-neighbor and seeded random completion
//! - Best-improvement 2-opt with swap previews
//! - Cooperative interruption at every step
//!
//! ## Example
//!
//! ```rust
//! use tourcraft::prelude::*;
//!
//! let points = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(0.0, 10.0),
//!     Point::new(10.0, 10.0),
//! ];
//! let config = EngineConfig::builder().seed(42).build();
//! let mut session = TourSession::new(points, config).unwrap();
//!
//! for idx in [0, 2, 1, 3, 0] {
//!     session.select_point(idx).unwrap();
//! }
//! assert!(session.can_run_two_opt());
//!
//! session.start_two_opt().unwrap();
//! session.run_until_idle().unwrap();
//! assert!((session.snapshot().route_length - 40.0).abs() < 1e-9);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops,  // Plain dx*dx + dy*dy keeps distances readable
    clippy::imprecise_flops,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::needless_range_loop,   // Sometimes range loops are clearer
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod geometry;
pub mod heuristics;
pub mod instance;
pub mod session;
pub mod tour;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{EngineConfig, EngineConfigBuilder, TimingConfig};
    pub use crate::engine::{SimRng, SimTime};
    pub use crate::error::{TourError, TourResult};
    pub use crate::events::{
        Edge, EngineEvent, EventLog, StepCallback, StepEvent, SwapHighlight, TourObserver,
    };
    pub use crate::geometry::{distance, Point};
    pub use crate::heuristics::{HeuristicKind, Termination};
    pub use crate::instance::TourInstance;
    pub use crate::session::{Candidate, GuidanceHint, TourSession, UndoOutcome};
    pub use crate::tour::{TourSnapshot, TourState};
}

/// Re-export for public API
pub use error::{TourError, TourResult};
