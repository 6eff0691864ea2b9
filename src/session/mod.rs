//! Interactive tour-building sessions.
//!
//! A [`TourSession`] owns one tour over a fixed point list together with its
//! undo history, the seeded RNG and the virtual clock. User commands live in
//! [`controller`]; the process lifecycle and time control live in
//! [`coordinator`].
//!
//! ```rust
//! use tourcraft::prelude::*;
//!
//! let points = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(10.0, 10.0),
//!     Point::new(0.0, 10.0),
//! ];
//! let mut session = TourSession::with_default_config(points).unwrap();
//! session.select_point(0).unwrap();
//! session.start_nearest_neighbor().unwrap();
//! session.run_until_idle().unwrap();
//!
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.tour, vec![0, 1, 2, 3, 0]);
//! assert!((snapshot.route_length - 40.0).abs() < 1e-9);
//! ```

pub mod controller;
pub mod coordinator;

use crate::config::EngineConfig;
use crate::engine::{ResumeScheduler, SimRng, SimTime};
use crate::error::TourResult;
use crate::events::{EventBus, TourObserver};
use crate::geometry::Point;
use crate::heuristics::TourProcess;
use crate::tour::{HistoryStack, TourSnapshot, TourState};

pub use controller::{Candidate, GuidanceHint, UndoOutcome, DEFAULT_CANDIDATE_LIMIT};

/// Per-session process flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFlags {
    /// A heuristic process is active.
    pub running: bool,
    /// The active process has been asked to stop at its next resume.
    pub interrupted: bool,
}

#[derive(Debug)]
struct ActiveProcess {
    generation: u64,
    process: Box<dyn TourProcess>,
}

/// One interactive tour-construction session.
#[derive(Debug)]
pub struct TourSession {
    config: EngineConfig,
    tour: TourState,
    history: HistoryStack,
    rng: SimRng,
    events: EventBus,
    scheduler: ResumeScheduler,
    now: SimTime,
    flags: SessionFlags,
    active: Option<ActiveProcess>,
    generation: u64,
}

impl TourSession {
    /// Create a session over `points`.
    ///
    /// # Errors
    ///
    /// Returns an error if `points` is empty or `config` fails validation.
    pub fn new(points: impl Into<Vec<Point>>, config: EngineConfig) -> TourResult<Self> {
        config.check()?;
        let tour = TourState::new(points.into())?;
        log::debug!(
            "new session over {} points (seed {}, history {})",
            tour.point_count(),
            config.seed,
            config.history_capacity
        );
        Ok(Self {
            history: HistoryStack::new(config.history_capacity),
            rng: SimRng::new(config.seed),
            config,
            tour,
            events: EventBus::new(),
            scheduler: ResumeScheduler::new(),
            now: SimTime::ZERO,
            flags: SessionFlags::default(),
            active: None,
            generation: 0,
        })
    }

    /// Create a session with [`EngineConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns `PreconditionNotMet` if `points` is empty.
    pub fn with_default_config(points: impl Into<Vec<Point>>) -> TourResult<Self> {
        Self::new(points, EngineConfig::default())
    }

    /// Register an observer for every subsequent event.
    pub fn subscribe(&mut self, observer: Box<dyn TourObserver>) {
        self.events.subscribe(observer);
    }

    /// Current read model. Calling it repeatedly without a command in between
    /// returns equal values.
    #[must_use]
    pub fn snapshot(&self) -> TourSnapshot {
        self.tour.view()
    }

    #[must_use]
    pub const fn tour(&self) -> &TourState {
        &self.tour
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn flags(&self) -> SessionFlags {
        self.flags
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.flags.running
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Step events emitted so far.
    #[must_use]
    pub const fn committed_steps(&self) -> u64 {
        self.events.committed()
    }

    /// Discard the tour, history and any running process, and reseed the RNG.
    ///
    /// The virtual clock keeps running.
    pub fn reset(&mut self) {
        if let Some(active) = self.active.take() {
            self.scheduler.cancel(active.generation);
            log::info!("{} dropped by reset", active.process.kind());
        }
        self.flags = SessionFlags::default();
        self.history.clear();
        self.tour.clear();
        self.rng.reseed(self.config.seed);
        self.events.refresh(&self.tour.view());
    }
}
