//! Cancellable, steppable tour heuristics.
//!
//! Each heuristic is a resumable state machine. A call to
//! [`TourProcess::resume`] commits at most one step and then either asks to be
//! suspended for a delay or reports that it has finished:
//!
//! ```text
//! resume ──► check interrupted ──► commit one step ──► Suspend(delay)
//!                  │                                        │
//!                  └──────────► Finished ◄──── nothing left ┘
//! ```
//!
//! Interruption is cooperative: a process only observes it at the top of a
//! resume, so a committed step is never rolled back.

pub mod completion;
pub mod two_opt;

use serde::{Deserialize, Serialize};

use crate::engine::{SimRng, SimTime};
use crate::error::TourResult;
use crate::events::{EventBus, StepEvent, SwapHighlight};
use crate::tour::{AppendKind, HistoryStack, TourState};

pub use completion::{nearest_unvisited, random_unvisited, CompletionProcess, CompletionRule};
pub use two_opt::{
    best_improving_swap, has_improving_swap, SwapMove, TwoOptProcess,
    DEFAULT_IMPROVEMENT_THRESHOLD,
};

/// The three processes a session can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicKind {
    NearestNeighbor,
    Random,
    TwoOpt,
}

impl std::fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NearestNeighbor => "nearest-neighbor completion",
            Self::Random => "random completion",
            Self::TwoOpt => "2-opt improvement",
        };
        f.write_str(name)
    }
}

/// Why a process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Ran to its natural end (tour closed, or 2-opt locally optimal).
    Completed,
    /// Stopped at a suspension point because an interrupt was requested.
    Interrupted,
    /// A step failed to commit; the tour keeps every step committed before it.
    Aborted,
}

/// Result of one resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStep {
    /// Resume again after this much virtual time.
    Suspend(SimTime),
    /// The process is done and must not be resumed again.
    Finished(Termination),
}

/// A heuristic expressed as a resumable state machine.
pub trait TourProcess: std::fmt::Debug {
    fn kind(&self) -> HeuristicKind;

    /// Run until the next suspension point.
    ///
    /// # Errors
    ///
    /// Returns an error if a step could not be committed.
    fn resume(&mut self, ctx: &mut StepContext<'_>) -> TourResult<ProcessStep>;
}

/// Everything a step may touch, borrowed from the session for one resume.
///
/// Every mutation goes through a `commit_*` method, which pushes the
/// pre-mutation snapshot, mutates, and emits the step event, in that order.
pub struct StepContext<'a> {
    tour: &'a mut TourState,
    history: &'a mut HistoryStack,
    rng: &'a mut SimRng,
    events: &'a mut EventBus,
    interrupted: bool,
}

impl<'a> StepContext<'a> {
    pub(crate) fn new(
        tour: &'a mut TourState,
        history: &'a mut HistoryStack,
        rng: &'a mut SimRng,
        events: &'a mut EventBus,
        interrupted: bool,
    ) -> Self {
        Self {
            tour,
            history,
            rng,
            events,
            interrupted,
        }
    }

    #[must_use]
    pub fn tour(&self) -> &TourState {
        self.tour
    }

    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn rng(&mut self) -> &mut SimRng {
        self.rng
    }

    /// Read the tour and draw from the RNG in the same expression.
    pub fn tour_and_rng(&mut self) -> (&TourState, &mut SimRng) {
        (&*self.tour, &mut *self.rng)
    }

    /// Append `idx` (or close the tour) as one undoable step.
    ///
    /// # Errors
    ///
    /// Propagates the tour's append errors; nothing is pushed or emitted then.
    pub fn commit_append(&mut self, idx: usize) -> TourResult<StepEvent> {
        let kind = self.tour.check_append(idx)?;
        let position = self.tour.len();
        self.history.push(self.tour.snapshot());
        self.tour.append(idx)?;

        let event = match kind {
            AppendKind::Extended => StepEvent::Append {
                point: idx,
                position,
            },
            AppendKind::Closed => StepEvent::Close { point: idx },
        };
        log::debug!("committed {event:?}, route length {:.1}", self.tour.route_length());
        self.events.step(&event);
        Ok(event)
    }

    /// Reverse tour positions `start..=end` as one undoable step.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIndex` for an out-of-range segment; nothing is pushed then.
    pub fn commit_reversal(&mut self, start: usize, end: usize) -> TourResult<StepEvent> {
        let snapshot = self.tour.snapshot();
        self.tour.reverse_segment(start, end)?;
        self.history.push(snapshot);

        let event = StepEvent::Swap { start, end };
        log::debug!("committed {event:?}, route length {:.1}", self.tour.route_length());
        self.events.step(&event);
        Ok(event)
    }

    /// Emit a non-mutating highlight.
    pub fn highlight(&mut self, highlight: SwapHighlight) {
        self.events.highlight(&highlight);
    }
}
