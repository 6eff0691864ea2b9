//! User commands and the queries a renderer polls between them.

use serde::{Deserialize, Serialize};

use crate::error::{TourError, TourResult};
use crate::events::StepEvent;
use crate::heuristics::has_improving_swap;
use crate::session::coordinator::MIN_TWO_OPT_POINTS;
use crate::session::TourSession;
use crate::tour::AppendKind;

/// Number of nearest unvisited points offered as candidate edges.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 3;

/// What [`TourSession::undo_or_interrupt`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoOutcome {
    /// A process was running; it will stop at its next resume.
    InterruptRequested,
    /// The most recent history snapshot was restored.
    Restored,
    /// History was empty, so the last tour entry was removed directly.
    Removed(usize),
}

/// An unvisited point offered as the next edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub index: usize,
    pub distance: f64,
}

/// Onboarding stage shown next to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidanceHint {
    /// Nothing selected yet.
    StartTour,
    /// One point selected.
    AddAnother,
    /// Two points selected; undo is worth pointing out.
    UndoAvailable,
    None,
}

impl TourSession {
    /// Append `idx` to the tour, or close it when `idx` is the start point and
    /// every point has been visited.
    ///
    /// # Errors
    ///
    /// - `PreconditionNotMet` while a heuristic is running
    /// - any append error from [`TourState::append`](crate::tour::TourState::append)
    ///
    /// State, history and observers are untouched on error.
    pub fn select_point(&mut self, idx: usize) -> TourResult<StepEvent> {
        if self.flags.running {
            log::warn!("ignoring selection of point {idx}: a heuristic is running");
            return Err(TourError::precondition("a heuristic is running"));
        }

        let kind = self.tour.check_append(idx)?;
        let position = self.tour.len();
        self.history.push(self.tour.snapshot());
        self.tour.append(idx)?;

        let event = match kind {
            AppendKind::Extended => StepEvent::Append {
                point: idx,
                position,
            },
            AppendKind::Closed => {
                log::info!("tour closed, length {:.1}", self.tour.route_length());
                StepEvent::Close { point: idx }
            }
        };
        log::debug!("selected {event:?}");
        self.events.step(&event);
        Ok(event)
    }

    /// Interrupt the running heuristic, or undo the last step when idle.
    ///
    /// Undo restores the latest history snapshot. With the history exhausted
    /// (older entries evicted) it falls back to removing the last tour entry.
    ///
    /// # Errors
    ///
    /// Returns `NothingToUndo` when idle with an empty history and tour.
    pub fn undo_or_interrupt(&mut self) -> TourResult<UndoOutcome> {
        if self.flags.running {
            log::info!("interrupt requested");
            self.flags.interrupted = true;
            return Ok(UndoOutcome::InterruptRequested);
        }

        let outcome = if let Some(snapshot) = self.history.pop() {
            self.tour.restore(&snapshot);
            UndoOutcome::Restored
        } else {
            match self.tour.pop_last() {
                Ok(idx) => UndoOutcome::Removed(idx),
                Err(TourError::EmptyTour) => return Err(TourError::NothingToUndo),
                Err(e) => return Err(e),
            }
        };

        log::debug!("undo: {outcome:?}, {} entries left", self.tour.len());
        self.events.refresh(&self.tour.view());
        Ok(outcome)
    }

    /// Nearest-neighbor completion could start now.
    #[must_use]
    pub fn can_run_nearest_neighbor(&self) -> bool {
        self.can_complete()
    }

    /// Random completion could start now.
    #[must_use]
    pub fn can_run_random(&self) -> bool {
        self.can_complete()
    }

    /// 2-opt could start now and would change the tour.
    #[must_use]
    pub fn can_run_two_opt(&self) -> bool {
        !self.flags.running
            && self.tour.is_closed()
            && self.tour.distinct_count() >= MIN_TWO_OPT_POINTS
            && has_improving_swap(&self.tour, self.config.improvement_threshold)
    }

    fn can_complete(&self) -> bool {
        !self.flags.running && !self.tour.is_empty() && !self.tour.is_closed()
    }

    /// The `limit` closest unvisited points to the last selected one,
    /// nearest first. Equal distances list the lower index first.
    #[must_use]
    pub fn candidate_edges(&self, limit: usize) -> Vec<Candidate> {
        let Some(current) = self.tour.last() else {
            return Vec::new();
        };

        let mut candidates: Vec<Candidate> = self
            .tour
            .unvisited()
            .map(|index| Candidate {
                index,
                distance: self.tour.distance_between(current, index),
            })
            .collect();
        candidates.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.index.cmp(&b.index))
        });
        candidates.truncate(limit);
        candidates
    }

    /// Length the edge to `idx` would add, for hover feedback.
    #[must_use]
    pub fn preview_distance(&self, idx: usize) -> Option<f64> {
        let current = self.tour.last()?;
        if idx >= self.tour.point_count() || self.tour.contains(idx) {
            return None;
        }
        Some(self.tour.distance_between(current, idx))
    }

    /// The start point, once selecting it would close the tour.
    #[must_use]
    pub fn closing_target(&self) -> Option<usize> {
        if self.tour.can_close() {
            self.tour.first()
        } else {
            None
        }
    }

    #[must_use]
    pub fn hint(&self) -> GuidanceHint {
        match self.tour.len() {
            0 => GuidanceHint::StartTour,
            1 => GuidanceHint::AddAnother,
            2 => GuidanceHint::UndoAvailable,
            _ => GuidanceHint::None,
        }
    }
}
