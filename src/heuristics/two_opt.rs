//! Best-improvement 2-opt over a closed tour.
//!
//! A move `(i, j)` removes edges `(t[i], t[i+1])` and `(t[j], t[d])` with
//! `d = (j + 1) mod k`, then reconnects by reversing `t[i+1..=j]`:
//!
//! ```text
//! before:  t[i] ── t[i+1] ... t[j] ── t[d]
//! after:   t[i] ── t[j] ... t[i+1] ── t[d]
//! ```
//!
//! The closing entry `t[k-1] == t[0]` is scanned like any other position. The
//! zero-length edge it forms can never yield a positive gain, so a committed
//! swap never moves it.

use crate::engine::SimTime;
use crate::error::TourResult;
use crate::events::{Edge, SwapHighlight};
use crate::heuristics::{HeuristicKind, ProcessStep, StepContext, Termination, TourProcess};
use crate::tour::TourState;

/// Minimum gain for a swap to count as improving.
pub const DEFAULT_IMPROVEMENT_THRESHOLD: f64 = 0.1;

/// A candidate 2-opt move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapMove {
    pub i: usize,
    pub j: usize,
    pub gain: f64,
}

impl SwapMove {
    /// Tour positions reversed when the move is applied.
    #[must_use]
    pub const fn segment(&self) -> (usize, usize) {
        (self.i + 1, self.j)
    }
}

/// Length saved by move `(i, j)` on `tour`. Requires `i + 1 < j < k`.
#[must_use]
pub(crate) fn swap_gain(tour: &TourState, i: usize, j: usize) -> f64 {
    let t = tour.visits();
    let d = (j + 1) % t.len();
    tour.distance_between(t[i], t[i + 1]) + tour.distance_between(t[j], t[d])
        - tour.distance_between(t[i], t[j])
        - tour.distance_between(t[i + 1], t[d])
}

/// Best move whose gain exceeds `threshold`.
///
/// Pairs are scanned with `i` ascending, then `j` ascending; a later pair only
/// replaces the incumbent when its gain is strictly greater.
#[must_use]
pub fn best_improving_swap(tour: &TourState, threshold: f64) -> Option<SwapMove> {
    let k = tour.len();
    if k < 4 {
        return None;
    }

    let mut best: Option<SwapMove> = None;
    let mut best_gain = threshold;
    for i in 0..k - 2 {
        for j in i + 2..k {
            let gain = swap_gain(tour, i, j);
            if gain > best_gain {
                best_gain = gain;
                best = Some(SwapMove { i, j, gain });
            }
        }
    }
    best
}

/// Whether any move gains more than `threshold`.
#[must_use]
pub fn has_improving_swap(tour: &TourState, threshold: f64) -> bool {
    let k = tour.len();
    if k < 4 {
        return false;
    }
    (0..k - 2).any(|i| (i + 2..k).any(|j| swap_gain(tour, i, j) > threshold))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Scan,
    Pending(SwapMove),
}

/// Repeated best-improvement passes until no move clears the threshold.
///
/// Each swap takes two resumes: one to preview it, one to commit it.
#[derive(Debug, Clone)]
pub struct TwoOptProcess {
    threshold: f64,
    preview_delay: SimTime,
    settle_delay: SimTime,
    phase: Phase,
    swaps: usize,
}

impl TwoOptProcess {
    #[must_use]
    pub const fn new(threshold: f64, preview_delay: SimTime, settle_delay: SimTime) -> Self {
        Self {
            threshold,
            preview_delay,
            settle_delay,
            phase: Phase::Scan,
            swaps: 0,
        }
    }

    /// Swaps committed so far.
    #[must_use]
    pub const fn swaps(&self) -> usize {
        self.swaps
    }

    fn preview(mv: &SwapMove, tour: &TourState) -> SwapHighlight {
        let t = tour.visits();
        let d = (mv.j + 1) % t.len();
        SwapHighlight::Preview {
            removed: [Edge::new(t[mv.i], t[mv.i + 1]), Edge::new(t[mv.j], t[d])],
            added: [Edge::new(t[mv.i], t[mv.j]), Edge::new(t[mv.i + 1], t[d])],
            gain: mv.gain,
        }
    }

    fn settled(mv: &SwapMove, tour: &TourState) -> SwapHighlight {
        let t = tour.visits();
        let d = (mv.j + 1) % t.len();
        SwapHighlight::Settled {
            edges: [Edge::new(t[mv.i], t[mv.i + 1]), Edge::new(t[mv.j], t[d])],
        }
    }
}

impl TourProcess for TwoOptProcess {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::TwoOpt
    }

    fn resume(&mut self, ctx: &mut StepContext<'_>) -> TourResult<ProcessStep> {
        if ctx.is_interrupted() {
            return Ok(ProcessStep::Finished(Termination::Interrupted));
        }

        match self.phase {
            Phase::Scan => {
                let Some(mv) = best_improving_swap(ctx.tour(), self.threshold) else {
                    log::debug!("2-opt locally optimal after {} swaps", self.swaps);
                    return Ok(ProcessStep::Finished(Termination::Completed));
                };
                let highlight = Self::preview(&mv, ctx.tour());
                ctx.highlight(highlight);
                self.phase = Phase::Pending(mv);
                Ok(ProcessStep::Suspend(self.preview_delay))
            }
            Phase::Pending(mv) => {
                let (start, end) = mv.segment();
                ctx.commit_reversal(start, end)?;
                self.swaps += 1;
                let highlight = Self::settled(&mv, ctx.tour());
                ctx.highlight(highlight);
                self.phase = Phase::Scan;
                Ok(ProcessStep::Suspend(self.settle_delay))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SimRng;
    use crate::events::{EngineEvent, EventBus, EventLog, StepEvent};
    use crate::geometry::Point;
    use crate::tour::HistoryStack;

    /// `(0,0),(10,0),(0,10),(10,10)`: visiting 0,2,1,3 crosses itself.
    fn crossed_points() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
        ]
    }

    fn tour_with(points: Vec<Point>, visits: &[usize]) -> TourState {
        let mut tour = TourState::new(points).expect("non-empty");
        for &v in visits {
            tour.append(v).expect("valid");
        }
        tour
    }

    fn octagon() -> Vec<Point> {
        (0u32..8)
            .map(|i| {
                let theta = f64::from(i) * std::f64::consts::TAU / 8.0;
                Point::new(50.0 * theta.cos(), 50.0 * theta.sin())
            })
            .collect()
    }

    #[test]
    fn test_swap_gain_crossed() {
        let tour = tour_with(crossed_points(), &[0, 2, 1, 3, 0]);
        let expected = 2.0 * 200f64.sqrt() - 20.0;
        assert!((swap_gain(&tour, 1, 3) - expected).abs() < 1e-9);
        assert!(swap_gain(&tour, 0, 2).abs() < 1e-9);
    }

    #[test]
    fn test_best_improving_swap_crossed() {
        let tour = tour_with(crossed_points(), &[0, 2, 1, 3, 0]);
        let mv = best_improving_swap(&tour, DEFAULT_IMPROVEMENT_THRESHOLD).expect("improvable");
        assert_eq!((mv.i, mv.j), (1, 3));
        assert_eq!(mv.segment(), (2, 3));
        assert!(has_improving_swap(&tour, DEFAULT_IMPROVEMENT_THRESHOLD));
    }

    #[test]
    fn test_convex_polygon_is_optimal() {
        let visits: Vec<usize> = (0..8).chain(std::iter::once(0)).collect();
        let tour = tour_with(octagon(), &visits);
        assert!(!has_improving_swap(&tour, DEFAULT_IMPROVEMENT_THRESHOLD));
        assert!(best_improving_swap(&tour, DEFAULT_IMPROVEMENT_THRESHOLD).is_none());
    }

    #[test]
    fn test_short_tours_have_no_swap() {
        let tour = tour_with(crossed_points(), &[0, 2, 1]);
        assert!(!has_improving_swap(&tour, 0.0));
        assert!(best_improving_swap(&tour, 0.0).is_none());
    }

    #[test]
    fn test_threshold_is_strict() {
        let tour = tour_with(crossed_points(), &[0, 2, 1, 3, 0]);
        let gain = swap_gain(&tour, 1, 3);
        assert!(!has_improving_swap(&tour, gain));
        assert!(has_improving_swap(&tour, gain - 1e-6));
    }

    #[test]
    fn test_process_converges_on_crossed_square() {
        let mut tour = tour_with(crossed_points(), &[0, 2, 1, 3, 0]);
        assert!((tour.route_length() - (20.0 + 2.0 * 200f64.sqrt())).abs() < 1e-9);

        let mut history = HistoryStack::default();
        let mut rng = SimRng::new(0);
        let log = EventLog::new();
        let mut events = EventBus::new();
        events.subscribe(Box::new(log.clone()));

        let mut process = TwoOptProcess::new(
            DEFAULT_IMPROVEMENT_THRESHOLD,
            SimTime::from_millis(1000),
            SimTime::from_millis(1000),
        );
        let termination = loop {
            let mut ctx = StepContext::new(&mut tour, &mut history, &mut rng, &mut events, false);
            match process.resume(&mut ctx).expect("commits") {
                ProcessStep::Suspend(_) => {}
                ProcessStep::Finished(t) => break t,
            }
        };

        assert_eq!(termination, Termination::Completed);
        assert_eq!(process.swaps(), 1);
        assert!((tour.route_length() - 40.0).abs() < 1e-9);
        assert_eq!(tour.visits(), &[0, 2, 3, 1, 0]);
        assert_eq!(history.len(), 1);
        assert_eq!(log.steps(), vec![StepEvent::Swap { start: 2, end: 3 }]);

        let highlights: Vec<SwapHighlight> = log
            .events()
            .into_iter()
            .filter_map(|e| match e {
                EngineEvent::Highlight(h) => Some(h),
                _ => None,
            })
            .collect();
        assert_eq!(highlights.len(), 2);
        assert!(matches!(highlights[0], SwapHighlight::Preview { .. }));
        assert_eq!(
            highlights[1],
            SwapHighlight::Settled {
                edges: [Edge::new(2, 3), Edge::new(1, 0)]
            }
        );
    }

    #[test]
    fn test_interrupt_between_preview_and_commit() {
        let mut tour = tour_with(crossed_points(), &[0, 2, 1, 3, 0]);
        let mut history = HistoryStack::default();
        let mut rng = SimRng::new(0);
        let mut events = EventBus::new();
        let mut process = TwoOptProcess::new(0.1, SimTime::ZERO, SimTime::ZERO);

        let mut ctx = StepContext::new(&mut tour, &mut history, &mut rng, &mut events, false);
        assert!(matches!(
            process.resume(&mut ctx),
            Ok(ProcessStep::Suspend(_))
        ));

        let mut ctx = StepContext::new(&mut tour, &mut history, &mut rng, &mut events, true);
        assert_eq!(
            process.resume(&mut ctx).ok(),
            Some(ProcessStep::Finished(Termination::Interrupted))
        );
        assert_eq!(tour.visits(), &[0, 2, 1, 3, 0]);
        assert!(history.is_empty());
    }
}
