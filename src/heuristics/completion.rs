//! Nearest-neighbor and random completion.
//!
//! Both extend the tour one point per resume from its current last point
//! until every point is visited, then close it. They differ only in how the
//! next point is chosen.

use crate::engine::{SimRng, SimTime};
use crate::error::TourResult;
use crate::heuristics::{HeuristicKind, ProcessStep, StepContext, Termination, TourProcess};
use crate::tour::TourState;

/// How the next point is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionRule {
    /// Closest unvisited point; the lowest index wins ties.
    Nearest,
    /// Uniformly random unvisited point.
    Random,
}

/// Closest unvisited point to the tour's last point.
///
/// Unvisited points are scanned in ascending index order and a candidate only
/// replaces the incumbent when strictly closer, so the first-seen minimum wins.
#[must_use]
pub fn nearest_unvisited(tour: &TourState) -> Option<usize> {
    let current = tour.last()?;
    let mut best = None;
    let mut best_dist = f64::INFINITY;

    for candidate in tour.unvisited() {
        let d = tour.distance_between(current, candidate);
        if d < best_dist {
            best_dist = d;
            best = Some(candidate);
        }
    }

    best
}

/// Uniformly random unvisited point.
pub fn random_unvisited(tour: &TourState, rng: &mut SimRng) -> Option<usize> {
    let unvisited: Vec<usize> = tour.unvisited().collect();
    rng.choose(&unvisited).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Extending,
    Closed,
}

/// Completes an open tour, one committed append per resume.
#[derive(Debug, Clone)]
pub struct CompletionProcess {
    rule: CompletionRule,
    delay: SimTime,
    phase: Phase,
}

impl CompletionProcess {
    #[must_use]
    pub const fn new(rule: CompletionRule, delay: SimTime) -> Self {
        Self {
            rule,
            delay,
            phase: Phase::Extending,
        }
    }

    #[must_use]
    pub const fn nearest(delay: SimTime) -> Self {
        Self::new(CompletionRule::Nearest, delay)
    }

    #[must_use]
    pub const fn random(delay: SimTime) -> Self {
        Self::new(CompletionRule::Random, delay)
    }

    fn select_next(&self, ctx: &mut StepContext<'_>) -> Option<usize> {
        match self.rule {
            CompletionRule::Nearest => nearest_unvisited(ctx.tour()),
            CompletionRule::Random => {
                let (tour, rng) = ctx.tour_and_rng();
                random_unvisited(tour, rng)
            }
        }
    }
}

impl TourProcess for CompletionProcess {
    fn kind(&self) -> HeuristicKind {
        match self.rule {
            CompletionRule::Nearest => HeuristicKind::NearestNeighbor,
            CompletionRule::Random => HeuristicKind::Random,
        }
    }

    fn resume(&mut self, ctx: &mut StepContext<'_>) -> TourResult<ProcessStep> {
        if ctx.is_interrupted() {
            return Ok(ProcessStep::Finished(Termination::Interrupted));
        }
        if self.phase == Phase::Closed {
            return Ok(ProcessStep::Finished(Termination::Completed));
        }

        if let Some(next) = self.select_next(ctx) {
            ctx.commit_append(next)?;
            return Ok(ProcessStep::Suspend(self.delay));
        }

        // Every point visited: close the cycle, then wait once more.
        if ctx.tour().can_close() {
            if let Some(start) = ctx.tour().first() {
                ctx.commit_append(start)?;
                self.phase = Phase::Closed;
                return Ok(ProcessStep::Suspend(self.delay));
            }
        }

        Ok(ProcessStep::Finished(Termination::Completed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventBus, EventLog, StepEvent};
    use crate::geometry::Point;
    use crate::tour::HistoryStack;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    /// Drive a process to completion without a scheduler.
    fn drive(
        process: &mut CompletionProcess,
        tour: &mut TourState,
        history: &mut HistoryStack,
        rng: &mut SimRng,
        events: &mut EventBus,
    ) -> (Termination, usize) {
        let mut suspensions = 0;
        loop {
            let mut ctx = StepContext::new(tour, history, rng, events, false);
            match process.resume(&mut ctx).expect("step commits") {
                ProcessStep::Suspend(_) => suspensions += 1,
                ProcessStep::Finished(t) => return (t, suspensions),
            }
        }
    }

    #[test]
    fn test_nearest_unvisited_tie_breaks_low_index() {
        // Points 1 and 3 are both 10 away from point 0.
        let mut tour = TourState::new(square()).expect("non-empty");
        tour.append(0).expect("start");
        assert_eq!(nearest_unvisited(&tour), Some(1));

        tour.append(1).expect("append");
        assert_eq!(nearest_unvisited(&tour), Some(2));
    }

    #[test]
    fn test_nearest_unvisited_empty_tour() {
        let tour = TourState::new(square()).expect("non-empty");
        assert_eq!(nearest_unvisited(&tour), None);
    }

    #[test]
    fn test_random_unvisited_only_unvisited() {
        let mut tour = TourState::new(square()).expect("non-empty");
        tour.append(0).expect("start");
        tour.append(2).expect("append");
        let mut rng = SimRng::new(42);
        for _ in 0..50 {
            let pick = random_unvisited(&tour, &mut rng);
            assert!(matches!(pick, Some(1 | 3)), "picked {pick:?}");
        }
    }

    #[test]
    fn test_nearest_completion_square() {
        let mut tour = TourState::new(square()).expect("non-empty");
        tour.append(0).expect("start");
        let mut history = HistoryStack::default();
        let mut rng = SimRng::new(42);
        let log = EventLog::new();
        let mut events = EventBus::new();
        events.subscribe(Box::new(log.clone()));

        let mut process = CompletionProcess::nearest(SimTime::from_millis(500));
        let (termination, suspensions) =
            drive(&mut process, &mut tour, &mut history, &mut rng, &mut events);

        assert_eq!(termination, Termination::Completed);
        assert_eq!(tour.visits(), &[0, 1, 2, 3, 0]);
        assert!((tour.route_length() - 40.0).abs() < 1e-9);
        // Three appends and the close, each followed by a suspension.
        assert_eq!(suspensions, 4);
        assert_eq!(history.len(), 4);
        assert_eq!(
            log.steps().last().copied(),
            Some(StepEvent::Close { point: 0 })
        );
    }

    #[test]
    fn test_random_completion_draws_like_random_unvisited() {
        let mut expected_tour = TourState::new(square()).expect("non-empty");
        expected_tour.append(0).expect("start");
        let expected = random_unvisited(&expected_tour, &mut SimRng::new(3));

        let mut tour = expected_tour.clone();
        let mut history = HistoryStack::default();
        let mut rng = SimRng::new(3);
        let mut events = EventBus::new();
        let mut process = CompletionProcess::random(SimTime::ZERO);
        let mut ctx = StepContext::new(&mut tour, &mut history, &mut rng, &mut events, false);
        process.resume(&mut ctx).expect("step commits");

        assert_eq!(tour.visits().get(1).copied(), expected);
    }

    #[test]
    fn test_random_completion_visits_everything() {
        let points: Vec<Point> = (0u32..12)
            .map(|i| Point::new(f64::from(i) * 3.0, f64::from(i % 4)))
            .collect();
        let mut tour = TourState::new(points).expect("non-empty");
        tour.append(5).expect("start");
        let mut history = HistoryStack::default();
        let mut rng = SimRng::new(9);
        let mut events = EventBus::new();

        let mut process = CompletionProcess::random(SimTime::from_millis(250));
        let (termination, _) = drive(&mut process, &mut tour, &mut history, &mut rng, &mut events);

        assert_eq!(termination, Termination::Completed);
        assert!(tour.is_closed());
        assert_eq!(tour.first(), Some(5));
        assert_eq!(tour.last(), Some(5));
        assert_eq!(events.committed(), 12);
    }

    #[test]
    fn test_random_completion_reproducible() {
        let run = |seed: u64| {
            let points: Vec<Point> = (0u32..10)
                .map(|i| Point::new(f64::from(i), f64::from(i * i)))
                .collect();
            let mut tour = TourState::new(points).expect("non-empty");
            tour.append(0).expect("start");
            let mut history = HistoryStack::default();
            let mut rng = SimRng::new(seed);
            let mut events = EventBus::new();
            let mut process = CompletionProcess::random(SimTime::ZERO);
            drive(&mut process, &mut tour, &mut history, &mut rng, &mut events);
            tour.visits().to_vec()
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_interrupted_before_first_step() {
        let mut tour = TourState::new(square()).expect("non-empty");
        tour.append(0).expect("start");
        let mut history = HistoryStack::default();
        let mut rng = SimRng::new(1);
        let mut events = EventBus::new();
        let mut process = CompletionProcess::nearest(SimTime::from_millis(500));

        let mut ctx = StepContext::new(&mut tour, &mut history, &mut rng, &mut events, true);
        let step = process.resume(&mut ctx).expect("no commit");

        assert_eq!(step, ProcessStep::Finished(Termination::Interrupted));
        assert_eq!(tour.visits(), &[0]);
        assert!(history.is_empty());
    }

    #[test]
    fn test_single_point_completes_without_closing() {
        let mut tour = TourState::new(vec![Point::new(0.0, 0.0)]).expect("non-empty");
        tour.append(0).expect("start");
        let mut history = HistoryStack::default();
        let mut rng = SimRng::new(1);
        let mut events = EventBus::new();
        let mut process = CompletionProcess::nearest(SimTime::from_millis(500));

        let (termination, suspensions) =
            drive(&mut process, &mut tour, &mut history, &mut rng, &mut events);

        assert_eq!(termination, Termination::Completed);
        assert_eq!(suspensions, 0);
        assert_eq!(tour.visits(), &[0]);
    }

    #[test]
    fn test_kind() {
        assert_eq!(
            CompletionProcess::nearest(SimTime::ZERO).kind(),
            HeuristicKind::NearestNeighbor
        );
        assert_eq!(
            CompletionProcess::random(SimTime::ZERO).kind(),
            HeuristicKind::Random
        );
    }
}
