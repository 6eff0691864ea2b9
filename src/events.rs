//! Step events and the observer seam.
//!
//! The engine retains no past events. Everything a renderer needs arrives
//! through [`TourObserver`] as it happens, or is polled as a
//! [`TourSnapshot`](crate::tour::TourSnapshot).

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::heuristics::{HeuristicKind, Termination};
use crate::tour::TourSnapshot;

/// An edge between two points, by point index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
}

impl Edge {
    #[must_use]
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

/// One committed mutation of the tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepEvent {
    /// `point` was appended at tour position `position`.
    Append { point: usize, position: usize },
    /// The start point `point` was re-appended, closing the cycle.
    Close { point: usize },
    /// Tour positions `start..=end` were reversed.
    Swap { start: usize, end: usize },
}

/// Visual cue emitted by 2-opt around a swap. Never mutates the tour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SwapHighlight {
    /// Edges about to be replaced, and their replacements.
    Preview {
        removed: [Edge; 2],
        added: [Edge; 2],
        gain: f64,
    },
    /// The two edges created by the swap just committed.
    Settled { edges: [Edge; 2] },
}

/// Everything an observer can be told, as a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    Step(StepEvent),
    Highlight(SwapHighlight),
    Refresh(TourSnapshot),
    ProcessStarted(HeuristicKind),
    ProcessFinished {
        kind: HeuristicKind,
        termination: Termination,
    },
}

/// Subscriber to engine activity.
///
/// Only [`TourObserver::on_step`] is required; it fires once per committed
/// mutation, manual or heuristic.
pub trait TourObserver {
    /// A mutation was committed.
    fn on_step(&mut self, event: &StepEvent);

    /// 2-opt is about to swap, or just swapped.
    fn on_highlight(&mut self, _highlight: &SwapHighlight) {}

    /// The tour changed without a step event (undo); redraw from scratch.
    fn on_refresh(&mut self, _snapshot: &TourSnapshot) {}

    fn on_process_started(&mut self, _kind: HeuristicKind) {}

    fn on_process_finished(&mut self, _kind: HeuristicKind, _termination: Termination) {}
}

/// Adapts a closure into a step-only observer.
pub struct StepCallback<F>(pub F);

impl<F: FnMut(&StepEvent)> TourObserver for StepCallback<F> {
    fn on_step(&mut self, event: &StepEvent) {
        (self.0)(event);
    }
}

/// Records every event; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<EngineEvent>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.borrow().clone()
    }

    /// Only the step events, in order.
    #[must_use]
    pub fn steps(&self) -> Vec<StepEvent> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                EngineEvent::Step(step) => Some(*step),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn record(&self, event: EngineEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl TourObserver for EventLog {
    fn on_step(&mut self, event: &StepEvent) {
        self.record(EngineEvent::Step(*event));
    }

    fn on_highlight(&mut self, highlight: &SwapHighlight) {
        self.record(EngineEvent::Highlight(*highlight));
    }

    fn on_refresh(&mut self, snapshot: &TourSnapshot) {
        self.record(EngineEvent::Refresh(snapshot.clone()));
    }

    fn on_process_started(&mut self, kind: HeuristicKind) {
        self.record(EngineEvent::ProcessStarted(kind));
    }

    fn on_process_finished(&mut self, kind: HeuristicKind, termination: Termination) {
        self.record(EngineEvent::ProcessFinished { kind, termination });
    }
}

/// Fan-out to every subscribed observer.
#[derive(Default)]
pub struct EventBus {
    observers: Vec<Box<dyn TourObserver>>,
    committed: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .field("committed", &self.committed)
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn TourObserver>) {
        self.observers.push(observer);
    }

    /// Number of step events emitted since creation.
    #[must_use]
    pub const fn committed(&self) -> u64 {
        self.committed
    }

    pub fn step(&mut self, event: &StepEvent) {
        self.committed += 1;
        for observer in &mut self.observers {
            observer.on_step(event);
        }
    }

    pub fn highlight(&mut self, highlight: &SwapHighlight) {
        for observer in &mut self.observers {
            observer.on_highlight(highlight);
        }
    }

    pub fn refresh(&mut self, snapshot: &TourSnapshot) {
        for observer in &mut self.observers {
            observer.on_refresh(snapshot);
        }
    }

    pub fn process_started(&mut self, kind: HeuristicKind) {
        for observer in &mut self.observers {
            observer.on_process_started(kind);
        }
    }

    pub fn process_finished(&mut self, kind: HeuristicKind, termination: Termination) {
        for observer in &mut self.observers {
            observer.on_process_finished(kind, termination);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_shared_between_clones() {
        let log = EventLog::new();
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(log.clone()));

        bus.step(&StepEvent::Append {
            point: 3,
            position: 0,
        });
        bus.step(&StepEvent::Close { point: 3 });

        assert_eq!(log.len(), 2);
        assert_eq!(bus.committed(), 2);
        assert_eq!(
            log.steps(),
            vec![
                StepEvent::Append {
                    point: 3,
                    position: 0
                },
                StepEvent::Close { point: 3 }
            ]
        );
    }

    #[test]
    fn test_highlight_not_counted_as_step() {
        let log = EventLog::new();
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(log.clone()));

        bus.highlight(&SwapHighlight::Settled {
            edges: [Edge::new(0, 1), Edge::new(2, 3)],
        });

        assert_eq!(bus.committed(), 0);
        assert_eq!(log.len(), 1);
        assert!(log.steps().is_empty());
    }

    #[test]
    fn test_step_callback() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(StepCallback(move |e: &StepEvent| {
            sink.borrow_mut().push(*e);
        })));

        bus.step(&StepEvent::Swap { start: 1, end: 3 });
        bus.highlight(&SwapHighlight::Settled {
            edges: [Edge::new(0, 1), Edge::new(2, 3)],
        });

        assert_eq!(*seen.borrow(), vec![StepEvent::Swap { start: 1, end: 3 }]);
    }

    #[test]
    fn test_step_event_serialization() {
        let json = serde_json::to_string(&StepEvent::Append {
            point: 2,
            position: 1,
        })
        .expect("serialize");
        assert!(json.contains("\"kind\":\"append\""));
        assert!(json.contains("\"point\":2"));
    }

    #[test]
    fn test_event_log_clear() {
        let log = EventLog::new();
        let mut observer = log.clone();
        observer.on_process_started(HeuristicKind::TwoOpt);
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_bus_debug() {
        let bus = EventBus::new();
        assert!(format!("{bus:?}").contains("EventBus"));
    }
}
