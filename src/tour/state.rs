//! The tour under construction.
//!
//! A tour over `n` points holds `k` visited indices and is valid only for
//! `k` in `0..=n+1`:
//!
//! ```text
//! k <  n   partial, all entries distinct
//! k == n   every point once, open (ready to close)
//! k == n+1 closed: tour[n] == tour[0]
//! ```
//!
//! The closing append is the only place a repeated index is accepted.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{TourError, TourResult};
use crate::geometry::{distance, path_length, Point};

/// What an accepted append did to the tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppendKind {
    /// A new point was visited.
    Extended,
    /// The start point was re-appended and the tour is now a cycle.
    Closed,
}

/// Pre-mutation copy of the visit sequence, used for undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    visits: Vec<usize>,
}

impl HistorySnapshot {
    /// Visit sequence captured by this snapshot.
    #[must_use]
    pub fn visits(&self) -> &[usize] {
        &self.visits
    }
}

/// Pollable read model handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourSnapshot {
    /// Visited point indices in order.
    pub tour: Vec<usize>,
    /// Whether the tour is a closed cycle.
    pub closed: bool,
    /// Sum of consecutive edge lengths.
    pub route_length: f64,
}

/// Ordered visits over a fixed, shared point list.
#[derive(Debug, Clone)]
pub struct TourState {
    points: Arc<[Point]>,
    visits: Vec<usize>,
    visited: Vec<bool>,
}

impl TourState {
    /// Create an empty tour over `points`.
    ///
    /// # Errors
    ///
    /// Returns `PreconditionNotMet` when `points` is empty.
    pub fn new(points: impl Into<Arc<[Point]>>) -> TourResult<Self> {
        let points = points.into();
        if points.is_empty() {
            return Err(TourError::precondition("a tour needs at least one point"));
        }
        let n = points.len();
        Ok(Self {
            points,
            visits: Vec::with_capacity(n + 1),
            visited: vec![false; n],
        })
    }

    /// Number of points in the instance (`n`).
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// The shared point list.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Coordinates of point `idx`.
    #[must_use]
    pub fn point(&self, idx: usize) -> Option<Point> {
        self.points.get(idx).copied()
    }

    /// Number of entries in the tour (`k`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    /// No point selected yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Visited indices in order.
    #[must_use]
    pub fn visits(&self) -> &[usize] {
        &self.visits
    }

    /// First visited point.
    #[must_use]
    pub fn first(&self) -> Option<usize> {
        self.visits.first().copied()
    }

    /// Most recently visited point.
    #[must_use]
    pub fn last(&self) -> Option<usize> {
        self.visits.last().copied()
    }

    /// Whether `idx` has been visited.
    #[must_use]
    pub fn contains(&self, idx: usize) -> bool {
        self.visited.get(idx).copied().unwrap_or(false)
    }

    /// Number of distinct points visited so far.
    #[must_use]
    pub fn distinct_count(&self) -> usize {
        if self.is_closed() {
            self.visits.len() - 1
        } else {
            self.visits.len()
        }
    }

    /// Unvisited point indices in ascending order.
    pub fn unvisited(&self) -> impl Iterator<Item = usize> + '_ {
        self.visited
            .iter()
            .enumerate()
            .filter(|(_, &seen)| !seen)
            .map(|(i, _)| i)
    }

    /// `k == n + 1`.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.visits.len() == self.point_count() + 1
    }

    /// `k == n` and the first and last entries differ.
    #[must_use]
    pub fn can_close(&self) -> bool {
        self.visits.len() == self.point_count()
            && matches!((self.first(), self.last()), (Some(a), Some(b)) if a != b)
    }

    /// Check whether `append(idx)` would succeed, without mutating.
    ///
    /// # Errors
    ///
    /// Same as [`TourState::append`].
    pub fn check_append(&self, idx: usize) -> TourResult<AppendKind> {
        let count = self.point_count();
        if idx >= count {
            return Err(TourError::InvalidIndex { index: idx, count });
        }
        if self.is_closed() {
            return Err(TourError::TourComplete);
        }
        if !self.contains(idx) {
            return Ok(AppendKind::Extended);
        }
        if self.can_close() && self.first() == Some(idx) {
            return Ok(AppendKind::Closed);
        }
        Err(TourError::DuplicateIndex { index: idx })
    }

    /// Append a point, or close the tour by re-appending its start.
    ///
    /// # Errors
    ///
    /// - `InvalidIndex` if `idx` is not a point of the instance
    /// - `TourComplete` if the tour is already closed
    /// - `DuplicateIndex` if `idx` was visited and this is not the closing append
    pub fn append(&mut self, idx: usize) -> TourResult<AppendKind> {
        let kind = self.check_append(idx)?;
        self.visits.push(idx);
        self.visited[idx] = true;
        Ok(kind)
    }

    /// Remove and return the last entry.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTour` if there is nothing to remove.
    pub fn pop_last(&mut self) -> TourResult<usize> {
        let idx = self.visits.pop().ok_or(TourError::EmptyTour)?;
        // Popping the closing entry leaves the start point visited.
        if !self.visits.contains(&idx) {
            self.visited[idx] = false;
        }
        Ok(idx)
    }

    /// Sum of distances over consecutive entries; a closed tour includes the closing edge.
    #[must_use]
    pub fn route_length(&self) -> f64 {
        path_length(&self.points, &self.visits)
    }

    /// Distance between two points of the instance. Both indices must be in range.
    #[must_use]
    pub(crate) fn distance_between(&self, a: usize, b: usize) -> f64 {
        distance(self.points[a], self.points[b])
    }

    /// Reverse `visits[start..=end]` in place.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIndex` if the range is empty or out of bounds.
    pub(crate) fn reverse_segment(&mut self, start: usize, end: usize) -> TourResult<()> {
        if start > end || end >= self.visits.len() {
            return Err(TourError::InvalidIndex {
                index: end,
                count: self.visits.len(),
            });
        }
        self.visits[start..=end].reverse();
        Ok(())
    }

    /// Copy the visit sequence for the history stack.
    #[must_use]
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            visits: self.visits.clone(),
        }
    }

    /// Replace the visit sequence with a previously captured one.
    pub fn restore(&mut self, snapshot: &HistorySnapshot) {
        self.visits.clone_from(&snapshot.visits);
        self.visited.iter_mut().for_each(|v| *v = false);
        for &idx in &self.visits {
            if let Some(v) = self.visited.get_mut(idx) {
                *v = true;
            }
        }
    }

    /// Drop every visit.
    pub fn clear(&mut self) {
        self.visits.clear();
        self.visited.iter_mut().for_each(|v| *v = false);
    }

    /// Full read model for renderers.
    #[must_use]
    pub fn view(&self) -> TourSnapshot {
        TourSnapshot {
            tour: self.visits.clone(),
            closed: self.is_closed(),
            route_length: self.route_length(),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Whatever is clicked or popped, k stays within 0..=n+1 and the
        /// distinctness invariant holds.
        #[test]
        fn prop_length_bounds(
            n in 1usize..8,
            ops in prop::collection::vec((any::<bool>(), 0usize..10), 0..60),
        ) {
            let points: Vec<Point> = (0..n).map(|i| Point::new(i as f64, (i * i) as f64)).collect();
            let mut tour = TourState::new(points).expect("non-empty");

            for (is_append, idx) in ops {
                let before = tour.visits().to_vec();
                let result = if is_append {
                    tour.append(idx).map(|_| ())
                } else {
                    tour.pop_last().map(|_| ())
                };
                if result.is_err() {
                    prop_assert_eq!(tour.visits(), before.as_slice());
                }

                prop_assert!(tour.len() <= n + 1);
                let open = if tour.is_closed() { &tour.visits()[..n] } else { tour.visits() };
                let mut seen = vec![false; n];
                for &v in open {
                    prop_assert!(!seen[v], "duplicate {} in {:?}", v, tour.visits());
                    seen[v] = true;
                }
                if tour.is_closed() {
                    prop_assert_eq!(tour.visits()[n], tour.visits()[0]);
                }
            }
        }
    }
}
