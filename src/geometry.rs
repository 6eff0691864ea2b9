//! Planar points and the distance oracle.
//!
//! Every pairwise cost in the crate goes through [`distance`], so swapping the
//! metric means changing this one function.

use serde::{Deserialize, Serialize};

/// A point in the (already projected) plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point at coordinates (x, y).
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        distance(*self, *other)
    }

    /// Both coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Euclidean distance `sqrt((ax-bx)^2 + (ay-by)^2)`.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Length of the open path visiting `visits` in order (0 for fewer than two entries).
#[must_use]
pub fn path_length(points: &[Point], visits: &[usize]) -> f64 {
    visits
        .windows(2)
        .map(|pair| distance(points[pair[0]], points[pair[1]]))
        .sum()
}
