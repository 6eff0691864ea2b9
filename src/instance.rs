//! Point-set instances loaded from YAML or JSON.
//!
//! # Example YAML
//!
//! ```yaml
//! meta:
//!   id: "SQUARE-4"
//!   description: "Unit square scaled by ten"
//!   units: "px"
//!
//! points:
//!   - { name: "A", x: 0, y: 0 }
//!   - { name: "B", x: 10, y: 0 }
//!   - { name: "C", x: 10, y: 10 }
//!   - { name: "D", x: 0, y: 10 }
//! ```
//!
//! Point indices are list positions; names are for display only.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{TourError, TourResult};
use crate::geometry::Point;

/// Metadata about the instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceMeta {
    /// Unique instance identifier.
    pub id: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Coordinate units (e.g. "px", "km").
    #[serde(default = "default_units")]
    pub units: String,
}

fn default_units() -> String {
    "px".to_string()
}

impl Default for InstanceMeta {
    fn default() -> Self {
        Self {
            id: "UNNAMED".to_string(),
            description: String::new(),
            units: default_units(),
        }
    }
}

/// A named point of the instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPoint {
    #[serde(default)]
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl NamedPoint {
    #[must_use]
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }

    #[must_use]
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A complete instance file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TourInstance {
    #[serde(default)]
    pub meta: InstanceMeta,
    pub points: Vec<NamedPoint>,
}

impl TourInstance {
    /// Build an instance from bare coordinates, naming points by index.
    #[must_use]
    pub fn from_points(id: impl Into<String>, points: &[Point]) -> Self {
        Self {
            meta: InstanceMeta {
                id: id.into(),
                ..InstanceMeta::default()
            },
            points: points
                .iter()
                .enumerate()
                .map(|(i, p)| NamedPoint::new(i.to_string(), p.x, p.y))
                .collect(),
        }
    }

    /// Parse and validate an instance from YAML.
    ///
    /// # Errors
    ///
    /// Returns `YamlParse` for malformed input, `Config` for invalid points.
    pub fn from_yaml(yaml: &str) -> TourResult<Self> {
        let instance: Self = serde_yaml::from_str(yaml)?;
        instance.validate()?;
        Ok(instance)
    }

    /// Parse and validate an instance from JSON.
    ///
    /// # Errors
    ///
    /// Returns `JsonParse` for malformed input, `Config` for invalid points.
    pub fn from_json(json: &str) -> TourResult<Self> {
        let instance: Self = serde_json::from_str(json)?;
        instance.validate()?;
        Ok(instance)
    }

    /// Load an instance file; `.json` files are read as JSON, anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed, or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> TourResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> TourResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject empty point lists and non-finite coordinates.
    ///
    /// # Errors
    ///
    /// Returns `Config` naming the first offending point.
    pub fn validate(&self) -> TourResult<()> {
        if self.points.is_empty() {
            return Err(TourError::config(format!(
                "instance {} has no points",
                self.meta.id
            )));
        }
        if let Some((i, p)) = self
            .points
            .iter()
            .enumerate()
            .find(|(_, p)| !p.point().is_finite())
        {
            return Err(TourError::config(format!(
                "point {i} ({}) has non-finite coordinates ({}, {})",
                p.name, p.x, p.y
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Coordinates in index order, ready for a session.
    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        self.points.iter().map(NamedPoint::point).collect()
    }

    /// Display name of point `idx`.
    #[must_use]
    pub fn name_of(&self, idx: usize) -> Option<&str> {
        self.points.get(idx).map(|p| p.name.as_str())
    }
}
