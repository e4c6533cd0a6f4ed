pub mod geometry;
pub mod ids;
pub mod store;

pub use store::{ConstraintStatus, PerimeterRegistry, SketchStore};

use serde::{Deserialize, Serialize};

/// A solver sketch point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchPoint {
    pub id: String,
    pub x: f64,
    pub y: f64,
    /// Fixed points are excluded from the solve (the sketch anchor).
    #[serde(default)]
    pub fixed: bool,
}

impl SketchPoint {
    /// Creates a free (non-fixed) point.
    #[must_use]
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            fixed: false,
        }
    }
}

/// A solver sketch line through two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchLine {
    pub id: String,
    pub p1: String,
    pub p2: String,
}

impl SketchLine {
    /// Creates a line between two point ids.
    #[must_use]
    pub fn new(id: impl Into<String>, p1: impl Into<String>, p2: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            p1: p1.into(),
            p2: p2.into(),
        }
    }
}

/// The solver's fixed primitive-constraint vocabulary.
///
/// The `type` tag and field names are the wire contract with the external
/// solver and must not drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintData {
    P2pDistance { p1: String, p2: String, distance: f64 },
    P2lDistance { p: String, l: String, distance: f64 },
    Parallel { l1: String, l2: String },
    Perpendicular { l1: String, l2: String },
    PointOnLine { p: String, l: String },
    /// `p` is equidistant from `p1` and `p2`.
    PointOnPerpBisector { p: String, p1: String, p2: String },
    AngleBetweenLines { l1: String, l2: String, angle: f64 },
    Horizontal { l: String },
    Vertical { l: String },
}

/// A solver primitive constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConstraint {
    pub id: String,
    #[serde(flatten)]
    pub data: ConstraintData,
    /// Driving constraints shape the solve; non-driving ones are measured
    /// only. Everything this engine emits is driving.
    #[serde(default = "default_driving")]
    pub driving: bool,
}

fn default_driving() -> bool {
    true
}

impl SolverConstraint {
    /// Creates a driving constraint.
    #[must_use]
    pub fn new(id: impl Into<String>, data: ConstraintData) -> Self {
        Self {
            id: id.into(),
            data,
            driving: true,
        }
    }
}

/// The full primitive sketch in the solver's data shape.
#[derive(Debug, Clone, Serialize)]
pub struct SolverSketch {
    pub points: Vec<SketchPoint>,
    pub lines: Vec<SketchLine>,
    pub constraints: Vec<SolverConstraint>,
}
