use thiserror::Error;

/// Top-level error type for the parietis constraint engine.
#[derive(Debug, Error)]
pub enum ParietisError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Sketch(#[from] SketchError),
}

/// Errors raised when a domain-model lookup comes back empty during
/// geometry generation or constraint resolution.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("corner not found: {0}")]
    CornerNotFound(String),

    #[error("wall not found: {0}")]
    WallNotFound(String),

    #[error("perimeter not found: {0}")]
    PerimeterNotFound(String),

    #[error("perimeter {0} is not a closed wall loop")]
    MalformedPerimeter(String),

    #[error("corner {corner} is not adjacent to exactly two walls")]
    BrokenAdjacency { corner: String },
}

/// Errors raised by the sketch store.
///
/// These are the fatal, single-call referential-integrity failures: a
/// building constraint referenced a corner or wall that has no counterpart
/// in the solver sketch. Duplicate keys and unknown-key removals are not
/// errors (they log and leave state unchanged).
#[derive(Debug, Error)]
pub enum SketchError {
    #[error("no sketch point for corner {0}")]
    CornerNotInSketch(String),

    #[error("no sketch line for wall {0}")]
    WallNotInSketch(String),

    #[error("no sketch points for wall entity {0}")]
    EntityNotInSketch(String),

    #[error("degenerate wall {0}: zero-length direction")]
    DegenerateWall(String),
}

/// Convenience type alias for results using [`ParietisError`].
pub type Result<T> = std::result::Result<T, ParietisError>;
