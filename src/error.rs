use thiserror::Error;

/// Precondition violations reported by the counting core.
///
/// Infeasible search branches are never errors; they simply contribute zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountError {
    #[error("worker count {workers} outside 1..={max}")]
    InvalidWorkerCount { workers: usize, max: usize },

    #[error("bounds at position {position} are empty: min {min} > max {max}")]
    InvalidBounds { position: usize, min: i64, max: i64 },

    #[error("bounds length mismatch: n = {n}, minima = {minima}, maxima = {maxima}")]
    BoundsLength {
        n: usize,
        minima: usize,
        maxima: usize,
    },

    #[error("vertex {vertex} out of range (diagram has {vertices} vertices)")]
    VertexOutOfRange { vertex: usize, vertices: usize },

    #[error("vertex index {value} is negative")]
    NegativeVertex { value: i64 },

    #[error("stage {stage} carries a negative edge count {value}")]
    NegativeEdgeCount { stage: usize, value: i64 },

    #[error("edge at vertex {vertex} is a self loop")]
    SelfLoop { vertex: usize },

    #[error("mismatched lengths: {what} has {got} entries, expected {expected}")]
    MismatchedLengths {
        what: &'static str,
        got: usize,
        expected: usize,
    },

    #[error("root order must be positive, got {root}")]
    InvalidRoot { root: i64 },

    #[error("h0 range needs the curve genus")]
    MissingGenus,

    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),
}

pub type Result<T> = std::result::Result<T, CountError>;
