#[derive(thiserror::Error, Debug)]
pub enum SmithError {
    /// Ragged rows, an empty matrix or an entry that is not an integer.
    #[error("InvalidMatrix: {0}")]
    InvalidMatrix(String),
    #[error("DimensionMismatch: {0}")]
    DimensionMismatch(String),

    /// Unreachable from the engine: every stage runs behind a nonzero pivot.
    #[error("Internal error: Division by zero")]
    DivisionByZero,
    #[error("Operation addresses {axis} {index}, but the matrix has only {len}")]
    IndexOutOfBounds {
        axis: Axis,
        index: usize,
        len: usize,
    },
    #[error("Adding a multiple of {0} {1} to itself is not an elementary operation")]
    SelfAddition(Axis, usize),
    #[error("Internal error: {0}")]
    BrokenInvariant(String),

    #[error("Data serialization: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Which side of the matrix an operation acts on.
#[derive(Debug, Copy, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Axis {
    Row,
    Col,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Col => f.write_str("col"),
        }
    }
}
