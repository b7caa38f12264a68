//! Error types for the laminate solver

use thiserror::Error;

/// Main error type for laminate and cut-out operations
#[derive(Error, Debug)]
pub enum CltError {
    #[error("Matrix is not positive definite - laminate stiffness is structurally invalid")]
    NotPositiveDefinite,

    #[error("Singular matrix in {0}")]
    SingularMatrix(&'static str),

    #[error("Complex division by zero")]
    ComplexDivisionByZero,

    #[error("Root finding failed to converge after {0} iterations")]
    ConvergenceFailed(usize),

    #[error("Operation '{0}' requires a symmetric laminate")]
    SymmetricLaminateRequired(&'static str),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid material: {0}")]
    InvalidMaterial(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Laminate has no plies")]
    EmptyLaminate,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for laminate operations
pub type CltResult<T> = Result<T, CltError>;
