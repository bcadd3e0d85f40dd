use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A document with no tokens reached a step that divides by its length.
    #[error("division by zero: document '{0}' has no tokens")]
    DivisionByZero(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
