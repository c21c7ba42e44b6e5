use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Failure on the storing side, not caused by the request.
    #[error("internal error: {0}")]
    Internal(String),
}
