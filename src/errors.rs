use thiserror::Error;

/// Error type that captures common cashbook failures.
///
/// `Validation`, `NotFound`, and `Duplicate` surface to the user and abort
/// the operation before anything is written. `Remote` is reserved for the
/// account directory; callers on the local path log it and carry on.
#[derive(Debug, Error)]
pub enum CashbookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Duplicate(String),
    #[error("Account directory unavailable: {0}")]
    Remote(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, CashbookError>;
