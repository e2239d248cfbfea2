use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness or reference constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found")]
    NotFound,

    /// The backend could not be reached in time. Callers should surface this
    /// as a temporary failure, not retry it.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be mapped back into domain types.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("store error: {0}")]
    Backend(String),
}
