use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A create/update/delete was rejected by the backend. The operation is
    /// abandoned; there is no automatic retry.
    #[error("Store write failed: {0}")]
    Write(String),

    /// Opening a live subscription failed.
    #[error("Subscription failed: {0}")]
    Subscription(String),

    /// An update or delete targeted a document that does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Document (de)serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
