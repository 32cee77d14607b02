/// Failure of a backing store. Lookups are point-in-time reads within one
/// serialization call; there are no retries, so a store failure is fatal for
/// the request and propagates uncaught.
#[derive(Debug, thiserror::Error)]
#[error("{store} store unavailable: {message}")]
pub struct StoreError {
    pub store: &'static str,
    pub message: String,
}

impl StoreError {
    pub fn new(store: &'static str, message: impl Into<String>) -> Self {
        Self {
            store,
            message: message.into(),
        }
    }
}

/// Application errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for serializers
pub type AppResult<T> = Result<T, AppError>;
