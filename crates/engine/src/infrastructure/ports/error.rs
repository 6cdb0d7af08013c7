//! Error types for port operations.

/// Storage failure reported by a repository adapter.
#[derive(Debug, thiserror::Error)]
#[error("Storage error in {operation}: {message}")]
pub struct RepoError {
    pub operation: &'static str,
    pub message: String,
}

impl RepoError {
    pub fn new(operation: &'static str, message: impl ToString) -> Self {
        Self {
            operation,
            message: message.to_string(),
        }
    }
}

/// Event could not be handed to the bus.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PublishError {
    #[error("Failed to encode event for {topic}: {message}")]
    Encode { topic: &'static str, message: String },
    #[error("Event bus unavailable: {0}")]
    Unavailable(String),
}
