use thiserror::Error;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    #[error("Version counter is at its maximum")]
    VersionOverflow,

    #[error("Storage lock poisoned")]
    LockPoisoned,
}
