use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Invalid embedding for article {index}: {reason}")]
    InvalidEmbedding { index: usize, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transient storage error: {0}")]
    StorageTransient(String),

    #[error("Publish error: {0}")]
    Publish(String),

    #[error("Stage '{0}' timed out")]
    Timeout(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Whether retrying the same storage call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::StorageTransient(_) | Error::Http(_) | Error::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
