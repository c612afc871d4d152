use std::path::PathBuf;
use thiserror::Error;

/// Core error type for fieldbench operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid measurement config: {0}")]
    InvalidConfig(String),

    #[error("Unknown write-back strategy '{0}' (expected 'whole' or 'single')")]
    UnknownStrategy(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result alias for fieldbench operations.
pub type Result<T> = std::result::Result<T, Error>;
