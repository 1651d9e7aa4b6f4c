use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid input: {0:?} is not a number")]
    InvalidInput(String),

    #[error("selection {index} is out of range (valid: 1-{len})")]
    OutOfRange { index: usize, len: usize },

    #[error("no usable ssh executable found on this system")]
    SshNotFound,
}

/// Crate-wide result type alias
pub type Result<T> = std::result::Result<T, Error>;
