//! Error types shared by the library modules

use thiserror::Error;

/// Errors raised while loading configuration, talking to the content store,
/// rendering, or submitting comments
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("content store request failed: {0}")]
    Store(String),

    #[error("failed to decode content store response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("comment submission failed: {0}")]
    Submission(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
