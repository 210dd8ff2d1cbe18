use std::io;
use std::path::PathBuf;

/// Failure recorded while materializing a response body
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to read response body: {message}")]
pub struct ContentError {
    pub message: String,
}

impl ContentError {
    pub(crate) fn new(err: &io::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },

    #[error("invalid proxy '{proxy}': {source}")]
    InvalidProxy {
        proxy: String,
        source: reqwest::Error,
    },

    #[error("failed to encode form fields: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),

    #[error("HTTP request failed: {0:#}")]
    Transport(anyhow::Error),

    #[error("failed to read '{path}': {source}")]
    ReadFile { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    WriteFile { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("response has no Location header")]
    NoLocation,

    #[error(transparent)]
    Content(#[from] ContentError),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
