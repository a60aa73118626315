use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status} for {url}")]
    HttpStatus { status: StatusCode, url: String },

    #[error("Unable to locate <{tag}> section on the page.")]
    ContentNotFound { tag: String },

    #[error("invalid content selector '{0}'")]
    InvalidSelector(String),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid boilerplate rules: {0}")]
    Rules(String),
}
