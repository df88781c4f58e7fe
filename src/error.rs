use std::path::PathBuf;

use thiserror::Error;

/// Why a single identifier could not be fetched. Never fatal to a run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no candidate URL found for {identifier}")]
    NotFound { identifier: String },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid table of contents: {0}")]
    Toc(String),

    #[error("Required input {0:?} does not exist")]
    MissingInput(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
