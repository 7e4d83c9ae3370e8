//! Error types for the `dataset_ingestor` crate.

use thiserror::Error;

/// The unified error type for the `dataset_ingestor` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A payload did not match the expected record shape (malformed date,
    /// missing required field, not a JSON array).
    #[error("Malformed {dataset} dataset: {message}")]
    DataFormat {
        /// Which of the three datasets failed to parse.
        dataset: &'static str,
        /// Parser detail.
        message: String,
    },

    /// The upstream server answered with a non-success status.
    #[error("Upstream returned {status} for {url}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Requested location.
        url: String,
    },

    /// A transport-level HTTP error.
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// A local file read failed.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
