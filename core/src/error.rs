//! Error types for the dining menus client.
//!
//! # Design
//! One enum covers every failure a caller can see. `kind()` collapses the
//! variants into the three classes callers usually branch on: bad arguments,
//! failure to reach upstream, and upstream answers that make no sense.

use thiserror::Error;

use crate::http::TransportError;

/// Coarse classification of a `DiningError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid caller-supplied argument or configuration.
    Parameter,
    /// Upstream could not be reached or answered with a non-2xx status.
    Request,
    /// The response body did not decode into the expected shape.
    Parse,
}

#[derive(Debug, Error)]
pub enum DiningError {
    /// The location is not a member of the registry (case-sensitive).
    #[error("invalid location: {0:?}")]
    InvalidLocation(String),

    #[error("invalid day range: start {start} is after end {end}")]
    InvalidDayRange { start: i64, end: i64 },

    /// The location registry is empty.
    #[error("configuration is uninitialized: location registry is empty")]
    UninitializedConfig,

    #[error("concurrency limit must be at least 1")]
    InvalidConcurrency,

    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A day offset pushed the date outside chrono's representable range.
    #[error("date offset {offset} is out of range")]
    DateOutOfRange { offset: i64 },

    #[error("settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("request failed: {0}")]
    Transport(#[from] TransportError),

    /// Upstream answered with a status outside 2xx.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// A retrieval task panicked or was cancelled.
    #[error("retrieval task failed: {0}")]
    Task(String),

    #[error("invalid response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// Upstream reported an empty location field, its way of saying the
    /// requested location does not exist.
    #[error("upstream does not recognise location {0:?}")]
    UnknownLocation(String),

    #[error("location {0:?} was returned for more than one request")]
    DuplicateLocation(String),
}

impl DiningError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiningError::InvalidLocation(_)
            | DiningError::InvalidDayRange { .. }
            | DiningError::UninitializedConfig
            | DiningError::InvalidConcurrency
            | DiningError::InvalidBaseUrl { .. }
            | DiningError::DateOutOfRange { .. }
            | DiningError::Settings(_) => ErrorKind::Parameter,
            DiningError::Transport(_) | DiningError::HttpStatus { .. } | DiningError::Task(_) => {
                ErrorKind::Request
            }
            DiningError::Parse(_)
            | DiningError::UnknownLocation(_)
            | DiningError::DuplicateLocation(_) => ErrorKind::Parse,
        }
    }
}
