//! Error types for quake-feed
//!
//! This module provides the error taxonomy for the library:
//! - Load errors ([`FetchError`], [`DecodeError`], [`ConnectivityError`]) that end a
//!   load cycle and reach the consumer through [`LoadFailure`]
//! - The crate-level [`Error`] used by constructors and configuration loading
//!
//! Malformed individual feed entries are not errors; the decoder drops them.

use thiserror::Error;

/// Result type alias for quake-feed operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for quake-feed
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "feed.url")
        key: Option<String>,
    },

    /// Feed retrieval failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Feed payload could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// No network connectivity
    #[error("connectivity error: {0}")]
    Connectivity(#[from] ConnectivityError),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<LoadFailure> for Error {
    fn from(failure: LoadFailure) -> Self {
        match failure {
            LoadFailure::Fetch(e) => Error::Fetch(e),
            LoadFailure::Decode(e) => Error::Decode(e),
            LoadFailure::Connectivity(e) => Error::Connectivity(e),
        }
    }
}

/// Network retrieval failures
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The host could not be reached (DNS failure, connection refused, no route)
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    /// The request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-2xx status
    #[error("server returned HTTP {0}")]
    NonSuccessStatus(u16),

    /// Any other transport failure, including malformed URLs
    #[error("transport error: {0}")]
    TransportError(String),
}

/// Payload decoding failures
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload is not a feature collection at all
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Connectivity pre-check failures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConnectivityError {
    /// The connectivity probe reported no network
    #[error("no network connection")]
    Disconnected,
}

/// Reason a load cycle ended without records
///
/// Carried by [`crate::FeedResult::Failure`]. Cloneable so a delivered result can
/// be retained by the controller.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadFailure {
    /// Fetching the feed failed; decoding was not attempted
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The fetched payload was unusable
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The load was short-circuited before any network call
    #[error(transparent)]
    Connectivity(#[from] ConnectivityError),
}

impl LoadFailure {
    /// Stable machine-readable code for the failure kind
    pub fn code(&self) -> &'static str {
        match self {
            LoadFailure::Fetch(FetchError::NetworkUnreachable(_)) => "network_unreachable",
            LoadFailure::Fetch(FetchError::Timeout) => "timeout",
            LoadFailure::Fetch(FetchError::NonSuccessStatus(_)) => "http_status",
            LoadFailure::Fetch(FetchError::TransportError(_)) => "transport",
            LoadFailure::Decode(DecodeError::MalformedPayload(_)) => "malformed_payload",
            LoadFailure::Connectivity(ConnectivityError::Disconnected) => "disconnected",
        }
    }
}
