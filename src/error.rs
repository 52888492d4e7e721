//! Error types for registry construction, page fetching and dispatch.
//!
//! Title and price misses are not errors; they resolve to the sentinels in
//! [`crate::types`].

use thiserror::Error;

/// A single HTTP GET that did not produce a usable body.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS, timeout or body decoding failure.
    #[error("transport error: {0}")]
    Transport(#[from] wreq::Error),

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },
}

/// Per-request failures, returned to callers as data.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("unknown scraper: {0}")]
    UnknownScraper(String),

    /// The product page itself could not be fetched. Terminal for the request.
    #[error("Failed to fetch product page")]
    PageFetch(#[source] FetchError),

    /// Anything the pipeline did not anticipate, such as a panicking routine.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Start-up failure while assembling the scraper registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("no scrapers registered")]
    Empty,

    #[error("scraper name registered twice: {0}")]
    Duplicate(String),

    #[error("invalid scraper name {0:?}: use lowercase letters, digits, '_' or '-'")]
    InvalidName(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}
