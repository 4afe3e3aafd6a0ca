//! Crate-wide error taxonomy.
//!
//! A handful of failure classes, each either fatal (propagated with `?` up
//! to `main`) or logged-and-skipped by the caller. The type itself doesn't
//! encode fatality, callers decide: detector/day-level errors are fatal,
//! while pairer/composer failures are always non-fatal and never even
//! constructed as this type, only logged.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaelundasError {
    #[error("missing ephemeris value for {body:?} at {timestamp} ({kind:?})")]
    EphemerisGap {
        body: crate::body::Body,
        timestamp: chrono::DateTime<chrono::Utc>,
        kind: crate::ephemeris::EphemerisKind,
    },

    #[error("ephemeris provider failed: {0}")]
    ProviderFailure(String),

    #[error("malformed configuration: {0}")]
    Configuration(String),

    #[error("event sink failure: {0}")]
    Sink(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not parse horizons response: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, CaelundasError>;
