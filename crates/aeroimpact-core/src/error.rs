//! Failure taxonomy for the snapshot pipeline.
//!
//! None of these are fatal: transport failures degrade to empty results or
//! default values, skipped rows only show up in the raw total.

use thiserror::Error;

/// Failure of a single upstream call (snapshot or metadata endpoint).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("upstream request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    #[error("malformed upstream body: {0}")]
    Malformed(String),
}

/// Why a raw state row was dropped during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("row has {0} fields, expected at least 10")]
    TooShort(usize),
    #[error("missing identifier")]
    MissingIdentifier,
    #[error("missing callsign")]
    MissingCallsign,
    #[error("missing origin country")]
    MissingCountry,
    #[error("missing or non-numeric {0}")]
    MissingNumber(&'static str),
}
