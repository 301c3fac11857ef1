//! Error types for content loading and lookup
//!
//! Fetch failures are recorded per source and never abort the load race on
//! their own; they only escalate into a [`ContentError`] at the single
//! decision point. Resolver lookups do not error: absent content yields
//! empty results so lower-priority fallbacks can run.

use thiserror::Error;

/// Per-source fetch failures, recorded in the loader's status slots
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with an error field or a non-success status
    #[error("remote service error: {0}")]
    Service(String),

    /// The service answered successfully but with zero rows
    #[error("no url data")]
    NoRows,

    #[error("no snapshot file configured")]
    NoFile,

    #[error("snapshot read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced by the content client
#[derive(Debug, Error)]
pub enum ContentError {
    /// A required construction parameter is missing
    #[error("missing required config: {0}")]
    MissingConfig(&'static str),

    #[error("invalid strategy '{0}', expected one of: all, file, url")]
    InvalidStrategy(String),

    /// The load deadline elapsed before any enabled source committed.
    /// `reasons` lists only sources that had already reported failure; a
    /// source still in flight contributes nothing, so the list may be empty.
    #[error("load timed out after {timeout_ms}ms (errors: {reasons})")]
    LoadTimeout { timeout_ms: u64, reasons: String },

    /// Every enabled source reported and none succeeded
    #[error("all sources failed (errors: {reasons})")]
    SourcesExhausted { reasons: String },

    /// A fetch task died before reporting its result
    #[error("load race failed (errors: {reasons})")]
    RaceFailed { reasons: String },

    /// Lookup for an operation that requires the record to exist
    #[error("no template for key '{key}' ({app_type}/{locale})")]
    NotFound {
        key: String,
        app_type: String,
        locale: String,
    },

    /// A single-source load path failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("snapshot serialization failed: {0}")]
    SnapshotEncode(#[source] serde_json::Error),

    #[error("snapshot write failed: {0}")]
    SnapshotWrite(#[source] std::io::Error),
}

impl ContentError {
    /// Whether this error came out of the load decision point
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            ContentError::LoadTimeout { .. } | ContentError::SourcesExhausted { .. } | ContentError::RaceFailed { .. }
        )
    }

    /// Whether this is a timeout-tagged load failure
    pub fn is_timeout(&self) -> bool {
        matches!(self, ContentError::LoadTimeout { .. })
    }
}
