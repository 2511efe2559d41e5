use crate::fetch::FetchError;
use thiserror::Error;

/// Top-level error type for an audit run.
///
/// Only fatal conditions surface here; per-source and per-page failures are
/// recovered locally and reported through page statuses and warnings.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        source: url::ParseError,
    },

    #[error("seed URL is unreachable: {0}")]
    SeedUnreachable(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}
