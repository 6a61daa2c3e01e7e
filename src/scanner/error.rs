// src/scanner/error.rs
// =============================================================================
// Everything that can stop a scan from producing an IPQS response.
//
// API-level failures (bad key, exhausted quota) are NOT errors: IPQS sends
// them back as a normal JSON body with `success: false`, and the client
// stores that body like any other.
// =============================================================================

use thiserror::Error;

/// Errors returned by [`MalUrl`](super::MalUrl) and [`Strictness`](super::Strictness).
#[derive(Debug, Error)]
pub enum ScanError {
    /// The input was not a well-formed URL; no request was sent.
    #[error("Invalid url {0}")]
    InvalidUrl(String),

    /// The HTTP layer failed (connection refused, DNS, timeout, TLS...).
    #[error("Failed to reach IP Quality Score API: {0}")]
    Transport(#[from] reqwest::Error),

    /// IPQS answered, but the body was not the JSON we expect.
    #[error("IP Quality Score returned an unreadable body (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// Strictness outside 0..=2.
    #[error("strictness must be 0, 1 or 2, got {0:?}")]
    InvalidStrictness(String),
}

impl ScanError {
    /// HTTP-style status recorded in the failure report left behind by a
    /// failed fetch.
    pub fn status_code(&self) -> i64 {
        match self {
            ScanError::InvalidUrl(_) => 404,
            ScanError::Transport(_) => 503,
            ScanError::Decode { status, .. } => i64::from(*status),
            ScanError::InvalidStrictness(_) => 400,
        }
    }
}
