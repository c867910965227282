use thiserror::Error;

/// Top-level error type for the `crucible-api` crate.
///
/// Covers every failure mode across the three backends: token
/// acquisition, transport, unexpected status codes, and response decoding.
/// `crucible-core` wraps these without translation so the host sees the
/// original message.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The token endpoint rejected the password grant.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── API ─────────────────────────────────────────────────────────
    /// The backend answered with a status other than the single one the
    /// operation expects.
    #[error("{operation}: API returned with status code {status} (expected {expected})")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        expected: u16,
    },

    /// A sequential bulk operation failed part way through.
    ///
    /// `completed` lists the elements (ids) that were processed before the
    /// failing one; callers must assume those took effect remotely.
    #[error("{operation}: {} completed before error: {source}", .completed.len())]
    Bulk {
        operation: String,
        completed: Vec<String>,
        #[source]
        source: Box<Error>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error is an HTTP 404 from the backend.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::UnexpectedStatus { status: 404, .. } => true,
            Self::Bulk { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// The HTTP status code behind this error, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Bulk { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Elements processed before a bulk failure. Empty for non-bulk errors.
    pub fn completed(&self) -> &[String] {
        match self {
            Self::Bulk { completed, .. } => completed,
            _ => &[],
        }
    }

    /// Wrap `source` as a bulk failure after `completed` elements succeeded.
    pub(crate) fn bulk(operation: &str, completed: Vec<String>, source: Self) -> Self {
        Self::Bulk {
            operation: operation.to_owned(),
            completed,
            source: Box::new(source),
        }
    }
}
