// ── Core error types ──
//
// API errors pass through untouched so the host sees the backend's
// message verbatim, including bulk partial-progress details. Everything
// else is a local validation failure raised before any request is sent.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote errors ────────────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] crucible_api::Error),

    // ── Local validation ─────────────────────────────────────────────
    /// An attribute in the key-value form had the wrong shape.
    #[error("Invalid attribute `{field}`: {reason}")]
    InvalidAttribute { field: String, reason: String },

    /// Two desired application instances in one team share a name.
    #[error("Duplicate application instance name {name:?} in team {team:?}")]
    DuplicateInstanceName { team: String, name: String },

    /// Two desired applications or teams of one view share a name, so
    /// they cannot be matched to existing ones.
    #[error("Duplicate {collection} name {name:?}")]
    DuplicateName { collection: String, name: String },

    /// An update or delete was requested for a resource with no identity.
    #[error("{kind} has no remote identity; create it first")]
    MissingIdentity { kind: String },
}

impl CoreError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Elements a failed bulk call processed before erroring, if any.
    pub fn completed(&self) -> &[String] {
        match self {
            Self::Api(e) => e.completed(),
            _ => &[],
        }
    }
}
