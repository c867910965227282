//! CLI error types with miette diagnostics.
//!
//! Maps provider and config failures into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use crucible_config::ConfigError;
use crucible_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(crucible::config),
        help(
            "Provide the setting in the config file (--config) or via its TF_* variable.\n\
             Required: username, password, auth_url, token_url, vm_api_url,\n\
             player_api_url, caster_api_url, client_id, client_secret."
        )
    )]
    Config(#[from] ConfigError),

    // ── Connection / authentication ──────────────────────────────────
    #[error("Could not reach the backend")]
    #[diagnostic(
        code(crucible::connection_failed),
        help("Check the *_api_url settings and that the service is reachable.")
    )]
    ConnectionFailed {
        #[source]
        source: crucible_api::Error,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(crucible::timeout),
        help("Raise timeout_secs in the provider config or check backend responsiveness.")
    )]
    Timeout {
        #[source]
        source: crucible_api::Error,
    },

    #[error("Authentication failed")]
    #[diagnostic(
        code(crucible::auth_failed),
        help("Verify username, password, client_id and client_secret against token_url.")
    )]
    AuthFailed {
        #[source]
        source: crucible_api::Error,
    },

    // ── Remote API ───────────────────────────────────────────────────
    #[error("{source}")]
    #[diagnostic(code(crucible::api_error))]
    Api {
        source: crucible_api::Error,
        #[help]
        progress: Option<String>,
    },

    // ── Local state ──────────────────────────────────────────────────
    #[error("No resource named '{name}' in the state file")]
    #[diagnostic(code(crucible::not_found), help("Run: crucible show"))]
    NotInState { name: String },

    #[error("'{name}' is a {existing}, not a {requested}")]
    #[diagnostic(
        code(crucible::kind_mismatch),
        help("Destroy the existing entry first or pick another name.")
    )]
    KindMismatch {
        name: String,
        existing: String,
        requested: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(crucible::validation))]
    Validation { field: String, reason: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(crucible::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(crucible::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("YAML rendering failed: {0}")]
    #[diagnostic(code(crucible::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Api { source, .. } => match source.status() {
                Some(401) => exit_code::AUTH,
                Some(403) => exit_code::PERMISSION,
                Some(404) => exit_code::NOT_FOUND,
                Some(409) => exit_code::CONFLICT,
                _ => exit_code::GENERAL,
            },
            Self::NotInState { .. } => exit_code::NOT_FOUND,
            Self::KindMismatch { .. } => exit_code::CONFLICT,
            Self::Config(_) | Self::Validation { .. } => exit_code::USAGE,
            Self::Io(_) | Self::Json(_) | Self::Yaml(_) => exit_code::GENERAL,
        }
    }
}

// ── Provider error mapping ───────────────────────────────────────────

impl From<crucible_api::Error> for CliError {
    fn from(err: crucible_api::Error) -> Self {
        let (timeout, connect) = match &err {
            crucible_api::Error::Transport(e) => (e.is_timeout(), e.is_connect()),
            _ => (false, false),
        };
        if timeout {
            return Self::Timeout { source: err };
        }
        if connect {
            return Self::ConnectionFailed { source: err };
        }
        if matches!(err, crucible_api::Error::Authentication { .. }) {
            return Self::AuthFailed { source: err };
        }

        let progress = match err.completed() {
            [] => None,
            done => Some(format!(
                "Already applied before the failure: {}\n\
                 Local state records this partial progress; re-run apply to converge.",
                done.join(", ")
            )),
        };
        Self::Api {
            source: err,
            progress,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(e) => e.into(),
            CoreError::InvalidAttribute { field, reason } => Self::Validation { field, reason },
            CoreError::DuplicateInstanceName { team, name } => Self::Validation {
                field: "app_instance.name".into(),
                reason: format!("{name:?} appears more than once in team {team:?}"),
            },
            CoreError::MissingIdentity { kind } => Self::Validation {
                field: "id".into(),
                reason: format!("{kind} has no remote identity"),
            },
            CoreError::DuplicateName { collection, name } => Self::Validation {
                field: format!("{collection}.name"),
                reason: format!("{name:?} appears more than once"),
            },
        }
    }
}
