//! Provider configuration for the Crucible CLI.
//!
//! Layered loading (defaults, optional TOML file, `TF_*` environment
//! variables) and validation into `crucible_core::ProviderConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::Uncased,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crucible_api::TlsMode;
use crucible_core::ProviderConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting `{field}` (set it in the config file or via {env})")]
    Missing { field: String, env: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Raw provider settings as they appear in TOML and the environment.
///
/// Everything is optional here; `into_provider_config` enforces what is
/// required.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Settings {
    pub username: Option<String>,
    pub password: Option<String>,
    pub auth_url: Option<String>,
    pub token_url: Option<String>,
    pub vm_api_url: Option<String>,
    pub player_api_url: Option<String>,
    pub caster_api_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,

    /// Per-request timeout in seconds. Unset keeps the transport default.
    pub timeout_secs: Option<u64>,

    /// Skip TLS certificate verification.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a PEM CA certificate for self-signed deployments.
    pub ca_cert: Option<PathBuf>,
}

/// Environment variable for each setting.
const ENV_KEYS: &[(&str, &str)] = &[
    ("TF_USERNAME", "username"),
    ("TF_PASSWORD", "password"),
    ("TF_AUTH_URL", "auth_url"),
    ("TF_PLAYER_TOK_URL", "token_url"),
    ("TF_VM_API_URL", "vm_api_url"),
    ("TF_PLAYER_API_URL", "player_api_url"),
    ("TF_CASTER_API_URL", "caster_api_url"),
    ("TF_PLAYER_CLIENT_ID", "client_id"),
    ("TF_CLIENT_SECRET", "client_secret"),
];

/// The setting an environment variable feeds, if any.
pub fn env_field(var: &str) -> Option<&'static str> {
    ENV_KEYS
        .iter()
        .find(|(env, _)| env.eq_ignore_ascii_case(var))
        .map(|(_, field)| *field)
}

fn env_for(field: &str) -> &'static str {
    ENV_KEYS
        .iter()
        .find(|(_, f)| *f == field)
        .map_or("no environment variable", |(env, _)| *env)
}

// ── Config file path ────────────────────────────────────────────────

/// Default config file location, e.g. `~/.config/crucible/provider.toml`.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "cmu-sei", "crucible").map_or_else(
        || PathBuf::from(".crucible").join("provider.toml"),
        |dirs| dirs.config_dir().join("provider.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// The layered figment: defaults, then the TOML file, then `TF_*` variables.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::raw().filter_map(|key| env_field(key.as_str()).map(Uncased::from)))
}

/// Load settings from `path` (or the default location) and the environment.
/// A missing file is not an error.
pub fn load(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    Ok(figment(&path).extract()?)
}

// ── Validation ──────────────────────────────────────────────────────

fn required(value: Option<String>, field: &str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::Missing {
            field: field.into(),
            env: env_for(field).into(),
        })
}

fn required_url(value: Option<String>, field: &str) -> Result<Url, ConfigError> {
    let raw = required(value, field)?;
    Url::parse(&raw).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL {raw:?}: {e}"),
    })
}

impl Settings {
    /// Validate into the runtime configuration the provider consumes.
    pub fn into_provider_config(self) -> Result<ProviderConfig, ConfigError> {
        let tls = if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ca) = self.ca_cert {
            TlsMode::CustomCa(ca)
        } else {
            TlsMode::System
        };

        Ok(ProviderConfig {
            username: required(self.username, "username")?,
            password: SecretString::from(required(self.password, "password")?),
            client_id: required(self.client_id, "client_id")?,
            client_secret: SecretString::from(required(self.client_secret, "client_secret")?),
            auth_url: required_url(self.auth_url, "auth_url")?,
            token_url: required_url(self.token_url, "token_url")?,
            vm_api_url: required_url(self.vm_api_url, "vm_api_url")?,
            player_api_url: required_url(self.player_api_url, "player_api_url")?,
            caster_api_url: required_url(self.caster_api_url, "caster_api_url")?,
            timeout: self.timeout_secs.map(Duration::from_secs),
            tls,
        })
    }
}
