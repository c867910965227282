// ── Runtime provider configuration ──
//
// Everything needed to reach the three backends. Built by the config
// crate (or directly by tests) and handed to `Provider`; core never reads
// files or environment variables.

use std::time::Duration;

use crucible_api::{Credentials, TlsMode, TransportConfig};
use secrecy::SecretString;
use url::Url;

/// Configuration for one provider instance.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub username: String,
    pub password: SecretString,
    pub client_id: String,
    pub client_secret: SecretString,
    pub auth_url: Url,
    pub token_url: Url,
    pub vm_api_url: Url,
    pub player_api_url: Url,
    pub caster_api_url: Url,
    /// Per-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
    pub tls: TlsMode,
}

impl ProviderConfig {
    pub(crate) fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            auth_url: self.auth_url.clone(),
            token_url: self.token_url.clone(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}
