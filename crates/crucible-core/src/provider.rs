// ── Provider facade ──
//
// Owns the three backend clients. A single `reqwest::Client` is built
// (or injected) here and cloned into each so they share one connection
// pool. Resources borrow the provider for the duration of one operation.

use std::collections::HashMap;
use std::sync::Arc;

use crucible_api::{CasterClient, PlayerClient, VmClient};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::CoreError;

pub struct Provider {
    vm: VmClient,
    player: PlayerClient,
    caster: CasterClient,
}

impl Provider {
    /// Build the shared HTTP client from the config's transport settings.
    pub fn new(config: &ProviderConfig) -> Result<Self, CoreError> {
        let http = config.transport().build_client()?;
        Self::with_http(config, http)
    }

    /// Use a caller-supplied HTTP client (tests, custom middleware).
    pub fn with_http(config: &ProviderConfig, http: reqwest::Client) -> Result<Self, CoreError> {
        let credentials = Arc::new(config.credentials());
        Ok(Self {
            vm: VmClient::new(config.vm_api_url.as_str(), http.clone(), credentials.clone())?,
            player: PlayerClient::new(
                config.player_api_url.as_str(),
                http.clone(),
                credentials.clone(),
            )?,
            caster: CasterClient::new(config.caster_api_url.as_str(), http, credentials)?,
        })
    }

    pub fn vm(&self) -> &VmClient {
        &self.vm
    }

    pub fn player(&self) -> &PlayerClient {
        &self.player
    }

    pub fn caster(&self) -> &CasterClient {
        &self.caster
    }

    /// A role resolver scoped to one operation.
    pub fn roles(&self) -> RoleResolver<'_> {
        RoleResolver {
            player: &self.player,
            ids: HashMap::new(),
            names: HashMap::new(),
        }
    }
}

// ── Role resolution ──────────────────────────────────────────────────

/// Translates role names to backend ids and back, remembering answers
/// for the life of one operation.
pub struct RoleResolver<'a> {
    player: &'a PlayerClient,
    /// name -> id
    ids: HashMap<String, String>,
    /// id -> name
    names: HashMap<String, String>,
}

impl RoleResolver<'_> {
    /// Resolve a role name before a write. Unset or empty stays `None`.
    pub async fn id_for(&mut self, name: Option<&str>) -> Result<Option<String>, CoreError> {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            return Ok(None);
        };
        if let Some(id) = self.ids.get(name) {
            return Ok(Some(id.clone()));
        }
        let role = self.player.role_by_name(name).await?;
        debug!(name, id = %role.id, "resolved role name");
        self.remember(&role.id, &role.name);
        Ok(Some(role.id))
    }

    /// Resolve a role id after a read. Unset or empty stays `None`.
    pub async fn name_for(&mut self, id: Option<&str>) -> Result<Option<String>, CoreError> {
        let Some(id) = id.filter(|i| !i.is_empty()) else {
            return Ok(None);
        };
        if let Some(name) = self.names.get(id) {
            return Ok(Some(name.clone()));
        }
        let role = self.player.role_by_id(id).await?;
        debug!(id, name = %role.name, "resolved role id");
        self.remember(&role.id, &role.name);
        Ok(Some(role.name))
    }

    fn remember(&mut self, id: &str, name: &str) {
        self.ids.insert(name.to_owned(), id.to_owned());
        self.names.insert(id.to_owned(), name.to_owned());
    }
}
