// Wire types for the VM, Player, and Caster APIs.
//
// Field names follow the backends' camelCase JSON. Nullable fields are
// serialized as explicit `null` so the backend can tell "unset" from a
// concrete value.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

// ── VM API ──────────────────────────────────────────────────────────

/// Console connection block attached to a VM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConnection {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// A virtual machine, as sent to `POST/PUT vms` and returned by `GET vms/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vm {
    pub id: String,
    #[serde(default)]
    pub url: String,
    /// Older API versions omit this; treated as `false`.
    #[serde(default)]
    pub default_url: bool,
    pub name: String,
    /// Ignored by the update endpoint; membership changes go through the
    /// team endpoints instead.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team_ids: Vec<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Older API versions omit this; treated as `true`.
    #[serde(default = "default_true")]
    pub embeddable: bool,
    #[serde(default, rename = "consoleConnectionInfo")]
    pub console_connection: Option<ConsoleConnection>,
}

// ── Player API: views ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    /// Required by `PUT views/{id}`, absent on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub create_admin_team: bool,
}

/// An application inside a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub embeddable: Option<bool>,
    #[serde(default)]
    pub load_in_background: Option<bool>,
    pub view_id: String,
    #[serde(default)]
    pub application_template_id: Option<String>,
}

// ── Player API: teams ───────────────────────────────────────────────

/// Body for `POST views/{view}/teams` and `PUT teams/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub role_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PermissionRef {
    pub id: String,
}

/// A team as listed by `GET views/{view}/teams`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role_id: Option<String>,
    #[serde(default)]
    pub role_name: Option<String>,
    #[serde(default)]
    pub permissions: Vec<PermissionRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// A user's membership in a team, carrying the team-scoped role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMembership {
    pub id: String,
    pub team_id: String,
    pub user_id: String,
    #[serde(default)]
    pub role_id: Option<String>,
}

// ── Player API: application instances ───────────────────────────────

/// An application placed in a team, as listed by the instances endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInstance {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    pub application_id: String,
    #[serde(default)]
    pub display_order: f64,
}

/// Body for creating or updating an application instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInstanceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub team_id: String,
    pub application_id: String,
    pub display_order: f64,
}

// ── Player API: templates and users ─────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub embeddable: bool,
    #[serde(default)]
    pub load_in_background: bool,
}

/// A top-level Player user (not scoped to a team).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role_id: Option<String>,
    #[serde(default)]
    pub is_system_admin: bool,
}

// ── Caster API ──────────────────────────────────────────────────────

/// Body for `POST vlans/actions/acquire`. Unset fields are sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VlanAcquire {
    pub project_id: Option<String>,
    pub partition_id: Option<String>,
    pub tag: Option<String>,
    pub vlan_id: Option<i32>,
}

/// A VLAN leased from the pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vlan {
    pub id: String,
    pub vlan_id: i32,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub partition_id: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub in_use: bool,
}
