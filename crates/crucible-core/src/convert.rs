// ── Wire-to-domain type conversions ──
//
// Bridges `crucible_api::models` wire types and `crucible_core::model`
// domain types. Empty strings from the wire collapse to `None`, team ids
// come back sorted, and role fields are left for the resources to resolve.

use crucible_api::models::{
    Application, ApplicationInstance, ApplicationInstanceRequest, ApplicationTemplate,
    ConsoleConnection as WireConsole, User, View, Vlan, VlanAcquire, Vm,
};

use crate::model::{
    AppInstanceSpec, AppTemplateState, ApplicationSpec, ConsoleConnection, PlayerUserState,
    ViewState, VlanState, VmState,
};

// ── Helpers ────────────────────────────────────────────────────────

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.is_empty())
}

// ── VM ─────────────────────────────────────────────────────────────

impl From<&ConsoleConnection> for WireConsole {
    fn from(c: &ConsoleConnection) -> Self {
        Self {
            hostname: c.hostname.clone(),
            port: c.port.clone(),
            protocol: c.protocol.clone(),
            username: c.username.clone(),
            password: c.password.clone(),
        }
    }
}

impl From<WireConsole> for ConsoleConnection {
    fn from(c: WireConsole) -> Self {
        Self {
            hostname: c.hostname,
            port: c.port,
            protocol: c.protocol,
            username: c.username,
            password: c.password,
        }
    }
}

/// Build the wire VM for `id`. Team ids are included for create; the
/// update endpoint ignores them.
pub fn vm_to_wire(state: &VmState, id: &str) -> Vm {
    Vm {
        id: id.to_owned(),
        url: state.url.clone(),
        default_url: state.default_url,
        name: state.name.clone(),
        team_ids: state.team_ids.clone(),
        user_id: state.user_id.clone(),
        embeddable: state.embeddable,
        console_connection: state.console_connection.as_ref().map(WireConsole::from),
    }
}

impl From<Vm> for VmState {
    fn from(vm: Vm) -> Self {
        let mut team_ids = vm.team_ids;
        team_ids.sort();
        Self {
            vm_id: Some(vm.id),
            url: vm.url,
            name: vm.name,
            team_ids,
            user_id: non_empty(vm.user_id),
            console_connection: vm.console_connection.map(ConsoleConnection::from),
            default_url: vm.default_url,
            embeddable: vm.embeddable,
        }
    }
}

// ── View and applications ──────────────────────────────────────────

/// Wire form of the view's own fields (applications and teams are separate calls).
pub fn view_to_wire(state: &ViewState) -> View {
    View {
        id: None,
        name: state.name.clone(),
        description: state.description.clone(),
        status: state.status.clone(),
        create_admin_team: state.create_admin_team,
    }
}

pub fn application_to_wire(app: &ApplicationSpec, view_id: &str) -> Application {
    Application {
        id: app.app_id.clone(),
        name: app.name.clone(),
        url: app.url.clone(),
        icon: app.icon.clone(),
        embeddable: app.embeddable,
        load_in_background: app.load_in_background,
        view_id: view_id.to_owned(),
        application_template_id: app.app_template_id.clone(),
    }
}

impl From<Application> for ApplicationSpec {
    fn from(app: Application) -> Self {
        Self {
            app_id: non_empty(app.id),
            name: non_empty(app.name),
            url: non_empty(app.url),
            icon: non_empty(app.icon),
            embeddable: app.embeddable,
            load_in_background: app.load_in_background,
            view_id: Some(app.view_id).filter(|s| !s.is_empty()),
            app_template_id: non_empty(app.application_template_id),
        }
    }
}

// ── Application instances ──────────────────────────────────────────

impl From<ApplicationInstance> for AppInstanceSpec {
    fn from(inst: ApplicationInstance) -> Self {
        Self {
            id: Some(inst.id),
            name: inst.name.unwrap_or_default(),
            display_order: inst.display_order,
            parent: Some(inst.application_id),
        }
    }
}

pub fn instance_to_wire(
    team: &str,
    application_id: &str,
    display_order: f64,
) -> ApplicationInstanceRequest {
    ApplicationInstanceRequest {
        id: None,
        team_id: team.to_owned(),
        application_id: application_id.to_owned(),
        display_order,
    }
}

// ── Templates ──────────────────────────────────────────────────────

impl From<&AppTemplateState> for ApplicationTemplate {
    fn from(t: &AppTemplateState) -> Self {
        Self {
            id: None,
            name: t.name.clone(),
            url: t.url.clone(),
            icon: t.icon.clone(),
            embeddable: t.embeddable,
            load_in_background: t.load_in_background,
        }
    }
}

impl From<ApplicationTemplate> for AppTemplateState {
    fn from(t: ApplicationTemplate) -> Self {
        Self {
            name: t.name,
            url: t.url,
            icon: t.icon,
            embeddable: t.embeddable,
            load_in_background: t.load_in_background,
        }
    }
}

// ── Users ──────────────────────────────────────────────────────────

/// Wire user with an already-resolved role id.
pub fn user_to_wire(state: &PlayerUserState, role_id: Option<String>) -> User {
    User {
        id: state.user_id.clone(),
        name: state.name.clone(),
        role_id,
        is_system_admin: state.is_system_admin,
    }
}

/// Domain user with an already-resolved role name.
pub fn user_from_wire(user: User, role: Option<String>) -> PlayerUserState {
    PlayerUserState {
        user_id: user.id,
        name: user.name,
        role,
        is_system_admin: user.is_system_admin,
    }
}

// ── VLANs ──────────────────────────────────────────────────────────

impl From<&VlanState> for VlanAcquire {
    fn from(v: &VlanState) -> Self {
        Self {
            project_id: non_empty(v.project_id.clone()),
            partition_id: non_empty(v.partition_id.clone()),
            tag: non_empty(v.tag.clone()),
            vlan_id: v.vlan_id,
        }
    }
}

impl From<Vlan> for VlanState {
    fn from(v: Vlan) -> Self {
        Self {
            project_id: non_empty(v.project_id),
            partition_id: non_empty(v.partition_id),
            tag: non_empty(v.tag),
            vlan_id: Some(v.vlan_id),
            vlan_uuid: Some(v.id),
        }
    }
}
