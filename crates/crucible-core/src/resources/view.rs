// View lifecycle.
//
// A view owns its applications and teams; each team owns permissions,
// user memberships, and application instances. Create builds them in
// that order, update reconciles each collection against the previously
// applied state, and read reassembles the whole tree from the backend.

use crucible_api::models::{ApplicationInstance, TeamRequest};
use tracing::{debug, info, warn};

use crate::convert::{application_to_wire, instance_to_wire, view_to_wire};
use crate::error::CoreError;
use crate::model::{AppInstanceSpec, ApplicationSpec, ResourceKind, TeamSpec, TeamUser, ViewState};
use crate::provider::{Provider, RoleResolver};
use crate::reconcile::{adopt_ids, diff_sets, plan_by_id, plan_instances, reject_duplicate_names};
use crate::resources::{Resource, ResourceData};

impl Resource for ViewState {
    const KIND: ResourceKind = ResourceKind::View;

    async fn create(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        validate(&data.state)?;

        // Remote ids are only ever assigned by the backend.
        for app in &mut data.state.applications {
            app.app_id = None;
        }
        for team in &mut data.state.teams {
            team.team_id = None;
            for inst in &mut team.app_instances {
                inst.id = None;
            }
        }

        let view_id = provider
            .player()
            .create_view(&view_to_wire(&data.state))
            .await?;
        data.id = Some(view_id.clone());

        create_applications(provider, &view_id, &mut data.state.applications).await?;

        let apps = data.state.applications.clone();
        let mut roles = provider.roles();
        for team in &mut data.state.teams {
            create_team(provider, &mut roles, &view_id, team, &apps).await?;
        }

        Self::read(provider, data).await
    }

    async fn read(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let Some(id) = data.id.clone() else {
            return Ok(());
        };
        let Some(view) = provider.player().find_view(&id).await? else {
            warn!(%id, "view no longer exists remotely");
            data.id = None;
            return Ok(());
        };

        let mut roles = provider.roles();
        let applications: Vec<ApplicationSpec> = provider
            .player()
            .list_applications(&id)
            .await?
            .into_iter()
            .map(ApplicationSpec::from)
            .collect();

        let mut teams = Vec::new();
        for team in provider.player().list_teams(&id).await? {
            let role = roles.name_for(team.role_id.as_deref()).await?;

            let mut permissions: Vec<String> =
                team.permissions.into_iter().map(|p| p.id).collect();
            permissions.sort();

            let mut users = Vec::new();
            for membership in provider.player().list_memberships(&team.id).await? {
                users.push(TeamUser {
                    user_id: membership.user_id,
                    role: roles.name_for(membership.role_id.as_deref()).await?,
                });
            }

            let previous = data
                .state
                .teams
                .iter()
                .find(|t| t.team_id.as_deref() == Some(team.id.as_str()));
            let app_instances = provider
                .player()
                .list_instances(&team.id)
                .await?
                .into_iter()
                .map(|inst| instance_from_remote(inst, &applications))
                .map(|inst| settle_parent(inst, previous, &applications))
                .collect();

            teams.push(TeamSpec {
                team_id: Some(team.id),
                name: team.name.filter(|n| !n.is_empty()),
                role,
                permissions,
                users,
                app_instances,
            });
        }

        data.state = ViewState {
            name: view.name,
            description: view.description.filter(|d| !d.is_empty()),
            status: view.status.filter(|s| !s.is_empty()),
            // Only meaningful at creation; the backend does not echo it.
            create_admin_team: data.state.create_admin_team,
            applications,
            teams,
        };
        Ok(())
    }

    async fn update(
        provider: &Provider,
        data: &mut ResourceData<Self>,
        mut desired: Self,
    ) -> Result<(), CoreError> {
        let id = data.require_id(Self::KIND)?;
        validate(&desired)?;

        // Elements written without ids keep the ids of their namesakes.
        adopt_ids(
            "application",
            &data.state.applications,
            &mut desired.applications,
            |a| a.name.as_deref(),
            |a| a.app_id.as_deref(),
            |a, id| a.app_id = Some(id),
        )?;
        adopt_ids(
            "team",
            &data.state.teams,
            &mut desired.teams,
            |t| t.name.as_deref(),
            |t| t.team_id.as_deref(),
            |t, id| t.team_id = Some(id),
        )?;

        provider
            .player()
            .update_view(&id, &view_to_wire(&desired))
            .await?;
        data.state.name.clone_from(&desired.name);
        data.state.description.clone_from(&desired.description);
        data.state.status.clone_from(&desired.status);
        data.state.create_admin_team = desired.create_admin_team;

        reconcile_applications(provider, &id, data, &desired.applications).await?;

        let apps = data.state.applications.clone();
        let mut roles = provider.roles();
        reconcile_teams(provider, &mut roles, &id, data, &desired.teams, &apps).await?;

        info!(%id, "view updated");
        Self::read(provider, data).await
    }

    async fn delete(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let Some(id) = data.id.clone() else {
            return Ok(());
        };
        if provider.player().view_exists(&id).await? {
            match provider.player().delete_view(&id).await {
                Ok(()) => info!(%id, "view deleted"),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }
        data.id = None;
        Ok(())
    }
}

// ── Validation ───────────────────────────────────────────────────────

/// Reject desired states that cannot be reconciled, before any request.
fn validate(state: &ViewState) -> Result<(), CoreError> {
    reject_duplicate_names("application", &state.applications, |a| a.name.as_deref())?;
    reject_duplicate_names("team", &state.teams, |t| t.name.as_deref())?;
    for team in &state.teams {
        plan_instances(&team_label(team), &[], &team.app_instances)?;
    }
    Ok(())
}

fn team_label(team: &TeamSpec) -> String {
    team.name
        .clone()
        .or_else(|| team.team_id.clone())
        .unwrap_or_default()
}

// ── Applications ─────────────────────────────────────────────────────

/// Create `apps` in order, writing each assigned id back, including for
/// the ones that succeeded before a failure.
async fn create_applications(
    provider: &Provider,
    view_id: &str,
    apps: &mut [ApplicationSpec],
) -> Result<(), CoreError> {
    if apps.is_empty() {
        return Ok(());
    }
    let wire: Vec<_> = apps
        .iter()
        .map(|a| application_to_wire(a, view_id))
        .collect();
    let result = provider.player().create_applications(view_id, &wire).await;

    let created = match &result {
        Ok(ids) => ids.as_slice(),
        Err(e) => e.completed(),
    };
    for (app, id) in apps.iter_mut().zip(created) {
        app.app_id = Some(id.clone());
        app.view_id = Some(view_id.to_owned());
    }

    result.map(|_| ()).map_err(Into::into)
}

async fn reconcile_applications(
    provider: &Provider,
    view_id: &str,
    data: &mut ResourceData<ViewState>,
    desired: &[ApplicationSpec],
) -> Result<(), CoreError> {
    let existing: Vec<String> = data
        .state
        .applications
        .iter()
        .filter_map(|a| a.app_id.clone())
        .collect();
    let plan = plan_by_id(&existing, desired, |a| a.app_id.as_deref());
    debug!(
        create = plan.create.len(),
        update = plan.update.len(),
        delete = plan.delete.len(),
        "reconciling view applications"
    );

    if !plan.update.is_empty() {
        let wire: Vec<_> = plan
            .update
            .iter()
            .map(|a| application_to_wire(a, view_id))
            .collect();
        provider.player().update_applications(&wire).await?;
        for app in &plan.update {
            if let Some(slot) = data
                .state
                .applications
                .iter_mut()
                .find(|a| a.app_id == app.app_id)
            {
                slot.clone_from(app);
            }
        }
    }

    let mut created = plan.create;
    for app in &mut created {
        app.app_id = None;
    }
    let result = create_applications(provider, view_id, &mut created).await;
    data.state
        .applications
        .extend(created.into_iter().filter(|a| a.app_id.is_some()));
    result?;

    if !plan.delete.is_empty() {
        let result = provider.player().delete_applications(&plan.delete).await;
        let gone = match &result {
            Ok(()) => plan.delete.as_slice(),
            Err(e) => e.completed(),
        };
        data.state
            .applications
            .retain(|a| !a.app_id.as_ref().is_some_and(|id| gone.contains(id)));
        result?;
    }
    Ok(())
}

// ── Teams ────────────────────────────────────────────────────────────

/// Create one team and everything it owns.
async fn create_team(
    provider: &Provider,
    roles: &mut RoleResolver<'_>,
    view_id: &str,
    team: &mut TeamSpec,
    apps: &[ApplicationSpec],
) -> Result<(), CoreError> {
    let request = TeamRequest {
        id: None,
        name: team.name.clone(),
        role_id: roles.id_for(team.role.as_deref()).await?,
    };
    let ids = provider
        .player()
        .create_teams(view_id, std::slice::from_ref(&request))
        .await?;
    let Some(team_id) = ids.into_iter().next() else {
        return Ok(());
    };
    team.team_id = Some(team_id.clone());
    info!(%team_id, name = ?team.name, "team created");

    // Each collection is written back only as far as the backend took it.
    let permissions = std::mem::take(&mut team.permissions);
    let users = std::mem::take(&mut team.users);
    let instances = std::mem::take(&mut team.app_instances);

    if !permissions.is_empty() {
        if let Err(e) = provider
            .player()
            .add_team_permissions(&team_id, &permissions)
            .await
        {
            team.permissions = e.completed().to_vec();
            return Err(e.into());
        }
    }
    team.permissions = permissions;

    if !users.is_empty() {
        let user_ids: Vec<String> = users.iter().map(|u| u.user_id.clone()).collect();
        if let Err(e) = provider
            .player()
            .add_users_to_team(&team_id, &user_ids)
            .await
        {
            let added = e.completed();
            team.users = users
                .into_iter()
                .filter(|u| added.contains(&u.user_id))
                .collect();
            return Err(e.into());
        }
        team.users = users;
        apply_membership_roles(provider, roles, &team_id, &team.users).await?;
    }

    for mut inst in instances {
        inst.id = None;
        create_instance(provider, &team_id, &mut inst, apps).await?;
        team.app_instances.push(inst);
    }
    Ok(())
}

async fn reconcile_teams(
    provider: &Provider,
    roles: &mut RoleResolver<'_>,
    view_id: &str,
    data: &mut ResourceData<ViewState>,
    desired: &[TeamSpec],
    apps: &[ApplicationSpec],
) -> Result<(), CoreError> {
    let existing: Vec<String> = data
        .state
        .teams
        .iter()
        .filter_map(|t| t.team_id.clone())
        .collect();
    let plan = plan_by_id(&existing, desired, |t| t.team_id.as_deref());

    if !plan.delete.is_empty() {
        let result = provider.player().delete_teams(&plan.delete).await;
        let gone = match &result {
            Ok(()) => plan.delete.as_slice(),
            Err(e) => e.completed(),
        };
        data.state
            .teams
            .retain(|t| !t.team_id.as_ref().is_some_and(|id| gone.contains(id)));
        result?;
    }

    let mut requests = Vec::with_capacity(plan.update.len());
    for team in &plan.update {
        requests.push(TeamRequest {
            id: team.team_id.clone(),
            name: team.name.clone(),
            role_id: roles.id_for(team.role.as_deref()).await?,
        });
    }
    if !requests.is_empty() {
        provider.player().update_teams(&requests).await?;
    }

    for team in &plan.update {
        let Some(team_id) = team.team_id.as_deref() else {
            continue;
        };
        let Some(slot) = data
            .state
            .teams
            .iter_mut()
            .find(|t| t.team_id.as_deref() == Some(team_id))
        else {
            continue;
        };
        slot.name.clone_from(&team.name);
        slot.role.clone_from(&team.role);

        reconcile_team_members(provider, roles, team_id, slot, team).await?;
        reconcile_instances(provider, team_id, team, apps).await?;
        slot.app_instances.clone_from(&team.app_instances);
    }

    for mut team in plan.create {
        team.team_id = None;
        let result = create_team(provider, roles, view_id, &mut team, apps).await;
        if team.team_id.is_some() {
            data.state.teams.push(team);
        }
        result?;
    }
    Ok(())
}

/// Converge permissions and users of an existing team, recording each
/// completed step in `current`.
async fn reconcile_team_members(
    provider: &Provider,
    roles: &mut RoleResolver<'_>,
    team_id: &str,
    current: &mut TeamSpec,
    desired: &TeamSpec,
) -> Result<(), CoreError> {
    let perms = diff_sets(&current.permissions, &desired.permissions);
    if !perms.to_remove.is_empty() {
        let result = provider
            .player()
            .remove_team_permissions(team_id, &perms.to_remove)
            .await;
        let removed = match &result {
            Ok(()) => perms.to_remove.as_slice(),
            Err(e) => e.completed(),
        };
        current.permissions.retain(|p| !removed.contains(p));
        result?;
    }
    if !perms.to_add.is_empty() {
        let result = provider
            .player()
            .add_team_permissions(team_id, &perms.to_add)
            .await;
        let added = match &result {
            Ok(()) => perms.to_add.as_slice(),
            Err(e) => e.completed(),
        };
        current.permissions.extend(added.iter().cloned());
        result?;
    }
    current.permissions.clone_from(&desired.permissions);

    let previous: Vec<String> = current.users.iter().map(|u| u.user_id.clone()).collect();
    let wanted: Vec<String> = desired.users.iter().map(|u| u.user_id.clone()).collect();
    let users = diff_sets(&previous, &wanted);
    if !users.to_remove.is_empty() {
        let result = provider
            .player()
            .remove_users_from_team(team_id, &users.to_remove)
            .await;
        let removed = match &result {
            Ok(()) => users.to_remove.as_slice(),
            Err(e) => e.completed(),
        };
        current.users.retain(|u| !removed.contains(&u.user_id));
        result?;
    }
    if !users.to_add.is_empty() {
        let result = provider
            .player()
            .add_users_to_team(team_id, &users.to_add)
            .await;
        let added = match &result {
            Ok(()) => users.to_add.as_slice(),
            Err(e) => e.completed(),
        };
        current.users.extend(
            desired
                .users
                .iter()
                .filter(|u| added.contains(&u.user_id))
                .cloned(),
        );
        result?;
    }
    if !desired.users.is_empty() {
        apply_membership_roles(provider, roles, team_id, &desired.users).await?;
    }
    current.users.clone_from(&desired.users);
    Ok(())
}

/// Set each user's team-scoped role where it differs from the backend's.
async fn apply_membership_roles(
    provider: &Provider,
    roles: &mut RoleResolver<'_>,
    team_id: &str,
    users: &[TeamUser],
) -> Result<(), CoreError> {
    let memberships = provider.player().list_memberships(team_id).await?;
    for user in users {
        let Some(membership) = memberships.iter().find(|m| m.user_id == user.user_id) else {
            warn!(team_id, user_id = %user.user_id, "no membership found for team user");
            continue;
        };
        let role_id = roles.id_for(user.role.as_deref()).await?;
        if membership.role_id.as_deref().filter(|r| !r.is_empty()) != role_id.as_deref() {
            provider
                .player()
                .set_membership_role(&membership.id, role_id.as_deref())
                .await?;
        }
    }
    Ok(())
}

// ── Application instances ────────────────────────────────────────────

async fn reconcile_instances(
    provider: &Provider,
    team_id: &str,
    desired: &TeamSpec,
    apps: &[ApplicationSpec],
) -> Result<(), CoreError> {
    let remote: Vec<AppInstanceSpec> = provider
        .player()
        .list_instances(team_id)
        .await?
        .into_iter()
        .map(|inst| instance_from_remote(inst, apps))
        .collect();
    let plan = plan_instances(&team_label(desired), &remote, &desired.app_instances)?;
    debug!(
        team_id,
        create = plan.create.len(),
        update = plan.update.len(),
        delete = plan.delete.len(),
        "reconciling application instances"
    );

    if !plan.delete.is_empty() {
        provider.player().delete_instances(&plan.delete).await?;
    }
    for (id, inst) in &plan.update {
        let parent = resolve_parent(inst, apps)?;
        provider
            .player()
            .update_instance(id, &instance_to_wire(team_id, &parent, inst.display_order))
            .await?;
    }
    for mut inst in plan.create {
        create_instance(provider, team_id, &mut inst, apps).await?;
    }
    Ok(())
}

async fn create_instance(
    provider: &Provider,
    team_id: &str,
    inst: &mut AppInstanceSpec,
    apps: &[ApplicationSpec],
) -> Result<(), CoreError> {
    let parent = resolve_parent(inst, apps)?;
    let id = provider
        .player()
        .create_instance(team_id, &instance_to_wire(team_id, &parent, inst.display_order))
        .await?;
    inst.id = Some(id);
    Ok(())
}

/// The application id an instance points at.
///
/// `parent` may be an application name in this view or an application id;
/// when unset, the application named like the instance is used.
fn resolve_parent(inst: &AppInstanceSpec, apps: &[ApplicationSpec]) -> Result<String, CoreError> {
    let key = inst.parent.as_deref().unwrap_or(&inst.name);

    if let Some(id) = apps
        .iter()
        .find(|a| a.name.as_deref() == Some(key))
        .and_then(|a| a.app_id.clone())
    {
        return Ok(id);
    }
    if inst.parent.is_some() || apps.iter().any(|a| a.app_id.as_deref() == Some(key)) {
        return Ok(key.to_owned());
    }
    Err(CoreError::invalid(
        format!("app_instance[{}].parent", inst.name),
        "no application with this name in the view",
    ))
}

/// Convert a listed instance, naming it after its application when the
/// backend leaves the name out.
fn instance_from_remote(inst: ApplicationInstance, apps: &[ApplicationSpec]) -> AppInstanceSpec {
    let mut spec = AppInstanceSpec::from(inst);
    if spec.name.is_empty() {
        if let Some(name) = apps
            .iter()
            .find(|a| a.app_id.is_some() && a.app_id == spec.parent)
            .and_then(|a| a.name.clone())
        {
            spec.name = name;
        }
    }
    spec
}

/// Keep the previously written form of `parent` (name, id, or unset) when
/// it still points at the same application, so reads don't churn it.
fn settle_parent(
    inst: AppInstanceSpec,
    previous: Option<&TeamSpec>,
    apps: &[ApplicationSpec],
) -> AppInstanceSpec {
    let Some(prev) = previous.and_then(|t| t.app_instances.iter().find(|p| p.name == inst.name))
    else {
        return inst;
    };
    if resolve_parent(prev, apps).ok() == inst.parent {
        AppInstanceSpec {
            parent: prev.parent.clone(),
            ..inst
        }
    } else {
        inst
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn app(id: &str, name: &str) -> ApplicationSpec {
        ApplicationSpec {
            app_id: Some(id.into()),
            name: Some(name.into()),
            ..ApplicationSpec::default()
        }
    }

    fn inst(name: &str, parent: Option<&str>) -> AppInstanceSpec {
        AppInstanceSpec {
            id: None,
            name: name.into(),
            display_order: 0.0,
            parent: parent.map(str::to_owned),
        }
    }

    #[test]
    fn parent_resolves_by_name_id_or_instance_name() {
        let apps = vec![app("a-1", "Console"), app("a-2", "Chat")];

        assert_eq!(resolve_parent(&inst("x", Some("Chat")), &apps).unwrap(), "a-2");
        assert_eq!(resolve_parent(&inst("x", Some("a-1")), &apps).unwrap(), "a-1");
        assert_eq!(resolve_parent(&inst("Console", None), &apps).unwrap(), "a-1");
        assert!(resolve_parent(&inst("Missing", None), &apps).is_err());
    }

    #[test]
    fn read_keeps_parent_written_by_name() {
        let apps = vec![app("a-1", "Console")];
        let previous = TeamSpec {
            app_instances: vec![inst("Console", Some("Console"))],
            ..TeamSpec::default()
        };
        let remote = AppInstanceSpec {
            id: Some("i-1".into()),
            ..inst("Console", Some("a-1"))
        };

        let settled = settle_parent(remote, Some(&previous), &apps);
        assert_eq!(settled.parent.as_deref(), Some("Console"));
        assert_eq!(settled.id.as_deref(), Some("i-1"));
    }

    #[test]
    fn duplicate_instance_names_fail_validation() {
        let state = ViewState {
            name: "v".into(),
            description: None,
            status: None,
            create_admin_team: false,
            applications: Vec::new(),
            teams: vec![TeamSpec {
                name: Some("Blue".into()),
                app_instances: vec![inst("A", None), inst("A", None)],
                ..TeamSpec::default()
            }],
        };
        assert!(matches!(
            validate(&state),
            Err(CoreError::DuplicateInstanceName { .. })
        ));
    }
}
