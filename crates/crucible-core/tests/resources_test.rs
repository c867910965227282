#![allow(clippy::unwrap_used)]
// Lifecycle tests for the resource adapters against a wiremock backend.
//
// All three API base URLs point at the same mock server; their paths do
// not overlap.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crucible_api::TlsMode;
use crucible_core::{
    AppInstanceSpec, AppTemplateState, ApplicationSpec, CoreError, PlayerUserState, Provider,
    ProviderConfig, Resource, ResourceData, TeamSpec, TeamUser, ViewState, VlanState, VmState,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Provider) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "t" })))
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).unwrap();
    let config = ProviderConfig {
        username: "operator".into(),
        password: SecretString::from("pw"),
        client_id: "crucible-provider".into(),
        client_secret: SecretString::from("secret"),
        auth_url: base.join("/connect/authorize").unwrap(),
        token_url: base.join("/connect/token").unwrap(),
        vm_api_url: base.clone(),
        player_api_url: base.clone(),
        caster_api_url: base,
        timeout: None,
        tls: TlsMode::System,
    };
    let provider = Provider::with_http(&config, reqwest::Client::new()).unwrap();
    (server, provider)
}

fn vm_state(teams: &[&str]) -> VmState {
    VmState {
        vm_id: None,
        url: String::new(),
        name: "kali".into(),
        team_ids: teams.iter().map(|t| (*t).to_owned()).collect(),
        user_id: None,
        console_connection: None,
        default_url: false,
        embeddable: true,
    }
}

fn app(id: &str, name: &str) -> ApplicationSpec {
    ApplicationSpec {
        app_id: Some(id.into()),
        name: Some(name.into()),
        view_id: Some("v-1".into()),
        ..ApplicationSpec::default()
    }
}

fn instance(id: Option<&str>, name: &str, order: f64) -> AppInstanceSpec {
    AppInstanceSpec {
        id: id.map(str::to_owned),
        name: name.into(),
        display_order: order,
        parent: None,
    }
}

fn team(id: &str, instances: Vec<AppInstanceSpec>) -> TeamSpec {
    TeamSpec {
        team_id: Some(id.into()),
        name: Some(format!("team {id}")),
        app_instances: instances,
        ..TeamSpec::default()
    }
}

fn user(id: &str, role: Option<&str>) -> TeamUser {
    TeamUser {
        user_id: id.into(),
        role: role.map(str::to_owned),
    }
}

fn view(applications: Vec<ApplicationSpec>, teams: Vec<TeamSpec>) -> ViewState {
    ViewState {
        name: "Exercise".into(),
        description: None,
        status: Some("Active".into()),
        create_admin_team: false,
        applications,
        teams,
    }
}

async fn mount_view_read(server: &MockServer, apps: serde_json::Value, teams: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/views/v-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "v-1",
            "name": "Exercise",
            "description": null,
            "status": "Active",
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/views/v-1/applications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(apps))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/views/v-1/teams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(teams))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/teams/[^/]+/application-instances$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .with_priority(10)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/teams/[^/]+/memberships$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

// ── VM ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_vm_create_generates_uuid_identity() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/vms"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/vms/[0-9a-f-]{36}$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ignored-by-test",
            "url": "",
            "name": "kali",
            "teamIds": ["t2", "t1"],
        })))
        .mount(&server)
        .await;

    let mut data = ResourceData::new(vm_state(&["t1", "t2"]));
    VmState::create(&provider, &mut data).await.unwrap();

    let id = data.id.clone().unwrap();
    assert!(uuid::Uuid::parse_str(&id).is_ok(), "not a uuid: {id}");
    assert_eq!(data.state.team_ids, vec!["t1".to_owned(), "t2".to_owned()]);
}

#[tokio::test]
async fn test_vm_read_clears_identity_when_gone() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vms/vm-1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut data = ResourceData {
        id: Some("vm-1".into()),
        state: vm_state(&[]),
    };
    VmState::read(&provider, &mut data).await.unwrap();
    assert_eq!(data.id, None);
}

#[tokio::test]
async fn test_vm_update_records_partial_team_removal() {
    let (server, provider) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/teams/a/vms/vm-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/teams/b/vms/vm-1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/api/teams/[^/]+/vms/vm-1$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut data = ResourceData {
        id: Some("vm-1".into()),
        state: vm_state(&["a", "b"]),
    };
    let err = VmState::update(&provider, &mut data, vm_state(&["c"]))
        .await
        .unwrap_err();

    assert_eq!(err.completed().to_vec(), vec!["a".to_owned()]);
    assert_eq!(data.state.team_ids, vec!["b".to_owned()]);
    assert_eq!(data.id.as_deref(), Some("vm-1"));
}

#[tokio::test]
async fn test_vm_update_without_identity_is_rejected() {
    let (_server, provider) = setup().await;

    let mut data = ResourceData::new(vm_state(&[]));
    let err = VmState::update(&provider, &mut data, vm_state(&["a"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::MissingIdentity { .. }));
}

// ── View ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_view_update_reconciles_instances_by_name() {
    let (server, provider) = setup().await;
    let apps = vec![app("a-1", "Console"), app("a-2", "Chat"), app("a-3", "Wiki")];

    Mock::given(method("PUT"))
        .and(path("/api/views/v-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/api/applications/a-[123]$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/teams/t1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/teams/t1/application-instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "i-1", "name": "Console", "applicationId": "a-1", "displayOrder": 0 },
            { "id": "i-2", "name": "Chat", "applicationId": "a-2", "displayOrder": 0 },
        ])))
        .mount(&server)
        .await;

    // Expected plan: delete Console, update Chat to 1, create Wiki at 0.
    Mock::given(method("DELETE"))
        .and(path("/api/application-instances/i-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/application-instances/i-2"))
        .and(body_partial_json(json!({ "applicationId": "a-2", "displayOrder": 1.0 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/teams/t1/application-instances"))
        .and(body_partial_json(json!({ "applicationId": "a-3", "displayOrder": 0.0 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "i-3" })))
        .expect(1)
        .mount(&server)
        .await;

    mount_view_read(
        &server,
        json!([
            { "id": "a-1", "name": "Console", "viewId": "v-1" },
            { "id": "a-2", "name": "Chat", "viewId": "v-1" },
            { "id": "a-3", "name": "Wiki", "viewId": "v-1" },
        ]),
        json!([{ "id": "t1", "name": "team t1", "permissions": [] }]),
    )
    .await;

    let previous = view(
        apps.clone(),
        vec![team(
            "t1",
            vec![
                instance(Some("i-1"), "Console", 0.0),
                instance(Some("i-2"), "Chat", 0.0),
            ],
        )],
    );
    let desired = view(
        apps,
        vec![team(
            "t1",
            vec![instance(None, "Chat", 1.0), instance(None, "Wiki", 0.0)],
        )],
    );

    let mut data = ResourceData {
        id: Some("v-1".into()),
        state: previous,
    };
    ViewState::update(&provider, &mut data, desired).await.unwrap();
    assert_eq!(data.id.as_deref(), Some("v-1"));
    assert_eq!(data.state.teams.len(), 1);
}

#[tokio::test]
async fn test_view_update_reports_partial_team_deletion() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/views/v-1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/teams/t1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/teams/t2"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/teams/t3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut data = ResourceData {
        id: Some("v-1".into()),
        state: view(
            Vec::new(),
            vec![team("t1", vec![]), team("t2", vec![]), team("t3", vec![])],
        ),
    };
    let err = ViewState::update(&provider, &mut data, view(Vec::new(), Vec::new()))
        .await
        .unwrap_err();

    assert_eq!(err.completed().to_vec(), vec!["t1".to_owned()]);
    let left: Vec<_> = data
        .state
        .teams
        .iter()
        .filter_map(|t| t.team_id.clone())
        .collect();
    assert_eq!(left, vec!["t2".to_owned(), "t3".to_owned()]);
}

#[tokio::test]
async fn test_view_create_with_duplicate_instances_sends_nothing() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/views"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "v-1" })))
        .expect(0)
        .mount(&server)
        .await;

    let mut t = team("t1", vec![instance(None, "A", 0.0), instance(None, "A", 1.0)]);
    t.team_id = None;
    let mut data = ResourceData::new(view(Vec::new(), vec![t]));

    let err = ViewState::create(&provider, &mut data).await.unwrap_err();
    assert!(matches!(err, CoreError::DuplicateInstanceName { .. }));
    assert_eq!(data.id, None);
}

#[tokio::test]
async fn test_view_reapply_without_ids_updates_in_place() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/views/v-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/applications/a-1"))
        .and(body_partial_json(json!({ "id": "a-1", "name": "Console" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/teams/t1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/api/(views|teams)/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    mount_view_read(
        &server,
        json!([{ "id": "a-1", "name": "Console", "viewId": "v-1" }]),
        json!([{ "id": "t1", "name": "team t1", "permissions": [] }]),
    )
    .await;

    let mut written_app = app("a-1", "Console");
    written_app.app_id = None;
    let mut written_team = team("t1", vec![]);
    written_team.team_id = None;

    let mut data = ResourceData {
        id: Some("v-1".into()),
        state: view(vec![app("a-1", "Console")], vec![team("t1", vec![])]),
    };
    ViewState::update(&provider, &mut data, view(vec![written_app], vec![written_team]))
        .await
        .unwrap();

    assert_eq!(data.state.applications[0].app_id.as_deref(), Some("a-1"));
    assert_eq!(data.state.teams[0].team_id.as_deref(), Some("t1"));
}

#[tokio::test]
async fn test_view_update_rejects_duplicate_application_names() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/views/v-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut first = app("a-1", "Console");
    first.app_id = None;
    let second = first.clone();

    let mut data = ResourceData {
        id: Some("v-1".into()),
        state: view(vec![app("a-1", "Console")], Vec::new()),
    };
    let err = ViewState::update(&provider, &mut data, view(vec![first, second], Vec::new()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::DuplicateName { ref collection, .. } if collection == "application"
    ));
    assert_eq!(data.state.applications.len(), 1);
}

#[tokio::test]
async fn test_view_update_converges_team_members() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/views/v-1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/teams/t1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/teams/t1/permissions/p1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/teams/t1/permissions/p3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/teams/t1/users/u1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/teams/t1/users/u3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path_regex(r"^/api/teams/t1/(permissions/p2|users/u2)$"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/teams/t1/memberships"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "m2", "teamId": "t1", "userId": "u2", "roleId": null },
            { "id": "m3", "teamId": "t1", "userId": "u3", "roleId": null },
        ])))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/roles/name/Observer"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "r-obs", "name": "Observer" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/team-memberships/m2"))
        .and(body_partial_json(json!({ "id": "m2", "roleId": "r-obs" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/team-memberships/m3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    mount_view_read(
        &server,
        json!([]),
        json!([{
            "id": "t1",
            "name": "team t1",
            "permissions": [{ "id": "p2" }, { "id": "p3" }],
        }]),
    )
    .await;

    let mut previous = team("t1", vec![]);
    previous.permissions = vec!["p1".into(), "p2".into()];
    previous.users = vec![user("u1", None), user("u2", None)];
    let mut desired = team("t1", vec![]);
    desired.permissions = vec!["p2".into(), "p3".into()];
    desired.users = vec![user("u2", Some("Observer")), user("u3", None)];

    let mut data = ResourceData {
        id: Some("v-1".into()),
        state: view(Vec::new(), vec![previous]),
    };
    ViewState::update(&provider, &mut data, view(Vec::new(), vec![desired]))
        .await
        .unwrap();

    assert_eq!(
        data.state.teams[0].permissions,
        vec!["p2".to_owned(), "p3".to_owned()]
    );
}

#[tokio::test]
async fn test_view_update_records_partial_permission_removal() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/api/(views/v-1|teams/t1)$"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/teams/t1/permissions/p1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/teams/t1/permissions/p2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut previous = team("t1", vec![]);
    previous.permissions = vec!["p1".into(), "p2".into()];
    let mut data = ResourceData {
        id: Some("v-1".into()),
        state: view(Vec::new(), vec![previous]),
    };
    let err = ViewState::update(&provider, &mut data, view(Vec::new(), vec![team("t1", vec![])]))
        .await
        .unwrap_err();

    assert_eq!(err.completed().to_vec(), vec!["p1".to_owned()]);
    assert_eq!(data.state.teams[0].permissions, vec!["p2".to_owned()]);
}

#[tokio::test]
async fn test_view_update_records_partial_user_addition() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/api/(views/v-1|teams/t1)$"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/teams/t1/users/u1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/teams/t1/users/u2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut desired = team("t1", vec![]);
    desired.users = vec![user("u1", None), user("u2", None)];
    let mut data = ResourceData {
        id: Some("v-1".into()),
        state: view(Vec::new(), vec![team("t1", vec![])]),
    };
    ViewState::update(&provider, &mut data, view(Vec::new(), vec![desired]))
        .await
        .unwrap_err();

    assert_eq!(data.state.teams[0].users, vec![user("u1", None)]);
}

#[tokio::test]
async fn test_view_create_records_partial_team_permissions() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/views"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "v-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/views/v-1/teams"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "t1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/teams/t1/permissions/p1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/teams/t1/permissions/p2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/api/teams/t1/users/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut t = team("t1", vec![]);
    t.team_id = None;
    t.permissions = vec!["p1".into(), "p2".into()];
    t.users = vec![user("u1", None)];
    let mut data = ResourceData::new(view(Vec::new(), vec![t]));

    ViewState::create(&provider, &mut data).await.unwrap_err();

    assert_eq!(data.id.as_deref(), Some("v-1"));
    let created = &data.state.teams[0];
    assert_eq!(created.team_id.as_deref(), Some("t1"));
    assert_eq!(created.permissions, vec!["p1".to_owned()]);
    assert!(created.users.is_empty());
}

#[tokio::test]
async fn test_view_create_discards_written_ids() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/views"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "v-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/views/v-1/applications"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let stale_app = app("old-app", "Console");
    let stale_team = team("old-team", vec![instance(Some("old-inst"), "Console", 0.0)]);
    let mut data = ResourceData::new(view(vec![stale_app], vec![stale_team]));

    ViewState::create(&provider, &mut data).await.unwrap_err();

    assert_eq!(data.id.as_deref(), Some("v-1"));
    assert_eq!(data.state.applications[0].app_id, None);
    assert_eq!(data.state.teams[0].team_id, None);
    assert_eq!(data.state.teams[0].app_instances[0].id, None);
}

#[tokio::test]
async fn test_view_create_with_duplicate_team_names_sends_nothing() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/views"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "v-1" })))
        .expect(0)
        .mount(&server)
        .await;

    let mut blue = team("t1", vec![]);
    blue.name = Some("Blue".into());
    let mut again = team("t2", vec![]);
    again.name = Some("Blue".into());
    let mut data = ResourceData::new(view(Vec::new(), vec![blue, again]));

    let err = ViewState::create(&provider, &mut data).await.unwrap_err();
    assert!(matches!(err, CoreError::DuplicateName { ref name, .. } if name == "Blue"));
    assert_eq!(data.id, None);
}

#[tokio::test]
async fn test_view_delete_tolerates_absent_view() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/views/v-1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/views/v-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut data = ResourceData {
        id: Some("v-1".into()),
        state: view(Vec::new(), Vec::new()),
    };
    ViewState::delete(&provider, &mut data).await.unwrap();
    assert_eq!(data.id, None);
}

// ── Application template ────────────────────────────────────────────

#[tokio::test]
async fn test_template_delete_tolerates_concurrent_removal() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/application-templates/tpl-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "tpl-1",
            "name": "Console",
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/application-templates/tpl-1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = ResourceData {
        id: Some("tpl-1".into()),
        state: AppTemplateState {
            name: "Console".into(),
            url: String::new(),
            icon: String::new(),
            embeddable: true,
            load_in_background: false,
        },
    };
    AppTemplateState::delete(&provider, &mut data).await.unwrap();
    assert_eq!(data.id, None);
}

#[tokio::test]
async fn test_template_delete_reports_other_failures() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/application-templates/tpl-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "tpl-1",
            "name": "Console",
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/application-templates/tpl-1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let mut data = ResourceData {
        id: Some("tpl-1".into()),
        state: AppTemplateState {
            name: "Console".into(),
            url: String::new(),
            icon: String::new(),
            embeddable: false,
            load_in_background: false,
        },
    };
    AppTemplateState::delete(&provider, &mut data).await.unwrap_err();
    assert_eq!(data.id.as_deref(), Some("tpl-1"));
}

// ── User ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_user_role_round_trips_through_ids() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/roles/name/Observer"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "r-9", "name": "Observer" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/roles/r-9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "r-9", "name": "Observer" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(body_partial_json(json!({ "id": "u-1", "roleId": "r-9" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "name": "Ada",
            "roleId": "r-9",
            "isSystemAdmin": false,
        })))
        .mount(&server)
        .await;

    let mut data = ResourceData::new(PlayerUserState {
        user_id: "u-1".into(),
        name: "Ada".into(),
        role: Some("Observer".into()),
        is_system_admin: false,
    });
    PlayerUserState::create(&provider, &mut data).await.unwrap();

    assert_eq!(data.id.as_deref(), Some("u-1"));
    assert_eq!(data.state.role.as_deref(), Some("Observer"));
}

#[tokio::test]
async fn test_user_without_role_skips_lookup() {
    let (server, provider) = setup().await;

    Mock::given(path_regex(r"^/api/roles/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/u-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-2",
            "name": "Grace",
            "roleId": null,
        })))
        .mount(&server)
        .await;

    let mut data = ResourceData {
        id: Some("u-2".into()),
        state: PlayerUserState {
            user_id: "u-2".into(),
            name: String::new(),
            role: None,
            is_system_admin: false,
        },
    };
    PlayerUserState::read(&provider, &mut data).await.unwrap();
    assert_eq!(data.state.name, "Grace");
    assert_eq!(data.state.role, None);
}

// ── VLAN ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_vlan_update_releases_and_reacquires() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/vlans/old"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "old",
            "vlanId": 101,
            "projectId": "proj",
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/vlans/old/actions/release"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/vlans/actions/acquire"))
        .and(body_partial_json(json!({ "projectId": "proj", "tag": "dmz" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "new",
            "vlanId": 202,
            "projectId": "proj",
            "tag": "dmz",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut data = ResourceData {
        id: Some("old".into()),
        state: VlanState {
            project_id: Some("proj".into()),
            vlan_id: Some(101),
            vlan_uuid: Some("old".into()),
            ..VlanState::default()
        },
    };
    let desired = VlanState {
        project_id: Some("proj".into()),
        tag: Some("dmz".into()),
        ..VlanState::default()
    };
    VlanState::update(&provider, &mut data, desired).await.unwrap();

    assert_eq!(data.id.as_deref(), Some("new"));
    assert_eq!(data.state.vlan_id, Some(202));
}
