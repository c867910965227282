// Player API team endpoints
//
// Teams, their permissions, roles, and user membership. Role names are
// resolved here only as raw lookups; callers decide when to resolve.

use reqwest::StatusCode;
use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::models::{Role, Team, TeamMembership, TeamRequest};
use crate::player::PlayerClient;
use crate::rest::{Created, Progress, decode, expect_status};

impl PlayerClient {
    // ── Teams ────────────────────────────────────────────────────────

    /// `GET views/{view}/teams` -- expects 200.
    pub async fn list_teams(&self, view: &str) -> Result<Vec<Team>, Error> {
        let token = self.rest.token().await?;
        self.rest
            .fetch(&token, &format!("views/{view}/teams"), "listing view teams")
            .await
    }

    /// Create each team in order and return the assigned ids.
    ///
    /// `POST views/{view}/teams` -- expects 201 per team.
    pub async fn create_teams(
        &self,
        view: &str,
        teams: &[TeamRequest],
    ) -> Result<Vec<String>, Error> {
        let token = self.rest.token().await?;
        let path = format!("views/{view}/teams");
        let mut progress = Progress::new("creating teams", teams.len());

        for team in teams {
            let mut body = team.clone();
            body.id = None;

            let step = async {
                let resp = self.rest.post(&token, &path, &body).await?;
                let created: Created =
                    decode(expect_status(resp, StatusCode::CREATED, "creating team")?).await?;
                Ok::<_, Error>(created.id)
            };
            match step.await {
                Ok(id) => progress.record(id),
                Err(e) => return Err(progress.fail(e)),
            }
        }
        Ok(progress.finish())
    }

    /// `PUT teams/{id}` for each team carrying an id -- expects 200.
    pub async fn update_teams(&self, teams: &[TeamRequest]) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let mut progress = Progress::new("updating teams", teams.len());

        for team in teams {
            let Some(id) = team.id.as_deref() else {
                debug!(name = ?team.name, "skipping team without id");
                continue;
            };
            let step = async {
                let resp = self.rest.put(&token, &format!("teams/{id}"), team).await?;
                expect_status(resp, StatusCode::OK, "updating team")
            };
            match step.await {
                Ok(_) => progress.record(id),
                Err(e) => return Err(progress.fail(e)),
            }
        }
        Ok(())
    }

    /// `DELETE teams/{id}` for each id -- expects 204.
    pub async fn delete_teams(&self, ids: &[String]) -> Result<(), Error> {
        let token = self.rest.token().await?;
        self.delete_each(&token, "deleting teams", ids, |id| format!("teams/{id}"))
            .await
    }

    // ── Permissions ──────────────────────────────────────────────────

    /// `POST teams/{team}/permissions/{perm}` for each permission -- expects 200.
    pub async fn add_team_permissions(&self, team: &str, perms: &[String]) -> Result<(), Error> {
        let token = self.rest.token().await?;
        self.post_each(&token, "adding team permissions", perms, |perm| {
            format!("teams/{team}/permissions/{perm}")
        })
        .await
    }

    /// `DELETE teams/{team}/permissions/{perm}` for each permission -- expects 204.
    pub async fn remove_team_permissions(
        &self,
        team: &str,
        perms: &[String],
    ) -> Result<(), Error> {
        let token = self.rest.token().await?;
        self.delete_each(&token, "removing team permissions", perms, |perm| {
            format!("teams/{team}/permissions/{perm}")
        })
        .await
    }

    // ── Roles ────────────────────────────────────────────────────────

    /// `GET roles/name/{name}` -- expects 200.
    pub async fn role_by_name(&self, name: &str) -> Result<Role, Error> {
        let token = self.rest.token().await?;
        self.rest
            .fetch(&token, &format!("roles/name/{name}"), "resolving role name")
            .await
    }

    /// `GET roles/{id}` -- expects 200.
    pub async fn role_by_id(&self, id: &str) -> Result<Role, Error> {
        let token = self.rest.token().await?;
        self.rest
            .fetch(&token, &format!("roles/{id}"), "resolving role id")
            .await
    }

    // ── Membership ───────────────────────────────────────────────────

    /// `GET teams/{team}/memberships` -- expects 200.
    pub async fn list_memberships(&self, team: &str) -> Result<Vec<TeamMembership>, Error> {
        let token = self.rest.token().await?;
        self.rest
            .fetch(
                &token,
                &format!("teams/{team}/memberships"),
                "listing team memberships",
            )
            .await
    }

    /// `POST teams/{team}/users/{user}` for each user -- expects 200.
    pub async fn add_users_to_team(&self, team: &str, users: &[String]) -> Result<(), Error> {
        let token = self.rest.token().await?;
        self.post_each(&token, "adding users to team", users, |user| {
            format!("teams/{team}/users/{user}")
        })
        .await
    }

    /// `DELETE teams/{team}/users/{user}` for each user -- expects 204.
    pub async fn remove_users_from_team(
        &self,
        team: &str,
        users: &[String],
    ) -> Result<(), Error> {
        let token = self.rest.token().await?;
        self.delete_each(&token, "removing users from team", users, |user| {
            format!("teams/{team}/users/{user}")
        })
        .await
    }

    /// Set (or clear) the team-scoped role of one membership.
    ///
    /// `PUT team-memberships/{id}` -- expects 200.
    pub async fn set_membership_role(
        &self,
        membership: &str,
        role_id: Option<&str>,
    ) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let body = json!({ "id": membership, "roleId": role_id });
        let resp = self
            .rest
            .put(&token, &format!("team-memberships/{membership}"), &body)
            .await?;
        expect_status(resp, StatusCode::OK, "updating membership role")?;
        Ok(())
    }
}
