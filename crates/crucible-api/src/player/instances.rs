// Player API application instance endpoints

use reqwest::StatusCode;

use crate::error::Error;
use crate::models::{ApplicationInstance, ApplicationInstanceRequest};
use crate::player::PlayerClient;
use crate::rest::{Created, decode, expect_status};

impl PlayerClient {
    /// `GET teams/{team}/application-instances` -- expects 200.
    pub async fn list_instances(&self, team: &str) -> Result<Vec<ApplicationInstance>, Error> {
        let token = self.rest.token().await?;
        self.rest
            .fetch(
                &token,
                &format!("teams/{team}/application-instances"),
                "listing application instances",
            )
            .await
    }

    /// `POST teams/{team}/application-instances` -- expects 201, returns the new id.
    pub async fn create_instance(
        &self,
        team: &str,
        instance: &ApplicationInstanceRequest,
    ) -> Result<String, Error> {
        let token = self.rest.token().await?;
        let mut body = instance.clone();
        body.id = None;
        body.team_id = team.to_owned();

        let resp = self
            .rest
            .post(&token, &format!("teams/{team}/application-instances"), &body)
            .await?;
        let created: Created = decode(expect_status(
            resp,
            StatusCode::CREATED,
            "creating application instance",
        )?)
        .await?;
        Ok(created.id)
    }

    /// `PUT application-instances/{id}` -- expects 200.
    pub async fn update_instance(
        &self,
        id: &str,
        instance: &ApplicationInstanceRequest,
    ) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let mut body = instance.clone();
        body.id = Some(id.to_owned());

        let resp = self
            .rest
            .put(&token, &format!("application-instances/{id}"), &body)
            .await?;
        expect_status(resp, StatusCode::OK, "updating application instance")?;
        Ok(())
    }

    /// `DELETE application-instances/{id}` for each id -- expects 204.
    pub async fn delete_instances(&self, ids: &[String]) -> Result<(), Error> {
        let token = self.rest.token().await?;
        self.delete_each(&token, "deleting application instances", ids, |id| {
            format!("application-instances/{id}")
        })
        .await
    }
}
