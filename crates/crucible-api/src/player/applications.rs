// Player API application endpoints
//
// Applications belong to a view. Creation is view-scoped, while update
// and delete address the application directly.

use reqwest::StatusCode;
use tracing::debug;

use crate::error::Error;
use crate::models::Application;
use crate::player::PlayerClient;
use crate::rest::{Created, Progress, decode, expect_status};

impl PlayerClient {
    /// `GET views/{view}/applications` -- expects 200.
    pub async fn list_applications(&self, view: &str) -> Result<Vec<Application>, Error> {
        let token = self.rest.token().await?;
        self.rest
            .fetch(
                &token,
                &format!("views/{view}/applications"),
                "listing view applications",
            )
            .await
    }

    /// Create each application in order and return the assigned ids.
    ///
    /// `POST views/{view}/applications` -- expects 201 per application.
    /// On failure the error lists the ids created so far.
    pub async fn create_applications(
        &self,
        view: &str,
        apps: &[Application],
    ) -> Result<Vec<String>, Error> {
        let token = self.rest.token().await?;
        let path = format!("views/{view}/applications");
        let mut progress = Progress::new("creating applications", apps.len());

        for app in apps {
            let mut body = app.clone();
            body.id = None;
            body.view_id = view.to_owned();

            let step = async {
                let resp = self.rest.post(&token, &path, &body).await?;
                let created: Created =
                    decode(expect_status(resp, StatusCode::CREATED, "creating application")?)
                        .await?;
                Ok::<_, Error>(created.id)
            };
            match step.await {
                Ok(id) => progress.record(id),
                Err(e) => return Err(progress.fail(e)),
            }
        }
        Ok(progress.finish())
    }

    /// `PUT applications/{id}` for each application -- expects 200.
    ///
    /// Applications without an id are skipped.
    pub async fn update_applications(&self, apps: &[Application]) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let mut progress = Progress::new("updating applications", apps.len());

        for app in apps {
            let Some(id) = app.id.as_deref() else {
                debug!(name = ?app.name, "skipping application without id");
                continue;
            };
            let step = async {
                let resp = self
                    .rest
                    .put(&token, &format!("applications/{id}"), app)
                    .await?;
                expect_status(resp, StatusCode::OK, "updating application")
            };
            match step.await {
                Ok(_) => progress.record(id),
                Err(e) => return Err(progress.fail(e)),
            }
        }
        Ok(())
    }

    /// `DELETE applications/{id}` for each id -- expects 204.
    pub async fn delete_applications(&self, ids: &[String]) -> Result<(), Error> {
        let token = self.rest.token().await?;
        self.delete_each(&token, "deleting applications", ids, |id| {
            format!("applications/{id}")
        })
        .await
    }
}
