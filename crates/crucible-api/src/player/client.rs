// Player API client core and view endpoints

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::SecretString;
use tracing::{debug, info};

use crate::auth::Credentials;
use crate::error::Error;
use crate::models::View;
use crate::rest::{Created, Progress, RestClient, decode, expect_status};

/// Default status for new views when none is given.
const DEFAULT_VIEW_STATUS: &str = "Active";

pub struct PlayerClient {
    pub(super) rest: RestClient,
}

impl PlayerClient {
    pub fn new(
        base_url: &str,
        http: reqwest::Client,
        credentials: Arc<Credentials>,
    ) -> Result<Self, Error> {
        Ok(Self {
            rest: RestClient::new(base_url, http, credentials)?,
        })
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    // ── Shared bulk loops ────────────────────────────────────────────

    /// `DELETE {path(id)}` for each id, in order, each expecting 204.
    pub(super) async fn delete_each(
        &self,
        token: &SecretString,
        operation: &'static str,
        ids: &[String],
        path: impl Fn(&str) -> String,
    ) -> Result<(), Error> {
        let mut progress = Progress::new(operation, ids.len());
        for id in ids {
            let step = async {
                let resp = self.rest.delete(token, &path(id.as_str())).await?;
                expect_status(resp, StatusCode::NO_CONTENT, operation)
            };
            match step.await {
                Ok(_) => progress.record(id.as_str()),
                Err(e) => return Err(progress.fail(e)),
            }
        }
        Ok(())
    }

    /// Body-less `POST {path(id)}` for each id, in order, each expecting 200.
    pub(super) async fn post_each(
        &self,
        token: &SecretString,
        operation: &'static str,
        ids: &[String],
        path: impl Fn(&str) -> String,
    ) -> Result<(), Error> {
        let mut progress = Progress::new(operation, ids.len());
        for id in ids {
            let step = async {
                let resp = self.rest.post_empty(token, &path(id.as_str())).await?;
                expect_status(resp, StatusCode::OK, operation)
            };
            match step.await {
                Ok(_) => progress.record(id.as_str()),
                Err(e) => return Err(progress.fail(e)),
            }
        }
        Ok(())
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Create a view and return the id the backend assigned.
    ///
    /// `POST views` -- expects 201. An empty description is left out and a
    /// missing status defaults to `Active`.
    pub async fn create_view(&self, view: &View) -> Result<String, Error> {
        let token = self.rest.token().await?;

        let mut body = view.clone();
        body.id = None;
        if body.description.as_deref() == Some("") {
            body.description = None;
        }
        if body.status.as_deref().is_none_or(str::is_empty) {
            body.status = Some(DEFAULT_VIEW_STATUS.to_owned());
        }

        let resp = self.rest.post(&token, "views", &body).await?;
        let created: Created =
            decode(expect_status(resp, StatusCode::CREATED, "creating view")?).await?;
        info!(id = %created.id, name = %view.name, "view created");
        Ok(created.id)
    }

    /// `GET views/{id}` -- expects 200.
    pub async fn get_view(&self, id: &str) -> Result<View, Error> {
        let token = self.rest.token().await?;
        self.rest
            .fetch(&token, &format!("views/{id}"), "reading view")
            .await
    }

    /// Fetch a view, `None` on 404.
    pub async fn find_view(&self, id: &str) -> Result<Option<View>, Error> {
        let token = self.rest.token().await?;
        match self
            .rest
            .probe(&token, &format!("views/{id}"), "reading view")
            .await?
        {
            Some(resp) => decode(resp).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn view_exists(&self, id: &str) -> Result<bool, Error> {
        Ok(self.find_view(id).await?.is_some())
    }

    /// `PUT views/{id}` -- expects 200. The body always carries the id.
    pub async fn update_view(&self, id: &str, view: &View) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let mut body = view.clone();
        body.id = Some(id.to_owned());

        debug!(id, "updating view");
        let resp = self.rest.put(&token, &format!("views/{id}"), &body).await?;
        expect_status(resp, StatusCode::OK, "updating view")?;
        Ok(())
    }

    /// `DELETE views/{id}` -- expects 204.
    pub async fn delete_view(&self, id: &str) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let resp = self.rest.delete(&token, &format!("views/{id}")).await?;
        expect_status(resp, StatusCode::NO_CONTENT, "deleting view")?;
        info!(id, "view deleted");
        Ok(())
    }
}
