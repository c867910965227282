// Player API application template endpoints

use reqwest::StatusCode;
use tracing::info;

use crate::error::Error;
use crate::models::ApplicationTemplate;
use crate::player::PlayerClient;
use crate::rest::{Created, decode, expect_status};

impl PlayerClient {
    /// `POST application-templates` -- expects 201, returns the new id.
    pub async fn create_template(&self, template: &ApplicationTemplate) -> Result<String, Error> {
        let token = self.rest.token().await?;
        let mut body = template.clone();
        body.id = None;

        let resp = self
            .rest
            .post(&token, "application-templates", &body)
            .await?;
        let created: Created = decode(expect_status(
            resp,
            StatusCode::CREATED,
            "creating application template",
        )?)
        .await?;
        info!(id = %created.id, name = %template.name, "application template created");
        Ok(created.id)
    }

    /// Fetch a template, `None` on 404.
    pub async fn find_template(&self, id: &str) -> Result<Option<ApplicationTemplate>, Error> {
        let token = self.rest.token().await?;
        match self
            .rest
            .probe(
                &token,
                &format!("application-templates/{id}"),
                "reading application template",
            )
            .await?
        {
            Some(resp) => decode(resp).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn template_exists(&self, id: &str) -> Result<bool, Error> {
        Ok(self.find_template(id).await?.is_some())
    }

    /// `PUT application-templates/{id}` -- expects 200.
    pub async fn update_template(
        &self,
        id: &str,
        template: &ApplicationTemplate,
    ) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let mut body = template.clone();
        body.id = Some(id.to_owned());

        let resp = self
            .rest
            .put(&token, &format!("application-templates/{id}"), &body)
            .await?;
        expect_status(resp, StatusCode::OK, "updating application template")?;
        Ok(())
    }

    /// `DELETE application-templates/{id}` -- expects 204.
    pub async fn delete_template(&self, id: &str) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let resp = self
            .rest
            .delete(&token, &format!("application-templates/{id}"))
            .await?;
        expect_status(resp, StatusCode::NO_CONTENT, "deleting application template")?;
        Ok(())
    }
}
