// Player API directory user endpoints
//
// Users are keyed by an id chosen by the caller (the identity provider's
// subject), so create does not return one.

use reqwest::StatusCode;
use tracing::info;

use crate::error::Error;
use crate::models::User;
use crate::player::PlayerClient;
use crate::rest::{decode, expect_status};

impl PlayerClient {
    /// `POST users` -- expects 201.
    pub async fn create_user(&self, user: &User) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let resp = self.rest.post(&token, "users", user).await?;
        expect_status(resp, StatusCode::CREATED, "creating user")?;
        info!(id = %user.id, name = %user.name, "user created");
        Ok(())
    }

    /// Fetch a user, `None` on 404.
    pub async fn find_user(&self, id: &str) -> Result<Option<User>, Error> {
        let token = self.rest.token().await?;
        match self
            .rest
            .probe(&token, &format!("users/{id}"), "reading user")
            .await?
        {
            Some(resp) => decode(resp).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn user_exists(&self, id: &str) -> Result<bool, Error> {
        Ok(self.find_user(id).await?.is_some())
    }

    /// `PUT users/{id}` -- expects 200.
    pub async fn update_user(&self, id: &str, user: &User) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let resp = self.rest.put(&token, &format!("users/{id}"), user).await?;
        expect_status(resp, StatusCode::OK, "updating user")?;
        Ok(())
    }

    /// `DELETE users/{id}` -- expects 204.
    pub async fn delete_user(&self, id: &str) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let resp = self.rest.delete(&token, &format!("users/{id}")).await?;
        expect_status(resp, StatusCode::NO_CONTENT, "deleting user")?;
        Ok(())
    }
}
