// OAuth2 resource-owner password grant.
//
// Every backend operation starts by exchanging the configured user
// credentials for a bearer token. Tokens are not cached between operations.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::rest::preview;

/// Credentials shared by all three backends.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    pub client_id: String,
    pub client_secret: SecretString,
    /// Authorization endpoint. Kept for parity with the identity server's
    /// configuration; the password grant only talks to `token_url`.
    pub auth_url: Url,
    pub token_url: Url,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl Credentials {
    /// Perform the password grant against `token_url`.
    pub async fn fetch_token(&self, http: &reqwest::Client) -> Result<SecretString, Error> {
        debug!("requesting token from {}", self.token_url);

        let form = [
            ("grant_type", "password"),
            ("username", self.username.as_str()),
            ("password", self.password.expose_secret()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
        ];

        let resp = http
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("token endpoint returned HTTP {status}: {}", preview(&body)),
            });
        }

        let body = resp.text().await?;
        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| Error::Authentication {
            message: format!("malformed token response: {e}"),
        })?;

        Ok(SecretString::from(token.access_token))
    }
}
