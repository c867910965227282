#![allow(clippy::unwrap_used, dead_code)]
// Shared fixtures for the wiremock client tests.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crucible_api::Credentials;

pub const TOKEN: &str = "test-token";

pub fn credentials(server: &MockServer) -> Arc<Credentials> {
    let base = server.uri();
    Arc::new(Credentials {
        username: "operator".into(),
        password: SecretString::from("hunter2"),
        client_id: "crucible-provider".into(),
        client_secret: SecretString::from("client-secret"),
        auth_url: Url::parse(&format!("{base}/connect/authorize")).unwrap(),
        token_url: Url::parse(&format!("{base}/connect/token")).unwrap(),
    })
}

/// Mount a token endpoint that accepts any password grant.
pub async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .and(body_string_contains("grant_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;
}
