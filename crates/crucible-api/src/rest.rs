// Bearer-authenticated JSON REST transport shared by all backend clients.
//
// Each backend client owns one `RestClient` pointed at its own base URL.
// The underlying `reqwest::Client` is cloned from a single provider-wide
// instance, so the connection pool is shared.

use std::sync::Arc;

use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;

/// Response body of every create endpoint: the id the backend assigned.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct Created {
    pub id: String,
}

/// Raw REST transport: URL construction, auth header, status and body handling.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Arc<Credentials>,
}

impl RestClient {
    /// Wrap an existing `reqwest::Client` for the backend at `base_url`.
    pub fn new(
        base_url: &str,
        http: reqwest::Client,
        credentials: Arc<Credentials>,
    ) -> Result<Self, Error> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    /// The normalized base URL (always ends in `/api/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join a relative path (e.g. `"vms/abc"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Acquire a fresh bearer token for the next operation.
    pub(crate) async fn token(&self) -> Result<SecretString, Error> {
        self.credentials.fetch_token(&self.http).await
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get(&self, token: &SecretString, path: &str) -> Result<Response, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        Ok(resp)
    }

    pub(crate) async fn post<B: Serialize + Sync + ?Sized>(
        &self,
        token: &SecretString,
        path: &str,
        body: &B,
    ) -> Result<Response, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await?;
        Ok(resp)
    }

    /// POST without a request body (collection membership and pool actions).
    pub(crate) async fn post_empty(
        &self,
        token: &SecretString,
        path: &str,
    ) -> Result<Response, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        Ok(resp)
    }

    pub(crate) async fn put<B: Serialize + Sync + ?Sized>(
        &self,
        token: &SecretString,
        path: &str,
        body: &B,
    ) -> Result<Response, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self
            .http
            .put(url)
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await?;
        Ok(resp)
    }

    pub(crate) async fn delete(&self, token: &SecretString, path: &str) -> Result<Response, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        Ok(resp)
    }

    // ── Compound helpers ─────────────────────────────────────────────

    /// GET `path`, require 200, and decode the body.
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        token: &SecretString,
        path: &str,
        operation: &str,
    ) -> Result<T, Error> {
        let resp = self.get(token, path).await?;
        decode(expect_status(resp, StatusCode::OK, operation)?).await
    }

    /// GET `path` as an existence probe.
    ///
    /// 404 yields `Ok(None)`; 200 yields the response for decoding; any other
    /// status is an error rather than "absent".
    pub(crate) async fn probe(
        &self,
        token: &SecretString,
        path: &str,
        operation: &str,
    ) -> Result<Option<Response>, Error> {
        let resp = self.get(token, path).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            debug!("{operation}: not found");
            return Ok(None);
        }
        expect_status(resp, StatusCode::OK, operation).map(Some)
    }
}

// ── Bulk progress ────────────────────────────────────────────────────

/// Tracks the elements a sequential bulk loop has finished, so a failure
/// can report exactly which ones took effect.
pub(crate) struct Progress {
    operation: &'static str,
    completed: Vec<String>,
}

impl Progress {
    pub(crate) fn new(operation: &'static str, total: usize) -> Self {
        Self {
            operation,
            completed: Vec::with_capacity(total),
        }
    }

    pub(crate) fn record(&mut self, id: impl Into<String>) {
        self.completed.push(id.into());
    }

    /// Abort the loop, wrapping `source` with everything recorded so far.
    pub(crate) fn fail(self, source: Error) -> Error {
        warn!(
            operation = self.operation,
            completed = self.completed.len(),
            "bulk operation aborted: {source}"
        );
        Error::bulk(self.operation, self.completed, source)
    }

    pub(crate) fn finish(self) -> Vec<String> {
        self.completed
    }
}

// ── Response handling ────────────────────────────────────────────────

/// Require exactly `expected`; anything else is an `UnexpectedStatus` error.
pub(crate) fn expect_status(
    resp: Response,
    expected: StatusCode,
    operation: &str,
) -> Result<Response, Error> {
    let status = resp.status();
    debug!("{operation}: HTTP {status}");
    if status == expected {
        Ok(resp)
    } else {
        Err(Error::UnexpectedStatus {
            operation: operation.to_owned(),
            status: status.as_u16(),
            expected: expected.as_u16(),
        })
    }
}

/// Decode a JSON body, keeping the raw text on failure.
pub(crate) async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, Error> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

/// First 200 characters of a response body, for error messages.
pub(crate) fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

/// Build the API root for a backend.
///
/// Trailing slashes are trimmed and `/api/` appended unless the path
/// already ends in `/api`.
fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();

    if path.ends_with("/api") {
        url.set_path(&format!("{path}/"));
    } else {
        url.set_path(&format!("{path}/api/"));
    }

    Ok(url)
}
