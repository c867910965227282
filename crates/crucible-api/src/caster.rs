// Caster API client
//
// VLANs are leased from a pool rather than created: `acquire` hands back
// a concrete VLAN and `release` returns it.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::{debug, info};

use crate::auth::Credentials;
use crate::error::Error;
use crate::models::{Vlan, VlanAcquire};
use crate::rest::{RestClient, decode, expect_status};

pub struct CasterClient {
    rest: RestClient,
}

impl CasterClient {
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

    /// Lease a VLAN matching the request.
    ///
    /// `POST vlans/actions/acquire` -- expects 200 with the leased VLAN.
    pub async fn acquire_vlan(&self, request: &VlanAcquire) -> Result<Vlan, Error> {
        let token = self.rest.token().await?;
        let resp = self
            .rest
            .post(&token, "vlans/actions/acquire", request)
            .await?;
        let vlan: Vlan = decode(expect_status(resp, StatusCode::OK, "acquiring VLAN")?).await?;
        info!(id = %vlan.id, vlan_id = vlan.vlan_id, "VLAN acquired");
        Ok(vlan)
    }

    /// `GET vlans/{id}` -- expects 200.
    pub async fn get_vlan(&self, id: &str) -> Result<Vlan, Error> {
        let token = self.rest.token().await?;
        self.rest
            .fetch(&token, &format!("vlans/{id}"), "reading VLAN")
            .await
    }

    /// Existence probe: `false` on 404.
    pub async fn vlan_exists(&self, id: &str) -> Result<bool, Error> {
        Ok(self.find_vlan(id).await?.is_some())
    }

    /// Fetch a VLAN, `None` when the backend no longer knows it.
    pub async fn find_vlan(&self, id: &str) -> Result<Option<Vlan>, Error> {
        let token = self.rest.token().await?;
        match self
            .rest
            .probe(&token, &format!("vlans/{id}"), "reading VLAN")
            .await?
        {
            Some(resp) => decode(resp).await.map(Some),
            None => Ok(None),
        }
    }

    /// Return a VLAN to the pool.
    ///
    /// `POST vlans/{id}/actions/release` -- expects 200.
    pub async fn release_vlan(&self, id: &str) -> Result<(), Error> {
        let token = self.rest.token().await?;
        debug!(id, "releasing VLAN");
        let resp = self
            .rest
            .post_empty(&token, &format!("vlans/{id}/actions/release"))
            .await?;
        expect_status(resp, StatusCode::OK, "releasing VLAN")?;
        Ok(())
    }
}
