// VM API client
//
// Virtual machine CRUD plus team membership. Membership changes are
// issued one team at a time; on failure the error records which teams
// were already processed.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::debug;

use crate::auth::Credentials;
use crate::error::Error;
use crate::models::Vm;
use crate::rest::{Progress, RestClient, decode, expect_status};

pub struct VmClient {
    rest: RestClient,
}

impl VmClient {
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

    /// `POST vms` -- expects 201.
    pub async fn create_vm(&self, vm: &Vm) -> Result<(), Error> {
        let token = self.rest.token().await?;
        debug!(id = %vm.id, name = %vm.name, "creating VM");
        let resp = self.rest.post(&token, "vms", vm).await?;
        expect_status(resp, StatusCode::CREATED, "creating VM")?;
        Ok(())
    }

    /// `GET vms/{id}` -- expects 200.
    pub async fn get_vm(&self, id: &str) -> Result<Vm, Error> {
        let token = self.rest.token().await?;
        self.rest
            .fetch(&token, &format!("vms/{id}"), "reading VM")
            .await
    }

    /// Existence probe: `false` on 404, error on any other non-200.
    pub async fn vm_exists(&self, id: &str) -> Result<bool, Error> {
        let token = self.rest.token().await?;
        let found = self
            .rest
            .probe(&token, &format!("vms/{id}"), "probing VM")
            .await?;
        Ok(found.is_some())
    }

    /// Probe and fetch in one round trip. `None` when the VM is gone.
    pub async fn find_vm(&self, id: &str) -> Result<Option<Vm>, Error> {
        let token = self.rest.token().await?;
        match self
            .rest
            .probe(&token, &format!("vms/{id}"), "reading VM")
            .await?
        {
            Some(resp) => decode(resp).await.map(Some),
            None => Ok(None),
        }
    }

    /// `PUT vms/{id}` -- expects 200.
    pub async fn update_vm(&self, id: &str, vm: &Vm) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let resp = self.rest.put(&token, &format!("vms/{id}"), vm).await?;
        expect_status(resp, StatusCode::OK, "updating VM")?;
        Ok(())
    }

    /// `DELETE vms/{id}` -- expects 204.
    pub async fn delete_vm(&self, id: &str) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let resp = self.rest.delete(&token, &format!("vms/{id}")).await?;
        expect_status(resp, StatusCode::NO_CONTENT, "deleting VM")?;
        Ok(())
    }

    /// `POST teams/{team}/vms/{vm}` for each team, in order -- expects 200.
    pub async fn add_vm_to_teams(&self, vm: &str, teams: &[String]) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let mut progress = Progress::new("adding VM to teams", teams.len());

        for team in teams {
            let path = format!("teams/{team}/vms/{vm}");
            let step = async {
                let resp = self.rest.post_empty(&token, &path).await?;
                expect_status(resp, StatusCode::OK, &format!("adding VM {vm} to team {team}"))
            };
            match step.await {
                Ok(_) => progress.record(team.as_str()),
                Err(e) => return Err(progress.fail(e)),
            }
        }
        debug!(vm, count = teams.len(), "VM added to teams");
        Ok(())
    }

    /// `DELETE teams/{team}/vms/{vm}` for each team, in order -- expects 204.
    pub async fn remove_vm_from_teams(&self, vm: &str, teams: &[String]) -> Result<(), Error> {
        let token = self.rest.token().await?;
        let mut progress = Progress::new("removing VM from teams", teams.len());

        for team in teams {
            let path = format!("teams/{team}/vms/{vm}");
            let step = async {
                let resp = self.rest.delete(&token, &path).await?;
                expect_status(
                    resp,
                    StatusCode::NO_CONTENT,
                    &format!("removing VM {vm} from team {team}"),
                )
            };
            match step.await {
                Ok(_) => progress.record(team.as_str()),
                Err(e) => return Err(progress.fail(e)),
            }
        }
        debug!(vm, count = teams.len(), "VM removed from teams");
        Ok(())
    }
}
