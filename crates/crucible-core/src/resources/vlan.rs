// VLAN lease lifecycle.
//
// A VLAN cannot be edited in place: changing what is asked for releases
// the current lease and acquires a new one.

use crucible_api::models::VlanAcquire;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::model::{ResourceKind, VlanState};
use crate::provider::Provider;
use crate::resources::{Resource, ResourceData};

async fn acquire(
    provider: &Provider,
    data: &mut ResourceData<VlanState>,
    request: &VlanState,
) -> Result<(), CoreError> {
    let vlan = provider
        .caster()
        .acquire_vlan(&VlanAcquire::from(request))
        .await?;
    data.id = Some(vlan.id.clone());
    data.state = VlanState::from(vlan);
    Ok(())
}

impl Resource for VlanState {
    const KIND: ResourceKind = ResourceKind::Vlan;

    async fn create(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let request = data.state.clone();
        acquire(provider, data, &request).await
    }

    async fn read(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let Some(id) = data.id.clone() else {
            return Ok(());
        };
        match provider.caster().find_vlan(&id).await? {
            Some(vlan) => data.state = VlanState::from(vlan),
            None => {
                warn!(%id, "VLAN no longer exists remotely");
                data.id = None;
            }
        }
        Ok(())
    }

    async fn update(
        provider: &Provider,
        data: &mut ResourceData<Self>,
        desired: Self,
    ) -> Result<(), CoreError> {
        let id = data.require_id(Self::KIND)?;
        if !data.state.needs_reacquire(&desired) {
            return Self::read(provider, data).await;
        }

        info!(%id, "VLAN request changed, re-acquiring");
        Self::delete(provider, data).await?;
        acquire(provider, data, &desired).await
    }

    async fn delete(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let Some(id) = data.id.clone() else {
            return Ok(());
        };
        if provider.caster().vlan_exists(&id).await? {
            match provider.caster().release_vlan(&id).await {
                Ok(()) => info!(%id, "VLAN released"),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }
        data.id = None;
        data.state.vlan_uuid = None;
        Ok(())
    }
}
