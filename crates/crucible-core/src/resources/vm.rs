// Virtual machine lifecycle.

use tracing::{info, warn};
use uuid::Uuid;

use crate::convert::vm_to_wire;
use crate::error::CoreError;
use crate::model::{ResourceKind, VmState};
use crate::provider::Provider;
use crate::reconcile::diff_sets;
use crate::resources::{Resource, ResourceData};

impl Resource for VmState {
    const KIND: ResourceKind = ResourceKind::Vm;

    async fn create(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let id = data
            .state
            .vm_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        provider
            .vm()
            .create_vm(&vm_to_wire(&data.state, &id))
            .await?;

        info!(%id, name = %data.state.name, "VM created");
        data.state.vm_id = Some(id.clone());
        data.id = Some(id);
        Self::read(provider, data).await
    }

    async fn read(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let Some(id) = data.id.clone() else {
            return Ok(());
        };
        match provider.vm().find_vm(&id).await? {
            Some(vm) => data.state = VmState::from(vm),
            None => {
                warn!(%id, "VM no longer exists remotely");
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
        let diff = diff_sets(&data.state.team_ids, &desired.team_ids);

        if !diff.to_remove.is_empty() {
            if let Err(e) = provider.vm().remove_vm_from_teams(&id, &diff.to_remove).await {
                let removed = e.completed();
                data.state.team_ids.retain(|t| !removed.contains(t));
                return Err(e.into());
            }
            data.state.team_ids.retain(|t| !diff.to_remove.contains(t));
        }

        if !diff.to_add.is_empty() {
            if let Err(e) = provider.vm().add_vm_to_teams(&id, &diff.to_add).await {
                data.state.team_ids.extend(e.completed().iter().cloned());
                data.state.team_ids.sort();
                return Err(e.into());
            }
            data.state.team_ids.extend(diff.to_add.iter().cloned());
            data.state.team_ids.sort();
        }

        let mut body = vm_to_wire(&desired, &id);
        body.team_ids.clear();
        provider.vm().update_vm(&id, &body).await?;
        info!(%id, "VM updated");

        Self::read(provider, data).await
    }

    async fn delete(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let Some(id) = data.id.clone() else {
            return Ok(());
        };
        if provider.vm().vm_exists(&id).await? {
            match provider.vm().delete_vm(&id).await {
                Ok(()) => info!(%id, "VM deleted"),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }
        data.id = None;
        Ok(())
    }
}
