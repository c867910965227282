// Player directory user lifecycle.
//
// The role is held by name locally and resolved at both boundaries.

use tracing::{info, warn};

use crate::convert::{user_from_wire, user_to_wire};
use crate::error::CoreError;
use crate::model::{PlayerUserState, ResourceKind};
use crate::provider::Provider;
use crate::resources::{Resource, ResourceData};

impl Resource for PlayerUserState {
    const KIND: ResourceKind = ResourceKind::User;

    async fn create(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let role_id = provider.roles().id_for(data.state.role.as_deref()).await?;
        provider
            .player()
            .create_user(&user_to_wire(&data.state, role_id))
            .await?;
        data.id = Some(data.state.user_id.clone());
        Self::read(provider, data).await
    }

    async fn read(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let Some(id) = data.id.clone() else {
            return Ok(());
        };
        let Some(user) = provider.player().find_user(&id).await? else {
            warn!(%id, "user no longer exists remotely");
            data.id = None;
            return Ok(());
        };
        let role = provider.roles().name_for(user.role_id.as_deref()).await?;
        data.state = user_from_wire(user, role);
        Ok(())
    }

    async fn update(
        provider: &Provider,
        data: &mut ResourceData<Self>,
        desired: Self,
    ) -> Result<(), CoreError> {
        let id = data.require_id(Self::KIND)?;
        let role_id = provider.roles().id_for(desired.role.as_deref()).await?;
        let mut body = user_to_wire(&desired, role_id);
        body.id.clone_from(&id);
        provider.player().update_user(&id, &body).await?;
        info!(%id, "user updated");
        Self::read(provider, data).await
    }

    async fn delete(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let Some(id) = data.id.clone() else {
            return Ok(());
        };
        if provider.player().user_exists(&id).await? {
            match provider.player().delete_user(&id).await {
                Ok(()) => info!(%id, "user deleted"),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }
        data.id = None;
        Ok(())
    }
}
