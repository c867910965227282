// Application template lifecycle.

use crucible_api::models::ApplicationTemplate;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::model::{AppTemplateState, ResourceKind};
use crate::provider::Provider;
use crate::resources::{Resource, ResourceData};

impl Resource for AppTemplateState {
    const KIND: ResourceKind = ResourceKind::AppTemplate;

    async fn create(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let body = ApplicationTemplate::from(&data.state);
        let id = provider.player().create_template(&body).await?;
        data.id = Some(id);
        Self::read(provider, data).await
    }

    async fn read(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let Some(id) = data.id.clone() else {
            return Ok(());
        };
        match provider.player().find_template(&id).await? {
            Some(template) => data.state = AppTemplateState::from(template),
            None => {
                warn!(%id, "application template no longer exists remotely");
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
        provider
            .player()
            .update_template(&id, &ApplicationTemplate::from(&desired))
            .await?;
        info!(%id, "application template updated");
        Self::read(provider, data).await
    }

    async fn delete(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError> {
        let Some(id) = data.id.clone() else {
            return Ok(());
        };
        if provider.player().template_exists(&id).await? {
            match provider.player().delete_template(&id).await {
                Ok(()) => info!(%id, "application template deleted"),
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
        }
        data.id = None;
        Ok(())
    }
}
