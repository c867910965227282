use crucible_core::{
    AppTemplateState, Attributes, CoreError, PlayerUserState, Provider, Resource, ResourceKind,
    ViewState, VlanState, VmState,
};
use tracing::info;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::state::{StateEntry, StateFile};

pub async fn handle(name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let mut state = StateFile::load(&global.state)?;
    let entry = state.get(name)?;
    let kind = entry.kind;

    // Never created remotely: only the local entry goes.
    if entry.id.is_some() {
        let provider = super::provider(global)?;
        let entry = state.get_mut(name)?;
        let result = match kind {
            ResourceKind::Vm => destroy_as::<VmState>(&provider, entry).await,
            ResourceKind::View => destroy_as::<ViewState>(&provider, entry).await,
            ResourceKind::AppTemplate => destroy_as::<AppTemplateState>(&provider, entry).await,
            ResourceKind::User => destroy_as::<PlayerUserState>(&provider, entry).await,
            ResourceKind::Vlan => destroy_as::<VlanState>(&provider, entry).await,
        };
        if let Err(e) = result {
            state.save(&global.state)?;
            return Err(e.into());
        }
    }

    state.resources.remove(name);
    state.save(&global.state)?;
    info!(resource = name, %kind, "resource destroyed");
    eprintln!("Destroyed {kind} '{name}'");
    Ok(())
}

async fn destroy_as<T: Resource + Attributes>(
    provider: &Provider,
    entry: &mut StateEntry,
) -> Result<(), CoreError> {
    let mut data = entry.data::<T>()?;
    let result = T::delete(provider, &mut data).await;
    entry.record(&data);
    result
}
