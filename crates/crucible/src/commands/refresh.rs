use crucible_core::{
    AppTemplateState, Attributes, CoreError, PlayerUserState, Provider, Resource, ResourceKind,
    ViewState, VlanState, VmState,
};
use tracing::warn;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;
use crate::state::{StateEntry, StateFile};

pub async fn handle(name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let mut state = StateFile::load(&global.state)?;
    let kind = state.get(name)?.kind;
    let provider = super::provider(global)?;
    let entry = state.get_mut(name)?;

    let result = match kind {
        ResourceKind::Vm => refresh_as::<VmState>(&provider, entry).await,
        ResourceKind::View => refresh_as::<ViewState>(&provider, entry).await,
        ResourceKind::AppTemplate => refresh_as::<AppTemplateState>(&provider, entry).await,
        ResourceKind::User => refresh_as::<PlayerUserState>(&provider, entry).await,
        ResourceKind::Vlan => refresh_as::<VlanState>(&provider, entry).await,
    };

    state.save(&global.state)?;
    result?;

    let entry = state.get(name)?;
    if entry.id.is_none() {
        warn!(resource = name, "resource does not exist remotely; the next apply recreates it");
    }
    output::print_output(&super::show::render_entry(global.output, name, entry)?);
    Ok(())
}

async fn refresh_as<T: Resource + Attributes>(
    provider: &Provider,
    entry: &mut StateEntry,
) -> Result<(), CoreError> {
    let mut data = entry.data::<T>()?;
    let result = T::read(provider, &mut data).await;
    entry.record(&data);
    result
}
