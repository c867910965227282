use std::path::Path;

use crucible_core::{
    AppTemplateState, AttributeMap, Attributes, CoreError, PlayerUserState, Provider, Resource,
    ResourceData, ResourceKind, ViewState, VlanState, VmState,
};
use serde_json::Value;
use tracing::info;

use crate::cli::{ApplyArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;
use crate::state::{StateEntry, StateFile};

pub async fn handle(args: ApplyArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let kind = ResourceKind::from(args.kind);
    let desired = read_desired(&args.file)?;
    let mut state = StateFile::load(&global.state)?;

    if let Some(existing) = state.resources.get(&args.name) {
        if existing.kind != kind {
            return Err(CliError::KindMismatch {
                name: args.name,
                existing: existing.kind.to_string(),
                requested: kind.to_string(),
            });
        }
    }

    let provider = super::provider(global)?;
    let entry = state
        .resources
        .entry(args.name.clone())
        .or_insert_with(|| StateEntry::new(kind));

    let result = match kind {
        ResourceKind::Vm => apply_as::<VmState>(&provider, entry, &desired).await,
        ResourceKind::View => apply_as::<ViewState>(&provider, entry, &desired).await,
        ResourceKind::AppTemplate => {
            apply_as::<AppTemplateState>(&provider, entry, &desired).await
        }
        ResourceKind::User => apply_as::<PlayerUserState>(&provider, entry, &desired).await,
        ResourceKind::Vlan => apply_as::<VlanState>(&provider, entry, &desired).await,
    };

    state.save(&global.state)?;
    result?;

    let entry = state.get(&args.name)?;
    output::print_output(&super::show::render_entry(
        global.output,
        &args.name,
        entry,
    )?);
    Ok(())
}

/// Create when there is no remote identity yet, otherwise update.
async fn apply_as<T: Resource + Attributes>(
    provider: &Provider,
    entry: &mut StateEntry,
    desired: &AttributeMap,
) -> Result<(), CoreError> {
    let desired = T::from_attributes(desired)?;

    if entry.id.is_none() {
        info!(kind = %T::KIND, "creating resource");
        let mut data = ResourceData::new(desired);
        let result = T::create(provider, &mut data).await;
        entry.record(&data);
        return result;
    }

    info!(kind = %T::KIND, id = ?entry.id, "updating resource");
    let mut data = entry.data::<T>()?;
    let result = T::update(provider, &mut data, desired).await;
    entry.record(&data);
    result
}

fn read_desired(path: &Path) -> Result<AttributeMap, CliError> {
    let raw = std::fs::read_to_string(path)?;
    match serde_json::from_str(&raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::Validation {
            field: "file".into(),
            reason: "desired attributes must be a JSON object".into(),
        }),
    }
}
