//! Command handlers.
//!
//! Each handler loads the state file, drives one lifecycle operation per
//! resource kind, and saves state again even when the operation failed so
//! no remote identity is ever lost.

pub mod apply;
pub mod destroy;
pub mod refresh;
pub mod show;

use crucible_core::Provider;
use tracing::debug;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Apply(args) => apply::handle(args, global).await,
        Command::Refresh(args) => refresh::handle(&args.name, global).await,
        Command::Destroy(args) => destroy::handle(&args.name, global).await,
        Command::Show(args) => show::handle(args.name.as_deref(), global),
        Command::Completions(_) => Ok(()),
    }
}

/// Load and validate provider settings, then build the shared client.
fn provider(global: &GlobalOpts) -> Result<Provider, CliError> {
    let settings = crucible_config::load(global.config.as_deref())?;
    let config = settings.into_provider_config()?;
    debug!(
        vm = %config.vm_api_url,
        player = %config.player_api_url,
        caster = %config.caster_api_url,
        "provider configured"
    );
    Ok(Provider::new(&config)?)
}
