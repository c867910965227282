// crucible-core: Domain model, reconciliation, and resource lifecycle for the Crucible provider.

pub mod attrs;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod provider;
pub mod reconcile;
pub mod resources;

// ── Primary re-exports ──────────────────────────────────────────────
pub use attrs::{AttributeMap, Attributes};
pub use config::ProviderConfig;
pub use error::CoreError;
pub use model::{
    AppInstanceSpec, AppTemplateState, ApplicationSpec, ConsoleConnection, PlayerUserState,
    ResourceKind, TeamSpec, TeamUser, ViewState, VlanState, VmState,
};
pub use provider::{Provider, RoleResolver};
pub use resources::{Resource, ResourceData};
