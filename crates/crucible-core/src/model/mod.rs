// ── Domain model ──
//
// Typed resource states, one module per resource kind. Each implements
// `Attributes` for the host-visible key-value form; wire conversion lives
// in `crate::convert`.

pub mod template;
pub mod user;
pub mod view;
pub mod vlan;
pub mod vm;

pub use template::AppTemplateState;
pub use user::PlayerUserState;
pub use view::{AppInstanceSpec, ApplicationSpec, TeamSpec, TeamUser, ViewState};
pub use vlan::VlanState;
pub use vm::{ConsoleConnection, VmState};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Resource kinds exposed to the host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Vm,
    View,
    AppTemplate,
    User,
    Vlan,
}
