//! Clap derive structures for the `crucible` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crucible_core::ResourceKind;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// crucible -- drive Crucible VMs, views, templates, users and VLANs
#[derive(Debug, Parser)]
#[command(
    name = "crucible",
    version,
    about = "Reconcile Crucible exercise infrastructure from the command line",
    long_about = "A minimal host for the Crucible provider.\n\n\
        Keeps resource state in a local JSON file and converges the VM,\n\
        Player, and Caster APIs to the desired attributes you supply.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Provider config file (defaults to the platform config directory)
    #[arg(long, env = "CRUCIBLE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Local state file
    #[arg(
        long,
        env = "CRUCIBLE_STATE",
        default_value = "crucible.state.json",
        global = true
    )]
    pub state: PathBuf,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

/// Resource kinds accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Vm,
    View,
    AppTemplate,
    User,
    Vlan,
}

impl From<KindArg> for ResourceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Vm => Self::Vm,
            KindArg::View => Self::View,
            KindArg::AppTemplate => Self::AppTemplate,
            KindArg::User => Self::User,
            KindArg::Vlan => Self::Vlan,
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or update a resource from a desired-attributes JSON file
    Apply(ApplyArgs),

    /// Re-read a resource from its backend into local state
    Refresh(NameArgs),

    /// Delete a resource remotely and drop it from local state
    Destroy(NameArgs),

    /// Print local state (all entries, or one by name)
    Show(ShowArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Resource kind
    pub kind: KindArg,

    /// Local name of the resource in the state file
    pub name: String,

    /// JSON file holding the desired attributes
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct NameArgs {
    /// Local name of the resource in the state file
    pub name: String,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Only this entry
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: Shell,
}
