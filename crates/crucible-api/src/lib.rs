// crucible-api: Async Rust clients for the Crucible VM, Player, and Caster APIs

pub mod auth;
pub mod caster;
pub mod error;
pub mod models;
pub mod player;
pub mod rest;
pub mod transport;
pub mod vm;

pub use auth::Credentials;
pub use caster::CasterClient;
pub use error::Error;
pub use player::PlayerClient;
pub use rest::RestClient;
pub use transport::{TlsMode, TransportConfig};
pub use vm::VmClient;
