// Player API client
//
// Views, their applications and teams, team permissions and membership,
// application instances, application templates, and directory users.
// Endpoint groups live in their own modules as `impl PlayerClient` blocks.

mod applications;
mod client;
mod instances;
mod teams;
mod templates;
mod users;

pub use client::PlayerClient;
