// ── Resource lifecycle ──
//
// Create / read / update / delete for each resource kind, following the
// host contract:
// - create sets `id` only once the remote create succeeded;
// - read clears `id` when the remote object is gone instead of failing;
// - update finishes with a read so state reflects server normalization;
// - delete treats "already gone" as success.
//
// Operations mutate the `ResourceData` in place, so on error it still
// records whatever partial progress was made.

mod template;
mod user;
mod view;
mod vlan;
mod vm;

use crate::error::CoreError;
use crate::model::ResourceKind;
use crate::provider::Provider;

/// Locally persisted state of one resource instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceData<T> {
    /// Remote identity. `None` means the resource does not exist remotely.
    pub id: Option<String>,
    pub state: T,
}

impl<T> ResourceData<T> {
    /// A local-only resource that has never been created.
    pub fn new(state: T) -> Self {
        Self { id: None, state }
    }

    pub fn exists(&self) -> bool {
        self.id.is_some()
    }

    pub(crate) fn require_id(&self, kind: ResourceKind) -> Result<String, CoreError> {
        self.id.clone().ok_or_else(|| CoreError::MissingIdentity {
            kind: kind.to_string(),
        })
    }
}

/// Lifecycle operations the host drives for one resource kind.
#[allow(async_fn_in_trait)]
pub trait Resource: Sized {
    const KIND: ResourceKind;

    /// Create the remote object from `data.state`.
    async fn create(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError>;

    /// Refresh `data.state` from the backend.
    async fn read(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError>;

    /// Converge the remote object from `data.state` to `desired`.
    async fn update(
        provider: &Provider,
        data: &mut ResourceData<Self>,
        desired: Self,
    ) -> Result<(), CoreError>;

    /// Remove the remote object and clear `data.id`.
    async fn delete(provider: &Provider, data: &mut ResourceData<Self>) -> Result<(), CoreError>;
}
