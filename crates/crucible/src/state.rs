//! Local state file.
//!
//! One JSON document mapping a user-chosen name to the resource's kind,
//! remote identity, and last known attributes.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crucible_core::{AttributeMap, Attributes, CoreError, ResourceData, ResourceKind};

use crate::error::CliError;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StateFile {
    #[serde(default)]
    pub resources: BTreeMap<String, StateEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateEntry {
    pub kind: ResourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: AttributeMap,
}

impl StateEntry {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            id: None,
            attributes: AttributeMap::new(),
        }
    }

    /// Typed view of this entry.
    pub fn data<T: Attributes>(&self) -> Result<ResourceData<T>, CoreError> {
        Ok(ResourceData {
            id: self.id.clone(),
            state: T::from_attributes(&self.attributes)?,
        })
    }

    /// Copy back whatever an operation left in `data`, success or not.
    pub fn record<T: Attributes>(&mut self, data: &ResourceData<T>) {
        self.id.clone_from(&data.id);
        self.attributes = data.state.to_attributes();
    }
}

impl StateFile {
    /// Read the state file. A missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no state file yet");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write via a sibling temp file so a crash never truncates state.
    pub fn save(&self, path: &Path) -> Result<(), CliError> {
        let raw = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, path)?;
        debug!(path = %path.display(), entries = self.resources.len(), "state saved");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&StateEntry, CliError> {
        self.resources.get(name).ok_or_else(|| CliError::NotInState {
            name: name.to_owned(),
        })
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut StateEntry, CliError> {
        self.resources
            .get_mut(name)
            .ok_or_else(|| CliError::NotInState {
                name: name.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn missing_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::load(&dir.path().join("absent.json")).unwrap();
        assert!(state.resources.is_empty());
    }

    #[test]
    fn entry_without_id_omits_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut state = StateFile::default();
        state
            .resources
            .insert("pool".into(), StateEntry::new(ResourceKind::Vlan));
        state.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"kind\": \"vlan\""));
        assert!(!raw.contains("\"id\""));

        let loaded = StateFile::load(&path).unwrap();
        assert_eq!(loaded.get("pool").unwrap().kind, ResourceKind::Vlan);
        assert!(matches!(
            loaded.get("other"),
            Err(CliError::NotInState { .. })
        ));
    }
}
