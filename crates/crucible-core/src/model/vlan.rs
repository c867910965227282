use serde_json::Value;

use crate::attrs::{self, AttributeMap, Attributes};
use crate::error::CoreError;

/// A VLAN leased from the Caster pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VlanState {
    pub project_id: Option<String>,
    pub partition_id: Option<String>,
    pub tag: Option<String>,
    /// Requested VLAN number, or the one the pool assigned.
    pub vlan_id: Option<i32>,
    /// Remote identity, set once acquired.
    pub vlan_uuid: Option<String>,
}

impl VlanState {
    /// Whether `desired` asks for a different lease than `self` holds.
    ///
    /// An unset `vlan_id` in `desired` accepts whatever the pool assigned.
    pub fn needs_reacquire(&self, desired: &Self) -> bool {
        self.project_id != desired.project_id
            || self.partition_id != desired.partition_id
            || self.tag != desired.tag
            || desired.vlan_id.is_some_and(|want| self.vlan_id != Some(want))
    }
}

impl Attributes for VlanState {
    fn to_attributes(&self) -> AttributeMap {
        let mut map = AttributeMap::new();
        attrs::put_opt_string(&mut map, "project_id", self.project_id.as_deref());
        attrs::put_opt_string(&mut map, "partition_id", self.partition_id.as_deref());
        attrs::put_opt_string(&mut map, "tag", self.tag.as_deref());
        if let Some(id) = self.vlan_id {
            map.insert("vlan_id".into(), Value::from(id));
        }
        attrs::put_opt_string(&mut map, "vlan_uuid", self.vlan_uuid.as_deref());
        map
    }

    fn from_attributes(map: &AttributeMap) -> Result<Self, CoreError> {
        Ok(Self {
            project_id: attrs::opt_string(map, "project_id")?,
            partition_id: attrs::opt_string(map, "partition_id")?,
            tag: attrs::opt_string(map, "tag")?,
            vlan_id: attrs::opt_i32(map, "vlan_id")?,
            vlan_uuid: attrs::opt_string(map, "vlan_uuid")?,
        })
    }
}
