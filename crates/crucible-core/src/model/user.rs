use serde_json::Value;

use crate::attrs::{self, AttributeMap, Attributes};
use crate::error::CoreError;

/// A top-level Player user. The id is chosen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerUserState {
    pub user_id: String,
    pub name: String,
    /// Role name; `None` when the user has no role.
    pub role: Option<String>,
    pub is_system_admin: bool,
}

impl Attributes for PlayerUserState {
    fn to_attributes(&self) -> AttributeMap {
        let mut map = AttributeMap::new();
        map.insert("user_id".into(), Value::from(self.user_id.as_str()));
        map.insert("name".into(), Value::from(self.name.as_str()));
        attrs::put_opt_string(&mut map, "role", self.role.as_deref());
        map.insert("is_system_admin".into(), Value::from(self.is_system_admin));
        map
    }

    fn from_attributes(map: &AttributeMap) -> Result<Self, CoreError> {
        let user_id = attrs::opt_string(map, "user_id")?
            .ok_or_else(|| CoreError::invalid("user_id", "required"))?;
        Ok(Self {
            user_id,
            name: attrs::string(map, "name")?,
            role: attrs::opt_string(map, "role")?,
            is_system_admin: attrs::bool_or(map, "is_system_admin", false)?,
        })
    }
}
