use serde_json::Value;

use crate::attrs::{self, AttributeMap, Attributes};
use crate::error::CoreError;

/// An application template. Unlike view applications, its flags are plain
/// booleans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppTemplateState {
    pub name: String,
    pub url: String,
    pub icon: String,
    pub embeddable: bool,
    pub load_in_background: bool,
}

impl Attributes for AppTemplateState {
    fn to_attributes(&self) -> AttributeMap {
        let mut map = AttributeMap::new();
        map.insert("name".into(), Value::from(self.name.as_str()));
        map.insert("url".into(), Value::from(self.url.as_str()));
        map.insert("icon".into(), Value::from(self.icon.as_str()));
        map.insert("embeddable".into(), Value::from(self.embeddable));
        map.insert(
            "load_in_background".into(),
            Value::from(self.load_in_background),
        );
        map
    }

    fn from_attributes(map: &AttributeMap) -> Result<Self, CoreError> {
        Ok(Self {
            name: attrs::string(map, "name")?,
            url: attrs::string(map, "url")?,
            icon: attrs::string(map, "icon")?,
            embeddable: attrs::bool_or(map, "embeddable", false)?,
            load_in_background: attrs::bool_or(map, "load_in_background", false)?,
        })
    }
}
