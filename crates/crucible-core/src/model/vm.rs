use serde_json::{Value, json};

use crate::attrs::{self, AttributeMap, Attributes};
use crate::error::CoreError;

/// Console access details for a VM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleConnection {
    pub hostname: String,
    pub port: String,
    pub protocol: String,
    pub username: String,
    pub password: String,
}

/// Desired or observed state of a virtual machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmState {
    /// Caller-chosen id. A v4 UUID is generated on create when unset.
    pub vm_id: Option<String>,
    pub url: String,
    pub name: String,
    /// Compared as a set; kept sorted after every read.
    pub team_ids: Vec<String>,
    pub user_id: Option<String>,
    pub console_connection: Option<ConsoleConnection>,
    pub default_url: bool,
    pub embeddable: bool,
}

impl Attributes for VmState {
    fn to_attributes(&self) -> AttributeMap {
        let mut map = AttributeMap::new();
        attrs::put_opt_string(&mut map, "vm_id", self.vm_id.as_deref());
        map.insert("url".into(), Value::from(self.url.as_str()));
        map.insert("name".into(), Value::from(self.name.as_str()));
        map.insert("team_ids".into(), json!(self.team_ids));
        attrs::put_opt_string(&mut map, "user_id", self.user_id.as_deref());
        if let Some(conn) = &self.console_connection {
            map.insert(
                "console_connection_info".into(),
                json!({
                    "hostname": conn.hostname,
                    "port": conn.port,
                    "protocol": conn.protocol,
                    "username": conn.username,
                    "password": conn.password,
                }),
            );
        }
        map.insert("default_url".into(), Value::from(self.default_url));
        map.insert("embeddable".into(), Value::from(self.embeddable));
        map
    }

    fn from_attributes(map: &AttributeMap) -> Result<Self, CoreError> {
        let console_connection = attrs::object(map, "console_connection_info")?
            .map(|conn| {
                Ok::<_, CoreError>(ConsoleConnection {
                    hostname: attrs::string(conn, "hostname")?,
                    port: attrs::string(conn, "port")?,
                    protocol: attrs::string(conn, "protocol")?,
                    username: attrs::string(conn, "username")?,
                    password: attrs::string(conn, "password")?,
                })
            })
            .transpose()
            .map_err(|e| attrs::within("console_connection_info", e))?;

        Ok(Self {
            vm_id: attrs::opt_string(map, "vm_id")?,
            url: attrs::string(map, "url")?,
            name: attrs::string(map, "name")?,
            team_ids: attrs::string_list(map, "team_ids")?,
            user_id: attrs::opt_string(map, "user_id")?,
            console_connection,
            default_url: attrs::bool_or(map, "default_url", false)?,
            embeddable: attrs::bool_or(map, "embeddable", true)?,
        })
    }
}
