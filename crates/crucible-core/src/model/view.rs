// View, its applications, and its teams.
//
// Nullable application fields are tri-state and rendered as `"true"`,
// `"false"`, or an absent key. Team roles are held by name; resolution to
// the backend's role id happens in the view resource.

use serde_json::{Value, json};

use crate::attrs::{self, AttributeMap, Attributes};
use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub create_admin_team: bool,
    pub applications: Vec<ApplicationSpec>,
    pub teams: Vec<TeamSpec>,
}

/// An application inside a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationSpec {
    /// Remote id; `None` until created.
    pub app_id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub embeddable: Option<bool>,
    pub load_in_background: Option<bool>,
    pub view_id: Option<String>,
    pub app_template_id: Option<String>,
}

/// A team inside a view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamSpec {
    /// Remote id; `None` until created.
    pub team_id: Option<String>,
    pub name: Option<String>,
    /// Role name, never the backend id.
    pub role: Option<String>,
    /// Permission ids, compared as a set.
    pub permissions: Vec<String>,
    pub users: Vec<TeamUser>,
    pub app_instances: Vec<AppInstanceSpec>,
}

/// A user's membership in a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamUser {
    pub user_id: String,
    /// Team-scoped role name.
    pub role: Option<String>,
}

/// An application placed in a team. Matched to remote instances by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppInstanceSpec {
    /// Remote id; `None` until created.
    pub id: Option<String>,
    pub name: String,
    pub display_order: f64,
    /// Application id, or the name of an application in the same view.
    /// Unset means "the application named like this instance".
    pub parent: Option<String>,
}

// ── Attribute mapping ────────────────────────────────────────────────

impl Attributes for ViewState {
    fn to_attributes(&self) -> AttributeMap {
        let mut map = AttributeMap::new();
        map.insert("name".into(), Value::from(self.name.as_str()));
        attrs::put_opt_string(&mut map, "description", self.description.as_deref());
        attrs::put_opt_string(&mut map, "status", self.status.as_deref());
        map.insert(
            "create_admin_team".into(),
            Value::from(self.create_admin_team),
        );
        map.insert(
            "application".into(),
            Value::Array(
                self.applications
                    .iter()
                    .map(|a| Value::Object(a.to_attributes()))
                    .collect(),
            ),
        );
        map.insert(
            "team".into(),
            Value::Array(
                self.teams
                    .iter()
                    .map(|t| Value::Object(t.to_attributes()))
                    .collect(),
            ),
        );
        map
    }

    fn from_attributes(map: &AttributeMap) -> Result<Self, CoreError> {
        let applications = attrs::objects(map, "application")?
            .into_iter()
            .enumerate()
            .map(|(i, m)| {
                ApplicationSpec::from_attributes(m)
                    .map_err(|e| attrs::within(&format!("application[{i}]"), e))
            })
            .collect::<Result<_, _>>()?;
        let teams = attrs::objects(map, "team")?
            .into_iter()
            .enumerate()
            .map(|(i, m)| {
                TeamSpec::from_attributes(m).map_err(|e| attrs::within(&format!("team[{i}]"), e))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            name: attrs::string(map, "name")?,
            description: attrs::opt_string(map, "description")?,
            status: attrs::opt_string(map, "status")?,
            create_admin_team: attrs::bool_or(map, "create_admin_team", false)?,
            applications,
            teams,
        })
    }
}

impl Attributes for ApplicationSpec {
    fn to_attributes(&self) -> AttributeMap {
        let mut map = AttributeMap::new();
        attrs::put_opt_string(&mut map, "app_id", self.app_id.as_deref());
        attrs::put_opt_string(&mut map, "name", self.name.as_deref());
        attrs::put_opt_string(&mut map, "url", self.url.as_deref());
        attrs::put_opt_string(&mut map, "icon", self.icon.as_deref());
        attrs::put_tri_bool(&mut map, "embeddable", self.embeddable);
        attrs::put_tri_bool(&mut map, "load_in_background", self.load_in_background);
        attrs::put_opt_string(&mut map, "v_id", self.view_id.as_deref());
        attrs::put_opt_string(&mut map, "app_template_id", self.app_template_id.as_deref());
        map
    }

    fn from_attributes(map: &AttributeMap) -> Result<Self, CoreError> {
        Ok(Self {
            app_id: attrs::opt_string(map, "app_id")?,
            name: attrs::opt_string(map, "name")?,
            url: attrs::opt_string(map, "url")?,
            icon: attrs::opt_string(map, "icon")?,
            embeddable: attrs::tri_bool(map, "embeddable")?,
            load_in_background: attrs::tri_bool(map, "load_in_background")?,
            view_id: attrs::opt_string(map, "v_id")?,
            app_template_id: attrs::opt_string(map, "app_template_id")?,
        })
    }
}

impl Attributes for TeamSpec {
    fn to_attributes(&self) -> AttributeMap {
        let mut map = AttributeMap::new();
        attrs::put_opt_string(&mut map, "team_id", self.team_id.as_deref());
        attrs::put_opt_string(&mut map, "name", self.name.as_deref());
        attrs::put_opt_string(&mut map, "role", self.role.as_deref());
        map.insert("permissions".into(), json!(self.permissions));

        let users: Vec<Value> = self
            .users
            .iter()
            .map(|u| {
                let mut m = AttributeMap::new();
                m.insert("user_id".into(), Value::from(u.user_id.as_str()));
                attrs::put_opt_string(&mut m, "role", u.role.as_deref());
                Value::Object(m)
            })
            .collect();
        map.insert("user".into(), Value::Array(users));

        let instances: Vec<Value> = self
            .app_instances
            .iter()
            .map(|inst| {
                let mut m = AttributeMap::new();
                attrs::put_opt_string(&mut m, "id", inst.id.as_deref());
                m.insert("name".into(), Value::from(inst.name.as_str()));
                m.insert("display_order".into(), json!(inst.display_order));
                attrs::put_opt_string(&mut m, "parent", inst.parent.as_deref());
                Value::Object(m)
            })
            .collect();
        map.insert("app_instance".into(), Value::Array(instances));
        map
    }

    fn from_attributes(map: &AttributeMap) -> Result<Self, CoreError> {
        let users = attrs::objects(map, "user")?
            .into_iter()
            .enumerate()
            .map(|(i, m)| {
                let read = || {
                    let user_id = attrs::opt_string(m, "user_id")?
                        .ok_or_else(|| CoreError::invalid("user_id", "required"))?;
                    Ok::<_, CoreError>(TeamUser {
                        user_id,
                        role: attrs::opt_string(m, "role")?,
                    })
                };
                read().map_err(|e| attrs::within(&format!("user[{i}]"), e))
            })
            .collect::<Result<_, _>>()?;

        let app_instances = attrs::objects(map, "app_instance")?
            .into_iter()
            .enumerate()
            .map(|(i, m)| {
                let read = || {
                    Ok::<_, CoreError>(AppInstanceSpec {
                        id: attrs::opt_string(m, "id")?,
                        name: attrs::string(m, "name")?,
                        display_order: attrs::number(m, "display_order")?,
                        parent: attrs::opt_string(m, "parent")?,
                    })
                };
                read().map_err(|e| attrs::within(&format!("app_instance[{i}]"), e))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            team_id: attrs::opt_string(map, "team_id")?,
            name: attrs::opt_string(map, "name")?,
            role: attrs::opt_string(map, "role")?,
            permissions: attrs::string_list(map, "permissions")?,
            users,
            app_instances,
        })
    }
}
