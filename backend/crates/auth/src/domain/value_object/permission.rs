//! Permission Catalog
//!
//! Static role → permission table and the authorization decision functions.
//! Permissions are never stored; they are derived from the role on every
//! check. A role string that is not one of the four known codes is granted
//! nothing.
//!
//! | role          | permissions                                          |
//! |---------------|------------------------------------------------------|
//! | administrator | all nine                                             |
//! | manager       | all except `user:manage`                             |
//! | operator      | `user:view`, `map:view`, `task:*`, `device:*`, `operation:view` |
//! | user          | every `*:view`                                       |

use derive_more::Display;
use serde::Serialize;

use super::user_role::UserRole;

/// A single capability tag such as `map:manage`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
pub enum Permission {
    #[display("user:manage")]
    #[serde(rename = "user:manage")]
    UserManage,
    #[display("user:view")]
    #[serde(rename = "user:view")]
    UserView,
    #[display("map:manage")]
    #[serde(rename = "map:manage")]
    MapManage,
    #[display("map:view")]
    #[serde(rename = "map:view")]
    MapView,
    #[display("task:manage")]
    #[serde(rename = "task:manage")]
    TaskManage,
    #[display("task:view")]
    #[serde(rename = "task:view")]
    TaskView,
    #[display("device:manage")]
    #[serde(rename = "device:manage")]
    DeviceManage,
    #[display("device:view")]
    #[serde(rename = "device:view")]
    DeviceView,
    #[display("operation:view")]
    #[serde(rename = "operation:view")]
    OperationView,
}

use Permission::*;

const ADMINISTRATOR: &[Permission] = &[
    UserManage,
    UserView,
    MapManage,
    MapView,
    TaskManage,
    TaskView,
    DeviceManage,
    DeviceView,
    OperationView,
];

const MANAGER: &[Permission] = &[
    UserView,
    MapManage,
    MapView,
    TaskManage,
    TaskView,
    DeviceManage,
    DeviceView,
    OperationView,
];

const OPERATOR: &[Permission] = &[
    UserView,
    MapView,
    TaskManage,
    TaskView,
    DeviceManage,
    DeviceView,
    OperationView,
];

const USER: &[Permission] = &[UserView, DeviceView, TaskView, OperationView, MapView];

impl Permission {
    pub const ALL: &'static [Permission] = ADMINISTRATOR;

    pub fn as_str(&self) -> &'static str {
        match self {
            UserManage => "user:manage",
            UserView => "user:view",
            MapManage => "map:manage",
            MapView => "map:view",
            TaskManage => "task:manage",
            TaskView => "task:view",
            DeviceManage => "device:manage",
            DeviceView => "device:view",
            OperationView => "operation:view",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == tag)
    }
}

pub(crate) const fn granted(role: UserRole) -> &'static [Permission] {
    match role {
        UserRole::Administrator => ADMINISTRATOR,
        UserRole::Manager => MANAGER,
        UserRole::Operator => OPERATOR,
        UserRole::User => USER,
    }
}

/// Permissions granted to a role code; empty for unknown roles
pub fn permissions_for(role: &str) -> &'static [Permission] {
    match UserRole::from_code(role) {
        Some(role) => granted(role),
        None => &[],
    }
}

/// True when the role holds at least one of `required`
///
/// An empty `required` list passes for every role, including unknown ones.
pub fn has_any(role: &str, required: &[Permission]) -> bool {
    if required.is_empty() {
        return true;
    }
    let granted = permissions_for(role);
    required.iter().any(|p| granted.contains(p))
}

/// True when the role holds every permission in `required`
pub fn has_all(role: &str, required: &[Permission]) -> bool {
    let granted = permissions_for(role);
    required.iter().all(|p| granted.contains(p))
}
