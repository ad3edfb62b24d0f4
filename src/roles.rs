//! Roles

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::TypedId;

/// Role assigned to a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Full back-office access.
    Admin,

    /// Catalog management.
    Manager,

    /// Sales reporting.
    Sales,

    /// End customer.
    General,
}

/// Back-office panel a role lands on after sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Users, products, payments and messages.
    Admin,

    /// Catalog and stock.
    Manager,

    /// Sales figures and customer messages.
    Sales,
}

/// Returned when a role string is not one of the known roles.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    /// Every role, in the order the backend lists them.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Sales, Role::General];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Sales => "SALES",
            Role::General => "GENERAL",
        }
    }

    /// Panel this role may enter, if any.
    pub fn panel(self) -> Option<Panel> {
        match self {
            Role::Admin => Some(Panel::Admin),
            Role::Manager => Some(Panel::Manager),
            Role::Sales => Some(Panel::Sales),
            Role::General => None,
        }
    }

    /// Whether the role may upload or edit products.
    pub fn can_manage_products(self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    /// Whether the role may delete customer messages.
    pub fn can_delete_messages(self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    /// Whether the role receives storefront notifications.
    pub fn receives_notifications(self) -> bool {
        self == Role::General
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownRole(value.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

/// Role option as listed by the backend's role catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleOption {
    /// Backend id of the role record.
    #[serde(rename = "_id")]
    pub id: TypedId<RoleOption>,

    /// Role name shown in the employee form.
    pub role_name: String,
}
