//! Users

use std::borrow::Cow;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{ids::TypedId, listing::Listable, roles::Role};

/// User Id
pub type UserId = TypedId<User>;

/// A storefront account, customer or employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: UserId,

    /// Given name.
    #[serde(default)]
    pub first_name: String,

    /// Family name.
    #[serde(default)]
    pub last_name: String,

    /// Sign-in email.
    pub email: String,

    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    /// Assigned role.
    pub role: Role,

    /// Profile picture URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic: Option<String>,

    /// When the account was created.
    pub created_at: Timestamp,
}

impl User {
    /// "First Last", trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl Listable for User {
    type Facet = Role;

    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(self.full_name())
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn facet(&self) -> Option<Role> {
        Some(self.role)
    }
}
