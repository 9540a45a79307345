//! The user record and its wire representation.

use bson::Uuid;
use serde::{Deserialize, Serialize};
use userdesk_core::document::Document;

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub age: i64,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Document for User {
    fn id(&self) -> &Uuid {
        &self.id
    }

    fn collection_name() -> &'static str {
        "users"
    }
}

/// Fields accepted from a client once validation has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub age: i64,
    pub email: String,
    pub address: Option<String>,
}

impl NewUser {
    /// Attaches an id, producing the record to store.
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            name: self.name,
            age: self.age,
            email: self.email,
            address: self.address,
        }
    }
}

/// Validated changes for an existing user. `None` leaves a field as stored;
/// `address: Some(None)` clears the address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub email: Option<String>,
    pub address: Option<Option<String>>,
}

impl UserPatch {
    /// Overlays the given fields onto `user`.
    pub fn apply(self, user: User) -> User {
        User {
            id: user.id,
            name: self.name.unwrap_or(user.name),
            age: self.age.unwrap_or(user.age),
            email: self.email.unwrap_or(user.email),
            address: self.address.unwrap_or(user.address),
        }
    }
}

/// JSON shape of a user in responses: `{id, name, age, email, address}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub age: i64,
    pub email: String,
    pub address: Option<String>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            age: user.age,
            email: user.email,
            address: user.address,
        }
    }
}
