//! User domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a User.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random UserId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a UserId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A user of the platform who can receive payouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    /// Role names, populated by `UserStore::get_user_with_roles`.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    /// Creates a user without names or roles.
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            email: email.into(),
            roles: Vec::new(),
        }
    }

    /// Replaces missing first/last names with empty strings.
    pub fn normalize_names(&mut self) {
        self.first_name.get_or_insert_with(String::new);
        self.last_name.get_or_insert_with(String::new);
    }
}
