use serde::{Deserialize, Serialize};

use fittrack_core::{DomainError, DomainResult, UserId, ValueObject};

/// Display name of a user. Never blank; surrounding whitespace is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("username is required"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl core::fmt::Display for Username {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValueObject for Username {}

/// A registered user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
}

impl User {
    /// Register a new user under a freshly issued identifier.
    pub fn register(username: Username) -> Self {
        Self::new(UserId::new(), username)
    }

    /// Rehydrate a user from storage.
    pub fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }

    pub fn id_typed(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }
}
