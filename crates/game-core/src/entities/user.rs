//! User entity - represents a player account

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Player account as seen by the login flow and game services.
///
/// The balance is not part of the user; it lives behind the `Wallet` port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a guest account named `guest-<id>`
    pub fn guest(id: impl Into<String>) -> Self {
        let id = id.into();
        let name = format!("guest-{id}");
        Self::new(id, name).with_tag("guest")
    }

    /// Add a tag
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Check if this is an auto-created guest account
    #[inline]
    pub fn is_guest(&self) -> bool {
        self.tags.iter().any(|t| t == "guest")
    }

    /// Update the display name
    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_user() {
        let user = User::guest("100001");
        assert_eq!(user.id, "100001");
        assert_eq!(user.name, "guest-100001");
        assert!(user.is_guest());
    }

    #[test]
    fn test_set_name_touches_updated_at() {
        let mut user = User::new("u1", "alice");
        let before = user.updated_at;
        user.set_name("bob".to_string());
        assert_eq!(user.name, "bob");
        assert!(user.updated_at >= before);
        assert!(!user.is_guest());
    }
}
