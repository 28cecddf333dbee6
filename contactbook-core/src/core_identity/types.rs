//! Identity handles
//!
//! Handles are opaque, stable references issued by the identity system. The
//! contact layer never interprets them beyond equality and display.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle of a user agent
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        AgentId(id.into())
    }

    /// Create a new random AgentId (32 random bytes, hex encoded)
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut id = [0u8; 32];
        rand::rng().fill_bytes(&mut id);
        AgentId(hex::encode(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable handle of a group agent
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        GroupId(id.into())
    }

    pub fn generate() -> Self {
        GroupId(format!("group-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public profile of a user agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: AgentId,
    pub login_name: String,
}

impl Profile {
    pub fn new(id: AgentId, login_name: impl Into<String>) -> Self {
        Self { id, login_name: login_name.into() }
    }

    /// Name shown in listings. The identity system only knows login names.
    pub fn display_name(&self) -> &str {
        &self.login_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_generation() {
        let id1 = AgentId::generate();
        let id2 = AgentId::generate();
        assert_ne!(id1, id2, "Generated IDs should be unique");
        assert_eq!(id1.as_str().len(), 64);
        assert!(id1.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_group_id_generation() {
        let id = GroupId::generate();
        assert!(id.as_str().starts_with("group-"));
        assert_ne!(id, GroupId::generate());
    }

    #[test]
    fn test_profile_display_name() {
        let profile = Profile::new(AgentId::new("a1"), "adam");
        assert_eq!(profile.display_name(), "adam");
        assert_eq!(format!("{}", profile.id), "a1");
    }
}
