//! Role Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    /// Unique (case-insensitive)
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The default role is assigned to new users and cannot be deleted
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn can_delete(&self) -> bool {
        !self.is_default
    }

    /// Case-insensitive name comparison
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Update role payload (PATCH /roles/{id})
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RoleUpdate {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }
}
