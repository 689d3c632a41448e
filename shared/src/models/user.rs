//! User Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first: String,
    pub last: String,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Role reference (String ID)
    pub role_id: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// "First Last", falling back to whichever half is present
    pub fn display_name(&self) -> String {
        match (self.first.trim(), self.last.trim()) {
            ("", last) => last.to_string(),
            (first, "") => first.to_string(),
            (first, last) => format!("{} {}", first, last),
        }
    }

    /// Initials used when there is no photo
    pub fn initials(&self) -> String {
        self.first
            .chars()
            .next()
            .into_iter()
            .chain(self.last.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}
