//! Table cell formatting

use chrono::{DateTime, Utc};
use shared::Role;

/// Label shown for a role id with no loaded role
pub const UNKNOWN_ROLE: &str = "Unknown";

/// Name of the role `role_id` refers to, or [`UNKNOWN_ROLE`]
pub fn role_label<'a>(role_id: &str, roles: &'a [Role]) -> &'a str {
    roles
        .iter()
        .find(|role| role.id == role_id)
        .map_or(UNKNOWN_ROLE, |role| role.name.as_str())
}

/// Long date, e.g. "October 19, 2026"
pub fn format_created_at(created_at: &DateTime<Utc>) -> String {
    created_at.format("%B %-d, %Y").to_string()
}
