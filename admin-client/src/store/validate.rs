//! Role form validation, checked before any request is made

use shared::Role;

use crate::error::RoleNameError;

/// Check a role name against the loaded roles.
///
/// The name must be non-empty after trimming and must not match (ignoring
/// case) the name of any other loaded role. The role being edited is
/// excluded so saving an unchanged name is allowed.
pub fn validate_role_name(name: &str, editing_id: &str, roles: &[Role]) -> Result<(), RoleNameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RoleNameError::Empty);
    }

    match roles
        .iter()
        .find(|role| role.id != editing_id && role.name_matches(name))
    {
        Some(existing) => Err(RoleNameError::Duplicate(existing.name.clone())),
        None => Ok(()),
    }
}
