//! Edit-role dialog state

use shared::Role;

use crate::client::HttpClient;
use crate::error::RoleNameError;
use crate::store::{AdminStore, validate_role_name};

use super::ErrorBanner;

/// Form state of the edit-role dialog
#[derive(Debug, Clone, Default)]
pub struct RoleEditor {
    editing: Option<Role>,
    pub name: String,
    pub description: String,
}

impl RoleEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the dialog prefilled from `role`
    pub fn open(&mut self, role: &Role) {
        self.name = role.name.clone();
        self.description = role.description.clone().unwrap_or_default();
        self.editing = Some(role.clone());
    }

    pub fn cancel(&mut self) {
        self.editing = None;
    }

    pub fn is_open(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing(&self) -> Option<&Role> {
        self.editing.as_ref()
    }

    /// Check the typed name against the loaded roles
    pub fn validate(&self, roles: &[Role]) -> Result<(), RoleNameError> {
        let editing_id = self.editing.as_ref().map_or("", |role| role.id.as_str());
        validate_role_name(&self.name, editing_id, roles)
    }

    /// Save is enabled when the dialog is open, the name is valid and no
    /// update is already running
    pub fn can_submit(&self, roles: &[Role], is_updating: bool) -> bool {
        self.is_open() && !is_updating && self.validate(roles).is_ok()
    }

    /// Send the update. Closes the dialog on success; on failure the dialog
    /// stays open and the error goes to `banner`.
    pub async fn submit<C: HttpClient>(
        &mut self,
        store: &AdminStore<C>,
        banner: &ErrorBanner,
    ) -> Option<Role> {
        let role_id = self.editing.as_ref()?.id.clone();

        match store
            .update_role(&role_id, &self.name, Some(self.description.clone()))
            .await
        {
            Ok(role) => {
                self.editing = None;
                Some(role)
            }
            Err(err) => {
                banner.report(&err);
                None
            }
        }
    }
}
