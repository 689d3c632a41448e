//! Typed admin API endpoints

use std::sync::Arc;

use shared::{ListQuery, PagedData, Role, RoleUpdate, User};

use crate::ClientResult;
use crate::client::HttpClient;

/// Typed wrapper over an [`HttpClient`] for the user & role endpoints.
///
/// Cheap to clone; the transport is shared.
#[derive(Debug)]
pub struct AdminApi<C> {
    http: Arc<C>,
}

impl<C> Clone for AdminApi<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
        }
    }
}

impl<C: HttpClient> AdminApi<C> {
    pub fn new(http: C) -> Self {
        Self {
            http: Arc::new(http),
        }
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// GET /users?search=&page=
    pub async fn list_users(&self, query: &ListQuery) -> ClientResult<PagedData<User>> {
        self.http.get(&query.apply_to("/users")).await
    }

    /// DELETE /users/{id}
    pub async fn delete_user(&self, id: &str) -> ClientResult<()> {
        self.http.delete(&entity_path("/users", id)).await
    }

    /// GET /roles?search=&page=
    pub async fn list_roles(&self, query: &ListQuery) -> ClientResult<PagedData<Role>> {
        self.http.get(&query.apply_to("/roles")).await
    }

    /// PATCH /roles/{id}, returns the server's canonical record
    pub async fn update_role(&self, id: &str, update: &RoleUpdate) -> ClientResult<Role> {
        self.http.patch(&entity_path("/roles", id), update).await
    }
}

fn entity_path(collection: &str, id: &str) -> String {
    format!("{}/{}", collection, urlencoding::encode(id))
}
