// admin-client/tests/common/mod.rs
// 测试用 mock API (axum Router, 进程内调用)

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use admin_client::{AdminStore, ListQuery, OneshotHttpClient, PagedData, Role, RoleUpdate, User};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::Notify;

pub const PAGE_SIZE: usize = 2;

type ApiError = (StatusCode, Json<Value>);

#[derive(Default)]
struct Inner {
    users: Mutex<Vec<User>>,
    roles: Mutex<Vec<Role>>,
    /// Every request URI, in arrival order
    requests: Mutex<Vec<String>>,
    /// Query string -> gate the handler waits on before answering
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    fail_users: Mutex<bool>,
    fail_roles: Mutex<bool>,
    /// IDs whose delete / patch fails
    fail_ids: Mutex<HashSet<String>>,
}

/// In-memory admin API
#[derive(Clone, Default)]
pub struct MockApi {
    inner: Arc<Inner>,
}

impl MockApi {
    pub fn seeded() -> Self {
        let api = Self::default();
        *api.inner.users.lock() = seed_users();
        *api.inner.roles.lock() = seed_roles();
        api
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/users", get(list_users))
            .route("/users/{id}", delete(delete_user))
            .route("/roles", get(list_roles))
            .route("/roles/{id}", patch(update_role))
            .with_state(self.clone())
    }

    pub fn store(&self) -> AdminStore<OneshotHttpClient> {
        AdminStore::new(OneshotHttpClient::new(self.router()))
    }

    pub fn requests(&self) -> Vec<String> {
        self.inner.requests.lock().clone()
    }

    pub fn requests_to(&self, prefix: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|uri| uri.starts_with(prefix))
            .collect()
    }

    /// Hold responses to `query` (e.g. `"search=ann"`, `""` for unfiltered)
    /// until the returned gate is notified
    pub fn gate(&self, query: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.inner
            .gates
            .lock()
            .insert(query.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn fail_users(&self, fail: bool) {
        *self.inner.fail_users.lock() = fail;
    }

    pub fn fail_roles(&self, fail: bool) {
        *self.inner.fail_roles.lock() = fail;
    }

    pub fn fail_id(&self, id: &str) {
        self.inner.fail_ids.lock().insert(id.to_string());
    }

    /// Wait until `count` requests have reached the server
    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..200 {
            if self.inner.requests.lock().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!(
            "expected {} requests, saw {:?}",
            count,
            self.requests()
        );
    }

    fn gate_for(&self, query: &ListQuery) -> Option<Arc<Notify>> {
        self.inner.gates.lock().get(&query.to_query_string()).cloned()
    }
}

fn server_error(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "code": 5000, "message": message })),
    )
}

fn paginate<T: Clone>(items: &[T], page: Option<&str>) -> PagedData<T> {
    let pages = items.len().div_ceil(PAGE_SIZE).max(1);
    let page = page.and_then(|p| p.parse::<usize>().ok()).unwrap_or(1).clamp(1, pages);
    let start = (page - 1) * PAGE_SIZE;
    PagedData {
        data: items.iter().skip(start).take(PAGE_SIZE).cloned().collect(),
        next: (page < pages).then(|| (page + 1).to_string()),
        prev: (page > 1).then(|| (page - 1).to_string()),
        pages: Some(pages as u32),
    }
}

fn matches(haystack: &[&str], search: Option<&str>) -> bool {
    match search {
        None => true,
        Some(term) => {
            let term = term.to_lowercase();
            haystack.iter().any(|field| field.to_lowercase().contains(&term))
        }
    }
}

async fn list_users(
    State(api): State<MockApi>,
    uri: Uri,
    Query(query): Query<ListQuery>,
) -> Result<Json<PagedData<User>>, ApiError> {
    api.inner.requests.lock().push(uri.to_string());
    if let Some(gate) = api.gate_for(&query) {
        gate.notified().await;
    }
    if *api.inner.fail_users.lock() {
        return Err(server_error("database offline"));
    }

    let users: Vec<User> = api
        .inner
        .users
        .lock()
        .iter()
        .filter(|u| matches(&[&u.first, &u.last], query.search.as_deref()))
        .cloned()
        .collect();
    Ok(Json(paginate(&users, query.page.as_deref())))
}

async fn delete_user(
    State(api): State<MockApi>,
    uri: Uri,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    api.inner.requests.lock().push(format!("DELETE {}", uri));
    if api.inner.fail_ids.lock().contains(&id) {
        return Err(server_error("user is locked"));
    }

    let mut users = api.inner.users.lock();
    let before = users.len();
    users.retain(|u| u.id != id);
    if users.len() == before {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "code": 4040, "message": format!("User {} not found", id) })),
        ));
    }
    Ok(StatusCode::OK)
}

async fn list_roles(
    State(api): State<MockApi>,
    uri: Uri,
    Query(query): Query<ListQuery>,
) -> Result<Json<PagedData<Role>>, ApiError> {
    api.inner.requests.lock().push(uri.to_string());
    if let Some(gate) = api.gate_for(&query) {
        gate.notified().await;
    }
    if *api.inner.fail_roles.lock() {
        return Err(server_error("database offline"));
    }

    let roles: Vec<Role> = api
        .inner
        .roles
        .lock()
        .iter()
        .filter(|r| matches(&[&r.name], query.search.as_deref()))
        .cloned()
        .collect();
    Ok(Json(paginate(&roles, query.page.as_deref())))
}

/// Canonical form the server stores: trimmed, first letter upper-case
fn normalize_name(name: &str) -> String {
    let name = name.trim();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

async fn update_role(
    State(api): State<MockApi>,
    uri: Uri,
    Path(id): Path<String>,
    Json(update): Json<RoleUpdate>,
) -> Result<Json<Role>, ApiError> {
    api.inner.requests.lock().push(format!("PATCH {}", uri));
    if api.inner.fail_ids.lock().contains(&id) {
        return Err(server_error("role is locked"));
    }

    let mut roles = api.inner.roles.lock();
    let Some(role) = roles.iter_mut().find(|r| r.id == id) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "code": 4041, "message": format!("Role {} not found", id) })),
        ));
    };
    role.name = normalize_name(&update.name);
    if update.description.is_some() {
        role.description = update.description.filter(|d| !d.is_empty());
    }
    Ok(Json(role.clone()))
}

fn user(id: &str, first: &str, last: &str, role_id: &str, day: u32) -> User {
    User {
        id: id.into(),
        first: first.into(),
        last: last.into(),
        photo: None,
        role_id: role_id.into(),
        created_at: Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap(),
    }
}

/// Seven users; five of them match "ann"
pub fn seed_users() -> Vec<User> {
    vec![
        user("u1", "Ann", "Lee", "r1", 1),
        user("u2", "Anna", "Park", "r2", 2),
        user("u3", "Bob", "Stone", "r3", 3),
        user("u4", "Joanne", "Smith", "r2", 4),
        user("u5", "Hannah", "Brown", "r3", 5),
        user("u6", "Carl", "Wu", "r3", 6),
        user("u7", "Dianne", "Cole", "r2", 7),
    ]
}

fn role(id: &str, name: &str, is_default: bool) -> Role {
    Role {
        id: id.into(),
        name: name.into(),
        description: Some(format!("{} role", name)),
        is_default,
        created_at: Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(),
    }
}

/// Two roles, one page
pub fn seed_roles() -> Vec<Role> {
    vec![role("r1", "Admin", false), role("r2", "Editor", false)]
}

pub fn ids<T, F: Fn(&T) -> &str>(items: &[T], id: F) -> Vec<String> {
    items.iter().map(|item| id(item).to_string()).collect()
}

pub fn user_ids(users: &[User]) -> Vec<String> {
    ids(users, |u| u.id.as_str())
}
