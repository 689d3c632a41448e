//! Admin data store
//!
//! Owns the users and roles collections together with their loading and
//! mutation flags, and funnels every network call through action methods.
//!
//! # Single flight
//!
//! Each collection has at most one load in flight. Starting a load cancels
//! the previous one and mints a new [`Generation`]; a response commits only
//! if its generation is still the active one when it arrives, so a slow
//! earlier query can never overwrite the result of a later one.
//!
//! # Atomicity
//!
//! All state lives behind one `parking_lot::RwLock`. Every mutation is a
//! single short lock section that is never held across an `.await`, and
//! subscribers are notified through a `watch` revision counter afterwards.
//!
//! # Example
//!
//! ```ignore
//! let store = AdminStore::new(NetworkHttpClient::from_config(&config)?);
//! store.load_users(LoadParams::search("ann")).await?;
//! let snapshot = store.snapshot();
//! ```

mod collection;
mod flight;
mod validate;

pub use collection::{Collection, CollectionKind};
pub use flight::{Fetch, Generation};
pub use validate::validate_role_name;

use std::sync::Arc;

use parking_lot::RwLock;
use shared::{ListQuery, PagedData, Role, RoleUpdate, User};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::api::AdminApi;
use crate::client::HttpClient;
use crate::error::{Action, StoreError, StoreResult};
use collection::{CollectionState, Resource};

/// Parameters of a load call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadParams {
    pub search: Option<String>,
    /// Page token from a previous response
    pub page: Option<String>,
    /// Fetch even when the collection already holds data
    pub force_reload: bool,
}

impl LoadParams {
    /// Forced reload of the first, unfiltered page
    pub fn reload() -> Self {
        Self {
            force_reload: true,
            ..Self::default()
        }
    }

    /// Forced reload filtered by `term`; an empty term means unfiltered
    pub fn search(term: impl Into<String>) -> Self {
        let term = term.into();
        Self {
            search: (!term.is_empty()).then_some(term),
            page: None,
            force_reload: true,
        }
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn query(&self) -> ListQuery {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        ListQuery::new(non_empty(&self.search), non_empty(&self.page))
    }
}

/// How a load call ended, when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Collection already had data and no reload was forced; nothing sent
    Cached,
    /// The response was committed
    Committed,
    /// Superseded by a newer load or cancelled; nothing committed
    Superseded,
}

/// Consistent copy of the store for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub users: Collection<User>,
    pub roles: Collection<Role>,
    pub is_loading_users: bool,
    pub is_loading_roles: bool,
    pub is_deleting_user: bool,
    pub is_updating_role: bool,
}

impl StoreSnapshot {
    /// The users table shows a spinner while either collection loads or a delete runs
    pub fn is_table_loading(&self) -> bool {
        self.is_loading_users || self.is_loading_roles || self.is_deleting_user
    }
}

#[derive(Debug)]
pub(crate) struct StoreState {
    users: CollectionState<User>,
    roles: CollectionState<Role>,
    pending_deletes: usize,
    pending_updates: usize,
    next_generation: Generation,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            users: CollectionState::default(),
            roles: CollectionState::default(),
            pending_deletes: 0,
            pending_updates: 0,
            next_generation: Generation::first(),
        }
    }
}

impl StoreState {
    fn mint_generation(&mut self) -> Generation {
        let generation = self.next_generation;
        self.next_generation = generation.next();
        generation
    }

    fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            users: self.users.committed.clone(),
            roles: self.roles.committed.clone(),
            is_loading_users: self.users.flight.is_active(),
            is_loading_roles: self.roles.flight.is_active(),
            is_deleting_user: self.pending_deletes > 0,
            is_updating_role: self.pending_updates > 0,
        }
    }
}

/// The application's data store.
///
/// Clones share the same state.
pub struct AdminStore<C> {
    api: AdminApi<C>,
    state: Arc<RwLock<StoreState>>,
    revision: Arc<watch::Sender<u64>>,
}

impl<C> Clone for AdminStore<C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: Arc::clone(&self.state),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<C> std::fmt::Debug for AdminStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("AdminStore")
            .field("users", &state.users.committed.len())
            .field("roles", &state.roles.committed.len())
            .field("revision", &*self.revision.borrow())
            .finish()
    }
}

impl<C> AdminStore<C> {
    fn notify(&self) {
        self.revision.send_modify(|revision| *revision = revision.wrapping_add(1));
    }
}

impl<C: HttpClient> AdminStore<C> {
    /// Create a store with empty collections
    pub fn new(http: C) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            api: AdminApi::new(http),
            state: Arc::new(RwLock::new(StoreState::default())),
            revision: Arc::new(revision),
        }
    }

    pub fn api(&self) -> &AdminApi<C> {
        &self.api
    }

    // ========== State access ==========

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.read().snapshot()
    }

    /// Revision counter bumped after every state change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn users(&self) -> Collection<User> {
        self.state.read().users.committed.clone()
    }

    pub fn roles(&self) -> Collection<Role> {
        self.state.read().roles.committed.clone()
    }

    pub fn is_loading(&self, kind: CollectionKind) -> bool {
        let state = self.state.read();
        match kind {
            CollectionKind::Users => state.users.flight.is_active(),
            CollectionKind::Roles => state.roles.flight.is_active(),
        }
    }

    pub fn is_loading_users(&self) -> bool {
        self.is_loading(CollectionKind::Users)
    }

    pub fn is_loading_roles(&self) -> bool {
        self.is_loading(CollectionKind::Roles)
    }

    pub fn is_deleting_user(&self) -> bool {
        self.state.read().pending_deletes > 0
    }

    pub fn is_updating_role(&self) -> bool {
        self.state.read().pending_updates > 0
    }

    // ========== Loads ==========

    /// Load a page of `kind`.
    ///
    /// Cancelled and superseded loads are not errors: they return
    /// `Ok(LoadOutcome::Superseded)` and leave the collection untouched.
    pub async fn load(&self, kind: CollectionKind, params: LoadParams) -> StoreResult<LoadOutcome> {
        match kind {
            CollectionKind::Users => self.load_resource::<User>(params).await,
            CollectionKind::Roles => self.load_resource::<Role>(params).await,
        }
    }

    pub async fn load_users(&self, params: LoadParams) -> StoreResult<LoadOutcome> {
        self.load_resource::<User>(params).await
    }

    pub async fn load_roles(&self, params: LoadParams) -> StoreResult<LoadOutcome> {
        self.load_resource::<Role>(params).await
    }

    /// Cancel the in-flight load of `kind` without starting another
    pub fn cancel_load(&self, kind: CollectionKind) {
        let cancelled = {
            let mut state = self.state.write();
            match kind {
                CollectionKind::Users => state.users.flight.cancel(),
                CollectionKind::Roles => state.roles.flight.cancel(),
            }
        };
        if let Some(generation) = cancelled {
            tracing::debug!(collection = %kind, %generation, "Load cancelled");
            self.notify();
        }
    }

    async fn load_resource<T: Resource>(&self, params: LoadParams) -> StoreResult<LoadOutcome> {
        let kind = T::KIND;
        let query = params.query();

        let Some((generation, cancel)) = self.begin_load::<T>(params.force_reload) else {
            tracing::trace!(collection = %kind, "Collection cached, skipping load");
            return Ok(LoadOutcome::Cached);
        };

        tracing::debug!(
            collection = %kind,
            %generation,
            search = ?query.search,
            page = ?query.page,
            "Loading collection"
        );

        let guard = LoadGuard::<T, C> {
            store: self,
            generation,
            armed: true,
            _resource: std::marker::PhantomData,
        };
        let fetch = Fetch::race(&cancel, T::fetch(&self.api, &query)).await;
        guard.disarm();

        self.finish_load::<T>(generation, query, fetch)
    }

    /// Make a new generation the active load, unless the collection is
    /// cached and no reload was forced
    fn begin_load<T: Resource>(&self, force_reload: bool) -> Option<(Generation, CancellationToken)> {
        let started = {
            let mut state = self.state.write();
            if !force_reload && !T::slot(&mut state).committed.is_empty() {
                None
            } else {
                let generation = state.mint_generation();
                let cancel = T::slot(&mut state).flight.supersede(generation);
                Some((generation, cancel))
            }
        };
        if started.is_some() {
            self.notify();
        }
        started
    }

    /// Commit `fetch` only if `generation` is still the active load
    fn finish_load<T: Resource>(
        &self,
        generation: Generation,
        query: ListQuery,
        fetch: Fetch<PagedData<T>>,
    ) -> StoreResult<LoadOutcome> {
        let kind = T::KIND;
        let committed = {
            let mut state = self.state.write();
            let slot = T::slot(&mut state);
            if !slot.flight.finish(generation) {
                None
            } else {
                match fetch {
                    Fetch::Succeeded(page) => {
                        let count = page.data.len();
                        slot.committed.commit(page, query);
                        Some(Ok(count))
                    }
                    Fetch::Failed(err) => Some(Err(err)),
                    // Token fired while still current; nothing to commit
                    Fetch::Cancelled => None,
                }
            }
        };

        match committed {
            None => {
                tracing::debug!(collection = %kind, %generation, "Discarding superseded response");
                Ok(LoadOutcome::Superseded)
            }
            Some(Ok(count)) => {
                self.notify();
                tracing::debug!(collection = %kind, %generation, count, "Collection committed");
                Ok(LoadOutcome::Committed)
            }
            Some(Err(err)) => {
                self.notify();
                tracing::warn!(collection = %kind, %generation, error = %err, "Load failed");
                Err(StoreError::request(kind.load_action(), err))
            }
        }
    }

    // ========== Mutations ==========

    /// Append a user to the local collection (no request)
    pub fn add_user(&self, user: User) {
        self.state.write().users.committed.data.push(user);
        self.notify();
    }

    /// Delete `user` on the server, then drop it from the local collection.
    ///
    /// Only entries with the same id are removed; no refetch happens.
    pub async fn remove_user(&self, user: &User) -> StoreResult<()> {
        let pending = PendingMutation::begin(self, Counter::Deletes);
        tracing::debug!(user_id = %user.id, "Deleting user");

        match self.api.delete_user(&user.id).await {
            Ok(()) => {
                let removed = pending.finish(|state| {
                    let users = &mut state.users.committed.data;
                    let before = users.len();
                    users.retain(|u| u.id != user.id);
                    before - users.len()
                });
                tracing::info!(user_id = %user.id, removed, "User deleted");
                Ok(())
            }
            Err(err) => {
                pending.finish(|_| ());
                tracing::warn!(user_id = %user.id, error = %err, "Delete user failed");
                Err(StoreError::request(Action::RemovingUser, err))
            }
        }
    }

    /// Rename / re-describe a role.
    ///
    /// The name is validated against the loaded roles first; an invalid
    /// name fails with [`StoreError::InvalidRole`] without any request.
    /// On success the local role is replaced with the record the server
    /// returned, which is also returned to the caller.
    pub async fn update_role(
        &self,
        role_id: &str,
        name: &str,
        description: Option<String>,
    ) -> StoreResult<Role> {
        {
            let state = self.state.read();
            validate_role_name(name, role_id, &state.roles.committed.data)?;
        }

        let pending = PendingMutation::begin(self, Counter::Updates);
        let update = RoleUpdate::new(name.trim(), description);
        tracing::debug!(%role_id, name = %update.name, "Updating role");

        match self.api.update_role(role_id, &update).await {
            Ok(role) => {
                let replaced = pending.finish(|state| {
                    replace_by_id(&mut state.roles.committed.data, role_id, role.clone())
                });
                tracing::info!(%role_id, replaced, "Role updated");
                Ok(role)
            }
            Err(err) => {
                pending.finish(|_| ());
                tracing::warn!(%role_id, error = %err, "Update role failed");
                Err(StoreError::request(Action::UpdatingRole, err))
            }
        }
    }
}

/// Swap the item whose id is `id` for `record`; returns whether one was found
fn replace_by_id<T: Resource>(items: &mut [T], id: &str, record: T) -> bool {
    match items.iter_mut().find(|item| item.id() == id) {
        Some(slot) => {
            *slot = record;
            true
        }
        None => false,
    }
}

/// Clears the loading flag if the load future is dropped mid-flight
struct LoadGuard<'a, T: Resource, C> {
    store: &'a AdminStore<C>,
    generation: Generation,
    armed: bool,
    _resource: std::marker::PhantomData<fn() -> T>,
}

impl<T: Resource, C> LoadGuard<'_, T, C> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<T: Resource, C> Drop for LoadGuard<'_, T, C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let retired = T::slot(&mut self.store.state.write())
            .flight
            .cancel_if_current(self.generation);
        if retired {
            tracing::debug!(collection = %T::KIND, generation = %self.generation, "Load abandoned");
            self.store.notify();
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Counter {
    Deletes,
    Updates,
}

impl Counter {
    fn get(self, state: &mut StoreState) -> &mut usize {
        match self {
            Counter::Deletes => &mut state.pending_deletes,
            Counter::Updates => &mut state.pending_updates,
        }
    }
}

/// Keeps a mutation flag raised until the mutation finishes or is dropped
struct PendingMutation<'a, C> {
    store: &'a AdminStore<C>,
    counter: Counter,
    done: bool,
}

impl<'a, C> PendingMutation<'a, C> {
    fn begin(store: &'a AdminStore<C>, counter: Counter) -> Self {
        *counter.get(&mut store.state.write()) += 1;
        store.notify();
        Self {
            store,
            counter,
            done: false,
        }
    }

    /// Lower the flag and apply `commit` in the same lock section
    fn finish<R>(mut self, commit: impl FnOnce(&mut StoreState) -> R) -> R {
        let result = {
            let mut state = self.store.state.write();
            let pending = self.counter.get(&mut state);
            *pending = pending.saturating_sub(1);
            commit(&mut state)
        };
        self.done = true;
        self.store.notify();
        result
    }
}

impl<C> Drop for PendingMutation<'_, C> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        {
            let mut state = self.store.state.write();
            let pending = self.counter.get(&mut state);
            *pending = pending.saturating_sub(1);
        }
        self.store.notify();
    }
}
