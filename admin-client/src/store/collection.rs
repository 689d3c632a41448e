//! Paginated collections held by the store

use std::fmt;
use std::future::Future;

use shared::{ListQuery, PagedData, Role, User};

use super::StoreState;
use super::flight::FlightSlot;
use crate::api::AdminApi;
use crate::client::HttpClient;
use crate::error::Action;
use crate::ClientResult;

/// Which managed collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Users,
    Roles,
}

impl CollectionKind {
    /// Action reported when a load of this collection fails
    pub fn load_action(self) -> Action {
        match self {
            CollectionKind::Users => Action::LoadingUsers,
            CollectionKind::Roles => Action::LoadingRoles,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Users => "users",
            CollectionKind::Roles => "roles",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The committed page of one collection.
///
/// Always the content of exactly one server response, together with the
/// query that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<T> {
    pub data: Vec<T>,
    pub next: Option<String>,
    pub prev: Option<String>,
    pub pages: Option<u32>,
    /// Query of the committed response
    pub query: ListQuery,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            next: None,
            prev: None,
            pages: None,
            query: ListQuery::default(),
        }
    }
}

impl<T> Collection<T> {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// More than one page exists
    pub fn is_paginated(&self) -> bool {
        self.pages.is_some_and(|pages| pages > 1)
    }

    /// Search term the committed page was filtered by
    pub fn search(&self) -> Option<&str> {
        self.query.search.as_deref()
    }

    /// Replace everything with `page`
    pub(crate) fn commit(&mut self, page: PagedData<T>, query: ListQuery) {
        self.data = page.data;
        self.next = page.next;
        self.prev = page.prev;
        self.pages = page.pages;
        self.query = query;
    }
}

/// Per-collection store state
#[derive(Debug)]
pub(crate) struct CollectionState<T> {
    pub committed: Collection<T>,
    pub flight: FlightSlot,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            committed: Collection::default(),
            flight: FlightSlot::default(),
        }
    }
}

/// An entity type the store keeps a collection of
pub(crate) trait Resource: Clone + Send + Sync + 'static {
    const KIND: CollectionKind;

    fn id(&self) -> &str;

    fn slot(state: &mut StoreState) -> &mut CollectionState<Self>;

    fn fetch<C: HttpClient>(
        api: &AdminApi<C>,
        query: &ListQuery,
    ) -> impl Future<Output = ClientResult<PagedData<Self>>> + Send;
}

impl Resource for User {
    const KIND: CollectionKind = CollectionKind::Users;

    fn id(&self) -> &str {
        &self.id
    }

    fn slot(state: &mut StoreState) -> &mut CollectionState<Self> {
        &mut state.users
    }

    fn fetch<C: HttpClient>(
        api: &AdminApi<C>,
        query: &ListQuery,
    ) -> impl Future<Output = ClientResult<PagedData<Self>>> + Send {
        api.list_users(query)
    }
}

impl Resource for Role {
    const KIND: CollectionKind = CollectionKind::Roles;

    fn id(&self) -> &str {
        &self.id
    }

    fn slot(state: &mut StoreState) -> &mut CollectionState<Self> {
        &mut state.roles
    }

    fn fetch<C: HttpClient>(
        api: &AdminApi<C>,
        query: &ListQuery,
    ) -> impl Future<Output = ClientResult<PagedData<Self>>> + Send {
        api.list_roles(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_replaces_page() {
        let mut collection = Collection::<u32>::default();
        collection.commit(
            PagedData {
                data: vec![1, 2],
                next: Some("2".into()),
                prev: None,
                pages: Some(3),
            },
            ListQuery::search("ann"),
        );
        assert_eq!(collection.len(), 2);
        assert!(collection.is_paginated());
        assert_eq!(collection.search(), Some("ann"));

        collection.commit(PagedData::single(vec![9]), ListQuery::default());
        assert_eq!(collection.data, vec![9]);
        assert!(collection.next.is_none());
        assert!(!collection.is_paginated());
        assert_eq!(collection.search(), None);
    }
}
