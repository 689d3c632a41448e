//! Previous / Next pagination controls

use crate::store::{Collection, LoadParams};

/// Pagination controls for one collection.
///
/// Page requests carry the settled search term of the bound search input
/// (see [`Pager::with_search`]). Without one they fall back to the search
/// of the committed page.
#[derive(Debug)]
pub struct Pager<'a, T> {
    collection: &'a Collection<T>,
    search: Option<String>,
}

impl<'a, T> Pager<'a, T> {
    pub fn new(collection: &'a Collection<T>) -> Self {
        Self {
            collection,
            search: collection.query.search.clone(),
        }
    }

    /// Page through `search`, the settled term of the search input
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search;
        self
    }

    /// Controls are shown only when there is more than one page
    pub fn is_visible(&self) -> bool {
        self.collection.is_paginated()
    }

    pub fn can_previous(&self) -> bool {
        self.collection.prev.is_some()
    }

    pub fn can_next(&self) -> bool {
        self.collection.next.is_some()
    }

    /// Load params for the previous page, `None` when disabled
    pub fn previous(&self) -> Option<LoadParams> {
        self.collection.prev.as_deref().map(|page| self.page(page))
    }

    /// Load params for the next page, `None` when disabled
    pub fn next(&self) -> Option<LoadParams> {
        self.collection.next.as_deref().map(|page| self.page(page))
    }

    fn page(&self, page: &str) -> LoadParams {
        LoadParams {
            search: self.search.clone(),
            page: Some(page.to_string()),
            force_reload: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ListQuery;

    fn collection(next: Option<&str>, prev: Option<&str>, pages: Option<u32>) -> Collection<u32> {
        Collection {
            data: vec![1],
            next: next.map(Into::into),
            prev: prev.map(Into::into),
            pages,
            query: ListQuery::search("ann"),
        }
    }

    #[test]
    fn test_hidden_for_single_page() {
        let c = collection(None, None, Some(1));
        assert!(!Pager::new(&c).is_visible());
        let c = collection(None, None, None);
        assert!(!Pager::new(&c).is_visible());
    }

    #[test]
    fn test_first_page_of_three() {
        let c = collection(Some("2"), None, Some(3));
        let pager = Pager::new(&c);
        assert!(pager.is_visible());
        assert!(!pager.can_previous());
        assert!(pager.previous().is_none());

        let next = pager.next().unwrap();
        assert_eq!(next.page.as_deref(), Some("2"));
        assert_eq!(next.search.as_deref(), Some("ann"));
        assert!(next.force_reload);
    }

    #[test]
    fn test_settled_search_wins_over_committed() {
        let c = collection(Some("2"), None, Some(3));
        let next = Pager::new(&c).with_search(Some("bob".into())).next().unwrap();
        assert_eq!(next.search.as_deref(), Some("bob"));
        assert_eq!(next.page.as_deref(), Some("2"));

        let next = Pager::new(&c).with_search(None).next().unwrap();
        assert_eq!(next.search, None);
    }
}
