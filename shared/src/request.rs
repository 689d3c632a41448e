//! Request types for the shared crate

use serde::{Deserialize, Serialize};

/// List query parameters (`?search=&page=`)
///
/// Empty strings are treated the same as absent parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Opaque page token taken from `PagedData::next` / `PagedData::prev`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

impl ListQuery {
    pub fn new(search: Option<String>, page: Option<String>) -> Self {
        Self { search, page }
    }

    /// Search filter only
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            page: None,
        }
    }

    /// Percent-encoded query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        [("search", &self.search), ("page", &self.page)]
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .map(|v| format!("{}={}", key, urlencoding::encode(v)))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `path` with this query appended
    pub fn apply_to(&self, path: &str) -> String {
        let query = self.to_query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query)
        }
    }
}
