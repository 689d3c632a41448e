//! API Response types
//!
//! Paged list shape returned by the list endpoints:
//! ```json
//! {
//!     "data": [ ... ],
//!     "next": "3",
//!     "prev": "1",
//!     "pages": 5
//! }
//! ```

use serde::{Deserialize, Serialize};

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedData<T> {
    pub data: Vec<T>,
    /// Page token for the next page, absent on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Page token for the previous page, absent on the first page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
    /// Total page count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
}

impl<T> PagedData<T> {
    /// Single page holding `data`
    pub fn single(data: Vec<T>) -> Self {
        Self {
            data,
            next: None,
            prev: None,
            pages: Some(1),
        }
    }
}

impl<T> Default for PagedData<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            next: None,
            prev: None,
            pages: None,
        }
    }
}
