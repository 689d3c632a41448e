//! Admin Client - users & roles administration over the admin REST API
//!
//! - [`AdminStore`]: the data store. Paginated users/roles collections,
//!   loading and mutation flags, single-flight loads with stale-response
//!   suppression.
//! - [`SearchBinding`]: debounced search input driving forced reloads.
//! - [`view`]: presentation-facing state (error banner, pager, role editor).
//! - [`client`]: HTTP transports behind the [`HttpClient`] trait.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod search;
pub mod store;
pub mod view;

pub use api::AdminApi;
pub use client::{HttpClient, NetworkHttpClient, OneshotHttpClient};
pub use config::ClientConfig;
pub use error::{Action, ClientError, ClientResult, RoleNameError, StoreError, StoreResult};
pub use search::SearchBinding;
pub use store::{AdminStore, Collection, CollectionKind, LoadOutcome, LoadParams, StoreSnapshot};

// Re-export shared types for convenience
pub use shared::{ListQuery, PagedData, Role, RoleUpdate, User};
