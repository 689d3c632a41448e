//! Shared types for the admin console
//!
//! Wire models and request/response shapes exchanged with the
//! user & role administration REST API.

pub mod models;
pub mod request;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{Role, RoleUpdate, User};
pub use request::ListQuery;
pub use response::PagedData;
