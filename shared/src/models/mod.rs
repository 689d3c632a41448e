//! Data models
//!
//! Shared between the admin API and its clients.
//! All IDs are opaque strings; timestamps are UTC and serialized as RFC 3339.

pub mod role;
pub mod user;

// Re-exports
pub use role::*;
pub use user::*;
