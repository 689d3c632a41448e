//! Client module - HTTP transports.
//!
//! [`HttpClient`] is the seam the store talks through. The network
//! implementation uses reqwest; the in-process one drives an axum
//! `Router` directly.

pub mod http;
pub mod http_oneshot;

// Re-export main types
pub use http::{HttpClient, NetworkHttpClient};
pub use http_oneshot::OneshotHttpClient;
