//! Presentation-facing state
//!
//! Small pieces of view state the tables and dialogs render from. None of
//! them talk to the network themselves; side effects go through the store.

mod banner;
pub mod format;
mod pager;
mod role_editor;

pub use banner::ErrorBanner;
pub use format::{format_created_at, role_label};
pub use pager::Pager;
pub use role_editor::RoleEditor;
