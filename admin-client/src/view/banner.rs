//! Dismissible error banner

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::StoreError;

/// The one place user-visible errors are kept.
///
/// Holds at most one message; a newer error replaces the older one.
/// Clones share the same banner. Changes are published to
/// [`ErrorBanner::subscribe`] receivers so views can redraw.
#[derive(Debug, Clone)]
pub struct ErrorBanner {
    message: Arc<watch::Sender<Option<String>>>,
}

impl Default for ErrorBanner {
    fn default() -> Self {
        let (message, _) = watch::channel(None);
        Self {
            message: Arc::new(message),
        }
    }
}

impl ErrorBanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "Showing error banner");
        self.message.send_replace(Some(message));
    }

    /// Show the user-facing text of a store error
    pub fn report(&self, err: &StoreError) {
        self.show(err.to_string());
    }

    pub fn message(&self) -> Option<String> {
        self.message.borrow().clone()
    }

    pub fn is_visible(&self) -> bool {
        self.message.borrow().is_some()
    }

    /// Explicit dismissal by the operator
    pub fn dismiss(&self) {
        self.message.send_if_modified(|message| message.take().is_some());
    }

    /// Receiver notified whenever the message is shown or dismissed
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.message.subscribe()
    }
}
