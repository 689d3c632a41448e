//! Debounced search binding
//!
//! Connects a search input to a forced reload of one collection. Keystrokes
//! only reset a quiescence deadline; once the input has been quiet for the
//! debounce window the settled term is sent as `search`. An empty term
//! reloads the unfiltered collection.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::client::HttpClient;
use crate::store::{AdminStore, Collection, CollectionKind, LoadParams};
use crate::view::{ErrorBanner, Pager};

/// Idle wait used when no deadline is pending
const IDLE_WAIT: Duration = Duration::from_secs(3600);

/// Settled form of raw input: trimmed, `None` when blank
fn settle(raw: &str) -> Option<String> {
    let term = raw.trim();
    (!term.is_empty()).then(|| term.to_string())
}

/// A search input bound to one collection.
///
/// Creating the binding issues the initial unfiltered load. Dropping it
/// stops the background task.
#[derive(Debug)]
pub struct SearchBinding {
    kind: CollectionKind,
    input: watch::Sender<String>,
    settled: Arc<Mutex<Option<String>>>,
    shutdown: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl SearchBinding {
    pub fn spawn<C>(
        store: AdminStore<C>,
        kind: CollectionKind,
        window: Duration,
        banner: ErrorBanner,
    ) -> Self
    where
        C: HttpClient + 'static,
    {
        let (input, rx) = watch::channel(String::new());
        let settled = Arc::new(Mutex::new(None));
        let shutdown = CancellationToken::new();

        let worker = SearchWorker {
            store,
            kind,
            window,
            banner,
            input: rx,
            settled: Arc::clone(&settled),
            shutdown: shutdown.clone(),
        };
        let handle = tokio::spawn(worker.run());

        Self {
            kind,
            input,
            settled,
            shutdown,
            handle: Some(handle),
        }
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Latest raw text of the input
    pub fn input(&self, text: impl Into<String>) {
        let text = text.into();
        self.input.send_if_modified(|current| {
            if *current == text {
                false
            } else {
                *current = text;
                true
            }
        });
    }

    pub fn text(&self) -> String {
        self.input.borrow().clone()
    }

    /// Last term that was sent to the store
    pub fn settled(&self) -> Option<String> {
        self.settled.lock().clone()
    }

    /// Pagination controls over `collection` that page through the settled
    /// term, even while its search is still in flight or after it failed
    pub fn pager<'a, T>(&self, collection: &'a Collection<T>) -> Pager<'a, T> {
        Pager::new(collection).with_search(self.settled())
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Stop the background task and wait for it to exit
    pub async fn stop(mut self) {
        self.shutdown.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            tracing::error!(collection = %self.kind, "Search task failed: {e}");
        }
    }
}

impl Drop for SearchBinding {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct SearchWorker<C> {
    store: AdminStore<C>,
    kind: CollectionKind,
    window: Duration,
    banner: ErrorBanner,
    input: watch::Receiver<String>,
    settled: Arc<Mutex<Option<String>>>,
    shutdown: CancellationToken,
}

impl<C: HttpClient + 'static> SearchWorker<C> {
    async fn run(mut self) {
        tracing::debug!(collection = %self.kind, window_ms = self.window.as_millis() as u64, "Search binding started");

        self.dispatch(None);
        let mut last_sent: Option<String> = None;
        let mut deadline: Option<Instant> = None;

        loop {
            let sleep_until = deadline.unwrap_or_else(|| Instant::now() + IDLE_WAIT);

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    break;
                }

                changed = self.input.changed() => {
                    if changed.is_err() {
                        // Binding dropped
                        break;
                    }
                    deadline = Some(Instant::now() + self.window);
                }

                _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                    deadline = None;
                    let term = settle(&self.input.borrow_and_update());
                    if term != last_sent {
                        last_sent = term.clone();
                        self.dispatch(term);
                    }
                }
            }
        }

        tracing::debug!(collection = %self.kind, "Search binding stopped");
    }

    /// Start a forced reload for `term` without waiting for it, so a later
    /// term can supersede it.
    fn dispatch(&self, term: Option<String>) {
        *self.settled.lock() = term.clone();
        tracing::debug!(collection = %self.kind, search = ?term, "Search settled");

        let store = self.store.clone();
        let banner = self.banner.clone();
        let kind = self.kind;
        let params = LoadParams {
            search: term,
            page: None,
            force_reload: true,
        };
        tokio::spawn(async move {
            if let Err(err) = store.load(kind, params).await {
                banner.report(&err);
            }
        });
    }
}
