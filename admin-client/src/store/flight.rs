//! Single-flight bookkeeping: generation tokens and cancellable fetches.

use std::fmt;
use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::{ClientError, ClientResult};

/// Opaque marker minted for every load attempt.
///
/// Only the response carrying the collection's active generation may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub(crate) fn first() -> Self {
        Generation(1)
    }

    pub(crate) fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of a cancellable request
#[derive(Debug)]
pub enum Fetch<T> {
    Succeeded(T),
    /// The request's token fired before it finished; the request was dropped
    Cancelled,
    Failed(ClientError),
}

impl<T> Fetch<T> {
    /// Drive `request` until it finishes or `cancel` fires, whichever is first.
    ///
    /// Cancellation wins ties so a request superseded while its response
    /// was already ready still reports `Cancelled`.
    pub async fn race<F>(cancel: &CancellationToken, request: F) -> Self
    where
        F: Future<Output = ClientResult<T>>,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Fetch::Cancelled,
            result = request => match result {
                Ok(value) => Fetch::Succeeded(value),
                Err(err) => Fetch::Failed(err),
            },
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Fetch::Cancelled)
    }
}

#[derive(Debug)]
struct InFlight {
    generation: Generation,
    cancel: CancellationToken,
}

/// In-flight load of one collection (at most one)
#[derive(Debug, Default)]
pub(crate) struct FlightSlot {
    active: Option<InFlight>,
}

impl FlightSlot {
    /// Cancel the running request, if any, and make `generation` the active one
    pub fn supersede(&mut self, generation: Generation) -> CancellationToken {
        if let Some(previous) = self.active.take() {
            tracing::debug!(
                superseded = %previous.generation,
                by = %generation,
                "Cancelling superseded request"
            );
            previous.cancel.cancel();
        }
        let cancel = CancellationToken::new();
        self.active = Some(InFlight {
            generation,
            cancel: cancel.clone(),
        });
        cancel
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.active
            .as_ref()
            .is_some_and(|flight| flight.generation == generation)
    }

    /// Retire `generation` if it is still the active one.
    ///
    /// Returns false when it was superseded or cancelled in the meantime.
    pub fn finish(&mut self, generation: Generation) -> bool {
        if self.is_current(generation) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Cancel `generation` if it is still the active one
    pub fn cancel_if_current(&mut self, generation: Generation) -> bool {
        if self.is_current(generation) {
            self.cancel();
            true
        } else {
            false
        }
    }

    /// Cancel the running request without starting another
    pub fn cancel(&mut self) -> Option<Generation> {
        self.active.take().map(|flight| {
            flight.cancel.cancel();
            flight.generation
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
