//! Debounced customer search
//!
//! Every keystroke calls [`CustomerSearch::search`]. The pending timer is
//! cancelled and restarted; only when the input has been quiet for the
//! configured period does a lookup hit the store. A lookup that already
//! started is left to finish, so results are published by arrival order.

use super::find;
use crate::store::DocumentStore;
use parking_lot::Mutex;
use shared::models::Customer;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Latest published lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub customers: Vec<Customer>,
}

pub struct CustomerSearch {
    store: Arc<dyn DocumentStore>,
    quiet_period: Duration,
    pending: Mutex<Option<CancellationToken>>,
    results: Arc<watch::Sender<SearchResults>>,
}

impl CustomerSearch {
    pub fn new(store: Arc<dyn DocumentStore>, quiet_period: Duration) -> Self {
        let (tx, _rx) = watch::channel(SearchResults::default());
        Self {
            store,
            quiet_period,
            pending: Mutex::new(None),
            results: Arc::new(tx),
        }
    }

    /// Receiver for published results
    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.results.subscribe()
    }

    /// Schedule a lookup for `text`, replacing any lookup still waiting
    pub fn search(&self, text: impl Into<String>) -> JoinHandle<()> {
        let text = text.into();
        let token = CancellationToken::new();
        if let Some(previous) = self.pending.lock().replace(token.clone()) {
            previous.cancel();
        }

        let store = self.store.clone();
        let results = self.results.clone();
        let quiet_period = self.quiet_period;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::trace!(query = %text, "Customer search superseded");
                    return;
                }
                _ = tokio::time::sleep(quiet_period) => {}
            }

            match find(store.as_ref(), &text).await {
                Ok(customers) => {
                    tracing::debug!(query = %text, hits = customers.len(), "Customer search done");
                    results.send_replace(SearchResults {
                        query: text,
                        customers,
                    });
                }
                Err(e) => {
                    tracing::warn!(query = %text, error = %e, "Customer search failed");
                }
            }
        })
    }

    /// Drop the pending lookup, if any
    pub fn cancel(&self) {
        if let Some(token) = self.pending.lock().take() {
            token.cancel();
        }
    }
}

impl Drop for CustomerSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}
