//! Authoritative cart state.
//!
//! `CartStore` keeps the committed list in a `watch` channel. Each mutation
//! reads the latest committed list, applies a pure transform, publishes the
//! result to subscribers, and queues it for persistence, all while holding
//! the channel's lock. Concurrent mutations therefore never overwrite each
//! other, and the persist queue sees lists in commit order.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use gomarket_storage::{Cache, KeyValueStore};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cart::{self, CartItem, NewCartItem};
use crate::error::CartError;
use crate::persist::{PersistQueue, PersistStatus};

/// Storage key the cart is written under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketplace:products";

/// Cart store options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartOptions {
    /// Key holding the serialized cart.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for CartOptions {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

impl CartOptions {
    /// Use a different storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}

/// Lifecycle phase of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartPhase {
    /// The initial load has not completed.
    Uninitialized,
    /// The initial load has completed. There is no way back.
    Ready,
}

/// A published cart state.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    /// Items in insertion order.
    pub items: Arc<[CartItem]>,
    /// Lifecycle phase at publication time.
    pub phase: CartPhase,
    /// Bumped on every publication.
    pub revision: u64,
}

impl CartSnapshot {
    fn empty() -> Self {
        Self {
            items: Arc::from(Vec::new()),
            phase: CartPhase::Uninitialized,
            revision: 0,
        }
    }
}

/// Result of [`CartStore::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Stored list replaced the in-memory one.
    Restored { items: usize },
    /// Nothing stored; the in-memory list was kept.
    Missing,
    /// Stored value could not be read or decoded; the in-memory list was kept.
    Unreadable { reason: String },
    /// The store was already loaded; nothing happened.
    AlreadyLoaded,
}

/// In-memory cart mirrored into a key-value store.
pub struct CartStore {
    state: watch::Sender<CartSnapshot>,
    cache: Cache<Arc<dyn KeyValueStore>>,
    queue: PersistQueue,
    options: CartOptions,
    load_started: AtomicBool,
}

impl CartStore {
    /// Create an empty, uninitialized store.
    ///
    /// Must be called from within a Tokio runtime, which hosts the persist
    /// writer.
    pub fn new(adapter: Arc<dyn KeyValueStore>, options: CartOptions) -> Result<Self, CartError> {
        let queue = PersistQueue::spawn(adapter.clone(), options.storage_key.clone())?;
        let (state, _) = watch::channel(CartSnapshot::empty());
        Ok(Self {
            state,
            cache: Cache::new(adapter),
            queue,
            options,
            load_started: AtomicBool::new(false),
        })
    }

    /// Options the store was built with.
    pub fn options(&self) -> &CartOptions {
        &self.options
    }

    /// Hydrate the cart from storage, once.
    ///
    /// A stored list replaces the in-memory list wholesale, including any
    /// changes made before the load completed. Read and decode failures keep
    /// the in-memory list and are reported through the outcome. Either way
    /// the store becomes [`CartPhase::Ready`] and the state is published.
    pub async fn load(&self) -> LoadOutcome {
        if self.load_started.swap(true, Ordering::SeqCst) {
            self.wait_ready().await;
            return LoadOutcome::AlreadyLoaded;
        }

        let key = self.options.storage_key.as_str();
        let (restored, outcome) = match self.read_stored().await {
            Ok(Some(items)) => {
                let count = items.len();
                (Some(items), LoadOutcome::Restored { items: count })
            }
            Ok(None) => (None, LoadOutcome::Missing),
            Err(e) => {
                warn!(key, error = %e, "could not read stored cart, keeping current state");
                (
                    None,
                    LoadOutcome::Unreadable {
                        reason: e.to_string(),
                    },
                )
            }
        };

        self.state.send_modify(|snap| {
            if let Some(items) = restored {
                snap.items = items.into();
            }
            snap.phase = CartPhase::Ready;
            snap.revision += 1;
        });

        info!(key, outcome = ?outcome, "cart loaded");
        outcome
    }

    async fn read_stored(&self) -> Result<Option<Vec<CartItem>>, CartError> {
        let key = self.options.storage_key.as_str();
        let items: Option<Vec<CartItem>> = self.cache.get(key).await?;
        Ok(items.map(dedupe_by_id))
    }

    /// Add a product, or bump its quantity if it is already in the cart.
    ///
    /// A candidate with a non-finite price is rejected and nothing changes.
    pub fn add_to_cart(&self, candidate: NewCartItem) -> Result<Arc<[CartItem]>, CartError> {
        candidate.validate()?;
        Ok(self.commit("add_to_cart", |items| cart::add_to_cart(items, candidate)))
    }

    /// Raise the quantity of `id` by one.
    pub fn increment(&self, id: &str) -> Arc<[CartItem]> {
        self.commit("increment", |items| cart::increment(items, id))
    }

    /// Lower the quantity of `id` by one.
    pub fn decrement(&self, id: &str) -> Arc<[CartItem]> {
        self.commit("decrement", |items| cart::decrement(items, id))
    }

    fn commit<F>(&self, op: &'static str, transform: F) -> Arc<[CartItem]>
    where
        F: FnOnce(&[CartItem]) -> Vec<CartItem>,
    {
        let mut committed = None;
        self.state.send_modify(|snap| {
            let next: Arc<[CartItem]> = transform(&snap.items).into();
            snap.items = next.clone();
            snap.revision += 1;
            // Enqueue under the lock so writes follow commit order.
            self.queue.enqueue(snap.revision, next.clone());
            committed = Some((next, snap.revision, snap.phase));
        });

        let Some((items, revision, phase)) = committed else {
            return self.snapshot();
        };
        if phase == CartPhase::Uninitialized {
            debug!(op, revision, "cart mutated before load completed");
        }
        debug!(op, revision, items = items.len(), "cart committed");
        items
    }

    /// Current items.
    pub fn snapshot(&self) -> Arc<[CartItem]> {
        self.state.borrow().items.clone()
    }

    /// Current published state.
    pub fn current(&self) -> CartSnapshot {
        self.state.borrow().clone()
    }

    /// Subscribe to published states.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.state.subscribe()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> CartPhase {
        self.state.borrow().phase
    }

    /// Wait until the initial load has completed.
    pub async fn wait_ready(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|s| s.phase == CartPhase::Ready).await;
    }

    /// Wait for every write issued so far to settle.
    pub async fn flush(&self) -> Result<(), CartError> {
        self.queue.flush().await
    }

    /// Progress of the persist queue.
    pub fn persist_status(&self) -> PersistStatus {
        self.queue.status()
    }

    /// Sum of all quantities.
    pub fn item_count(&self) -> i64 {
        self.state
            .borrow()
            .items
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.state.borrow().items.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.state.borrow().items.is_empty()
    }

    /// Get a line by product id.
    pub fn get_item(&self, id: &str) -> Option<CartItem> {
        self.state.borrow().items.iter().find(|i| i.id == id).cloned()
    }
}

/// Keep the first line for each id.
fn dedupe_by_id(items: Vec<CartItem>) -> Vec<CartItem> {
    let mut seen = HashSet::with_capacity(items.len());
    let before = items.len();
    let kept: Vec<CartItem> = items
        .into_iter()
        .filter(|i| seen.insert(i.id.clone()))
        .collect();
    if kept.len() < before {
        warn!(dropped = before - kept.len(), "stored cart had duplicate ids");
    }
    kept
}
