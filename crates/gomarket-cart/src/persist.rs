//! Serialized write path for the cart blob.
//!
//! Every committed list is queued here and written by a single writer task,
//! so writes to the storage key settle in the order they were issued. When
//! the writer falls behind, queued lists are coalesced and only the newest
//! one is written.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gomarket_storage::{Cache, KeyValueStore};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error};

use crate::cart::CartItem;
use crate::error::CartError;

/// Progress of the persist queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistStatus {
    /// Writes issued so far.
    pub issued: u64,
    /// Sequence number of the newest write that has settled.
    pub settled: u64,
    /// Writes that failed.
    pub failed: u64,
    /// Error of the newest settled write, if it failed.
    pub last_error: Option<String>,
}

impl PersistStatus {
    /// True when storage holds the newest settled list.
    pub fn is_healthy(&self) -> bool {
        self.last_error.is_none()
    }

    /// Writes issued but not yet settled.
    pub fn pending(&self) -> u64 {
        self.issued.saturating_sub(self.settled)
    }
}

#[derive(Debug)]
struct WriteRequest {
    seq: u64,
    revision: u64,
    items: Arc<[CartItem]>,
}

/// Single-writer queue for one storage key.
#[derive(Debug)]
pub(crate) struct PersistQueue {
    tx: mpsc::UnboundedSender<WriteRequest>,
    status: watch::Receiver<PersistStatus>,
    issued: AtomicU64,
}

impl PersistQueue {
    /// Spawn the writer task on the current runtime.
    pub(crate) fn spawn(store: Arc<dyn KeyValueStore>, key: String) -> Result<Self, CartError> {
        let handle = Handle::try_current().map_err(|e| CartError::NoRuntime(e.to_string()))?;
        let (tx, rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(PersistStatus::default());

        handle.spawn(run_writer(Cache::new(store), key, rx, status_tx));

        Ok(Self {
            tx,
            status,
            issued: AtomicU64::new(0),
        })
    }

    /// Queue a full-list write. Never blocks.
    pub(crate) fn enqueue(&self, revision: u64, items: Arc<[CartItem]>) {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        if self
            .tx
            .send(WriteRequest {
                seq,
                revision,
                items,
            })
            .is_err()
        {
            error!(seq, revision, "persist writer is gone, dropping write");
        }
    }

    /// Current queue progress.
    pub(crate) fn status(&self) -> PersistStatus {
        let mut status = self.status.borrow().clone();
        status.issued = self.issued.load(Ordering::SeqCst);
        status
    }

    /// Wait for every write issued so far to settle.
    ///
    /// Returns the error of the newest settled write, if it failed.
    pub(crate) async fn flush(&self) -> Result<(), CartError> {
        let target = self.issued.load(Ordering::SeqCst);
        let mut rx = self.status.clone();
        let status = rx
            .wait_for(|s| s.settled >= target)
            .await
            .map_err(|_| CartError::WriterClosed)?;

        match &status.last_error {
            Some(reason) => Err(CartError::Persist {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

async fn run_writer(
    cache: Cache<Arc<dyn KeyValueStore>>,
    key: String,
    mut rx: mpsc::UnboundedReceiver<WriteRequest>,
    status: watch::Sender<PersistStatus>,
) {
    while let Some(mut request) = rx.recv().await {
        // Only the newest queued list matters; skip superseded ones.
        while let Ok(newer) = rx.try_recv() {
            request = newer;
        }

        let result = cache.set(&key, &*request.items).await;

        status.send_modify(|s| {
            s.settled = request.seq;
            match &result {
                Ok(()) => s.last_error = None,
                Err(e) => {
                    s.failed += 1;
                    s.last_error = Some(e.to_string());
                }
            }
        });

        match result {
            Ok(()) => debug!(
                key = %key,
                seq = request.seq,
                revision = request.revision,
                items = request.items.len(),
                "persisted cart"
            ),
            Err(e) => error!(
                key = %key,
                seq = request.seq,
                revision = request.revision,
                error = %e,
                "failed to persist cart"
            ),
        }
    }
    debug!(key = %key, "persist writer stopped");
}
