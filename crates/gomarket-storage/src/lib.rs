//! Device-local key-value storage for the GoMarketplace cart.
//!
//! The cart treats persistence as an opaque asynchronous get/set service.
//! This crate defines that service as the [`KeyValueStore`] trait and ships
//! two backends:
//!
//! - [`MemoryStore`] - process-local map, for tests and ephemeral sessions
//! - [`FileStore`] - one file per key in a directory, survives restarts
//!
//! [`Cache`] layers automatic JSON serialization over any backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use gomarket_storage::{Cache, FileStore};
//!
//! let cache = Cache::new(FileStore::open("./data").await?);
//!
//! cache.set("@GoMarketplace:products", &products).await?;
//! let products: Option<Vec<Product>> = cache.get("@GoMarketplace:products").await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use kv::{Cache, KeyValueStore};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, FileStore, KeyValueStore, MemoryStore, StorageError};
}
