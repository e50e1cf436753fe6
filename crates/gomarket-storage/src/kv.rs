//! Key-value store trait and typed JSON wrapper.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::StorageError;

/// Asynchronous text key-value store.
///
/// Values are opaque strings and every `set` overwrites the whole value.
/// Implementations make no promise about ordering between concurrent calls
/// on the same key; callers that need ordering serialize their writes.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`.
    ///
    /// Returns `None` if the key doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key).await
    }
}

/// Type-safe cache over a [`KeyValueStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Debug, Clone)]
pub struct Cache<S> {
    store: S,
}

impl<S: KeyValueStore> Cache<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let products: Option<Vec<Product>> = cache.get("@GoMarketplace:products").await?;
    /// ```
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.store.get(key).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("@GoMarketplace:products", &products).await?;
    /// ```
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let text = serde_json::to_string(value)?;
        self.store.set(key, text).await
    }

    /// Delete a value from the cache.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove(key).await
    }

    /// Check if a key exists in the cache.
    pub async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.store.get(key).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Line {
        id: String,
        quantity: i64,
    }

    #[tokio::test]
    async fn test_typed_roundtrip() {
        let cache = Cache::new(MemoryStore::new());
        let lines = vec![
            Line { id: "p1".into(), quantity: 2 },
            Line { id: "p2".into(), quantity: -1 },
        ];

        cache.set("cart", &lines).await.unwrap();
        let loaded: Option<Vec<Line>> = cache.get("cart").await.unwrap();
        assert_eq!(loaded, Some(lines));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let cache = Cache::new(MemoryStore::new());
        let loaded: Option<Vec<Line>> = cache.get("nothing").await.unwrap();
        assert!(loaded.is_none());
        assert!(!cache.exists("nothing").await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_value_is_serialization_error() {
        let store = MemoryStore::new();
        store.set("cart", "{not json".to_string()).await.unwrap();

        let cache = Cache::new(store);
        let result: Result<Option<Vec<Line>>, _> = cache.get("cart").await;
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = Cache::new(Arc::new(MemoryStore::new()));
        cache.set("cart", &Vec::<Line>::new()).await.unwrap();
        assert!(cache.exists("cart").await.unwrap());

        cache.delete("cart").await.unwrap();
        assert!(!cache.exists("cart").await.unwrap());
    }
}
