//! Cart provider and the handle UI collaborators receive.
//!
//! A [`Cart`] can only be obtained from a [`CartProvider`], either directly
//! through [`CartProvider::cart`] or through [`use_cart`] inside
//! [`CartProvider::scope`]. The handle keeps a weak reference to the store:
//! once the provider is dropped, every call fails with
//! [`CartError::OutsideProvider`] instead of returning an empty cart.

use std::future::Future;
use std::sync::{Arc, Weak};

use gomarket_storage::KeyValueStore;
use tokio::sync::watch;
use tracing::debug;

use crate::cart::{CartItem, NewCartItem};
use crate::error::CartError;
use crate::store::{CartOptions, CartSnapshot, CartStore, LoadOutcome};

tokio::task_local! {
    static CURRENT_CART: Cart;
}

/// Owner of the cart state.
///
/// Dropping the provider ends the lifetime of every [`Cart`] it handed out.
/// Writes already queued still reach storage.
pub struct CartProvider {
    store: Arc<CartStore>,
}

impl CartProvider {
    /// Create a provider with an empty, unloaded cart.
    ///
    /// Call [`load`](Self::load) to hydrate it, or use [`mount`](Self::mount).
    pub fn new<S>(adapter: S, options: CartOptions) -> Result<Self, CartError>
    where
        S: KeyValueStore + 'static,
    {
        Self::with_adapter(Arc::new(adapter), options)
    }

    /// Create a provider over a shared adapter.
    pub fn with_adapter(
        adapter: Arc<dyn KeyValueStore>,
        options: CartOptions,
    ) -> Result<Self, CartError> {
        let store = CartStore::new(adapter, options)?;
        Ok(Self {
            store: Arc::new(store),
        })
    }

    /// Create a provider and start loading in the background.
    ///
    /// The cart is usable immediately; it turns ready once the load settles.
    pub fn mount<S>(adapter: S, options: CartOptions) -> Result<Self, CartError>
    where
        S: KeyValueStore + 'static,
    {
        let provider = Self::new(adapter, options)?;
        let store = Arc::downgrade(&provider.store);
        tokio::spawn(async move {
            if let Some(store) = store.upgrade() {
                store.load().await;
            } else {
                debug!("provider dropped before initial load");
            }
        });
        Ok(provider)
    }

    /// Hydrate the cart from storage.
    pub async fn load(&self) -> LoadOutcome {
        self.store.load().await
    }

    /// Hand out a cart handle.
    pub fn cart(&self) -> Cart {
        Cart {
            store: Arc::downgrade(&self.store),
        }
    }

    /// Direct access to the store.
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Run `fut` with this provider's cart available through [`use_cart`].
    pub async fn scope<F>(&self, fut: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CART.scope(self.cart(), fut).await
    }
}

/// The cart handle within the current [`CartProvider::scope`].
pub fn use_cart() -> Result<Cart, CartError> {
    CURRENT_CART
        .try_with(Cart::clone)
        .map_err(|_| CartError::outside_provider())
}

/// Handle to the cart state.
///
/// Cheap to clone. Every method fails with [`CartError::OutsideProvider`]
/// once the owning provider is gone.
#[derive(Debug, Clone)]
pub struct Cart {
    store: Weak<CartStore>,
}

impl Cart {
    fn store(&self) -> Result<Arc<CartStore>, CartError> {
        self.store.upgrade().ok_or_else(CartError::outside_provider)
    }

    /// Current items, in insertion order.
    pub fn products(&self) -> Result<Arc<[CartItem]>, CartError> {
        Ok(self.store()?.snapshot())
    }

    /// Add a product, or bump its quantity if already present.
    pub fn add_to_cart(&self, item: NewCartItem) -> Result<(), CartError> {
        self.store()?.add_to_cart(item)?;
        Ok(())
    }

    /// Raise the quantity of `id` by one.
    pub fn increment(&self, id: &str) -> Result<(), CartError> {
        self.store()?.increment(id);
        Ok(())
    }

    /// Lower the quantity of `id` by one.
    pub fn decrement(&self, id: &str) -> Result<(), CartError> {
        self.store()?.decrement(id);
        Ok(())
    }

    /// Subscribe to published states.
    pub fn subscribe(&self) -> Result<watch::Receiver<CartSnapshot>, CartError> {
        Ok(self.store()?.subscribe())
    }

    /// Wait until the initial load has completed.
    pub async fn wait_ready(&self) -> Result<(), CartError> {
        let store = self.store()?;
        store.wait_ready().await;
        Ok(())
    }

    /// Wait for queued writes to settle; reports a failed latest write.
    pub async fn flush(&self) -> Result<(), CartError> {
        let store = self.store()?;
        store.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CartPhase;
    use gomarket_storage::MemoryStore;

    fn shoe() -> NewCartItem {
        NewCartItem::new("p1", "Shoe", "u", 10.0)
    }

    #[tokio::test]
    async fn test_cart_handle_mutates_store() {
        let provider = CartProvider::new(MemoryStore::new(), CartOptions::default()).unwrap();
        provider.load().await;
        let cart = provider.cart();

        cart.add_to_cart(shoe()).unwrap();
        cart.add_to_cart(shoe()).unwrap();
        cart.decrement("p1").unwrap();
        cart.increment("p1").unwrap();

        let products = cart.products().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_handle_fails_after_provider_dropped() {
        let provider = CartProvider::new(MemoryStore::new(), CartOptions::default()).unwrap();
        let cart = provider.cart();
        drop(provider);

        let err = cart.products().unwrap_err();
        assert!(matches!(err, CartError::OutsideProvider { scope: "CartProvider" }));
        assert!(cart.add_to_cart(shoe()).is_err());
        assert!(cart.increment("p1").is_err());
        assert!(cart.decrement("p1").is_err());
        assert!(cart.flush().await.is_err());
    }

    #[tokio::test]
    async fn test_use_cart_inside_scope() {
        let provider = CartProvider::new(MemoryStore::new(), CartOptions::default()).unwrap();
        provider.load().await;

        provider
            .scope(async {
                let cart = use_cart().unwrap();
                cart.add_to_cart(shoe()).unwrap();
            })
            .await;

        assert_eq!(provider.store().item_count(), 1);
    }

    #[tokio::test]
    async fn test_use_cart_outside_scope() {
        let err = use_cart().unwrap_err();
        assert_eq!(err.to_string(), "cart must be used within a CartProvider");
    }

    #[tokio::test]
    async fn test_subscriber_sees_mutations() {
        let provider = CartProvider::new(MemoryStore::new(), CartOptions::default()).unwrap();
        let cart = provider.cart();
        let mut rx = cart.subscribe().unwrap();

        cart.add_to_cart(shoe()).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().items.len(), 1);
    }

    #[tokio::test]
    async fn test_mount_loads_in_background() {
        let stored = serde_json::json!([
            {"id": "p1", "title": "Shoe", "image_url": "u", "price": 10, "quantity": 2}
        ])
        .to_string();
        let adapter = MemoryStore::with_entries([(crate::DEFAULT_STORAGE_KEY, stored)]);

        let provider = CartProvider::mount(adapter, CartOptions::default()).unwrap();
        let cart = provider.cart();
        cart.wait_ready().await.unwrap();

        assert_eq!(provider.store().phase(), CartPhase::Ready);
        assert_eq!(cart.products().unwrap()[0].quantity, 2);
    }
}
