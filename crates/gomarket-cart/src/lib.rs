//! Shopping cart state for the GoMarketplace app.
//!
//! The cart lives in memory and is mirrored into a device-local key-value
//! store after every change:
//!
//! - **Cart**: ordered product lines, unique by id, with a signed quantity
//! - **Store**: committed state, change notifications, load and persistence
//! - **Provider**: owns the store and hands out [`Cart`] handles
//!
//! # Example
//!
//! ```rust,ignore
//! use gomarket_cart::prelude::*;
//! use gomarket_storage::FileStore;
//!
//! let provider = CartProvider::new(FileStore::open("./data").await?, CartOptions::default())?;
//! provider.load().await;
//!
//! let cart = provider.cart();
//! cart.add_to_cart(NewCartItem::new("p1", "Shoe", "https://img/shoe.png", 10.0))?;
//! cart.increment("p1")?;
//!
//! for item in cart.products()?.iter() {
//!     println!("{} x{}", item.title, item.quantity);
//! }
//!
//! cart.flush().await?;
//! ```

pub mod cart;
pub mod error;
pub mod ids;
mod persist;
mod provider;
mod store;

pub use cart::{CartItem, NewCartItem};
pub use error::{CartError, PROVIDER_SCOPE};
pub use ids::ProductId;
pub use persist::PersistStatus;
pub use provider::{use_cart, Cart, CartProvider};
pub use store::{
    CartOptions, CartPhase, CartSnapshot, CartStore, LoadOutcome, DEFAULT_STORAGE_KEY,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{CartItem, NewCartItem};
    pub use crate::error::CartError;
    pub use crate::ids::ProductId;
    pub use crate::persist::PersistStatus;
    pub use crate::provider::{use_cart, Cart, CartProvider};
    pub use crate::store::{CartOptions, CartPhase, CartSnapshot, CartStore, LoadOutcome};
}
