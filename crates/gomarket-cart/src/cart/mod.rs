//! Shopping cart module.
//!
//! Contains the cart line types and the pure list transforms the store
//! applies on every mutation.

mod item;
mod ops;

pub use item::{CartItem, NewCartItem};
pub use ops::{add_to_cart, decrement, increment};
