//! Cart line types.

use crate::error::CartError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// One product line in the cart.
///
/// Field names match the stored JSON one for one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product identifier, unique within the cart.
    pub id: ProductId,
    /// Product title (display only).
    pub title: String,
    /// Product image URL (display only).
    pub image_url: String,
    /// Unit price. No currency semantics.
    pub price: f64,
    /// Quantity. Not clamped; may be zero or negative.
    pub quantity: i64,
}

impl CartItem {
    /// Build a line from a candidate with the given quantity.
    pub fn from_candidate(candidate: NewCartItem, quantity: i64) -> Self {
        Self {
            id: candidate.id,
            title: candidate.title,
            image_url: candidate.image_url,
            price: candidate.price,
            quantity,
        }
    }
}

/// A product offered to the cart: a [`CartItem`] without a quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewCartItem {
    /// Product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Product image URL.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
}

impl NewCartItem {
    /// Create a candidate line.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Reject prices JSON cannot represent.
    ///
    /// `NaN` and the infinities serialize as `null`, which would make the
    /// whole stored cart unreadable on the next load.
    pub fn validate(&self) -> Result<(), CartError> {
        if self.price.is_finite() {
            Ok(())
        } else {
            Err(CartError::InvalidPrice {
                id: self.id.to_string(),
                price: self.price,
            })
        }
    }
}
