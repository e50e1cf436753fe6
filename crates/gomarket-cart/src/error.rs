//! Cart error types.

use gomarket_storage::StorageError;
use thiserror::Error;

/// Name of the scope a [`Cart`](crate::Cart) handle must live in.
pub const PROVIDER_SCOPE: &str = "CartProvider";

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// Cart handle used outside the lifetime of its provider.
    #[error("cart must be used within a {scope}")]
    OutsideProvider { scope: &'static str },

    /// Storage backend error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Price that cannot be stored as a JSON number.
    #[error("Invalid price for {id}: {price} (must be a finite number)")]
    InvalidPrice { id: String, price: f64 },

    /// The most recent write to storage failed.
    #[error("Failed to persist cart: {reason}")]
    Persist { reason: String },

    /// The persist writer is gone; writes can no longer be observed.
    #[error("Persist writer closed")]
    WriterClosed,

    /// No Tokio runtime to host the persist writer.
    #[error("Cart requires a Tokio runtime: {0}")]
    NoRuntime(String),
}

impl CartError {
    /// The scope-access error.
    pub const fn outside_provider() -> Self {
        Self::OutsideProvider {
            scope: PROVIDER_SCOPE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outside_provider_names_scope() {
        let msg = CartError::outside_provider().to_string();
        assert_eq!(msg, "cart must be used within a CartProvider");
    }

    #[test]
    fn test_invalid_price_message() {
        let err = CartError::InvalidPrice {
            id: "p1".into(),
            price: f64::NAN,
        };
        assert_eq!(
            err.to_string(),
            "Invalid price for p1: NaN (must be a finite number)"
        );
    }
}
