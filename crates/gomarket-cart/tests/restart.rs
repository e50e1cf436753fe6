//! Cart state surviving a process restart on a file-backed store.

use gomarket_cart::prelude::*;
use gomarket_cart::DEFAULT_STORAGE_KEY;
use gomarket_storage::{FileStore, KeyValueStore};

async fn open(dir: &std::path::Path) -> CartProvider {
    let store = FileStore::open(dir).await.unwrap();
    CartProvider::new(store, CartOptions::default()).unwrap()
}

#[tokio::test]
async fn test_quantity_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let provider = open(dir.path()).await;
        assert_eq!(provider.load().await, LoadOutcome::Missing);

        let cart = provider.cart();
        cart.add_to_cart(NewCartItem::new("p1", "Shoe", "u", 10.0)).unwrap();
        cart.increment("p1").unwrap();
        cart.flush().await.unwrap();
    }

    let provider = open(dir.path()).await;
    assert_eq!(provider.load().await, LoadOutcome::Restored { items: 1 });

    let products = provider.cart().products().unwrap();
    assert_eq!(
        products.to_vec(),
        vec![CartItem {
            id: "p1".into(),
            title: "Shoe".into(),
            image_url: "u".into(),
            price: 10.0,
            quantity: 2,
        }]
    );
}

#[tokio::test]
async fn test_reload_preserves_order_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let before = {
        let provider = open(dir.path()).await;
        provider.load().await;
        let cart = provider.cart();
        cart.add_to_cart(NewCartItem::new("z", "Zed", "z.png", 1.5)).unwrap();
        cart.add_to_cart(NewCartItem::new("a", "Ay", "a.png", 20.0)).unwrap();
        cart.add_to_cart(NewCartItem::new("m", "Em", "m.png", 0.0)).unwrap();
        cart.decrement("m").unwrap();
        cart.decrement("m").unwrap();
        cart.flush().await.unwrap();
        cart.products().unwrap()
    };

    let provider = open(dir.path()).await;
    provider.load().await;
    assert_eq!(provider.cart().products().unwrap(), before);
    assert_eq!(provider.store().get_item("m").map(|i| i.quantity), Some(-1));
}

#[tokio::test]
async fn test_stored_format_is_plain_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let provider = open(dir.path()).await;
    provider.load().await;
    let cart = provider.cart();
    cart.add_to_cart(NewCartItem::new("p1", "Shoe", "u", 10.0)).unwrap();
    cart.flush().await.unwrap();

    let raw = FileStore::open(dir.path())
        .await
        .unwrap()
        .get(DEFAULT_STORAGE_KEY)
        .await
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            {"id": "p1", "title": "Shoe", "image_url": "u", "price": 10.0, "quantity": 1}
        ])
    );
}

#[tokio::test]
async fn test_rejected_price_leaves_stored_cart_loadable() {
    let dir = tempfile::tempdir().unwrap();

    {
        let provider = open(dir.path()).await;
        provider.load().await;
        let cart = provider.cart();
        cart.add_to_cart(NewCartItem::new("p1", "Shoe", "u", 10.0)).unwrap();

        let err = cart
            .add_to_cart(NewCartItem::new("p2", "Hat", "h", f64::NAN))
            .unwrap_err();
        assert!(matches!(err, CartError::InvalidPrice { .. }));

        cart.flush().await.unwrap();
    }

    let provider = open(dir.path()).await;
    assert_eq!(provider.load().await, LoadOutcome::Restored { items: 1 });
    let ids: Vec<_> = provider
        .cart()
        .products()
        .unwrap()
        .iter()
        .map(|i| i.id.to_string())
        .collect();
    assert_eq!(ids, ["p1"]);
}
