//! Pure list transforms.
//!
//! Each transform takes the committed list and returns the next one; the
//! input is never modified. An unknown id yields a list equal in value to the
//! input.

use crate::cart::{CartItem, NewCartItem};

/// Append `candidate` with quantity 1, or bump the existing line.
///
/// A repeat add never touches the existing line's display fields or price.
pub fn add_to_cart(items: &[CartItem], candidate: NewCartItem) -> Vec<CartItem> {
    if items.iter().any(|i| i.id == candidate.id) {
        return increment(items, candidate.id.as_str());
    }

    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(CartItem::from_candidate(candidate, 1));
    next
}

/// Raise the quantity of `id` by one.
pub fn increment(items: &[CartItem], id: &str) -> Vec<CartItem> {
    adjust(items, id, |q| q.saturating_add(1))
}

/// Lower the quantity of `id` by one. No floor and no removal.
pub fn decrement(items: &[CartItem], id: &str) -> Vec<CartItem> {
    adjust(items, id, |q| q.saturating_sub(1))
}

fn adjust(items: &[CartItem], id: &str, step: impl Fn(i64) -> i64) -> Vec<CartItem> {
    items
        .iter()
        .map(|item| {
            if item.id == id {
                CartItem {
                    quantity: step(item.quantity),
                    ..item.clone()
                }
            } else {
                item.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shoe() -> NewCartItem {
        NewCartItem::new("p1", "Shoe", "u", 10.0)
    }

    fn line(id: &str, quantity: i64) -> CartItem {
        CartItem::from_candidate(NewCartItem::new(id, "Shoe", "u", 10.0), quantity)
    }

    #[test]
    fn test_add_to_empty_cart() {
        let items = add_to_cart(&[], shoe());
        assert_eq!(
            items,
            vec![CartItem {
                id: "p1".into(),
                title: "Shoe".into(),
                image_url: "u".into(),
                price: 10.0,
                quantity: 1,
            }]
        );
    }

    #[test]
    fn test_repeat_add_keeps_original_fields() {
        let items = add_to_cart(&[], shoe());
        let items = add_to_cart(&items, NewCartItem::new("p1", "Other", "x", 99.0));

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Shoe");
        assert_eq!(items[0].image_url, "u");
        assert_eq!(items[0].price, 10.0);
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_repeat_add_matches_increment() {
        let items = vec![line("p1", 3), line("p2", 1)];
        assert_eq!(
            add_to_cart(&items, NewCartItem::new("p2", "Other", "x", 99.0)),
            increment(&items, "p2")
        );
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let items = add_to_cart(&[], NewCartItem::new("b", "B", "", 1.0));
        let items = add_to_cart(&items, NewCartItem::new("a", "A", "", 1.0));
        let items = add_to_cart(&items, NewCartItem::new("c", "C", "", 1.0));
        let items = add_to_cart(&items, NewCartItem::new("a", "A", "", 1.0));

        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_increment_then_decrement_restores() {
        let items = vec![line("p1", 2), line("p2", 5)];
        let round = decrement(&increment(&items, "p2"), "p2");
        assert_eq!(round, items);
    }

    #[test]
    fn test_unknown_id_is_unchanged() {
        let items = vec![line("p1", 1)];
        assert_eq!(increment(&items, "missing"), items);
        assert_eq!(decrement(&items, "missing"), items);
    }

    #[test]
    fn test_decrement_goes_negative() {
        let items = vec![line("p1", 0)];
        let items = decrement(&items, "p1");
        assert_eq!(items, vec![line("p1", -1)]);
    }

    #[test]
    fn test_quantity_saturates() {
        let items = vec![line("p1", i64::MAX), line("p2", i64::MIN)];
        assert_eq!(increment(&items, "p1")[0].quantity, i64::MAX);
        assert_eq!(decrement(&items, "p2")[1].quantity, i64::MIN);
    }
}
