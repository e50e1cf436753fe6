//! Cart commands.

use anyhow::{bail, Context as _, Result};
use gomarket_cart::{Cart, CartProvider, NewCartItem};
use gomarket_storage::{Cache, FileStore};

use super::{AddArgs, ClearArgs, QuantityArgs};
use crate::context::Context;

/// Print the cart.
pub async fn list(ctx: &Context) -> Result<()> {
    let provider = ctx.open_cart().await?;
    let products = provider.cart().products()?;
    let snapshot = provider.store().current();
    ctx.output.debug(&format!(
        "Revision {} ({:?})",
        snapshot.revision, snapshot.phase
    ));

    ctx.output.header("Cart");
    ctx.output.cart(&products);
    if !products.is_empty() {
        let store = provider.store();
        ctx.output.kv("lines", &store.unique_item_count().to_string());
        ctx.output.kv("items", &store.item_count().to_string());
    }
    Ok(())
}

/// Add a product to the cart.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let provider = ctx.open_cart().await?;
    let cart = provider.cart();
    let existed = provider.store().get_item(&args.id).is_some();

    cart.add_to_cart(NewCartItem::new(
        args.id.as_str(),
        args.title,
        args.image_url,
        args.price,
    ))?;

    if existed {
        ctx.output.info(&format!(
            "{} is already in the cart; quantity increased",
            args.id
        ));
    } else {
        ctx.output.success(&format!("Added {}", args.id));
    }
    finish(&provider, &cart, ctx).await
}

/// Raise a product's quantity.
pub async fn increment(args: QuantityArgs, ctx: &Context) -> Result<()> {
    adjust(args, ctx, |cart, id| cart.increment(id)).await
}

/// Lower a product's quantity.
pub async fn decrement(args: QuantityArgs, ctx: &Context) -> Result<()> {
    adjust(args, ctx, |cart, id| cart.decrement(id)).await
}

async fn adjust<F>(args: QuantityArgs, ctx: &Context, step: F) -> Result<()>
where
    F: Fn(&Cart, &str) -> Result<(), gomarket_cart::CartError>,
{
    let provider = ctx.open_cart().await?;
    let cart = provider.cart();

    if provider.store().get_item(&args.id).is_none() {
        ctx.output
            .warn(&format!("{} is not in the cart; nothing changes", args.id));
    }

    for _ in 0..args.times {
        step(&cart, &args.id)?;
    }

    if let Some(item) = provider.store().get_item(&args.id) {
        if item.quantity <= 0 {
            ctx.output.warn(&format!(
                "{} now has quantity {}",
                item.id, item.quantity
            ));
        }
    }
    finish(&provider, &cart, ctx).await
}

/// Flush writes and print the resulting cart.
async fn finish(provider: &CartProvider, cart: &Cart, ctx: &Context) -> Result<()> {
    cart.flush().await.context("Cart changed in memory but was not saved")?;
    ctx.output
        .debug(&format!("Persist status: {:?}", provider.store().persist_status()));
    ctx.output.cart(&cart.products()?);
    Ok(())
}

/// Wipe the stored cart.
pub async fn clear(args: ClearArgs, ctx: &Context) -> Result<()> {
    if !args.yes {
        bail!("Refusing to clear the cart without --yes");
    }

    let dir = ctx.data_dir();
    let store = FileStore::open(&dir)
        .await
        .with_context(|| format!("Failed to open cart storage: {}", dir.display()))?;
    Cache::new(store).delete(&ctx.config.storage.key).await?;

    ctx.output.success("Cart cleared");
    Ok(())
}
