//! Wishlist commands.

use rust_decimal::Decimal;

use atelier_core::{Product, ProductId};

use crate::config::CliConfig;
use crate::context::AppContext;

type Error = Box<dyn std::error::Error>;

/// Toggle a product in or out of the wishlist.
#[allow(clippy::print_stdout)]
pub async fn toggle(
    config: CliConfig,
    product: String,
    name: String,
    price: Decimal,
) -> Result<(), Error> {
    let ctx = AppContext::load(config).await?;
    let product = Product {
        id: ProductId::new(product),
        name,
        price,
        images: Vec::new(),
    };

    let toggle = ctx.wishlist.toggle(&product).await?;
    println!("{}", toggle.message);
    Ok(())
}

/// Remove a product from the wishlist.
#[allow(clippy::print_stdout)]
pub async fn remove(config: CliConfig, product: String) -> Result<(), Error> {
    let ctx = AppContext::load(config).await?;
    ctx.wishlist.remove(&ProductId::new(product)).await?;

    println!("Wishlist: {} product(s)", ctx.wishlist.product_ids().len());
    Ok(())
}

/// Print the wishlisted product IDs.
#[allow(clippy::print_stdout)]
pub async fn list(config: CliConfig) -> Result<(), Error> {
    let ctx = AppContext::load(config).await?;
    let ids = ctx.wishlist.product_ids();

    if ids.is_empty() {
        println!("Wishlist is empty ({})", ctx.identity);
        return Ok(());
    }

    println!("Wishlist ({}):", ctx.identity);
    for id in ids {
        println!("  {id}");
    }
    Ok(())
}
