//! Cart commands.

use rust_decimal::Decimal;

use atelier_core::{Product, ProductId};

use crate::config::CliConfig;
use crate::context::AppContext;

type Error = Box<dyn std::error::Error>;

/// Add a product to the cart (guest or account).
#[allow(clippy::print_stdout)]
pub async fn add(
    config: CliConfig,
    product: String,
    name: String,
    price: Decimal,
    size: String,
    quantity: u32,
    image: Option<String>,
) -> Result<(), Error> {
    let ctx = AppContext::load(config).await?;
    let product = Product {
        id: ProductId::new(product),
        name,
        price,
        images: image.into_iter().collect(),
    };

    let receipt = ctx.cart.add(&product, &size, quantity).await?;
    println!("{}", receipt.message);
    Ok(())
}

/// Print the cart lines and the running total.
#[allow(clippy::print_stdout)]
pub async fn list(config: CliConfig) -> Result<(), Error> {
    let ctx = AppContext::load(config).await?;
    let lines = ctx.cart.lines();

    if lines.is_empty() {
        println!("Cart is empty ({})", ctx.identity);
        return Ok(());
    }

    println!("Cart ({}):", ctx.identity);
    for line in &lines {
        let size = if line.size.is_empty() {
            String::new()
        } else {
            format!(" [{}]", line.size)
        };
        println!(
            "  {} x{}{} @ {} = {}",
            line.name,
            line.quantity,
            size,
            line.price,
            line.subtotal()
        );
    }
    println!("Total: {}", ctx.cart.total());
    Ok(())
}

/// Change a line quantity by a signed delta.
#[allow(clippy::print_stdout)]
pub async fn change_quantity(
    config: CliConfig,
    product: String,
    size: String,
    delta: i64,
) -> Result<(), Error> {
    let ctx = AppContext::load(config).await?;
    ctx.cart
        .change_quantity(&ProductId::new(product), &size, delta)
        .await?;

    println!("Cart: {} item(s)", ctx.cart.count());
    Ok(())
}

/// Remove a line.
#[allow(clippy::print_stdout)]
pub async fn remove(config: CliConfig, product: String, size: String) -> Result<(), Error> {
    let ctx = AppContext::load(config).await?;
    ctx.cart.remove(&ProductId::new(product), &size).await?;

    println!("Cart: {} item(s)", ctx.cart.count());
    Ok(())
}

/// Empty the cart.
#[allow(clippy::print_stdout)]
pub async fn clear(config: CliConfig) -> Result<(), Error> {
    let ctx = AppContext::load(config).await?;
    ctx.cart.clear().await?;

    println!("Cart cleared");
    Ok(())
}
