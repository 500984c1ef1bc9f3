//! Order commands.

use atelier_core::{Customer, Email, PaymentMethod};
use atelier_sync::OrderService;

use crate::config::CliConfig;
use crate::context::AppContext;

type Error = Box<dyn std::error::Error>;

/// Submit the current cart as an order.
#[allow(clippy::print_stdout)]
pub async fn place(
    config: CliConfig,
    payment: PaymentMethod,
    name: Option<String>,
    email: Option<Email>,
) -> Result<(), Error> {
    let ctx = AppContext::load(config).await?;
    let service = OrderService::new(ctx.cart.clone(), ctx.orders.clone());

    let id = service.place(Customer { name, email }, payment).await?;
    println!("Order placed: {id}");
    Ok(())
}

/// List placed orders.
#[allow(clippy::print_stdout)]
pub async fn list(config: CliConfig) -> Result<(), Error> {
    let ctx = AppContext::load(config).await?;
    let orders = ctx.orders.all().await?;

    if orders.is_empty() {
        println!("No orders yet");
        return Ok(());
    }

    for record in orders {
        println!(
            "{}  {}  {}  {} item(s)  total {}  [{}]",
            record.id,
            record.draft.created_at.format("%Y-%m-%d %H:%M"),
            record.draft.customer_name,
            record.draft.items.len(),
            record.draft.total,
            record.draft.status,
        );
    }
    Ok(())
}
