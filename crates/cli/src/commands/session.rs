//! Session commands.

use atelier_core::AccountId;

use crate::config::CliConfig;
use crate::context::AppContext;

type Error = Box<dyn std::error::Error>;

/// Sign in, merging any guest cart into the account.
#[allow(clippy::print_stdout)]
pub async fn sign_in(config: CliConfig, account: String) -> Result<(), Error> {
    let mut ctx = AppContext::load(config).await?;
    ctx.sign_in(AccountId::new(account)).await?;

    println!("Signed in as {}", ctx.identity);
    println!(
        "Cart: {} item(s), total {}",
        ctx.cart.count(),
        ctx.cart.total()
    );
    Ok(())
}

/// Sign out back to guest state.
#[allow(clippy::print_stdout)]
pub async fn sign_out(config: CliConfig) -> Result<(), Error> {
    let mut ctx = AppContext::load(config).await?;
    ctx.sign_out().await?;

    println!("Signed out");
    Ok(())
}

/// Show the current identity and collection sizes.
#[allow(clippy::print_stdout)]
pub async fn status(config: CliConfig) -> Result<(), Error> {
    let ctx = AppContext::load(config).await?;

    println!("Identity: {}", ctx.identity);
    println!(
        "Cart: {} item(s), total {}",
        ctx.cart.count(),
        ctx.cart.total()
    );
    println!("Wishlist: {} product(s)", ctx.wishlist.product_ids().len());
    Ok(())
}
