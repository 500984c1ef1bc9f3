//! Atelier CLI - drive the sync engine from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add to the guest cart, then sign in (the guest cart merges in)
//! atelier cart add -p shorts-01 -n "Cargo Shorts" --price 19.99 -s M
//! atelier session sign-in uid-1
//! atelier cart list
//!
//! # Wishlist is account-only
//! atelier wishlist toggle -p shorts-01 -n "Cargo Shorts" --price 19.99
//!
//! # Place an order from the current cart
//! atelier order place --payment card --name "Sam B" --email sam@example.com
//!
//! # Generation service (needs GENAI_API_KEY)
//! atelier ask "Write a punchy description for blue cargo shorts"
//! atelier try-on --photo-file me.jpg --product-image https://img.example/p.jpg \
//!     -n "Cargo Shorts" -c shorts -o result.png
//! ```
//!
//! # Commands
//!
//! - `session` - sign in, sign out, show the current identity
//! - `cart` - add/list/qty/remove/clear against the active store
//! - `wishlist` - toggle/remove/list (requires a session)
//! - `order` - place an order, list placed orders
//! - `ask` / `try-on` - generation service calls

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use atelier_core::{Email, PaymentMethod};

mod commands;
mod config;
mod context;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(author, version, about = "Atelier commerce engine demo")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the demo session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Cart operations
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Wishlist operations (account-only)
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Order operations
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Generate text with the generation service
    Ask {
        /// The prompt to send
        prompt: String,

        /// Optional system/context instruction
        #[arg(short, long)]
        system: Option<String>,

        /// Max response tokens
        #[arg(long, default_value_t = 500)]
        max_tokens: u32,
    },
    /// Run a virtual try-on
    TryOn {
        /// Person photo file (mutually exclusive with --photo-url)
        #[arg(long, conflicts_with = "photo_url")]
        photo_file: Option<std::path::PathBuf>,

        /// Person photo URL
        #[arg(long)]
        photo_url: Option<url::Url>,

        /// Product photo URL
        #[arg(long)]
        product_image: url::Url,

        /// Product name
        #[arg(short, long)]
        name: String,

        /// Product category (e.g. shorts, dress)
        #[arg(short, long)]
        category: String,

        /// Where to write the generated image
        #[arg(short, long, default_value = "tryon-result.png")]
        output: std::path::PathBuf,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Sign in as an account (merges any guest cart)
    SignIn {
        /// Account ID
        account: String,
    },
    /// Sign out back to guest state
    SignOut,
    /// Show the current identity
    Status,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart
    Add {
        /// Product ID
        #[arg(short, long)]
        product: String,

        /// Product name
        #[arg(short, long)]
        name: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,

        /// Size (e.g. S, M, L)
        #[arg(short, long, default_value = "")]
        size: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Thumbnail image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// List cart lines with the running total
    List,
    /// Change a line's quantity by a signed delta
    Qty {
        /// Product ID
        #[arg(short, long)]
        product: String,

        /// Size
        #[arg(short, long, default_value = "")]
        size: String,

        /// Signed change, e.g. 1 or -2
        #[arg(short, long, allow_hyphen_values = true)]
        delta: i64,
    },
    /// Remove a line
    Remove {
        /// Product ID
        #[arg(short, long)]
        product: String,

        /// Size
        #[arg(short, long, default_value = "")]
        size: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Add or remove a product, whichever applies
    Toggle {
        /// Product ID
        #[arg(short, long)]
        product: String,

        /// Product name
        #[arg(short, long)]
        name: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,
    },
    /// Remove a product
    Remove {
        /// Product ID
        #[arg(short, long)]
        product: String,
    },
    /// List wishlisted product IDs
    List,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Submit the current cart as an order
    Place {
        /// Payment method: cash, card, paypal, eft
        #[arg(long, default_value = "cash")]
        payment: PaymentMethod,

        /// Customer display name
        #[arg(long)]
        name: Option<String>,

        /// Customer email
        #[arg(long)]
        email: Option<Email>,
    },
    /// List placed orders
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::from_env();

    match cli.command {
        Commands::Session { action } => match action {
            SessionAction::SignIn { account } => commands::session::sign_in(config, account).await?,
            SessionAction::SignOut => commands::session::sign_out(config).await?,
            SessionAction::Status => commands::session::status(config).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Add {
                product,
                name,
                price,
                size,
                quantity,
                image,
            } => commands::cart::add(config, product, name, price, size, quantity, image).await?,
            CartAction::List => commands::cart::list(config).await?,
            CartAction::Qty {
                product,
                size,
                delta,
            } => commands::cart::change_quantity(config, product, size, delta).await?,
            CartAction::Remove { product, size } => {
                commands::cart::remove(config, product, size).await?;
            }
            CartAction::Clear => commands::cart::clear(config).await?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Toggle {
                product,
                name,
                price,
            } => commands::wishlist::toggle(config, product, name, price).await?,
            WishlistAction::Remove { product } => {
                commands::wishlist::remove(config, product).await?;
            }
            WishlistAction::List => commands::wishlist::list(config).await?,
        },
        Commands::Order { action } => match action {
            OrderAction::Place {
                payment,
                name,
                email,
            } => commands::order::place(config, payment, name, email).await?,
            OrderAction::List => commands::order::list(config).await?,
        },
        Commands::Ask {
            prompt,
            system,
            max_tokens,
        } => commands::ai::ask(&config, &prompt, system, max_tokens).await?,
        Commands::TryOn {
            photo_file,
            photo_url,
            product_image,
            name,
            category,
            output,
        } => {
            commands::ai::try_on(
                &config,
                photo_file,
                photo_url,
                product_image,
                name,
                category,
                output,
            )
            .await?;
        }
    }
    Ok(())
}
