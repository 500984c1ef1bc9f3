//! Engine wiring for the CLI.
//!
//! One-shot process model: each invocation loads the persisted session
//! identity, replays it into freshly constructed controllers, runs one
//! command, and exits. Signing in applies the account transition to the
//! live controllers, so the engine's merge actually runs here.

use std::io;
use std::path::Path;

use atelier_core::{AccountId, Identity};
use atelier_sync::store::file::{FileDocumentStore, FileOrderGateway, JsonFileStore};
use atelier_sync::{CartSync, WishlistSync};

use crate::config::CliConfig;

const SESSION_FILE: &str = "session.json";

pub type Cart = CartSync<FileDocumentStore, JsonFileStore>;
pub type Wishlist = WishlistSync<FileDocumentStore, JsonFileStore>;

type Error = Box<dyn std::error::Error>;

/// Everything a command needs: config, stores, controllers, identity.
pub struct AppContext {
    pub config: CliConfig,
    pub identity: Identity,
    pub cart: Cart,
    pub wishlist: Wishlist,
    pub orders: FileOrderGateway,
}

impl AppContext {
    /// Build the engine over the file stores and replay the persisted
    /// session identity into it.
    pub async fn load(config: CliConfig) -> Result<Self, Error> {
        let local = JsonFileStore::new(config.data_dir.join("local.json"));
        let docs = FileDocumentStore::new(config.data_dir.join("documents.json"));
        let orders = FileOrderGateway::new(config.data_dir.join("orders.json"));

        let identity = read_session(&config.data_dir)?;
        let cart = CartSync::new(docs.clone(), local.clone());
        let wishlist = WishlistSync::new(docs, local);

        cart.apply_identity(identity.clone()).await?;
        wishlist.apply_identity(identity.clone()).await?;

        Ok(Self {
            config,
            identity,
            cart,
            wishlist,
            orders,
        })
    }

    /// Sign in as `account`, running the engine's sign-in transition
    /// (including the one-time guest merge) on both controllers.
    pub async fn sign_in(&mut self, account: AccountId) -> Result<(), Error> {
        let next = Identity::Account(account);
        self.cart.apply_identity(next.clone()).await?;
        self.wishlist.apply_identity(next.clone()).await?;
        write_session(&self.config.data_dir, &next)?;
        self.identity = next;
        Ok(())
    }

    /// Sign out; both controllers fall back to device-local state.
    pub async fn sign_out(&mut self) -> Result<(), Error> {
        self.cart.apply_identity(Identity::Anonymous).await?;
        self.wishlist.apply_identity(Identity::Anonymous).await?;
        write_session(&self.config.data_dir, &Identity::Anonymous)?;
        self.identity = Identity::Anonymous;
        Ok(())
    }
}

fn read_session(data_dir: &Path) -> Result<Identity, Error> {
    match std::fs::read(data_dir.join(SESSION_FILE)) {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Identity::Anonymous),
        Err(e) => Err(e.into()),
    }
}

fn write_session(data_dir: &Path, identity: &Identity) -> Result<(), Error> {
    std::fs::create_dir_all(data_dir)?;
    std::fs::write(
        data_dir.join(SESSION_FILE),
        serde_json::to_vec_pretty(identity)?,
    )?;
    Ok(())
}
