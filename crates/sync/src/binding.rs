//! Generic store binding shared by the cart and wishlist controllers.
//!
//! A binding owns the observable in-memory collection for one entity
//! kind and decides, from the current [`Identity`], which backing store
//! is authoritative. Identity transitions follow an explicit table:
//!
//! | transition            | action                                        |
//! |-----------------------|-----------------------------------------------|
//! | initial → anonymous   | load guest collection, no remote I/O          |
//! | anonymous → account   | fetch account state, merge non-empty guest    |
//! |                       | state into it, drain the guest copy, persist  |
//! | account → anonymous   | discard memory, reload guest state, no write  |
//! | account → account′    | re-run the sign-in load for the new account   |
//!
//! The guest copy is deleted *before* the merged write is awaited, so the
//! merge runs at most once per sign-in: a second sign-in finds an empty
//! guest collection and performs a plain load.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tracing::warn;

use atelier_core::{AccountId, CartLine, Identity, WishlistEntry};

use crate::collection::{EntityCollection, Record};
use crate::store::{DocumentStore, LocalStore, StoreError};

/// An entity kind the engine can bind to its stores.
pub trait SyncEntity:
    Record + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Account-document field holding this collection.
    const FIELD: &'static str;
    /// Local-store key holding the guest collection.
    const GUEST_KEY: &'static str;
}

impl SyncEntity for CartLine {
    const FIELD: &'static str = "cart";
    const GUEST_KEY: &'static str = "guest_cart";
}

impl SyncEntity for WishlistEntry {
    const FIELD: &'static str = "wishlist";
    const GUEST_KEY: &'static str = "guest_wishlist";
}

/// Observable collection state bound to the stores for one entity kind.
pub(crate) struct Binding<T, D, L> {
    docs: D,
    local: L,
    identity: watch::Sender<Identity>,
    state: watch::Sender<EntityCollection<T>>,
}

impl<T, D, L> Binding<T, D, L>
where
    T: SyncEntity,
    D: DocumentStore,
    L: LocalStore,
{
    pub(crate) fn new(docs: D, local: L) -> Self {
        let (identity, _) = watch::channel(Identity::Anonymous);
        let (state, _) = watch::channel(EntityCollection::new());
        Self {
            docs,
            local,
            identity,
            state,
        }
    }

    pub(crate) fn identity(&self) -> Identity {
        self.identity.borrow().clone()
    }

    pub(crate) fn collection(&self) -> EntityCollection<T> {
        self.state.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<EntityCollection<T>> {
        self.state.subscribe()
    }

    /// Run `f` against the collection synchronously and atomically with
    /// respect to observers, notifying them afterwards.
    pub(crate) fn mutate<R>(&self, f: impl FnOnce(&mut EntityCollection<T>) -> R) -> R {
        let mut result = None;
        self.state
            .send_modify(|collection| result = Some(f(collection)));
        result.expect("send_modify invokes the closure")
    }

    /// The guest collection currently on the device; unreadable or
    /// corrupt guest data degrades to an empty collection.
    pub(crate) fn read_guest(&self) -> EntityCollection<T> {
        match self.local.read(T::GUEST_KEY) {
            Ok(Some(value)) => EntityCollection::from_value(value).unwrap_or_else(|e| {
                warn!(key = T::GUEST_KEY, error = %e, "discarding unreadable guest collection");
                EntityCollection::new()
            }),
            Ok(None) => EntityCollection::new(),
            Err(e) => {
                warn!(key = T::GUEST_KEY, error = %e, "failed to read guest collection");
                EntityCollection::new()
            }
        }
    }

    async fn fetch_account(&self, account: &AccountId) -> Result<EntityCollection<T>, StoreError> {
        let field = self
            .docs
            .get(account)
            .await?
            .and_then(|mut doc| doc.get_mut(T::FIELD).map(Value::take));
        match field {
            Some(value) => Ok(EntityCollection::from_value(value)?),
            None => Ok(EntityCollection::new()),
        }
    }

    /// Apply one identity transition per the table in the module docs.
    ///
    /// On a failed account fetch the binding is left untouched: previous
    /// in-memory state stays visible and the guest copy is not drained.
    pub(crate) async fn apply_identity(&self, next: Identity) -> Result<(), StoreError> {
        match next {
            Identity::Anonymous => {
                let guest = self.read_guest();
                self.identity.send_replace(Identity::Anonymous);
                self.state.send_replace(guest);
                Ok(())
            }
            Identity::Account(account) => {
                let stored = self.fetch_account(&account).await?;
                let guest = self.read_guest();
                self.identity.send_replace(Identity::Account(account.clone()));

                if guest.is_empty() {
                    self.state.send_replace(stored);
                    return Ok(());
                }

                let merged = EntityCollection::merged(stored, guest);
                self.state.send_replace(merged.clone());

                // Drain the guest copy before the remote write is in
                // flight: a repeated sign-in must find nothing to merge.
                if let Err(e) = self.local.delete(T::GUEST_KEY) {
                    warn!(key = T::GUEST_KEY, error = %e, "failed to drain guest collection after merge");
                }

                match merged.to_value() {
                    Ok(value) => {
                        if let Err(e) = self.docs.set_field(&account, T::FIELD, value).await {
                            warn!(field = T::FIELD, error = %e, "failed to persist merged collection");
                        }
                    }
                    Err(e) => {
                        warn!(field = T::FIELD, error = %e, "merged collection is not serializable");
                    }
                }
                Ok(())
            }
        }
    }

    /// Persist a snapshot of the current collection to whichever store
    /// the current identity makes authoritative.
    ///
    /// A full-collection overwrite: concurrent persists resolve
    /// last-writer-wins (see [`crate::store`]).
    pub(crate) async fn persist(&self) -> Result<(), StoreError> {
        let identity = self.identity();
        let snapshot = self.collection();
        let value = snapshot.to_value()?;
        match identity {
            Identity::Anonymous => self.local.write(T::GUEST_KEY, &value),
            Identity::Account(account) => self.docs.set_field(&account, T::FIELD, value).await,
        }
    }

    /// Drive transitions from an identity channel: apply the identity in
    /// effect now, then one transition per observed change, until the
    /// sender goes away.
    pub(crate) async fn run(&self, mut transitions: watch::Receiver<Identity>) {
        loop {
            let next = transitions.borrow_and_update().clone();
            if let Err(e) = self.apply_identity(next).await {
                warn!(error = %e, "identity transition failed; keeping previous state");
            }
            if transitions.changed().await.is_err() {
                break;
            }
        }
    }
}
