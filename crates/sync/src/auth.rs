//! Identity source.
//!
//! The engine never talks to a concrete identity provider; it observes an
//! [`AuthProvider`], which yields the current [`Identity`] and a channel
//! of transitions. [`AuthBroker`] is the in-repo implementation: the
//! application glue calls `sign_in`/`sign_out` when its provider reports
//! a change, and every controller subscribed to the broker sees the
//! transition exactly once.

use std::sync::Arc;

use tokio::sync::watch;

use atelier_core::{AccountId, Identity};

/// Source of the current identity and its transitions.
pub trait AuthProvider: Send + Sync {
    /// The identity in effect right now.
    fn identity(&self) -> Identity;

    /// Subscribe to transitions. Each sign-in, sign-out, or account
    /// switch is delivered once, carrying the new identity.
    fn subscribe(&self) -> watch::Receiver<Identity>;
}

/// Watch-channel identity broker.
///
/// Each transition replaces the current identity wholesale and wakes all
/// subscribers, mirroring how a session binding is replaced rather than
/// mutated on every auth change.
#[derive(Debug, Clone)]
pub struct AuthBroker {
    tx: Arc<watch::Sender<Identity>>,
}

impl AuthBroker {
    /// Create a broker with the given starting identity.
    #[must_use]
    pub fn new(initial: Identity) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Transition to a signed-in account.
    pub fn sign_in(&self, account: AccountId) {
        self.tx.send_replace(Identity::Account(account));
    }

    /// Transition to anonymous.
    pub fn sign_out(&self) {
        self.tx.send_replace(Identity::Anonymous);
    }
}

impl Default for AuthBroker {
    fn default() -> Self {
        Self::new(Identity::Anonymous)
    }
}

impl AuthProvider for AuthBroker {
    fn identity(&self) -> Identity {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Identity> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_each_transition_once() {
        let broker = AuthBroker::default();
        let mut rx = broker.subscribe();

        broker.sign_in(AccountId::new("uid-1"));
        rx.changed().await.expect("broker alive");
        assert_eq!(
            *rx.borrow_and_update(),
            Identity::Account(AccountId::new("uid-1"))
        );

        broker.sign_out();
        rx.changed().await.expect("broker alive");
        assert_eq!(*rx.borrow_and_update(), Identity::Anonymous);
    }

    #[test]
    fn test_identity_reflects_latest() {
        let broker = AuthBroker::default();
        assert!(broker.identity().is_anonymous());
        broker.sign_in(AccountId::new("uid-2"));
        assert_eq!(
            broker.identity().account(),
            Some(&AccountId::new("uid-2"))
        );
    }
}
