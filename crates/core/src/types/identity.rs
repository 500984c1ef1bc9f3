//! Session identity.

use serde::{Deserialize, Serialize};

use super::id::AccountId;

/// The identity a client is currently operating under.
///
/// Exactly one identity is in effect at any moment; every sign-in,
/// sign-out, or account switch replaces it wholesale. The sync engine
/// keys its choice of backing store on this value: `Anonymous` state
/// lives in the device-local store, `Account` state in the per-account
/// document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Identity {
    /// No signed-in account; state is device-local only.
    Anonymous,
    /// A signed-in account with a stable ID.
    Account(AccountId),
}

impl Identity {
    /// Returns the account ID when signed in.
    #[must_use]
    pub const fn account(&self) -> Option<&AccountId> {
        match self {
            Self::Anonymous => None,
            Self::Account(id) => Some(id),
        }
    }

    /// Returns `true` when no account is signed in.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::Anonymous
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::Account(id) => write!(f, "account {id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_accessor() {
        let id = AccountId::new("uid-1");
        assert_eq!(Identity::Account(id.clone()).account(), Some(&id));
        assert_eq!(Identity::Anonymous.account(), None);
        assert!(Identity::Anonymous.is_anonymous());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Identity::Account(AccountId::new("uid-1")))
            .expect("serialize");
        assert_eq!(json, serde_json::json!({"kind": "account", "id": "uid-1"}));

        let json = serde_json::to_value(Identity::Anonymous).expect("serialize");
        assert_eq!(json, serde_json::json!({"kind": "anonymous"}));
    }
}
