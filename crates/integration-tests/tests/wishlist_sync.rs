//! Integration tests for the wishlist controller.
//!
//! Covers the account-only policy, toggle set semantics, and the
//! optimistic-update rollback on failed writes.

use serde_json::json;

use atelier_core::{AccountId, Identity, ProductId};
use atelier_sync::{
    MemoryDocumentStore, MemoryLocalStore, SyncError, WishlistSync,
};

use atelier_integration_tests::{FlakyDocumentStore, product};

fn account(id: &str) -> Identity {
    Identity::Account(AccountId::new(id))
}

// =============================================================================
// Account-Only Policy
// =============================================================================

#[tokio::test]
async fn test_anonymous_toggle_fails_fast_and_mutates_nothing() {
    let docs = MemoryDocumentStore::new();
    let local = MemoryLocalStore::new();
    let wishlist = WishlistSync::new(docs.clone(), local.clone());
    wishlist
        .apply_identity(Identity::Anonymous)
        .await
        .expect("load");

    let result = wishlist.toggle(&product("p1", "Cargo Shorts", "19.99")).await;

    match result {
        Err(SyncError::Authorization(message)) => {
            assert_eq!(message, "Sign in to use your wishlist");
        }
        other => panic!("expected authorization failure, got {other:?}"),
    }
    assert!(wishlist.product_ids().is_empty());
    // Nothing was persisted anywhere.
    assert!(local.is_empty());
}

#[tokio::test]
async fn test_anonymous_add_and_remove_fail_fast() {
    let wishlist = WishlistSync::new(MemoryDocumentStore::new(), MemoryLocalStore::new());
    wishlist
        .apply_identity(Identity::Anonymous)
        .await
        .expect("load");

    assert!(wishlist.add(&product("p1", "Cargo Shorts", "19.99")).await.is_err());
    assert!(wishlist.remove(&ProductId::new("p1")).await.is_err());
    assert!(wishlist.clear().await.is_err());
}

// =============================================================================
// Toggle Semantics
// =============================================================================

#[tokio::test]
async fn test_double_toggle_restores_membership() {
    let docs = MemoryDocumentStore::new();
    let wishlist = WishlistSync::new(docs.clone(), MemoryLocalStore::new());
    wishlist.apply_identity(account("uid-1")).await.expect("sign in");

    let shorts = product("p1", "Cargo Shorts", "19.99");

    let first = wishlist.toggle(&shorts).await.expect("toggle on");
    assert!(first.added);
    assert_eq!(first.message, "Cargo Shorts added to wishlist");
    assert!(wishlist.contains(&ProductId::new("p1")));
    assert_eq!(
        docs.field(&AccountId::new("uid-1"), "wishlist"),
        Some(json!(["p1"]))
    );

    let second = wishlist.toggle(&shorts).await.expect("toggle off");
    assert!(!second.added);
    assert_eq!(second.message, "Cargo Shorts removed from wishlist");
    assert!(wishlist.product_ids().is_empty());
    assert_eq!(
        docs.field(&AccountId::new("uid-1"), "wishlist"),
        Some(json!([]))
    );
}

#[tokio::test]
async fn test_sign_in_loads_stored_wishlist() {
    let docs = MemoryDocumentStore::new();
    docs.seed(
        AccountId::new("uid-1"),
        json!({"wishlist": ["p1", "p2"]}),
    );

    let wishlist = WishlistSync::new(docs, MemoryLocalStore::new());
    wishlist.apply_identity(account("uid-1")).await.expect("sign in");

    assert_eq!(
        wishlist.product_ids(),
        vec![ProductId::new("p1"), ProductId::new("p2")]
    );
}

#[tokio::test]
async fn test_add_is_a_no_op_when_already_present() {
    let docs = MemoryDocumentStore::new();
    docs.seed(AccountId::new("uid-1"), json!({"wishlist": ["p1"]}));
    let flaky = FlakyDocumentStore::new(docs);

    let wishlist = WishlistSync::new(flaky.clone(), MemoryLocalStore::new());
    wishlist.apply_identity(account("uid-1")).await.expect("sign in");

    // Any write would fail; the duplicate add must not issue one.
    flaky.fail_writes(true);
    let receipt = wishlist
        .add(&product("p1", "Cargo Shorts", "19.99"))
        .await
        .expect("duplicate add is quiet");
    assert_eq!(receipt.message, "Cargo Shorts is already in your wishlist");
    assert_eq!(wishlist.product_ids().len(), 1);
}

#[tokio::test]
async fn test_sign_out_clears_the_wishlist_view() {
    let docs = MemoryDocumentStore::new();
    docs.seed(AccountId::new("uid-1"), json!({"wishlist": ["p1"]}));

    let wishlist = WishlistSync::new(docs, MemoryLocalStore::new());
    wishlist.apply_identity(account("uid-1")).await.expect("sign in");
    assert_eq!(wishlist.product_ids().len(), 1);

    wishlist
        .apply_identity(Identity::Anonymous)
        .await
        .expect("sign out");
    assert!(wishlist.product_ids().is_empty());
}

// =============================================================================
// Rollback on Failed Writes
// =============================================================================

#[tokio::test]
async fn test_failed_toggle_on_rolls_the_insert_back() {
    let flaky = FlakyDocumentStore::new(MemoryDocumentStore::new());
    let wishlist = WishlistSync::new(flaky.clone(), MemoryLocalStore::new());
    wishlist.apply_identity(account("uid-1")).await.expect("sign in");

    flaky.fail_writes(true);
    let result = wishlist.toggle(&product("p1", "Cargo Shorts", "19.99")).await;

    assert!(matches!(result, Err(SyncError::Persistence(_))));
    // Post-call membership equals pre-call membership.
    assert!(wishlist.product_ids().is_empty());
}

#[tokio::test]
async fn test_failed_toggle_off_reinserts_the_entry() {
    let docs = MemoryDocumentStore::new();
    docs.seed(AccountId::new("uid-1"), json!({"wishlist": ["p1"]}));
    let flaky = FlakyDocumentStore::new(docs);

    let wishlist = WishlistSync::new(flaky.clone(), MemoryLocalStore::new());
    wishlist.apply_identity(account("uid-1")).await.expect("sign in");

    flaky.fail_writes(true);
    let result = wishlist.toggle(&product("p1", "Cargo Shorts", "19.99")).await;

    assert!(matches!(result, Err(SyncError::Persistence(_))));
    assert!(wishlist.contains(&ProductId::new("p1")));
    // The stored wishlist never saw the optimistic removal.
    assert_eq!(
        flaky.inner().field(&AccountId::new("uid-1"), "wishlist"),
        Some(json!(["p1"]))
    );
}

#[tokio::test]
async fn test_recovered_store_accepts_the_retry() {
    let flaky = FlakyDocumentStore::new(MemoryDocumentStore::new());
    let wishlist = WishlistSync::new(flaky.clone(), MemoryLocalStore::new());
    wishlist.apply_identity(account("uid-1")).await.expect("sign in");

    let shorts = product("p1", "Cargo Shorts", "19.99");

    flaky.fail_writes(true);
    assert!(wishlist.toggle(&shorts).await.is_err());

    flaky.fail_writes(false);
    let toggle = wishlist.toggle(&shorts).await.expect("retry lands");
    assert!(toggle.added);
    assert_eq!(
        flaky.inner().field(&AccountId::new("uid-1"), "wishlist"),
        Some(json!(["p1"]))
    );
}
