//! Integration tests for order submission.

use async_trait::async_trait;
use serde_json::json;

use atelier_core::{
    AccountId, Customer, Identity, OrderDraft, OrderId, OrderStatus, PaymentMethod,
};
use atelier_sync::{
    CartSync, MemoryDocumentStore, MemoryLocalStore, MemoryOrderGateway, OrderError, OrderGateway,
    OrderService, StoreError,
};

use atelier_integration_tests::{money, product};

fn account(id: &str) -> Identity {
    Identity::Account(AccountId::new(id))
}

async fn signed_in_cart() -> (
    CartSync<MemoryDocumentStore, MemoryLocalStore>,
    MemoryDocumentStore,
) {
    let docs = MemoryDocumentStore::new();
    let cart = CartSync::new(docs.clone(), MemoryLocalStore::new());
    cart.apply_identity(account("uid-1")).await.expect("sign in");
    (cart, docs)
}

#[tokio::test]
async fn test_successful_order_clears_the_cart() {
    let (cart, docs) = signed_in_cart().await;
    cart.add(&product("p1", "Cargo Shorts", "19.99"), "M", 2)
        .await
        .expect("add");
    cart.add(&product("p2", "Rain Jacket", "59.00"), "L", 1)
        .await
        .expect("add");

    let gateway = MemoryOrderGateway::new();
    let service = OrderService::new(cart.clone(), gateway.clone());

    let customer = Customer {
        name: Some("Sam B".to_owned()),
        email: Some("sam@example.com".parse().expect("valid email")),
    };
    let id = service
        .place(customer, PaymentMethod::Card)
        .await
        .expect("order placed");

    // The cart is empty in memory and in the account document.
    assert!(cart.lines().is_empty());
    assert_eq!(
        docs.field(&AccountId::new("uid-1"), "cart"),
        Some(json!([]))
    );

    let submitted = gateway.submitted();
    assert_eq!(submitted.len(), 1);
    let (submitted_id, draft) = &submitted[0];
    assert_eq!(submitted_id, &id);
    assert_eq!(draft.total, money("98.98"));
    assert_eq!(draft.status, OrderStatus::Pending);
    assert_eq!(draft.payment_method, PaymentMethod::Card);
    assert_eq!(draft.customer_name, "Sam B");
    assert_eq!(draft.items.len(), 2);
    assert_eq!(draft.created_at, draft.updated_at);
}

#[tokio::test]
async fn test_anonymous_orders_are_rejected() {
    let cart = CartSync::new(MemoryDocumentStore::new(), MemoryLocalStore::new());
    cart.apply_identity(Identity::Anonymous).await.expect("load");
    cart.add(&product("p1", "Cargo Shorts", "19.99"), "M", 1)
        .await
        .expect("guest add");

    let gateway = MemoryOrderGateway::new();
    let service = OrderService::new(cart.clone(), gateway.clone());

    let result = service.place(Customer::default(), PaymentMethod::Cash).await;
    assert!(matches!(result, Err(OrderError::SignedOut)));
    assert_eq!(cart.count(), 1);
    assert!(gateway.submitted().is_empty());
}

#[tokio::test]
async fn test_empty_cart_orders_are_rejected() {
    let (cart, _docs) = signed_in_cart().await;
    let service = OrderService::new(cart, MemoryOrderGateway::new());

    let result = service.place(Customer::default(), PaymentMethod::Cash).await;
    assert!(matches!(result, Err(OrderError::EmptyCart)));
}

#[tokio::test]
async fn test_failed_submission_leaves_the_cart_untouched() {
    #[derive(Clone)]
    struct RejectingGateway;

    #[async_trait]
    impl OrderGateway for RejectingGateway {
        async fn submit(&self, _draft: &OrderDraft) -> Result<OrderId, StoreError> {
            Err(StoreError::Backend("orders store unavailable".to_owned()))
        }
    }

    let (cart, _docs) = signed_in_cart().await;
    cart.add(&product("p1", "Cargo Shorts", "19.99"), "M", 2)
        .await
        .expect("add");

    let service = OrderService::new(cart.clone(), RejectingGateway);
    let result = service.place(Customer::default(), PaymentMethod::Eft).await;

    assert!(matches!(result, Err(OrderError::Submit(_))));
    assert_eq!(cart.count(), 2);
    assert_eq!(cart.total(), money("39.98"));
}

#[tokio::test]
async fn test_default_customer_name_is_applied() {
    let (cart, _docs) = signed_in_cart().await;
    cart.add(&product("p1", "Cargo Shorts", "19.99"), "M", 1)
        .await
        .expect("add");

    let gateway = MemoryOrderGateway::new();
    let service = OrderService::new(cart, gateway.clone());
    service
        .place(Customer::default(), PaymentMethod::Cash)
        .await
        .expect("order placed");

    let submitted = gateway.submitted();
    assert_eq!(submitted[0].1.customer_name, "Customer");
    assert_eq!(submitted[0].1.email, None);
}
