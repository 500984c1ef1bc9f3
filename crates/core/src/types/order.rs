//! Order types.
//!
//! An [`OrderDraft`] is the immutable snapshot submitted to the orders
//! store: line items frozen at submission time, a computed total, the
//! chosen payment method, and `pending` status. The backing store assigns
//! the order its ID.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::AccountId;
use super::line::CartLine;

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Paypal,
    Eft,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Card => write!(f, "card"),
            Self::Paypal => write!(f, "paypal"),
            Self::Eft => write!(f, "eft"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "paypal" => Ok(Self::Paypal),
            "eft" => Ok(Self::Eft),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Order lifecycle status.
///
/// Submission always creates orders as [`Pending`](Self::Pending);
/// later states are driven by fulfillment tooling, not by this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Who is placing the order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Customer {
    /// Display name; falls back to "Customer" on the order record.
    pub name: Option<String>,
    pub email: Option<Email>,
}

/// An immutable order record ready for submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub account_id: AccountId,
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    pub items: Vec<CartLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderDraft {
    /// Snapshot the given lines into a pending order.
    ///
    /// The total is computed from the lines, not taken on trust from the
    /// caller.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        customer: Customer,
        items: Vec<CartLine>,
        payment_method: PaymentMethod,
    ) -> Self {
        let total = items.iter().map(CartLine::subtotal).sum();
        let now = Utc::now();

        Self {
            account_id,
            customer_name: customer.name.unwrap_or_else(|| "Customer".to_owned()),
            email: customer.email,
            items,
            total,
            payment_method,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
