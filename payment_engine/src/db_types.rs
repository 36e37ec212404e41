use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use mpg_common::GrossAmount;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

use crate::helpers::normalize_status;

//--------------------------------------        OrderId        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------     PaymentStatus     ---------------------------------------------------------
/// The canonical payment status of an order. Every value is reachable from every other one: the gateway may correct
/// itself, so there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// The transaction exists, but the customer has not completed payment yet.
    Pending,
    /// Funds were captured or settled.
    Success,
    Cancelled,
    Expired,
    /// The gateway denied the transaction, or it failed.
    Failed,
    /// The gateway reported a status outside the known vocabulary.
    Unknown,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Success => write!(f, "success"),
            PaymentStatus::Cancelled => write!(f, "cancelled"),
            PaymentStatus::Expired => write!(f, "expired"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid payment status: {0}")]
pub struct ConversionError(String);

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "cancelled" => Ok(Self::Cancelled),
            "expired" => Ok(Self::Expired),
            "failed" => Ok(Self::Failed),
            "unknown" => Ok(Self::Unknown),
            s => Err(ConversionError(s.to_string())),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment status: {value}. But this conversion cannot fail. Defaulting to Unknown");
            PaymentStatus::Unknown
        })
    }
}

//--------------------------------------      StatusTuple      ---------------------------------------------------------
/// The canonical reading of a raw gateway status. See [`normalize_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusTuple {
    pub status: PaymentStatus,
    pub is_paid: bool,
    pub can_navigate_home: bool,
}

impl StatusTuple {
    pub const fn new(status: PaymentStatus, is_paid: bool, can_navigate_home: bool) -> Self {
        Self { status, is_paid, can_navigate_home }
    }
}

//--------------------------------------     StatusUpdate      ---------------------------------------------------------
/// The only way to change the status fields of a stored order.
///
/// A `StatusUpdate` can only be built from a raw gateway status, so `status` and `is_paid` on a record are always the
/// normalized form of its `transaction_status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    transaction_status: String,
    tuple: StatusTuple,
}

impl StatusUpdate {
    pub fn from_transaction_status(transaction_status: &str) -> Self {
        Self { transaction_status: transaction_status.to_string(), tuple: normalize_status(transaction_status) }
    }

    pub fn transaction_status(&self) -> &str {
        &self.transaction_status
    }

    pub fn tuple(&self) -> StatusTuple {
        self.tuple
    }

    pub fn status(&self) -> PaymentStatus {
        self.tuple.status
    }

    pub fn is_paid(&self) -> bool {
        self.tuple.is_paid
    }
}

//--------------------------------------     OrderCategory     ---------------------------------------------------------
/// What an order is for. Event and destination orders carry the extra bookkeeping the storefront needs to issue
/// tickets; general orders carry nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "payment_type", rename_all = "lowercase")]
pub enum OrderCategory {
    #[default]
    General,
    Event(EventOrder),
    Destination(DestinationOrder),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventOrder {
    pub user_id: Option<String>,
    pub event_id: Option<String>,
    pub event_name: Option<String>,
    pub event_data: Option<Value>,
    #[serde(flatten)]
    pub buyer: CategoryBuyer,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DestinationOrder {
    pub user_id: Option<String>,
    pub destination_id: Option<String>,
    pub destination_name: Option<String>,
    pub destination_data: Option<Value>,
    #[serde(flatten)]
    pub buyer: CategoryBuyer,
}

/// Fields shared by the ticketed order categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBuyer {
    pub user_email: String,
    pub user_name: String,
    pub quantity: i64,
    pub total_amount: GrossAmount,
    pub is_free: bool,
}

//--------------------------------------     OrderDetails      ---------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub id: String,
    pub price: i64,
    pub quantity: i64,
    pub name: String,
}

/// Order data captured at creation time. None of it takes part in reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub customer: CustomerDetails,
    pub items: Vec<ItemDetails>,
    pub category: OrderCategory,
    pub snap_token: Option<String>,
}

//--------------------------------------      OrderRecord      ---------------------------------------------------------
#[derive(Debug, Clone, FromRow)]
pub struct OrderRecord {
    pub id: i64,
    pub order_id: OrderId,
    pub gross_amount: GrossAmount,
    pub status: PaymentStatus,
    pub is_paid: bool,
    /// The raw status string, exactly as the gateway reported it.
    pub transaction_status: String,
    pub details: Json<OrderDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn status_tuple(&self) -> StatusTuple {
        StatusTuple::new(self.status, self.is_paid, self.status == PaymentStatus::Success)
    }
}

//--------------------------------------     NewOrderRecord    ---------------------------------------------------------
/// A freshly created order. It is stored as `pending`, unpaid, until the gateway says otherwise.
#[derive(Debug, Clone)]
pub struct NewOrderRecord {
    pub order_id: OrderId,
    pub gross_amount: GrossAmount,
    pub details: OrderDetails,
}

impl NewOrderRecord {
    pub fn new(order_id: OrderId, gross_amount: GrossAmount) -> Self {
        Self { order_id, gross_amount, details: OrderDetails::default() }
    }

    pub fn with_details(mut self, details: OrderDetails) -> Self {
        self.details = details;
        self
    }

    /// The status every new record starts with.
    pub fn initial_status() -> StatusUpdate {
        StatusUpdate::from_transaction_status("pending")
    }
}
