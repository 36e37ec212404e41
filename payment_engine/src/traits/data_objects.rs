use serde::Serialize;

use crate::db_types::{CustomerDetails, ItemDetails, OrderId, OrderRecord};
use mpg_common::GrossAmount;

#[derive(Debug, Clone)]
pub enum InsertOrderResult {
    Inserted(OrderRecord),
    AlreadyExists(OrderRecord),
}

impl InsertOrderResult {
    pub fn record(&self) -> &OrderRecord {
        match self {
            InsertOrderResult::Inserted(r) | InsertOrderResult::AlreadyExists(r) => r,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, InsertOrderResult::Inserted(_))
    }
}

/// A read-only snapshot of what the gateway knows about a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayStatusReport {
    pub order_id: OrderId,
    /// The raw status, e.g. `settlement`.
    pub transaction_status: String,
    pub fraud_status: Option<String>,
    pub payment_type: Option<String>,
    pub gross_amount: Option<String>,
    pub transaction_time: Option<String>,
}

impl GatewayStatusReport {
    pub fn new<S: Into<String>>(order_id: OrderId, transaction_status: S) -> Self {
        Self {
            order_id,
            transaction_status: transaction_status.into(),
            fraud_status: None,
            payment_type: None,
            gross_amount: None,
            transaction_time: None,
        }
    }
}

/// A request to open a new transaction with the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub order_id: OrderId,
    pub gross_amount: GrossAmount,
    pub customer: CustomerDetails,
    pub items: Vec<ItemDetails>,
}

/// The token and hosted payment page the gateway issued for a new transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentToken {
    pub token: String,
    pub redirect_url: String,
}
