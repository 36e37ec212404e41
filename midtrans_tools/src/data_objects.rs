use serde::{Deserialize, Serialize};

/// Response body of `GET /v2/{order_id}/status`.
///
/// Midtrans answers unknown orders with HTTP 200 and a body-level `status_code` of "404", in which case
/// `transaction_status` is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionStatus {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub transaction_status: Option<String>,
    #[serde(default)]
    pub status_code: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
    #[serde(default)]
    pub fraud_status: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub gross_amount: Option<String>,
    #[serde(default)]
    pub transaction_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapTransactionRequest {
    pub transaction_details: TransactionDetails,
    pub customer_details: SnapCustomerDetails,
    pub item_details: Vec<SnapItemDetails>,
    pub credit_card: CreditCardOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub order_id: String,
    pub gross_amount: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapCustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapItemDetails {
    pub id: String,
    pub price: i64,
    pub quantity: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CreditCardOptions {
    pub secure: bool,
}

impl Default for CreditCardOptions {
    fn default() -> Self {
        Self { secure: true }
    }
}

/// Response body of `POST /snap/v1/transactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapTransaction {
    pub token: String,
    pub redirect_url: String,
}
