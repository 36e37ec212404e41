use thiserror::Error;

use crate::{
    db_types::OrderId,
    traits::{GatewayStatusReport, NewTransaction, PaymentToken},
};

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Could not reach the payment gateway: {0}")]
    Unreachable(String),
    #[error("The payment gateway did not respond in time")]
    Timeout,
    #[error("The payment gateway rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("The payment gateway sent an unexpected response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// A description of the failure that is safe to hand to API clients. Transport and parsing details are left out.
    pub fn summary(&self) -> String {
        match self {
            Self::Rejected { .. } | Self::Timeout => self.to_string(),
            Self::Unreachable(_) | Self::InvalidResponse(_) => "The payment gateway lookup failed".to_string(),
        }
    }
}

/// The outbound half of the payment gateway.
#[allow(async_fn_in_trait)]
pub trait GatewayClient {
    /// Queries the gateway for the current state of the transaction attached to `order_id`.
    ///
    /// An unknown transaction is an error ([`GatewayError::Rejected`], usually with status 404).
    async fn transaction_status(&self, order_id: &OrderId) -> Result<GatewayStatusReport, GatewayError>;

    /// Opens a new transaction and returns the payment token for it.
    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<PaymentToken, GatewayError>;
}
