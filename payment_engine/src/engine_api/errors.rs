use thiserror::Error;

use crate::traits::GatewayError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid signature")]
    Authentication,
    #[error("Payment not found for order {order_id}")]
    NotFound { order_id: String, gateway_error: Option<String>, gateway_summary: Option<String> },
    #[error("Upstream service error: {0}")]
    Upstream(String),
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("{0}")]
    Validation(String),
    #[error("Failed to generate payment token. {0}")]
    Gateway(#[from] GatewayError),
}
