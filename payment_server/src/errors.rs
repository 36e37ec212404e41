use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use payment_engine::{OrderFlowError, ReconciliationError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    InvalidRequestBody(String),
    #[error("{0}")]
    InvalidRequestPath(String),
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Payment not found")]
    PaymentNotFound { order_id: String, gateway_error: Option<String> },
    #[error("Failed to generate payment token")]
    PaymentTokenFailed { detail: Option<String> },
    #[error("Internal server error")]
    BackendError { detail: Option<String> },
}

impl ServerError {
    /// Maps a reconciliation failure onto a response. `expose_details` controls whether internal error messages reach
    /// the client.
    pub fn from_reconciliation(e: ReconciliationError, expose_details: bool) -> Self {
        match e {
            ReconciliationError::Validation(msg) => Self::InvalidRequestBody(msg),
            ReconciliationError::Authentication => Self::InvalidSignature,
            ReconciliationError::NotFound { order_id, gateway_error, gateway_summary } => {
                let gateway_error = if expose_details { gateway_error } else { gateway_summary };
                Self::PaymentNotFound { order_id, gateway_error }
            },
            ReconciliationError::Upstream(msg) => Self::BackendError { detail: expose_details.then_some(msg) },
        }
    }

    pub fn from_order_flow(e: OrderFlowError, expose_details: bool) -> Self {
        match e {
            OrderFlowError::Validation(msg) => Self::InvalidRequestBody(msg),
            OrderFlowError::Gateway(e) => Self::PaymentTokenFailed { detail: expose_details.then(|| e.to_string()) },
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::PaymentNotFound { .. } => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PaymentTokenFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = json!({ "success": false, "message": self.to_string() });
        match self {
            Self::PaymentNotFound { order_id, gateway_error } => {
                body["order_id"] = json!(order_id);
                if let Some(e) = gateway_error {
                    body["midtrans_error"] = json!(e);
                }
            },
            Self::PaymentTokenFailed { detail: Some(detail) } | Self::BackendError { detail: Some(detail) } => {
                body["error"] = json!(detail);
            },
            _ => {},
        }
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}
