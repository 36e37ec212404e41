use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use mpg_common::GrossAmount;
use payment_engine::{
    db_types::{OrderId, PaymentStatus},
    order_objects::PaymentTokenResult,
    status_objects::{PaymentStatusReport, StatusSources, WebhookAck},
};
use serde::Serialize;

use crate::config::Environment;

pub const AVAILABLE_ENDPOINTS: [(&str, &str); 5] = [
    ("GET /", "API Information"),
    ("GET /health", "Health Check"),
    ("POST /generate-snap-token", "Create Payment Token"),
    ("POST /midtrans-webhook", "Payment Webhook Handler"),
    ("GET /payment-status/:orderId", "Check Payment Status"),
];

/// What the server knows about itself. Built once at start-up.
#[derive(Debug, Clone)]
pub struct ServiceStatus {
    pub store_enabled: bool,
    pub midtrans_configured: bool,
    pub environment: Environment,
    pub started_at: Instant,
}

impl ServiceStatus {
    pub fn new(store_enabled: bool, midtrans_configured: bool, environment: Environment) -> Self {
        Self { store_enabled, midtrans_configured, environment, started_at: Instant::now() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    pub message: String,
    pub order_id: OrderId,
    pub status: PaymentStatus,
}

impl From<WebhookAck> for WebhookResponse {
    fn from(ack: WebhookAck) -> Self {
        Self {
            success: true,
            message: "Webhook processed successfully".to_string(),
            order_id: ack.order_id,
            status: ack.status,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentStatusResponse {
    pub success: bool,
    pub order_id: OrderId,
    pub status: PaymentStatus,
    pub is_paid: bool,
    pub can_navigate_home: bool,
    pub transaction_status: String,
    pub message: String,
    pub timestamp: String,
    pub sources: StatusSources,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_time: Option<String>,
}

impl From<PaymentStatusReport> for PaymentStatusResponse {
    fn from(report: PaymentStatusReport) -> Self {
        let message = report.message();
        let (fraud_status, payment_type, gross_amount, transaction_time) = match report.gateway_report {
            Some(g) => (g.fraud_status, g.payment_type, g.gross_amount, g.transaction_time),
            None => (None, None, None, None),
        };
        Self {
            success: true,
            status: report.tuple.status,
            is_paid: report.tuple.is_paid,
            can_navigate_home: report.tuple.can_navigate_home,
            transaction_status: report.transaction_status,
            message,
            timestamp: iso_timestamp(report.checked_at),
            sources: report.sources,
            fraud_status,
            payment_type,
            gross_amount,
            transaction_time,
            order_id: report.order_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentTokenResponse {
    pub success: bool,
    pub snap_token: String,
    pub redirect_url: String,
    pub order_id: OrderId,
    pub gross_amount: GrossAmount,
}

impl From<PaymentTokenResult> for PaymentTokenResponse {
    fn from(result: PaymentTokenResult) -> Self {
        Self {
            success: true,
            snap_token: result.token.token,
            redirect_url: result.token.redirect_url,
            order_id: result.order_id,
            gross_amount: result.gross_amount,
        }
    }
}

pub fn iso_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}
