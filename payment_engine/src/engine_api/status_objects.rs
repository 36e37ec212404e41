use chrono::{DateTime, Utc};
use mpg_common::helpers::lenient_string;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{OrderId, PaymentStatus, StatusTuple},
    engine_api::errors::ReconciliationError,
    helpers::status_message,
    traits::GatewayStatusReport,
};

/// An HTTP notification as Midtrans sends it. Nothing in here is trusted until the signature has been checked.
///
/// Midtrans sends `status_code` and `gross_amount` as strings, but every field also accepts a JSON number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gross_amount: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub signature_key: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transaction_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fraud_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub payment_type: Option<String>,
}

/// The fields of a [`WebhookPayload`] that take part in reconciliation, all present and non-empty.
#[derive(Debug, Clone, Copy)]
pub struct WebhookFields<'a> {
    pub order_id: &'a str,
    pub status_code: &'a str,
    pub gross_amount: &'a str,
    pub signature_key: &'a str,
    pub transaction_status: &'a str,
}

impl WebhookPayload {
    pub fn required_fields(&self) -> Result<WebhookFields<'_>, ReconciliationError> {
        fn field<'a>(value: &'a Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> &'a str {
            match value.as_deref() {
                Some(v) if !v.is_empty() => v,
                _ => {
                    missing.push(name);
                    ""
                },
            }
        }
        let mut missing = Vec::new();
        let fields = WebhookFields {
            order_id: field(&self.order_id, "order_id", &mut missing),
            status_code: field(&self.status_code, "status_code", &mut missing),
            gross_amount: field(&self.gross_amount, "gross_amount", &mut missing),
            signature_key: field(&self.signature_key, "signature_key", &mut missing),
            transaction_status: field(&self.transaction_status, "transaction_status", &mut missing),
        };
        if missing.is_empty() {
            Ok(fields)
        } else {
            Err(ReconciliationError::Validation(format!("Missing required webhook fields: {}", missing.join(", "))))
        }
    }
}

/// Acknowledgement of an authenticated webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookAck {
    pub order_id: OrderId,
    pub status: PaymentStatus,
    /// Whether a stored record was changed. Unknown orders and store failures leave this false.
    #[serde(skip)]
    pub record_updated: bool,
}

/// Which sources contributed to a [`PaymentStatusReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSources {
    /// A stored record for the order was found.
    pub store: bool,
    /// The gateway answered with a transaction status.
    pub gateway: bool,
    /// The gateway's answer was written back to the stored record.
    pub store_update_success: bool,
}

/// The reconciled view of an order's payment status.
#[derive(Debug, Clone)]
pub struct PaymentStatusReport {
    pub order_id: OrderId,
    pub tuple: StatusTuple,
    pub transaction_status: String,
    pub sources: StatusSources,
    /// The raw gateway snapshot, when the gateway answered.
    pub gateway_report: Option<GatewayStatusReport>,
    /// Failures that were tolerated while building this report.
    pub upstream_errors: Vec<ReconciliationError>,
    pub checked_at: DateTime<Utc>,
}

impl PaymentStatusReport {
    pub fn status(&self) -> PaymentStatus {
        self.tuple.status
    }

    pub fn is_paid(&self) -> bool {
        self.tuple.is_paid
    }

    pub fn can_navigate_home(&self) -> bool {
        self.tuple.can_navigate_home
    }

    pub fn message(&self) -> String {
        status_message(self.tuple.status, &self.transaction_status)
    }
}
