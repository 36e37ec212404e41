use crate::db_types::{PaymentStatus, StatusTuple};

/// Maps a raw Midtrans `transaction_status` onto the canonical status of an order.
///
/// | raw                      | status      | paid  | home  |
/// |--------------------------|-------------|-------|-------|
/// | `settlement`, `capture`  | `success`   | true  | true  |
/// | `pending`                | `pending`   | false | false |
/// | `cancel`                 | `cancelled` | false | false |
/// | `expire`                 | `expired`   | false | false |
/// | `deny`, `failure`        | `failed`    | false | false |
/// | anything else            | `unknown`   | false | false |
///
/// Matching is exact. The gateway only ever sends lower-case values.
pub fn normalize_status(transaction_status: &str) -> StatusTuple {
    match transaction_status {
        "settlement" | "capture" => StatusTuple::new(PaymentStatus::Success, true, true),
        "pending" => StatusTuple::new(PaymentStatus::Pending, false, false),
        "cancel" => StatusTuple::new(PaymentStatus::Cancelled, false, false),
        "expire" => StatusTuple::new(PaymentStatus::Expired, false, false),
        "deny" | "failure" => StatusTuple::new(PaymentStatus::Failed, false, false),
        _ => StatusTuple::new(PaymentStatus::Unknown, false, false),
    }
}

/// A short human-readable description of a status, suitable for showing to the buyer.
pub fn status_message(status: PaymentStatus, transaction_status: &str) -> String {
    match status {
        PaymentStatus::Success => "Payment successful!".to_string(),
        PaymentStatus::Pending => "Payment is pending".to_string(),
        PaymentStatus::Cancelled => "Payment was cancelled".to_string(),
        PaymentStatus::Expired => "Payment has expired".to_string(),
        PaymentStatus::Failed => "Payment failed".to_string(),
        PaymentStatus::Unknown => format!("Payment status: {transaction_status}"),
    }
}
