use chrono::{TimeZone, Utc};
use mpg_common::GrossAmount;
use sqlx::types::Json;

use crate::db_types::{OrderDetails, OrderId, OrderRecord, StatusUpdate};

/// A stored order as a backend would return it, with its status fields derived from `transaction_status`.
pub fn order_record(order_id: &str, gross_amount: i64, transaction_status: &str) -> OrderRecord {
    let update = StatusUpdate::from_transaction_status(transaction_status);
    let created_at = Utc.with_ymd_and_hms(2024, 4, 1, 8, 30, 0).unwrap();
    OrderRecord {
        id: 1,
        order_id: OrderId::from(order_id),
        gross_amount: GrossAmount::try_from(gross_amount).unwrap(),
        status: update.status(),
        is_paid: update.is_paid(),
        transaction_status: transaction_status.to_string(),
        details: Json(OrderDetails::default()),
        created_at,
        updated_at: created_at,
    }
}
