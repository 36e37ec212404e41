use chrono::Utc;
use log::{debug, trace};
use sqlx::{types::Json, SqliteConnection};

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{NewOrderRecord, OrderId, OrderRecord, StatusUpdate},
    traits::InsertOrderResult,
};

/// Inserts the order, unless a record with the same order id is already there. The existing record is never modified.
pub async fn idempotent_insert(
    order: NewOrderRecord,
    conn: &mut SqliteConnection,
) -> Result<InsertOrderResult, SqliteDatabaseError> {
    let initial = NewOrderRecord::initial_status();
    let now = Utc::now();
    let inserted = sqlx::query_as::<_, OrderRecord>(
        r#"
            INSERT INTO payments (
                order_id,
                gross_amount,
                status,
                is_paid,
                transaction_status,
                details,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ON CONFLICT (order_id) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(&order.order_id)
    .bind(order.gross_amount)
    .bind(initial.status())
    .bind(initial.is_paid())
    .bind(initial.transaction_status())
    .bind(Json(&order.details))
    .bind(now)
    .fetch_optional(&mut *conn)
    .await?;
    match inserted {
        Some(record) => {
            debug!("🗃️ Order {} saved with id {}", record.order_id, record.id);
            Ok(InsertOrderResult::Inserted(record))
        },
        None => {
            let existing = fetch_order_by_order_id(&order.order_id, conn).await?.ok_or_else(|| {
                SqliteDatabaseError::DriverError(sqlx::Error::Protocol(format!(
                    "Order {} conflicted on insert but could not be read back",
                    order.order_id
                )))
            })?;
            debug!("🗃️ Order {} already exists. Leaving it as is.", existing.order_id);
            Ok(InsertOrderResult::AlreadyExists(existing))
        },
    }
}

pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderRecord>, SqliteDatabaseError> {
    let order = sqlx::query_as::<_, OrderRecord>("SELECT * FROM payments WHERE order_id = $1 LIMIT 1;")
        .bind(order_id)
        .fetch_optional(conn)
        .await?;
    trace!("🗃️ Fetched order {order_id}: {}", if order.is_some() { "found" } else { "not found" });
    Ok(order)
}

/// Writes the status fields of an existing order. `updated_at` never moves backwards.
pub async fn update_status(
    order_id: &OrderId,
    update: &StatusUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderRecord>, SqliteDatabaseError> {
    let record = sqlx::query_as::<_, OrderRecord>(
        r#"
            UPDATE payments SET
                status = $1,
                is_paid = $2,
                transaction_status = $3,
                updated_at = MAX(updated_at, $4)
            WHERE order_id = $5
            RETURNING *;
        "#,
    )
    .bind(update.status())
    .bind(update.is_paid())
    .bind(update.transaction_status())
    .bind(Utc::now())
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    if let Some(r) = &record {
        debug!("🗃️ Order {order_id} is now {} ({})", r.status, r.transaction_status);
    }
    Ok(record)
}
