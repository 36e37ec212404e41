use thiserror::Error;

use crate::{
    db_types::{NewOrderRecord, OrderId, OrderRecord, StatusUpdate},
    traits::InsertOrderResult,
};

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("Order store error: {0}")]
    DatabaseError(String),
    #[error("The order store did not respond in time")]
    Timeout,
    #[error("Stored order is malformed: {0}")]
    InvalidRecord(String),
}

/// Persistence for order records, keyed by order id.
///
/// "Not found" is never an error: lookups and updates of an unknown order id return `Ok(None)`.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// Fetches the record for `order_id`, if there is one.
    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, OrderStoreError>;

    /// Stores a new order as `pending` and unpaid.
    ///
    /// This call is idempotent. If a record with the same order id already exists, it is returned untouched as
    /// [`InsertOrderResult::AlreadyExists`].
    async fn insert_order(&self, order: NewOrderRecord) -> Result<InsertOrderResult, OrderStoreError>;

    /// Overwrites the status fields (`status`, `is_paid`, `transaction_status`) of an existing order and bumps
    /// `updated_at`. The amount and creation time are never touched.
    ///
    /// Returns the updated record, or `None` if no order with this id exists. No record is created.
    async fn update_status(
        &self,
        order_id: &OrderId,
        update: &StatusUpdate,
    ) -> Result<Option<OrderRecord>, OrderStoreError>;
}
