use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;

use crate::{
    db_types::{NewOrderRecord, OrderId, OrderRecord, StatusUpdate},
    traits::{InsertOrderResult, OrderStore, OrderStoreError},
};

/// A thread-safe, non-persistent [`OrderStore`]. Useful for tests and for running the gateway without a database.
#[derive(Debug, Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, OrderRecord>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

impl OrderStore for InMemoryOrderStore {
    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, OrderStoreError> {
        let orders = self.orders.read().await;
        Ok(orders.get(order_id).cloned())
    }

    async fn insert_order(&self, order: NewOrderRecord) -> Result<InsertOrderResult, OrderStoreError> {
        let mut orders = self.orders.write().await;
        if let Some(existing) = orders.get(&order.order_id) {
            return Ok(InsertOrderResult::AlreadyExists(existing.clone()));
        }
        let initial = NewOrderRecord::initial_status();
        let now = Utc::now();
        let id = i64::try_from(orders.len()).map_err(|e| OrderStoreError::DatabaseError(e.to_string()))? + 1;
        let record = OrderRecord {
            id,
            order_id: order.order_id.clone(),
            gross_amount: order.gross_amount,
            status: initial.status(),
            is_paid: initial.is_paid(),
            transaction_status: initial.transaction_status().to_string(),
            details: Json(order.details),
            created_at: now,
            updated_at: now,
        };
        orders.insert(order.order_id, record.clone());
        Ok(InsertOrderResult::Inserted(record))
    }

    async fn update_status(
        &self,
        order_id: &OrderId,
        update: &StatusUpdate,
    ) -> Result<Option<OrderRecord>, OrderStoreError> {
        let mut orders = self.orders.write().await;
        let Some(record) = orders.get_mut(order_id) else {
            return Ok(None);
        };
        record.status = update.status();
        record.is_paid = update.is_paid();
        record.transaction_status = update.transaction_status().to_string();
        record.updated_at = record.updated_at.max(Utc::now());
        Ok(Some(record.clone()))
    }
}
