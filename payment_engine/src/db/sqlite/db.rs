//! `SqliteDatabase` is the persistent [`OrderStore`] backend.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate, SqlitePool};

use super::{new_pool, orders, SqliteDatabaseError};
use crate::{
    db_types::{NewOrderRecord, OrderId, OrderRecord, StatusUpdate},
    traits::{InsertOrderResult, OrderStore, OrderStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects to the database at `url`. The file is created if it is missing, but no migrations are run. See
    /// [`Self::run_migrations`].
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub async fn run_migrations(&self) -> Result<(), SqliteDatabaseError> {
        migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Migrations complete for {}", self.url);
        Ok(())
    }

}

impl OrderStore for SqliteDatabase {
    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, OrderStoreError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let order = orders::fetch_order_by_order_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn insert_order(&self, order: NewOrderRecord) -> Result<InsertOrderResult, OrderStoreError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let result = orders::idempotent_insert(order, &mut conn).await?;
        Ok(result)
    }

    async fn update_status(
        &self,
        order_id: &OrderId,
        update: &StatusUpdate,
    ) -> Result<Option<OrderRecord>, OrderStoreError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let order = orders::update_status(order_id, update, &mut conn).await?;
        if order.is_none() {
            debug!("🗃️ No order {order_id} to update");
        }
        Ok(order)
    }
}
