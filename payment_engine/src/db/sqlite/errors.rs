use thiserror::Error;

use crate::traits::OrderStoreError;

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

impl From<SqliteDatabaseError> for OrderStoreError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::DriverError(sqlx::Error::PoolTimedOut) => OrderStoreError::Timeout,
            SqliteDatabaseError::DriverError(sqlx::Error::ColumnDecode { index, source }) => {
                OrderStoreError::InvalidRecord(format!("column {index}: {source}"))
            },
            e => OrderStoreError::DatabaseError(e.to_string()),
        }
    }
}
