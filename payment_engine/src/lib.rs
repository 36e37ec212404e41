//! Midtrans Payment Engine
//!
//! The payment engine keeps a local record of orders consistent with what the Midtrans payment gateway knows about
//! their transactions. It is independent of any web framework.
//!
//! The library is divided into three main sections:
//! 1. Data types and helpers ([`mod@db_types`], [`mod@helpers`]). This includes the status normalization table and
//!    the webhook signature check.
//! 2. Backend contracts ([`mod@traits`]) and their implementations: [`SqliteDatabase`] for persistent storage,
//!    [`InMemoryOrderStore`] for tests and database-free deployments. The gateway itself is provided by the caller.
//! 3. The payment engine public API. [`PaymentStatusApi`] reconciles webhook notifications and status polls with the
//!    stored records; [`OrderFlowApi`] opens new payments.
mod db;

pub mod db_types;
pub mod helpers;
pub mod traits;

mod engine_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use db::memory::InMemoryOrderStore;
#[cfg(feature = "sqlite")]
pub use db::sqlite::{db::SqliteDatabase, SqliteDatabaseError};
pub use engine_api::{
    errors::{OrderFlowError, ReconciliationError},
    order_flow_api::OrderFlowApi,
    order_locks::OrderLocks,
    order_objects,
    payment_status_api::{PaymentStatusApi, DEFAULT_CALL_TIMEOUT},
    status_objects,
};
