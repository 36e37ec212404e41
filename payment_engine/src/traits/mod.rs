//! # Backend contracts
//!
//! The reconciliation engine talks to the outside world through exactly two seams:
//!
//! * [`OrderStore`] is the local record of orders, keyed by order id. [`crate::SqliteDatabase`] and
//!   [`crate::InMemoryOrderStore`] implement it.
//! * [`GatewayClient`] is the payment gateway. The server wraps the Midtrans REST client in an implementation of it.
//!
//! Neither trait knows anything about webhooks, signatures or precedence rules. Those live in
//! [`crate::PaymentStatusApi`].
mod data_objects;
mod gateway_client;
mod order_store;

pub use data_objects::{GatewayStatusReport, InsertOrderResult, NewTransaction, PaymentToken};
pub use gateway_client::{GatewayClient, GatewayError};
pub use order_store::{OrderStore, OrderStoreError};
