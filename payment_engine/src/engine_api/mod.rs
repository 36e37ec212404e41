//! The public-facing API of the payment engine.
//!
//! * [`PaymentStatusApi`] reconciles the local order record with the payment gateway. It handles both inbound webhook
//!   notifications and on-demand status polls.
//! * [`OrderFlowApi`] opens new transactions with the gateway and seeds the matching order records.
pub mod errors;
pub mod order_flow_api;
pub mod order_locks;
pub mod order_objects;
pub mod payment_status_api;
pub mod status_objects;
