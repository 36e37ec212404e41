//! # Midtrans payment gateway server
//!
//! The HTTP front end for the payment engine. It is responsible for:
//! * Issuing Snap payment tokens for new orders and recording those orders as pending.
//! * Accepting signed payment notifications from Midtrans and applying them to the stored orders.
//! * Answering payment status polls by asking Midtrans directly, and falling back to the stored record when the
//!   gateway cannot be reached.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `GET /`: Service information and the list of endpoints.
//! * `GET /health`: A health check route.
//! * `POST /generate-snap-token`: Create a payment token.
//! * `POST /midtrans-webhook`: The Midtrans HTTP notification handler.
//! * `GET /payment-status/{order_id}`: Reconcile and report the status of a payment.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
