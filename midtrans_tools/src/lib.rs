//! A thin client for the parts of the Midtrans REST API that the payment gateway uses: the transaction status query
//! (Core API) and Snap transaction creation.
mod api;
mod config;
mod error;

mod data_objects;
pub mod helpers;

pub use api::MidtransApi;
pub use config::MidtransConfig;
pub use data_objects::{
    CreditCardOptions,
    SnapCustomerDetails,
    SnapItemDetails,
    SnapTransaction,
    SnapTransactionRequest,
    TransactionDetails,
    TransactionStatus,
};
pub use error::MidtransApiError;
