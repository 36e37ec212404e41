mod amount;

pub mod helpers;
mod secret;

pub use amount::{GrossAmount, GrossAmountError};
pub use secret::Secret;
