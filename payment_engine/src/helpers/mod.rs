mod signature;
mod status;
mod validation;

pub use signature::{verify_webhook_signature, webhook_signature};
pub use status::{normalize_status, status_message};
pub use validation::{is_valid_email, is_valid_order_id};
