//! # Webhook notification signatures
//!
//! Midtrans signs every HTTP notification it sends. The `signature_key` field of the notification is
//!
//! ```text
//!    hex(SHA-512(order_id ++ status_code ++ gross_amount ++ server_key))
//! ```
//!
//! where `++` is plain string concatenation and the digest is rendered as lower-case hexadecimal. All four inputs are
//! taken verbatim from the payload (`gross_amount` keeps its decimal suffix, e.g. `"100000.00"`), except the server
//! key, which only the merchant and the gateway know.
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

/// Calculates the expected `signature_key` for a notification.
pub fn webhook_signature(order_id: &str, status_code: &str, gross_amount: &str, server_key: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks a notification's `signature_key` against the one we expect.
///
/// Any empty input is rejected outright, including an empty server key. The comparison runs in constant time.
pub fn verify_webhook_signature(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    signature_key: &str,
    server_key: &str,
) -> bool {
    if [order_id, status_code, gross_amount, signature_key, server_key].iter().any(|s| s.is_empty()) {
        return false;
    }
    let expected = webhook_signature(order_id, status_code, gross_amount, server_key);
    expected.as_bytes().ct_eq(signature_key.as_bytes()).into()
}
