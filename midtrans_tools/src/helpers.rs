/// The value of the `Authorization` header for both Midtrans APIs: the server key is the basic-auth username and the
/// password is empty.
pub fn basic_auth_value(server_key: &str) -> String {
    format!("Basic {}", base64::encode(format!("{server_key}:")))
}
