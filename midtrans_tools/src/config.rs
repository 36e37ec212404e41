use std::time::Duration;

use log::*;
use mpg_common::{helpers::parse_boolean_flag, Secret};

const PRODUCTION_API_URL: &str = "https://api.midtrans.com";
const SANDBOX_API_URL: &str = "https://api.sandbox.midtrans.com";
const PRODUCTION_SNAP_URL: &str = "https://app.midtrans.com";
const SANDBOX_SNAP_URL: &str = "https://app.sandbox.midtrans.com";

pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_SNAP_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone)]
pub struct MidtransConfig {
    /// The merchant's server key. Used for basic auth against the gateway, and as the webhook signing secret.
    pub server_key: Secret<String>,
    /// Selects the production endpoints instead of the sandbox.
    pub is_production: bool,
    /// Upper bound for a single transaction status query.
    pub status_timeout: Duration,
    /// Upper bound for a single Snap transaction request.
    pub snap_timeout: Duration,
}

impl Default for MidtransConfig {
    fn default() -> Self {
        Self {
            server_key: Secret::default(),
            is_production: false,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            snap_timeout: DEFAULT_SNAP_TIMEOUT,
        }
    }
}

impl MidtransConfig {
    pub fn new(server_key: &str, is_production: bool) -> Self {
        Self { server_key: Secret::new(server_key.to_string()), is_production, ..Default::default() }
    }

    pub fn new_from_env_or_default() -> Self {
        let server_key = Secret::new(std::env::var("MIDTRANS_SERVER_KEY").unwrap_or_else(|_| {
            warn!("MIDTRANS_SERVER_KEY not set. Gateway queries and webhook verification will fail.");
            String::default()
        }));
        let is_production = parse_boolean_flag(std::env::var("MIDTRANS_IS_PRODUCTION").ok(), false);
        let status_timeout = std::env::var("MPG_GATEWAY_TIMEOUT")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("Invalid value for MPG_GATEWAY_TIMEOUT ({s}). {e}. Using the default."))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_STATUS_TIMEOUT);
        if is_production {
            info!("Using the Midtrans PRODUCTION endpoints");
        } else {
            info!("Using the Midtrans sandbox endpoints");
        }
        Self { server_key, is_production, status_timeout, ..Default::default() }
    }

    /// Base URL of the Core API, which hosts the transaction status query.
    pub fn api_base_url(&self) -> &'static str {
        if self.is_production {
            PRODUCTION_API_URL
        } else {
            SANDBOX_API_URL
        }
    }

    /// Base URL of the Snap API, which issues payment tokens.
    pub fn snap_base_url(&self) -> &'static str {
        if self.is_production {
            PRODUCTION_SNAP_URL
        } else {
            SANDBOX_SNAP_URL
        }
    }
}
