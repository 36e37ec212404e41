use std::{env, fmt::Display, str::FromStr};

use log::*;
use midtrans_tools::MidtransConfig;

use crate::errors::ServerError;

const DEFAULT_MPG_HOST: &str = "127.0.0.1";
const DEFAULT_MPG_PORT: u16 = 8360;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("'{other}' is not a known environment")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Where order records are kept. When unset, the server runs without persistence: webhooks are acknowledged
    /// without side effects and status polls rely on the gateway alone.
    pub database_url: Option<String>,
    pub midtrans: MidtransConfig,
    /// In development, error responses carry the underlying error message.
    pub environment: Environment,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MPG_HOST.to_string(),
            port: DEFAULT_MPG_PORT,
            database_url: None,
            midtrans: MidtransConfig::default(),
            environment: Environment::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("MPG_HOST").ok().unwrap_or_else(|| DEFAULT_MPG_HOST.into());
        let port = env::var("MPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for MPG_PORT. {e} Using the default, {DEFAULT_MPG_PORT}, instead."
                    );
                    DEFAULT_MPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_MPG_PORT);
        let database_url = env::var("MPG_DATABASE_URL").ok().filter(|s| !s.trim().is_empty());
        if database_url.is_none() {
            warn!("🪛️ MPG_DATABASE_URL is not set. Payment records will not be stored.");
        }
        let environment = env::var("MPG_ENVIRONMENT")
            .ok()
            .map(|s| {
                s.parse::<Environment>().unwrap_or_else(|e| {
                    warn!("🪛️ {e}. Using the development environment.");
                    Environment::Development
                })
            })
            .unwrap_or_default();
        let midtrans = MidtransConfig::new_from_env_or_default();
        Self { host, port, database_url, midtrans, environment }
    }

    /// Checks the settings the server cannot start without.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.midtrans.server_key.is_empty() {
            return Err(ServerError::ConfigurationError("MIDTRANS_SERVER_KEY must be set".to_string()));
        }
        Ok(())
    }

    pub fn options(&self) -> ServerOptions {
        ServerOptions { expose_error_details: self.environment == Environment::Development }
    }
}

/// Runtime switches that handlers need.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerOptions {
    pub expose_error_details: bool,
}
