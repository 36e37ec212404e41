pub mod fake_gateway;
#[cfg(feature = "sqlite")]
pub mod prepare_env;
pub mod records;
