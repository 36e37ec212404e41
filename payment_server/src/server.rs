use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use midtrans_tools::MidtransApi;
use payment_engine::{OrderFlowApi, PaymentStatusApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    data_objects::ServiceStatus,
    errors::ServerError,
    integrations::midtrans::MidtransGateway,
    routes::configure_routes,
};

const MAX_DB_CONNECTIONS: u32 = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;
    let db = match &config.database_url {
        Some(url) => connect_store(url).await,
        None => None,
    };
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(ServerError::from)
}

/// Opens the order store. The server keeps running without persistence if the database is unusable.
async fn connect_store(url: &str) -> Option<SqliteDatabase> {
    let db = match SqliteDatabase::new_with_url(url, MAX_DB_CONNECTIONS).await {
        Ok(db) => db,
        Err(e) => {
            warn!("🗃️ Could not connect to {url}. Payment records will not be stored. {e}");
            return None;
        },
    };
    match db.run_migrations().await {
        Ok(()) => {
            info!("🗃️ Order store ready at {url}");
            Some(db)
        },
        Err(e) => {
            warn!("🗃️ Could not migrate {url}. Payment records will not be stored. {e}");
            None
        },
    }
}

pub fn create_server_instance(config: ServerConfig, db: Option<SqliteDatabase>) -> Result<Server, ServerError> {
    let midtrans_api =
        MidtransApi::new(config.midtrans.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let gateway = MidtransGateway::new(midtrans_api);
    let store_enabled = db.is_some();
    // Shared across workers, so that per-order locking holds for the whole process
    let status_api = web::Data::new(
        PaymentStatusApi::new(gateway.clone(), db.clone(), config.midtrans.server_key.clone())
            .with_call_timeout(config.midtrans.status_timeout),
    );
    let orders_api =
        web::Data::new(OrderFlowApi::new(gateway, db).with_call_timeout(config.midtrans.snap_timeout));
    let midtrans_configured = !config.midtrans.server_key.is_empty();
    let status = web::Data::new(ServiceStatus::new(store_enabled, midtrans_configured, config.environment));
    let options = web::Data::new(config.options());
    info!(
        "🚀️ Midtrans {} mode. Persistence is {}.",
        if config.midtrans.is_production { "production" } else { "sandbox" },
        if store_enabled { "enabled" } else { "disabled" }
    );
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("mpg::access_log"))
            .app_data(status_api.clone())
            .app_data(orders_api.clone())
            .app_data(status.clone())
            .app_data(options.clone())
            .configure(configure_routes::<MidtransGateway, SqliteDatabase>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
