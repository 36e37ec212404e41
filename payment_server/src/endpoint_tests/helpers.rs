use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use log::debug;
use mpg_common::Secret;
use payment_engine::{
    helpers::webhook_signature,
    traits::{GatewayClient, OrderStore},
    OrderFlowApi,
    PaymentStatusApi,
};
use serde_json::{json, Value};

use crate::{
    config::{Environment, ServerOptions},
    data_objects::ServiceStatus,
    routes::configure_routes,
};

// Sandbox-style key for signing test notifications. It is not a real merchant key.
pub const SERVER_KEY: &str = "SB-Mid-server-TEST";

/// Registers the routes with a status API and (optionally) an order flow API, as the server does at start-up.
pub fn configure_apis<G, S>(
    status_api: PaymentStatusApi<G, S>,
    orders_api: Option<OrderFlowApi<G, S>>,
) -> impl FnOnce(&mut ServiceConfig)
where
    G: GatewayClient + 'static,
    S: OrderStore + 'static,
{
    move |cfg| {
        let status = ServiceStatus::new(status_api.store_enabled(), true, Environment::Development);
        cfg.app_data(web::Data::new(status_api))
            .app_data(web::Data::new(status))
            .app_data(web::Data::new(ServerOptions { expose_error_details: true }));
        if let Some(api) = orders_api {
            cfg.app_data(web::Data::new(api));
        }
        configure_routes::<G, S>(cfg);
    }
}

pub fn status_api<G, S>(gateway: G, store: Option<S>) -> PaymentStatusApi<G, S>
where
    G: GatewayClient,
    S: OrderStore,
{
    PaymentStatusApi::new(gateway, store, Secret::new(SERVER_KEY.to_string()))
}

/// A notification as Midtrans would send it, signed with [`SERVER_KEY`].
pub fn signed_notification(order_id: &str, transaction_status: &str) -> Value {
    let signature = webhook_signature(order_id, "200", "150000.00", SERVER_KEY);
    json!({
        "transaction_time": "2024-04-01 15:31:20",
        "transaction_status": transaction_status,
        "transaction_id": "513f1f01-c9da-474c-9fc9-d5c64364b709",
        "status_message": "midtrans payment notification",
        "status_code": "200",
        "signature_key": signature,
        "payment_type": "bank_transfer",
        "order_id": order_id,
        "merchant_id": "G141532850",
        "gross_amount": "150000.00",
        "fraud_status": "accept",
        "currency": "IDR"
    })
}

pub async fn get_request<F>(path: &str, configure: F) -> (StatusCode, Value)
where F: FnOnce(&mut ServiceConfig) {
    send(TestRequest::get().uri(path), configure).await
}

pub async fn post_request<F>(path: &str, body: &Value, configure: F) -> (StatusCode, Value)
where F: FnOnce(&mut ServiceConfig) {
    send(TestRequest::post().uri(path).set_json(body), configure).await
}

pub async fn post_raw_request<F>(path: &str, body: &'static str, configure: F) -> (StatusCode, Value)
where F: FnOnce(&mut ServiceConfig) {
    let req = TestRequest::post().uri(path).insert_header(("content-type", "application/json")).set_payload(body);
    send(req, configure).await
}

async fn send<F>(req: TestRequest, configure: F) -> (StatusCode, Value)
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let bytes = res.into_body().try_into_bytes().unwrap();
    let body =
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}
