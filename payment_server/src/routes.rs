//! Request handler definitions
//!
//! Define each route and its handler here. Handlers only translate between HTTP and the payment engine; any real
//! work belongs in `payment_engine`.
//!
//! A note about performance:
//! Each worker thread processes its requests sequentially, so handlers must never block the thread. Every call into
//! the engine is async and bounded by a timeout.
use std::time::Instant;

use actix_web::{
    error::JsonPayloadError,
    get,
    web,
    web::ServiceConfig,
    HttpRequest,
    HttpResponse,
    Responder,
};
use chrono::Utc;
use log::*;
use payment_engine::{
    order_objects::CreatePaymentRequest,
    status_objects::WebhookPayload,
    traits::{GatewayClient, OrderStore},
    OrderFlowApi,
    PaymentStatusApi,
};
use serde_json::json;

use crate::{
    config::ServerOptions,
    data_objects::{
        iso_timestamp,
        PaymentStatusResponse,
        PaymentTokenResponse,
        ServiceStatus,
        WebhookResponse,
        AVAILABLE_ENDPOINTS,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

/// Registers every route for a gateway `G` and store `S`, plus the JSON error handler and the 404 fallback.
///
/// The caller supplies the app data: `PaymentStatusApi<G, S>`, `OrderFlowApi<G, S>`, [`ServiceStatus`] and
/// [`ServerOptions`].
pub fn configure_routes<G, S>(cfg: &mut ServiceConfig)
where
    G: GatewayClient + 'static,
    S: OrderStore + 'static,
{
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(index)
        .service(health)
        .service(MidtransWebhookRoute::<G, S>::new())
        .service(missing_order_id)
        .service(PaymentStatusRoute::<G, S>::new())
        .service(GenerateSnapTokenRoute::<G, S>::new())
        .default_service(web::route().to(not_found));
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!("💻️ Could not deserialize request body. {err}");
    ServerError::InvalidRequestBody(format!("Invalid request body. {err}")).into()
}

// ----------------------------------------------   Info  ----------------------------------------------------
#[get("/")]
pub async fn index(status: web::Data<ServiceStatus>) -> impl Responder {
    trace!("💻️ Received info request");
    let endpoints =
        AVAILABLE_ENDPOINTS.iter().map(|(e, d)| (e.to_string(), json!(d))).collect::<serde_json::Map<_, _>>();
    HttpResponse::Ok().json(json!({
        "message": "Midtrans Payment Gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "active",
        "store_enabled": status.store_enabled,
        "environment": status.environment.to_string(),
        "timestamp": iso_timestamp(Utc::now()),
        "endpoints": endpoints,
    }))
}

#[get("/health")]
pub async fn health(status: web::Data<ServiceStatus>) -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "services": {
            "store": status.store_enabled,
            "midtrans": status.midtrans_configured,
        },
        "timestamp": iso_timestamp(Utc::now()),
        "uptime_secs": Instant::now().duration_since(status.started_at).as_secs(),
    }))
}

pub async fn not_found(req: HttpRequest) -> impl Responder {
    debug!("💻️ No route for {} {}", req.method(), req.path());
    let endpoints = AVAILABLE_ENDPOINTS.iter().map(|(e, _)| *e).collect::<Vec<_>>();
    HttpResponse::NotFound().json(json!({
        "success": false,
        "message": "Endpoint not found",
        "path": req.path(),
        "method": req.method().as_str(),
        "available_endpoints": endpoints,
    }))
}

//----------------------------------------------   Webhook  ----------------------------------------------------
route!(midtrans_webhook => Post "/midtrans-webhook" impl GatewayClient, OrderStore);
/// Route handler for Midtrans HTTP notifications.
///
/// Midtrans treats anything other than a 200 as a failed delivery and retries it, so only malformed or forged
/// notifications are refused. Store failures are logged by the engine and still acknowledged.
pub async fn midtrans_webhook<G, S>(
    body: web::Json<WebhookPayload>,
    api: web::Data<PaymentStatusApi<G, S>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    G: GatewayClient,
    S: OrderStore,
{
    trace!("💻️ Received webhook notification");
    let ack = api
        .process_webhook(&body)
        .await
        .map_err(|e| ServerError::from_reconciliation(e, options.expose_error_details))?;
    Ok(HttpResponse::Ok().json(WebhookResponse::from(ack)))
}

//----------------------------------------------   Payment status  ----------------------------------------------
#[get("/payment-status/")]
pub async fn missing_order_id() -> Result<HttpResponse, ServerError> {
    Err(ServerError::InvalidRequestPath("Order ID is required".to_string()))
}

route!(payment_status => Get "/payment-status/{order_id}" impl GatewayClient, OrderStore);
pub async fn payment_status<G, S>(
    path: web::Path<String>,
    api: web::Data<PaymentStatusApi<G, S>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    G: GatewayClient,
    S: OrderStore,
{
    let order_id = path.into_inner();
    trace!("💻️ Received payment status request for {order_id}");
    let report = api
        .poll_status(&order_id)
        .await
        .map_err(|e| ServerError::from_reconciliation(e, options.expose_error_details))?;
    for e in &report.upstream_errors {
        debug!("💻️ Status for {order_id} was reported despite an upstream failure. {e}");
    }
    Ok(HttpResponse::Ok().json(PaymentStatusResponse::from(report)))
}

//----------------------------------------------   Payment token  ----------------------------------------------
route!(generate_snap_token => Post "/generate-snap-token" impl GatewayClient, OrderStore);
pub async fn generate_snap_token<G, S>(
    body: web::Json<CreatePaymentRequest>,
    api: web::Data<OrderFlowApi<G, S>>,
    options: web::Data<ServerOptions>,
) -> Result<HttpResponse, ServerError>
where
    G: GatewayClient,
    S: OrderStore,
{
    trace!("💻️ Received payment token request");
    let result = api
        .create_payment_token(body.into_inner())
        .await
        .map_err(|e| ServerError::from_order_flow(e, options.expose_error_details))?;
    Ok(HttpResponse::Ok().json(PaymentTokenResponse::from(result)))
}
