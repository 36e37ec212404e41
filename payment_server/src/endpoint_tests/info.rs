use actix_web::http::StatusCode;
use payment_engine::{test_utils::fake_gateway::FakeGateway, InMemoryOrderStore};

use super::helpers::{configure_apis, get_request, status_api};

#[actix_web::test]
async fn index() {
    let _ = env_logger::try_init().ok();
    let api = status_api(FakeGateway::default(), Some(InMemoryOrderStore::new()));
    let (status, body) = get_request("/", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["store_enabled"], true);
    assert_eq!(body["environment"], "development");
    assert_eq!(body["endpoints"]["POST /midtrans-webhook"], "Payment Webhook Handler");
    assert_eq!(body["endpoints"].as_object().unwrap().len(), 5);
}

#[actix_web::test]
async fn health() {
    let _ = env_logger::try_init().ok();
    let api = status_api(FakeGateway::default(), None::<InMemoryOrderStore>);
    let (status, body) = get_request("/health", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["store"], false);
    assert_eq!(body["services"]["midtrans"], true);
}

#[actix_web::test]
async fn unknown_endpoint() {
    let _ = env_logger::try_init().ok();
    let api = status_api(FakeGateway::default(), None::<InMemoryOrderStore>);
    let (status, body) = get_request("/api/v2/payments", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Endpoint not found");
    assert_eq!(body["path"], "/api/v2/payments");
    assert_eq!(body["method"], "GET");
    assert_eq!(body["available_endpoints"].as_array().unwrap().len(), 5);
}
