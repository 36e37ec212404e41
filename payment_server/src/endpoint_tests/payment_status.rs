use actix_web::http::StatusCode;
use mpg_common::GrossAmount;
use payment_engine::{
    db_types::{NewOrderRecord, OrderId, PaymentStatus},
    test_utils::{fake_gateway::FakeGateway, records::order_record},
    traits::{GatewayError, GatewayStatusReport, OrderStore, OrderStoreError},
    InMemoryOrderStore,
};
use serde_json::json;

use super::{
    helpers::{configure_apis, get_request, status_api},
    mocks::{MockGateway, MockStore},
};

async fn seeded_store(order_id: &str) -> InMemoryOrderStore {
    let store = InMemoryOrderStore::new();
    let order = NewOrderRecord::new(OrderId::from(order_id), GrossAmount::try_from(150_000i64).unwrap());
    store.insert_order(order).await.unwrap();
    store
}

#[actix_web::test]
async fn gateway_status_is_reported_and_stored() {
    let _ = env_logger::try_init().ok();
    let store = seeded_store("ORDER-55").await;
    let gateway = FakeGateway::default().with_status("ORDER-55", "settlement");
    let api = status_api(gateway, Some(store.clone()));
    let (status, body) = get_request("/payment-status/ORDER-55", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["order_id"], "ORDER-55");
    assert_eq!(body["status"], "success");
    assert_eq!(body["is_paid"], true);
    assert_eq!(body["can_navigate_home"], true);
    assert_eq!(body["transaction_status"], "settlement");
    assert_eq!(body["message"], "Payment successful!");
    assert_eq!(body["payment_type"], "bank_transfer");
    assert_eq!(body["fraud_status"], "accept");
    assert_eq!(body["sources"], json!({"store": true, "gateway": true, "store_update_success": true}));
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    let record = store.fetch_order(&OrderId::from("ORDER-55")).await.unwrap().unwrap();
    assert_eq!(record.status, PaymentStatus::Success);
    assert!(record.is_paid);
}

#[actix_web::test]
async fn stored_status_is_used_when_gateway_is_down() {
    let _ = env_logger::try_init().ok();
    let store = seeded_store("ORDER-56").await;
    let api = status_api(FakeGateway::unreachable(), Some(store));
    let (status, body) = get_request("/payment-status/ORDER-56", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["is_paid"], false);
    assert_eq!(body["can_navigate_home"], false);
    assert_eq!(body["transaction_status"], "pending");
    assert_eq!(body["sources"], json!({"store": true, "gateway": false, "store_update_success": false}));
    assert!(body.get("payment_type").is_none());
}

#[actix_web::test]
async fn gateway_only_order_is_not_stored() {
    let _ = env_logger::try_init().ok();
    let store = InMemoryOrderStore::new();
    let gateway = FakeGateway::default().with_status("ORDER-57", "expire");
    let api = status_api(gateway, Some(store.clone()));
    let (status, body) = get_request("/payment-status/ORDER-57", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "expired");
    assert_eq!(body["message"], "Payment has expired");
    assert_eq!(body["sources"], json!({"store": false, "gateway": true, "store_update_success": false}));
    assert!(store.is_empty().await);
}

#[actix_web::test]
async fn unknown_order_is_not_found() {
    let _ = env_logger::try_init().ok();
    let api = status_api(FakeGateway::default(), Some(InMemoryOrderStore::new()));
    let (status, body) = get_request("/payment-status/ORDER-404", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Payment not found");
    assert_eq!(body["order_id"], "ORDER-404");
    assert_eq!(
        body["midtrans_error"],
        "The payment gateway rejected the request (404): Transaction doesn't exist."
    );
}

#[actix_web::test]
async fn malformed_order_id() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_transaction_status().times(0);
    let api = status_api(gateway, None::<MockStore>);
    let (status, body) = get_request("/payment-status/ORDER$1", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "message": "Invalid order ID format"}));
}

#[actix_web::test]
async fn missing_order_id() {
    let _ = env_logger::try_init().ok();
    let api = status_api(MockGateway::new(), None::<MockStore>);
    let (status, body) = get_request("/payment-status/", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "message": "Order ID is required"}));
}

#[actix_web::test]
async fn store_read_failure_is_tolerated() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway
        .expect_transaction_status()
        .times(1)
        .returning(|id| Ok(GatewayStatusReport::new(id.clone(), "cancel")));
    let mut store = MockStore::new();
    store.expect_fetch_order().times(1).returning(|_| Err(OrderStoreError::Timeout));
    store.expect_update_status().times(0);
    let api = status_api(gateway, Some(store));
    let (status, body) = get_request("/payment-status/ORDER-58", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cancelled");
    assert_eq!(body["message"], "Payment was cancelled");
    assert_eq!(body["sources"], json!({"store": false, "gateway": true, "store_update_success": false}));
}

#[actix_web::test]
async fn empty_gateway_status_counts_as_a_failure() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_transaction_status().returning(|id| Ok(GatewayStatusReport::new(id.clone(), "")));
    let api = status_api(gateway, None::<MockStore>);
    let (status, body) = get_request("/payment-status/ORDER-59", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["midtrans_error"].as_str().unwrap().contains("unexpected response"));
}

#[actix_web::test]
async fn gateway_rejection_falls_back_on_the_store() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway
        .expect_transaction_status()
        .returning(|_| Err(GatewayError::Rejected { status: 401, message: "Access denied".to_string() }));
    let store = seeded_store("ORDER-60").await;
    let api = status_api(gateway, Some(store));
    let (status, body) = get_request("/payment-status/ORDER-60", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["sources"]["gateway"], false);
}

#[actix_web::test]
async fn failed_write_back_still_reports_the_gateway_status() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway
        .expect_transaction_status()
        .times(1)
        .returning(|id| Ok(GatewayStatusReport::new(id.clone(), "settlement")));
    let mut store = MockStore::new();
    store.expect_fetch_order().times(1).returning(|_| Ok(Some(order_record("ORDER-61", 150_000, "pending"))));
    store
        .expect_update_status()
        .times(1)
        .returning(|_, _| Err(OrderStoreError::DatabaseError("database is locked".to_string())));
    let api = status_api(gateway, Some(store));
    let (status, body) = get_request("/payment-status/ORDER-61", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "success");
    assert_eq!(body["is_paid"], true);
    assert_eq!(body["transaction_status"], "settlement");
    assert_eq!(body["sources"], json!({"store": true, "gateway": true, "store_update_success": false}));
}
