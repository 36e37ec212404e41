use actix_web::http::StatusCode;
use mpg_common::GrossAmount;
use payment_engine::{
    db_types::{NewOrderRecord, OrderId, PaymentStatus},
    test_utils::{fake_gateway::FakeGateway, records::order_record},
    traits::{OrderStore, OrderStoreError},
    InMemoryOrderStore,
};
use serde_json::json;

use super::{
    helpers::{configure_apis, post_raw_request, post_request, signed_notification, status_api},
    mocks::{MockGateway, MockStore},
};

#[actix_web::test]
async fn settlement_updates_the_stored_order() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_update_status()
        .withf(|id, update| id.as_str() == "ORDER-101" && update.transaction_status() == "settlement")
        .times(1)
        .returning(|_, _| Ok(Some(order_record("ORDER-101", 150_000, "settlement"))));
    let api = status_api(MockGateway::new(), Some(store));
    let body = signed_notification("ORDER-101", "settlement");
    let (status, body) = post_request("/midtrans-webhook", &body, configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Webhook processed successfully",
            "order_id": "ORDER-101",
            "status": "success"
        })
    );
}

#[actix_web::test]
async fn forged_notification_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store.expect_update_status().times(0);
    let api = status_api(MockGateway::new(), Some(store));
    let mut body = signed_notification("ORDER-101", "settlement");
    body["gross_amount"] = json!("1.00");
    let (status, body) = post_request("/midtrans-webhook", &body, configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"success": false, "message": "Invalid signature"}));
}

#[actix_web::test]
async fn missing_fields_are_named() {
    let _ = env_logger::try_init().ok();
    let api = status_api(MockGateway::new(), None::<MockStore>);
    let mut body = signed_notification("ORDER-101", "settlement");
    body.as_object_mut().unwrap().remove("signature_key");
    body["transaction_status"] = json!("");
    let (status, body) = post_request("/midtrans-webhook", &body, configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Missing required webhook fields: signature_key, transaction_status");
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let api = status_api(MockGateway::new(), None::<MockStore>);
    let (status, body) = post_raw_request("/midtrans-webhook", "{\"order_id\": ", configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body."));
}

#[actix_web::test]
async fn store_failure_is_still_acknowledged() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_update_status()
        .times(1)
        .returning(|_, _| Err(OrderStoreError::DatabaseError("disk I/O error".to_string())));
    let api = status_api(MockGateway::new(), Some(store));
    let body = signed_notification("ORDER-101", "deny");
    let (status, body) = post_request("/midtrans-webhook", &body, configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
}

#[actix_web::test]
async fn unknown_order_is_acknowledged_but_not_created() {
    let _ = env_logger::try_init().ok();
    let store = InMemoryOrderStore::new();
    let api = status_api(FakeGateway::default(), Some(store.clone()));
    let body = signed_notification("ORDER-404", "settlement");
    let (status, body) = post_request("/midtrans-webhook", &body, configure_apis(api, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert!(store.is_empty().await);
}

#[actix_web::test]
async fn replayed_notification_changes_nothing_more() {
    let _ = env_logger::try_init().ok();
    let store = InMemoryOrderStore::new();
    let amount = GrossAmount::try_from(150_000i64).unwrap();
    store.insert_order(NewOrderRecord::new(OrderId::from("ORDER-7"), amount)).await.unwrap();
    let body = signed_notification("ORDER-7", "capture");
    for _ in 0..2 {
        let api = status_api(FakeGateway::default(), Some(store.clone()));
        let (status, _) = post_request("/midtrans-webhook", &body, configure_apis(api, None)).await;
        assert_eq!(status, StatusCode::OK);
    }
    let record = store.fetch_order(&OrderId::from("ORDER-7")).await.unwrap().unwrap();
    assert_eq!(record.status, PaymentStatus::Success);
    assert!(record.is_paid);
    assert_eq!(record.transaction_status, "capture");
    assert_eq!(record.gross_amount, amount);
    assert_eq!(store.len().await, 1);
}
