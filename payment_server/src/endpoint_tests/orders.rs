use actix_web::http::StatusCode;
use payment_engine::{
    db_types::{OrderCategory, OrderId, PaymentStatus},
    test_utils::fake_gateway::FakeGateway,
    traits::{GatewayError, OrderStore, OrderStoreError},
    InMemoryOrderStore,
    OrderFlowApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{configure_apis, post_request, status_api},
    mocks::{MockGateway, MockStore},
};

fn destination_request() -> Value {
    json!({
        "order_id": "DST-2024-0001",
        "gross_amount": "150000",
        "payment_type": "destination",
        "customer_details": {
            "first_name": "Putu",
            "last_name": "Ariani",
            "email": "putu@example.com",
            "phone": "+628123456789",
            "userId": "u-42",
            "destinasiId": "bali-01",
            "destinasiName": "Tanah Lot"
        },
        "item_details": [{"id": "bali-01", "price": 75000, "quantity": 2, "name": "Tiket Tanah Lot"}]
    })
}

#[actix_web::test]
async fn token_is_issued_and_order_recorded() {
    let _ = env_logger::try_init().ok();
    let store = InMemoryOrderStore::new();
    let gateway = FakeGateway::default();
    let orders = OrderFlowApi::new(gateway.clone(), Some(store.clone()));
    let api = status_api(gateway, Some(store.clone()));
    let (status, body) =
        post_request("/generate-snap-token", &destination_request(), configure_apis(api, Some(orders))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "snap_token": "snap-DST-2024-0001",
            "redirect_url": "https://app.sandbox.midtrans.com/snap/v4/redirection/snap-DST-2024-0001",
            "order_id": "DST-2024-0001",
            "gross_amount": 150000
        })
    );
    let record = store.fetch_order(&OrderId::from("DST-2024-0001")).await.unwrap().unwrap();
    assert_eq!(record.status, PaymentStatus::Pending);
    assert!(!record.is_paid);
    let OrderCategory::Destination(destination) = &record.details.category else {
        panic!("Expected a destination order, got {:?}", record.details.category);
    };
    assert_eq!(destination.destination_name.as_deref(), Some("Tanah Lot"));
    assert_eq!(destination.buyer.quantity, 2);
    assert_eq!(destination.buyer.user_email, "putu@example.com");
}

#[actix_web::test]
async fn missing_fields() {
    let _ = env_logger::try_init().ok();
    let orders = OrderFlowApi::new(MockGateway::new(), None::<MockStore>);
    let api = status_api(MockGateway::new(), None::<MockStore>);
    let (status, body) =
        post_request("/generate-snap-token", &json!({"order_id": "A-1"}), configure_apis(api, Some(orders))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Missing required fields: order_id, gross_amount, customer_details, item_details"
        })
    );
}

#[actix_web::test]
async fn invalid_email() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_create_transaction().times(0);
    let orders = OrderFlowApi::new(gateway, None::<MockStore>);
    let api = status_api(MockGateway::new(), None::<MockStore>);
    let mut request = destination_request();
    request["customer_details"]["email"] = json!("putu-at-example");
    let (status, body) = post_request("/generate-snap-token", &request, configure_apis(api, Some(orders))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid customer email format");
}

#[actix_web::test]
async fn negative_amount() {
    let _ = env_logger::try_init().ok();
    let orders = OrderFlowApi::new(MockGateway::new(), None::<MockStore>);
    let api = status_api(MockGateway::new(), None::<MockStore>);
    let mut request = destination_request();
    request["gross_amount"] = json!(-5);
    let (status, body) = post_request("/generate-snap-token", &request, configure_apis(api, Some(orders))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid gross_amount. Must be a valid positive number.");
}

#[actix_web::test]
async fn gateway_failure() {
    let _ = env_logger::try_init().ok();
    let mut gateway = MockGateway::new();
    gateway.expect_create_transaction().times(1).returning(|_| {
        let message = "transaction_details.order_id has already been taken".to_string();
        Err(GatewayError::Rejected { status: 400, message })
    });
    let mut store = MockStore::new();
    store.expect_insert_order().times(0);
    let orders = OrderFlowApi::new(gateway, Some(store));
    let api = status_api(MockGateway::new(), None::<MockStore>);
    let (status, body) =
        post_request("/generate-snap-token", &destination_request(), configure_apis(api, Some(orders))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Failed to generate payment token");
    assert_eq!(
        body["error"],
        "The payment gateway rejected the request (400): transaction_details.order_id has already been taken"
    );
}

#[actix_web::test]
async fn store_failure_still_returns_the_token() {
    let _ = env_logger::try_init().ok();
    let mut store = MockStore::new();
    store
        .expect_insert_order()
        .withf(|order| order.order_id.as_str() == "DST-2024-0001" && order.gross_amount.value() == 150_000)
        .times(1)
        .returning(|_| Err(OrderStoreError::DatabaseError("database is locked".to_string())));
    let orders = OrderFlowApi::new(FakeGateway::default(), Some(store));
    let api = status_api(FakeGateway::default(), None::<MockStore>);
    let (status, body) =
        post_request("/generate-snap-token", &destination_request(), configure_apis(api, Some(orders))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snap_token"], "snap-DST-2024-0001");
}
