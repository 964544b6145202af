use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use tourism_api::{app, middleware::StaffClaims, AppState};
use tourism_booking::{BookingManager, InMemoryBookingRepository};
use tourism_catalog::{Accommodation, InMemoryCatalog, Package};
use tower::ServiceExt;

const SECRET: &str = "test-secret";

fn catalog() -> InMemoryCatalog {
    let room = |id: &str, destination: &str, room_type: &str, price: i64| Accommodation {
        id: id.to_string(),
        name: format!("{} {}", room_type, id),
        destination_id: destination.to_string(),
        room_type: Some(room_type.to_string()),
        base_price: Decimal::from(price),
        base_occupancy: 2,
        extra_boarder_price: Some(Decimal::from(500)),
        max_occupancy: 4,
        total_units: 5,
        is_active: true,
    };
    InMemoryCatalog::new()
        .with_accommodation(room("a1", "d1", "COTTAGE", 3500))
        .with_accommodation(room("a2", "d2", "COTTAGE", 4000))
        .with_accommodation(room("a3", "d2", "DORMITORY", 900))
        .with_package(Package {
            id: "p2".to_string(),
            name: "Spiritual Journey".to_string(),
            duration_days: Some(3),
            price_inr: Some(Decimal::from(8000)),
            is_active: true,
        })
}

fn test_app() -> Router {
    let manager = BookingManager::new(Arc::new(InMemoryBookingRepository::new()), Arc::new(catalog()));
    app(AppState::new(manager, SECRET))
}

fn token(user_type: &str) -> String {
    let claims = StaffClaims {
        sub: "staff-1".to_string(),
        user_type: user_type.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_as(app, method, uri, body, Some(&token("PORTAL_STAFF"))).await
}

async fn send_as(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn stay_draft() -> Value {
    json!({
        "item_type": "ACCOMMODATION",
        "item_id": "a1",
        "check_in": "2025-01-20",
        "check_out": "2025-01-23",
        "unit_count": 1,
        "pax_adults": 2,
        "customer_name": "Rahul Sharma",
        "customer_phone": "9876543210",
        "payment_status": "PAID"
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app();
    let (status, body) = send_as(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_requires_staff_token() {
    let app = test_app();
    let quote = json!({"item_type": "PACKAGE", "item_id": "p2", "check_in": "2025-02-10"});

    let (status, body) = send_as(&app, "POST", "/v1/pricing/quote", Some(quote.clone()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send_as(&app, "POST", "/v1/pricing/quote", Some(quote), Some(&token("CUSTOMER"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_quote_accommodation_with_extra_boarders() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/v1/pricing/quote",
        Some(json!({
            "item_type": "ACCOMMODATION",
            "item_id": "a1",
            "check_in": "2025-01-20",
            "check_out": "2025-01-23",
            "unit_count": 2,
            "pax_adults": 5
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 3 nights * 2 units * 3500 + 1 extra boarder * 500 * 3 nights
    assert_eq!(body["total"].as_f64(), Some(22500.0));
    assert!(!body["breakdown"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_quote_without_selection_is_empty() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/v1/pricing/quote",
        Some(json!({"item_type": "PACKAGE", "check_in": "2025-02-10"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"].as_f64(), Some(0.0));
    assert!(body["breakdown"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_quote_unknown_item_is_not_found() {
    let app = test_app();
    let (status, _) = send(
        &app,
        "POST",
        "/v1/pricing/quote",
        Some(json!({"item_type": "PACKAGE", "item_id": "p404", "check_in": "2025-02-10"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quote_needs_an_adult() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/v1/pricing/quote",
        Some(json!({"item_type": "PACKAGE", "item_id": "p2", "check_in": "2025-02-10", "pax_adults": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed: At least one adult is required");
}

#[tokio::test]
async fn test_booking_stay_flow() {
    let app = test_app();

    let (status, created) = send(&app, "POST", "/v1/bookings", Some(stay_draft())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["booking_status"], "CONFIRMED");
    assert_eq!(created["payment_status"], "PAID");
    assert_eq!(created["total_amount"].as_f64(), Some(10500.0));
    assert_eq!(created["balance_due"].as_f64(), Some(0.0));
    assert_eq!(created["created_by"], "staff-1");
    assert!(created["booking_reference"].as_str().unwrap().starts_with("TRP-"));
    assert_eq!(created["available_actions"], json!(["CHECK_IN", "CANCEL"]));

    let id = created["id"].as_str().unwrap().to_string();

    let (status, checked_in) = send(&app, "POST", &format!("/v1/bookings/{}/check-in", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(checked_in["booking"]["booking_status"], "CHECKED_IN");
    assert_eq!(checked_in["event"]["from_status"], "CONFIRMED");
    assert_eq!(checked_in["event"]["to_status"], "CHECKED_IN");

    let (status, body) = send(&app, "POST", &format!("/v1/bookings/{}/check-in", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("CHECKED_IN"));

    let (status, _) = send(&app, "POST", &format!("/v1/bookings/{}/check-out", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, done) = send(
        &app,
        "POST",
        &format!("/v1/bookings/{}/check-out/complete", id),
        Some(json!({"additional_revenue": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["booking"]["booking_status"], "CHECKED_OUT");
    assert_eq!(done["booking"]["additional_revenue"].as_f64(), Some(0.0));

    let (status, fetched) = send(&app, "GET", &format!("/v1/bookings/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["booking_status"], "CHECKED_OUT");
}

#[tokio::test]
async fn test_partial_payment_shows_balance() {
    let app = test_app();
    let draft = json!({
        "item_type": "PACKAGE",
        "item_id": "p2",
        "check_in": "2025-02-10",
        "check_out": "2025-02-12",
        "pax_adults": 4,
        "customer_name": "Amit Patel",
        "customer_phone": "9876500000",
        "payment_status": "PARTIAL",
        "partial_amount": 10000
    });

    let (status, created) = send(&app, "POST", "/v1/bookings", Some(draft)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["total_amount"].as_f64(), Some(32000.0));
    assert_eq!(created["effective_payment_status"], "PARTIAL");
    assert_eq!(created["balance_due"].as_f64(), Some(22000.0));
}

#[tokio::test]
async fn test_invalid_draft_is_rejected() {
    let app = test_app();
    let mut draft = stay_draft();
    draft["customer_phone"] = json!("");

    let (status, body) = send(&app, "POST", "/v1/bookings", Some(draft)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("phone"));

    let (_, list) = send(&app, "GET", "/v1/bookings", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_booking_is_not_found() {
    let app = test_app();
    let uri = format!("/v1/bookings/{}", uuid::Uuid::new_v4());
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let app = test_app();
    let (_, first) = send(&app, "POST", "/v1/bookings", Some(stay_draft())).await;
    send(&app, "POST", "/v1/bookings", Some(stay_draft())).await;

    let id = first["id"].as_str().unwrap();
    send(&app, "POST", &format!("/v1/bookings/{}/cancel", id), None).await;

    let (status, cancelled) = send(&app, "GET", "/v1/bookings?status=CANCELLED", None).await;
    assert_eq!(status, StatusCode::OK);
    let cancelled = cancelled.as_array().unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0]["id"], first["id"]);

    let (_, all) = send(&app, "GET", "/v1/bookings", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_mass_update_preview() {
    let app = test_app();

    let (status, destinations) = send(&app, "GET", "/v1/catalog/room-type-destinations?room_type=COTTAGE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(destinations, json!(["d1", "d2"]));

    let (status, plan) = send(
        &app,
        "POST",
        "/v1/catalog/mass-update/preview",
        Some(json!({
            "room_type": "COTTAGE",
            "destination_ids": ["d2"],
            "action": {"kind": "BLOCK", "start_date": "2025-03-01", "end_date": "2025-03-05"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let targets = plan["targets"].as_array().unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0]["accommodation_id"], "a2");

    let (status, _) = send(
        &app,
        "POST",
        "/v1/catalog/mass-update/preview",
        Some(json!({
            "room_type": "COTTAGE",
            "destination_ids": [],
            "action": {"kind": "BLOCK", "start_date": "2025-03-01", "end_date": "2025-03-05"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
