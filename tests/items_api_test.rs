mod common;

use axum::http::Method;
use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn item_lifecycle_over_http() {
    let app = TestApp::new().await;

    // Create
    let response = app
        .request(
            Method::POST,
            "/api/v1/items",
            Some(json!({
                "itemId": "DRL-001",
                "itemName": "Cordless Drill",
                "serialNumber": "SN-100"
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["itemId"], "DRL-001");
    assert_eq!(body["data"]["status"], "Available");

    // Duplicate key is a conflict, not an upsert
    let response = app
        .request(
            Method::POST,
            "/api/v1/items",
            Some(json!({ "itemId": "DRL-001", "itemName": "Another Drill" })),
        )
        .await;
    assert_eq!(response.status(), 409);

    // Fetch
    let response = app.request(Method::GET, "/api/v1/items/DRL-001", None).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["itemName"], "Cordless Drill");
    assert_eq!(body["data"]["serialNumber"], "SN-100");

    // Update descriptive fields
    let response = app
        .request(
            Method::PUT,
            "/api/v1/items/DRL-001",
            Some(json!({ "itemName": "Cordless Drill 18V" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["itemName"], "Cordless Drill 18V");
    assert_eq!(body["data"]["status"], "Available");

    // Delete, then the item is gone
    let response = app
        .request(Method::DELETE, "/api/v1/items/DRL-001", None)
        .await;
    assert_eq!(response.status(), 200);
    let response = app.request(Method::GET, "/api/v1/items/DRL-001", None).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn list_filters_and_stats() {
    let app = TestApp::new().await;

    for (id, name) in [("SAW-1", "Circular Saw"), ("SAW-2", "Jig Saw"), ("DRL-9", "Drill")] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/items",
                Some(json!({ "itemId": id, "itemName": name })),
            )
            .await;
        assert_eq!(response.status(), 201);
    }

    // Check one item out so the status filter has something to split on
    let response = app
        .request(
            Method::POST,
            "/api/v1/checkin-checkout",
            Some(json!({
                "itemId": "SAW-1",
                "serialNumber": "SN-S1",
                "action": "checkout",
                "userId": "alice"
            })),
        )
        .await;
    assert_eq!(response.status(), 200);

    // Search
    let response = app
        .request(Method::GET, "/api/v1/items?search=Saw", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["count"], 2);

    // Status filter (URL-encoded "Checked Out")
    let response = app
        .request(Method::GET, "/api/v1/items?status=Checked%20Out", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["items"][0]["itemId"], "SAW-1");

    // Invalid status filter
    let response = app
        .request(Method::GET, "/api/v1/items?status=Broken", None)
        .await;
    assert_eq!(response.status(), 400);

    // Stats endpoint matches
    let response = app.request(Method::GET, "/api/v1/stats", None).await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["totalItems"], 3);
    assert_eq!(body["data"]["availableItems"], 2);
    assert_eq!(body["data"]["checkedOutItems"], 1);
}

#[tokio::test]
async fn check_in_out_endpoint_outcomes() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/items",
            Some(json!({ "itemId": "CAM-1", "itemName": "Thermal Camera" })),
        )
        .await;
    assert_eq!(response.status(), 201);

    // Unknown item: registration hint
    let response = app
        .request(
            Method::POST,
            "/api/v1/checkin-checkout",
            Some(json!({
                "itemId": "CAM-404",
                "serialNumber": "SN-1",
                "action": "checkout"
            })),
        )
        .await;
    assert_eq!(response.status(), 404);
    let body = response_json(response).await;
    assert_eq!(body["requiresRegistration"], true);
    assert_eq!(body["suggestedItemId"], "CAM-404");

    // Successful checkout
    let response = app
        .request(
            Method::POST,
            "/api/v1/checkin-checkout",
            Some(json!({
                "itemId": "CAM-1",
                "serialNumber": "SN-C1",
                "action": "checkout",
                "userId": "alice"
            })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"]["status"], "Checked Out");
    assert_eq!(body["data"]["checkedOutBy"], "alice");

    // Wrong-state rejection carries a reason code and the unchanged item
    let response = app
        .request(
            Method::POST,
            "/api/v1/checkin-checkout",
            Some(json!({
                "itemId": "CAM-1",
                "serialNumber": "SN-C1",
                "action": "checkout",
                "userId": "bob"
            })),
        )
        .await;
    assert_eq!(response.status(), 409);
    let body = response_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["reason"], "already_checked_out");
    assert_eq!(body["data"]["checkedOutBy"], "alice");

    // Missing serial number is a validation fault
    let response = app
        .request(
            Method::POST,
            "/api/v1/checkin-checkout",
            Some(json!({
                "itemId": "CAM-1",
                "serialNumber": "   ",
                "action": "checkin"
            })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // History shows created + checkout, newest first
    let response = app
        .request(Method::GET, "/api/v1/items/CAM-1/history", None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let history = body["data"]["history"].as_array().expect("history array");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["action"], "checkout");
    assert_eq!(history[0]["userId"], "alice");
    assert_eq!(history[1]["action"], "created");
}

#[tokio::test]
async fn csv_export_lists_all_items() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/items",
            Some(json!({ "itemId": "EXP-1", "itemName": "Endoscope" })),
        )
        .await;
    assert_eq!(response.status(), 201);

    let response = app.request(Method::GET, "/api/v1/export/csv", None).await;
    assert_eq!(response.status(), 200);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("csv body");
    let csv = String::from_utf8(bytes.to_vec()).expect("utf8 csv");
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "\"Item ID\",\"Item Name\",\"Serial Number\",\"Status\",\"Created At\",\"Updated At\",\"Checked Out By\",\"Checked Out At\""
    );
    assert!(lines.next().unwrap().starts_with("\"EXP-1\",\"Endoscope\""));
}

#[tokio::test]
async fn validation_failures_are_bad_requests() {
    let app = TestApp::new().await;

    // Empty item name
    let response = app
        .request(
            Method::POST,
            "/api/v1/items",
            Some(json!({ "itemId": "BAD-1", "itemName": "" })),
        )
        .await;
    assert_eq!(response.status(), 400);

    // Update with no updatable fields
    let response = app
        .request(
            Method::POST,
            "/api/v1/items",
            Some(json!({ "itemId": "OK-1", "itemName": "Multimeter" })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let response = app
        .request(Method::PUT, "/api/v1/items/OK-1", Some(json!({})))
        .await;
    assert_eq!(response.status(), 400);
}
