mod common;

use axum::{
    body::Body,
    http::{Method, Request},
};
use serde_json::json;

use common::{response_json, TestApp};

const BOUNDARY: &str = "toolroom-test-boundary";

fn multipart_request(uri: &str, parts: &[(&str, &str, &str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, content_type, bytes) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("build multipart request")
}

async fn seed_item(app: &TestApp, item_id: &str) {
    let response = app
        .request(
            Method::POST,
            "/api/v1/items",
            Some(json!({ "itemId": item_id, "itemName": "Oscilloscope" })),
        )
        .await;
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn receipt_upload_and_listing() {
    let app = TestApp::new().await;
    seed_item(&app, "OSC-1").await;

    let request = multipart_request(
        "/api/v1/items/OSC-1/receipts",
        &[(
            "receipts",
            "invoice.pdf",
            "application/pdf",
            b"%PDF-1.4 fake receipt",
        )],
    );
    let response = app.request_raw(request).await;
    assert_eq!(response.status(), 201);
    let body = response_json(response).await;
    assert_eq!(body["data"][0]["originalName"], "invoice.pdf");
    assert_eq!(body["data"][0]["mimeType"], "application/pdf");

    let response = app
        .request(Method::GET, "/api/v1/items/OSC-1/receipts", None)
        .await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().expect("receipts").len(), 1);

    // The stored file actually exists on disk
    let filename = body["data"][0]["filename"].as_str().expect("filename");
    let path = app.state.services.inventory.receipts_dir().join(filename);
    assert!(path.exists(), "stored receipt file missing: {:?}", path);
}

#[tokio::test]
async fn non_pdf_receipts_are_rejected() {
    let app = TestApp::new().await;
    seed_item(&app, "OSC-2").await;

    let request = multipart_request(
        "/api/v1/items/OSC-2/receipts",
        &[("receipts", "notes.txt", "text/plain", b"not a pdf")],
    );
    let response = app.request_raw(request).await;
    assert_eq!(response.status(), 400);

    let response = app
        .request(Method::GET, "/api/v1/items/OSC-2/receipts", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().expect("receipts").len(), 0);
}

#[tokio::test]
async fn photo_upload_updates_the_item() {
    let app = TestApp::new().await;
    seed_item(&app, "OSC-3").await;

    // Minimal PNG header is enough; content is not inspected beyond the type
    let request = multipart_request(
        "/api/v1/items/OSC-3/photo",
        &[("photo", "front.png", "image/png", b"\x89PNG\r\n\x1a\nfake")],
    );
    let response = app.request_raw(request).await;
    assert_eq!(response.status(), 200);
    let body = response_json(response).await;
    let filename = body["data"]["photoFilename"].as_str().expect("photo set");
    assert!(filename.ends_with(".png"));

    let path = app.state.services.inventory.photos_dir().join(filename);
    assert!(path.exists(), "stored photo file missing: {:?}", path);

    // Upload against a missing item 404s
    let request = multipart_request(
        "/api/v1/items/OSC-404/photo",
        &[("photo", "front.png", "image/png", b"\x89PNG")],
    );
    let response = app.request_raw(request).await;
    assert_eq!(response.status(), 404);
}
