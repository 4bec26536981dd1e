//! End-to-end tests of the HTTP API against a scripted USB bus

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use xprint_server::{Config, ServerState, api};
use xprint_usb::mock::{MockBus, MockDevice, MockOp, MockStep};
use xprint_usb::{Alignment, PrintError};

fn app(bus: MockBus) -> Router {
    let config = Config::from_vars(|_| None);
    api::router(ServerState::with_bus(config, bus))
}

fn xprinter() -> MockDevice {
    MockDevice::new(0x0483, 0x5743)
}

async fn post_print(app: Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/print")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app(MockBus::new()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "API is running"}));
}

#[tokio::test]
async fn test_print_hello_center_bold() {
    let bus = MockBus::new().with_device(xprinter());

    let (status, body) = post_print(
        app(bus.clone()),
        json!({"text": "Hello", "bold": true, "align": "center"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Print successful"}));
    assert_eq!(
        bus.ops(),
        vec![
            MockOp::Align(Alignment::Center),
            MockOp::Bold(true),
            MockOp::Text("Hello\n".into()),
            MockOp::Cut,
        ]
    );
}

#[tokio::test]
async fn test_print_defaults() {
    let bus = MockBus::new().with_device(xprinter());

    let (status, _) = post_print(app(bus.clone()), json!({"text": "plain"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(bus.ops()[0], MockOp::Align(Alignment::Left));
    assert_eq!(bus.ops()[1], MockOp::Bold(false));
}

#[tokio::test]
async fn test_print_strips_non_ascii() {
    let bus = MockBus::new().with_device(xprinter());

    let (status, _) = post_print(app(bus.clone()), json!({"text": "café☕"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(bus.ops()[2], MockOp::Text("caf\n".into()));
}

#[tokio::test]
async fn test_unknown_alignment_prints_left() {
    let bus = MockBus::new().with_device(xprinter());

    let (status, _) = post_print(app(bus.clone()), json!({"text": "x", "align": "Middle"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(bus.ops()[0], MockOp::Align(Alignment::Left));
}

#[tokio::test]
async fn test_no_device() {
    let bus = MockBus::new();

    let (status, body) = post_print(app(bus.clone()), json!({"text": "Hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "no_device");
    assert_eq!(body["message"], "Printer not detected or inaccessible");
    assert_eq!(bus.open_attempts(), 0);
}

#[tokio::test]
async fn test_connection_failed() {
    let bus = MockBus::new()
        .with_device(xprinter())
        .fail_open(PrintError::Connection("Resource busy".into()));

    let (status, body) = post_print(app(bus.clone()), json!({"text": "Hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "connection_failed");
    assert!(body["message"].as_str().unwrap().contains("Resource busy"));
    assert!(bus.ops().is_empty());
}

#[tokio::test]
async fn test_print_failed() {
    let bus = MockBus::new()
        .with_device(xprinter())
        .fail_step(MockStep::Text, PrintError::Write("Pipe error".into()));

    let (status, body) = post_print(app(bus), json!({"text": "Hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "print_failed");
    assert_eq!(body["message"], "Print error: Write failed: Pipe error");
}

#[tokio::test]
async fn test_cut_failure_is_success() {
    let bus = MockBus::new()
        .with_device(xprinter())
        .fail_step(MockStep::Cut, PrintError::Unsupported("no cutter".into()));

    let (status, body) = post_print(app(bus), json!({"text": "Hello"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Print successful", "cut": false}));
}

#[tokio::test]
async fn test_missing_text_is_rejected_before_device_access() {
    let bus = MockBus::new().with_device(xprinter());

    let (status, _) = post_print(app(bus.clone()), json!({"bold": true})).await;

    assert!(status.is_client_error());
    assert_eq!(bus.describe_calls(), 0);
}
