//! Carrier API client against a mock upstream.

use crate::common::{TRACKING_PATH, error_envelope, success_envelope};
use skylink_client::TrackingClient;
use skylink_core::TrackingStatus;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> TrackingClient {
    TrackingClient::new(format!("{}{TRACKING_PATH}", server.uri()))
}

#[tokio::test]
async fn test_fetch_raw_relays_body_verbatim() {
    let server = MockServer::start().await;
    let body = success_envelope("SKY123");

    Mock::given(method("GET"))
        .and(path(TRACKING_PATH))
        .and(query_param("AWBNO", "SKY123"))
        .and(header("cache-control", "no-cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let raw = client_for(&server).fetch_raw("SKY123").await.unwrap();
    assert_eq!(raw, body);
}

#[tokio::test]
async fn test_track_sanitizes_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TRACKING_PATH))
        .and(query_param("AWBNO", "SKY123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_envelope("SKY123")))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = client_for(&server).track(" SKY-123 ").await.unwrap();
    assert_eq!(envelope.data.tracking_status(), TrackingStatus::Success);
    assert_eq!(envelope.data.awb_number.as_deref(), Some("SKY123"));
    assert_eq!(envelope.data.history.len(), 2);
}

#[tokio::test]
async fn test_track_rejects_punctuation_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server).track(" -- / ").await.unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(err.user_message(), "Please enter a valid tracking number");
}

#[tokio::test]
async fn test_track_surfaces_embedded_error_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TRACKING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_envelope(Some("Not found"))))
        .mount(&server)
        .await;

    let err = client_for(&server).track("SKY404").await.unwrap_err();
    assert!(err.is_application());
    assert!(!err.is_transport());
    assert_eq!(err.user_message(), "Not found");
}

#[tokio::test]
async fn test_track_embedded_error_without_message_uses_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_envelope(None)))
        .mount(&server)
        .await;

    let err = client_for(&server).track("SKY404").await.unwrap_err();
    assert_eq!(
        err.user_message(),
        "No tracking information found for this number"
    );
}

#[tokio::test]
async fn test_track_null_data_is_application_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "statusCode": 404,
            "message": "AWB not found",
            "data": null
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).track("SKY404").await.unwrap_err();
    assert!(err.is_application());
    assert!(!err.is_transport());
    assert_eq!(err.user_message(), "AWB not found");
}

#[tokio::test]
async fn test_non_success_status_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_raw("SKY1").await.unwrap_err();
    assert!(err.is_transport());
    assert!(matches!(err, skylink_client::Error::Status { status: 503, .. }));
    assert_eq!(err.user_message(), "Failed to fetch tracking information");
}

#[tokio::test]
async fn test_html_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_raw("SKY1").await.unwrap_err();
    assert!(matches!(err, skylink_client::Error::Decode { .. }));
}

#[tokio::test]
async fn test_unreachable_upstream_is_http_error() {
    let server = MockServer::start().await;
    let url = format!("{}{TRACKING_PATH}", server.uri());
    drop(server);

    let err = TrackingClient::new(url).fetch_raw("SKY1").await.unwrap_err();
    assert!(matches!(err, skylink_client::Error::Http(_)));
    assert!(err.is_transport());
}
