use assert_matches::assert_matches;
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_api::{ApiClient, Envelope};
use shared_config::ApiConfig;
use shared_models::error::ApiError;

fn client_for(server: &MockServer) -> ApiClient {
    let config = ApiConfig {
        api_base_url: server.uri(),
        token_path: None,
    };
    ApiClient::new(&config)
}

#[tokio::test]
async fn bearer_credential_and_json_headers_are_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/user"))
        .and(header("Authorization", "Bearer tok-123"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let value: serde_json::Value = client_for(&server)
        .request(Method::GET, "/auth/user", Some("tok-123"), None)
        .await
        .unwrap();

    assert_eq!(value, json!({ "ok": true }));
}

#[tokio::test]
async fn query_parameters_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/appointments"))
        .and(query_param("doctor_id", "3"))
        .and(query_param("appointment_date", "2025-06-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": []
        })))
        .mount(&server)
        .await;

    let envelope: Envelope<Vec<serde_json::Value>> = client_for(&server)
        .request_with_query(
            Method::GET,
            "/appointments",
            &[
                ("doctor_id", "3".to_string()),
                ("appointment_date", "2025-06-02".to_string()),
            ],
            Some("tok-123"),
            None,
        )
        .await
        .unwrap();

    assert!(envelope.data.is_empty());
}

#[tokio::test]
async fn missing_resource_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doctors/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "No such doctor" })),
        )
        .mount(&server)
        .await;

    let result: Result<Envelope<serde_json::Value>, ApiError> = client_for(&server)
        .request(Method::GET, "/doctors/99", Some("tok-123"), None)
        .await;

    assert_matches!(result, Err(ApiError::NotFound(_)));
}

#[tokio::test]
async fn fail_payload_is_normalized_to_validation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/appointments/patient"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": "fail",
            "statusCode": 422,
            "message": "The given data was invalid.",
            "data": { "appointment_time": ["The appointment time has already been taken."] }
        })))
        .mount(&server)
        .await;

    let result: Result<Envelope<serde_json::Value>, ApiError> = client_for(&server)
        .request(
            Method::POST,
            "/appointments/patient",
            Some("tok-123"),
            Some(json!({})),
        )
        .await;

    let err = result.unwrap_err();
    let fields = err.field_errors().expect("field errors");
    assert_eq!(
        fields.get("appointment_time").map(String::as_str),
        Some("The appointment time has already been taken.")
    );
}

#[tokio::test]
async fn unexpected_body_shape_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doctors/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result: Result<Envelope<serde_json::Value>, ApiError> = client_for(&server)
        .request(Method::GET, "/doctors/1", Some("tok-123"), None)
        .await;

    assert_matches!(result, Err(ApiError::Decode(_)));
}
