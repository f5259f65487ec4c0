use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use patient_cell::models::{CreatePatientRequest, PatientError, UpdatePatientRequest};
use patient_cell::services::PatientService;
use shared_api::ApiClient;
use shared_config::ApiConfig;

const TOKEN: &str = "test-bearer-token";

fn service_for(server: &MockServer) -> PatientService {
    let config = ApiConfig {
        api_base_url: server.uri(),
        token_path: None,
    };
    PatientService::new(Arc::new(ApiClient::new(&config)))
}

fn patient_body(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "age": 31,
        "date_of_birth": "1994-03-14",
        "gender": "female",
        "phone": "+95 9 1234 5678",
        "address": "Yangon",
        "relation": "self",
        "blood_type": "O+"
    })
}

#[tokio::test]
async fn creating_a_profile_sends_the_demographics() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/patient-profile"))
        .and(body_partial_json(json!({
            "name": "Aye Chan",
            "date_of_birth": "1994-03-14",
            "blood_type": "O+"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "data": patient_body(7, "Aye Chan")
        })))
        .mount(&server)
        .await;

    let request = CreatePatientRequest {
        name: "Aye Chan".to_string(),
        age: 31,
        date_of_birth: NaiveDate::from_ymd_opt(1994, 3, 14).unwrap(),
        gender: "female".to_string(),
        phone: "+95 9 1234 5678".to_string(),
        address: "Yangon".to_string(),
        relation: "self".to_string(),
        blood_type: "O+".to_string(),
    };

    let patient = service_for(&server).create_patient(request, TOKEN).await.unwrap();

    assert_eq!(patient.id, 7);
    assert_eq!(patient.name, "Aye Chan");
}

#[tokio::test]
async fn listing_profiles_parses_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patient-profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [patient_body(7, "Aye Chan"), patient_body(8, "Ko Ko")]
        })))
        .mount(&server)
        .await;

    let patients = service_for(&server).list_patients(TOKEN).await.unwrap();

    assert_eq!(patients.len(), 2);
    assert_eq!(patients[1].relation, "self");
}

#[tokio::test]
async fn updates_send_only_the_changed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/patient-profile/7"))
        .and(body_partial_json(json!({ "phone": "+95 9 8765 4321" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": patient_body(7, "Aye Chan")
        })))
        .mount(&server)
        .await;

    let request = UpdatePatientRequest {
        phone: Some("+95 9 8765 4321".to_string()),
        ..Default::default()
    };

    let patient = service_for(&server)
        .update_patient(7, request, TOKEN)
        .await
        .unwrap();
    assert_eq!(patient.id, 7);

    // The partial update must not include untouched fields.
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("name").is_none());
    assert!(body.get("blood_type").is_none());
}

#[tokio::test]
async fn server_validation_failures_carry_field_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/patient-profile"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": "fail",
            "statusCode": 422,
            "message": "The given data was invalid.",
            "data": { "phone": ["The phone format is invalid."] }
        })))
        .mount(&server)
        .await;

    let request = CreatePatientRequest {
        name: "Aye Chan".to_string(),
        age: 31,
        date_of_birth: NaiveDate::from_ymd_opt(1994, 3, 14).unwrap(),
        gender: "female".to_string(),
        phone: "not-a-phone".to_string(),
        address: "Yangon".to_string(),
        relation: "self".to_string(),
        blood_type: "O+".to_string(),
    };

    let err = service_for(&server)
        .create_patient(request, TOKEN)
        .await
        .unwrap_err();

    assert_matches!(err, PatientError::Validation(_));
    let fields = err.field_errors().expect("field errors");
    assert_eq!(
        fields.get("phone").map(String::as_str),
        Some("The phone format is invalid.")
    );
}

#[tokio::test]
async fn deleting_a_missing_profile_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/patient-profile/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "No such profile" })),
        )
        .mount(&server)
        .await;

    let result = service_for(&server).delete_patient(99, TOKEN).await;

    assert_matches!(result, Err(PatientError::NotFound));
}
