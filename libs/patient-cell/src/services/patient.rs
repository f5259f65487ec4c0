use std::sync::Arc;

use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info};

use shared_api::{ApiClient, Envelope};

use crate::models::{CreatePatientRequest, Patient, PatientError, UpdatePatientRequest};

/// Patient-profile CRUD for the authenticated account.
pub struct PatientService {
    api: Arc<ApiClient>,
}

impl PatientService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list_patients(&self, auth_token: &str) -> Result<Vec<Patient>, PatientError> {
        debug!("Fetching patient profiles");

        let envelope: Envelope<Vec<Patient>> = self
            .api
            .request(Method::GET, "/patient-profile", Some(auth_token), None)
            .await?;

        Ok(envelope.data)
    }

    pub async fn get_patient(&self, patient_id: i64, auth_token: &str) -> Result<Patient, PatientError> {
        debug!("Fetching patient profile: {}", patient_id);

        let path = format!("/patient-profile/{}", patient_id);
        let envelope: Envelope<Patient> = self
            .api
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(envelope.data)
    }

    pub async fn create_patient(
        &self,
        request: CreatePatientRequest,
        auth_token: &str,
    ) -> Result<Patient, PatientError> {
        debug!("Creating patient profile for: {}", request.name);

        let body = json!({
            "name": request.name,
            "age": request.age,
            "date_of_birth": request.date_of_birth.format("%Y-%m-%d").to_string(),
            "gender": request.gender,
            "phone": request.phone,
            "address": request.address,
            "relation": request.relation,
            "blood_type": request.blood_type,
        });

        let envelope: Envelope<Patient> = self
            .api
            .request(Method::POST, "/patient-profile", Some(auth_token), Some(body))
            .await?;

        info!("Patient profile created with ID: {}", envelope.data.id);
        Ok(envelope.data)
    }

    pub async fn update_patient(
        &self,
        patient_id: i64,
        request: UpdatePatientRequest,
        auth_token: &str,
    ) -> Result<Patient, PatientError> {
        debug!("Updating patient profile: {}", patient_id);

        let mut update_data = serde_json::Map::new();

        if let Some(name) = request.name {
            update_data.insert("name".to_string(), json!(name));
        }
        if let Some(age) = request.age {
            update_data.insert("age".to_string(), json!(age));
        }
        if let Some(date_of_birth) = request.date_of_birth {
            update_data.insert(
                "date_of_birth".to_string(),
                json!(date_of_birth.format("%Y-%m-%d").to_string()),
            );
        }
        if let Some(gender) = request.gender {
            update_data.insert("gender".to_string(), json!(gender));
        }
        if let Some(phone) = request.phone {
            update_data.insert("phone".to_string(), json!(phone));
        }
        if let Some(address) = request.address {
            update_data.insert("address".to_string(), json!(address));
        }
        if let Some(relation) = request.relation {
            update_data.insert("relation".to_string(), json!(relation));
        }
        if let Some(blood_type) = request.blood_type {
            update_data.insert("blood_type".to_string(), json!(blood_type));
        }

        let path = format!("/patient-profile/{}", patient_id);
        let envelope: Envelope<Patient> = self
            .api
            .request(Method::PUT, &path, Some(auth_token), Some(Value::Object(update_data)))
            .await?;

        Ok(envelope.data)
    }

    pub async fn delete_patient(&self, patient_id: i64, auth_token: &str) -> Result<(), PatientError> {
        debug!("Deleting patient profile: {}", patient_id);

        let path = format!("/patient-profile/{}", patient_id);
        let _: Value = self
            .api
            .request(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        info!("Patient profile {} deleted", patient_id);
        Ok(())
    }
}
