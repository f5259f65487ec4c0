use std::sync::Arc;

use reqwest::Method;
use tracing::debug;

use shared_api::{ApiClient, Envelope};

use crate::models::{Doctor, DoctorError};

/// Read-only doctor browsing over the scheduling API.
pub struct DoctorService {
    api: Arc<ApiClient>,
}

impl DoctorService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list_doctors(&self, auth_token: &str) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Fetching doctor directory");

        let envelope: Envelope<Vec<Doctor>> = self
            .api
            .request(Method::GET, "/admin/doctors", Some(auth_token), None)
            .await?;

        Ok(envelope.data)
    }

    /// Fetches one doctor including the weekly availability template.
    pub async fn get_doctor(&self, doctor_id: i64, auth_token: &str) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor detail: {}", doctor_id);

        let path = format!("/doctors/{}", doctor_id);
        let envelope: Envelope<Doctor> = self
            .api
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(envelope.data)
    }
}
