use std::sync::Arc;

use reqwest::Method;
use tracing::debug;

use shared_api::{ApiClient, Envelope};

use crate::models::{Invoice, LabResult, RecordsError, Treatment};

/// Read-only per-appointment detail records: the treatment summary, lab
/// results, and the invoice. Fetched on demand by detail views.
pub struct AppointmentRecordsService {
    api: Arc<ApiClient>,
}

impl AppointmentRecordsService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn get_treatment(
        &self,
        appointment_id: i64,
        auth_token: &str,
    ) -> Result<Treatment, RecordsError> {
        debug!("Fetching treatment for appointment {}", appointment_id);

        let path = format!("/appointments/{}/treatment", appointment_id);
        let envelope: Envelope<Treatment> = self
            .api
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(envelope.data)
    }

    pub async fn get_lab_results(
        &self,
        appointment_id: i64,
        auth_token: &str,
    ) -> Result<Vec<LabResult>, RecordsError> {
        debug!("Fetching lab results for appointment {}", appointment_id);

        let path = format!("/appointments/{}/lab-results", appointment_id);
        let envelope: Envelope<Vec<LabResult>> = self
            .api
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(envelope.data)
    }

    pub async fn get_invoice(
        &self,
        appointment_id: i64,
        auth_token: &str,
    ) -> Result<Invoice, RecordsError> {
        debug!("Fetching invoice for appointment {}", appointment_id);

        let path = format!("/appointments/{}/invoice", appointment_id);
        let envelope: Envelope<Invoice> = self
            .api
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(envelope.data)
    }
}
