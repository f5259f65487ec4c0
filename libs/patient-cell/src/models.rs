use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::ApiError;

/// A patient profile owned by the authenticated account. One account may
/// manage several profiles (self plus family members, via `relation`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub relation: String,
    pub blood_type: String,
}

#[derive(Debug, Clone)]
pub struct CreatePatientRequest {
    pub name: String,
    pub age: i32,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub relation: String,
    pub blood_type: String,
}

/// Partial update; only the populated fields are sent.
#[derive(Debug, Clone, Default)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub relation: Option<String>,
    pub blood_type: Option<String>,
}

#[derive(Error, Debug)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("{0}")]
    Validation(ApiError),

    #[error("Failed to reach patient records: {0}")]
    Fetch(#[source] ApiError),
}

impl PatientError {
    pub fn field_errors(&self) -> Option<&std::collections::HashMap<String, String>> {
        match self {
            PatientError::Validation(api) => api.field_errors(),
            _ => None,
        }
    }
}

impl From<ApiError> for PatientError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::NotFound(_) => PatientError::NotFound,
            ApiError::Validation { .. } => PatientError::Validation(e),
            other => PatientError::Fetch(other),
        }
    }
}
