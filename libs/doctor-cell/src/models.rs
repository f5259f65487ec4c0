use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::ApiError;

/// A doctor's recurring weekly pattern of bookable start times, keyed by
/// short weekday name ("Mon".."Sun"). Times are "HH:MM" strings and must
/// match the server's appointment-time prefix format.
pub type WeeklyAvailability = HashMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub experience_years: Option<i32>,
    #[serde(default)]
    pub availability: Option<WeeklyAvailability>,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Failed to fetch doctors: {0}")]
    Fetch(#[source] ApiError),
}

impl From<ApiError> for DoctorError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::NotFound(_) => DoctorError::NotFound,
            other => DoctorError::Fetch(other),
        }
    }
}
