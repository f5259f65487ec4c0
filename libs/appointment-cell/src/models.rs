use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use doctor_cell::models::{Doctor, WeeklyAvailability};
use patient_cell::models::Patient;
use shared_models::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// A server-confirmed appointment. The server owns this record; the client
/// only ever holds a read-only cached copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub patient_profile_id: i64,
    pub doctor_profile_id: i64,
    pub appointment_date: NaiveDate,
    /// Time of day as reported by the server, possibly with seconds
    /// ("09:00:00"). Compared against template times by prefix.
    pub appointment_time: String,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A candidate start time for the currently selected doctor and date.
/// Ephemeral: recomputed whenever either selection changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: String,
    pub is_available: bool,
}

/// Read-only view of the coordinator state for the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct BookingSnapshot {
    pub doctor: Option<Doctor>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub patient: Option<Patient>,
    pub availability: Option<WeeklyAvailability>,
    pub slots: Vec<TimeSlot>,
    pub note: Option<String>,
    pub error: Option<String>,
    pub appointments: Vec<Appointment>,
}

impl BookingSnapshot {
    /// True once doctor, date, time, and patient are all chosen.
    pub fn is_submittable(&self) -> bool {
        self.doctor.is_some() && self.date.is_some() && self.time.is_some() && self.patient.is_some()
    }
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Failed to fetch doctor availability")]
    AvailabilityFetch(#[source] ApiError),

    #[error("Failed to fetch available time slots")]
    SlotFetch(#[source] ApiError),

    /// Submission attempted before all four selections were made. Purely
    /// local; no request is issued.
    #[error("Please fill in all required fields")]
    IncompleteSelection,

    #[error("Failed to book appointment")]
    Submission(#[source] ApiError),

    #[error("Failed to fetch appointments")]
    AppointmentsFetch(#[source] ApiError),
}

impl BookingError {
    /// Field-level validation messages from a rejected submission.
    pub fn field_errors(&self) -> Option<&HashMap<String, String>> {
        match self {
            BookingError::Submission(api) => api.field_errors(),
            _ => None,
        }
    }
}

// Wire shapes for the appointment endpoints.

/// `GET /appointments?doctor_id=..&appointment_date=..` nests the list under
/// `data.appointment`.
#[derive(Debug, Deserialize)]
pub struct AppointmentListData {
    #[serde(default)]
    pub appointment: Vec<Appointment>,
}

/// `POST /appointments/patient` nests the created record the same way.
#[derive(Debug, Deserialize)]
pub struct AppointmentData {
    pub appointment: Appointment,
}

// Per-appointment detail records (read-only views).

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Treatment {
    pub id: i64,
    pub appointment_id: i64,
    pub diagnosis: String,
    #[serde(default)]
    pub prescription: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabResultStatus {
    Normal,
    Abnormal,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabResult {
    pub id: i64,
    pub test_name: String,
    pub date: NaiveDate,
    pub status: LabResultStatus,
    pub value: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub reference_range: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub appointment_id: i64,
    pub total: f64,
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    #[serde(default)]
    pub issued_date: Option<NaiveDate>,
}

#[derive(Error, Debug)]
pub enum RecordsError {
    #[error("Record not found")]
    NotFound,

    #[error("Failed to fetch appointment records: {0}")]
    Fetch(#[source] ApiError),
}

impl From<ApiError> for RecordsError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::NotFound(_) => RecordsError::NotFound,
            other => RecordsError::Fetch(other),
        }
    }
}
