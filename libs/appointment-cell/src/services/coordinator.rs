use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use doctor_cell::models::{Doctor, WeeklyAvailability};
use patient_cell::models::Patient;
use shared_api::{ApiClient, Envelope};

use crate::models::{
    Appointment, AppointmentData, AppointmentListData, BookingError, BookingSnapshot, TimeSlot,
};
use crate::services::slots::compute_slots;

#[derive(Default)]
struct BookingState {
    doctor: Option<Doctor>,
    date: Option<NaiveDate>,
    time: Option<String>,
    patient: Option<Patient>,
    availability: Option<WeeklyAvailability>,
    slots: Vec<TimeSlot>,
    note: Option<String>,
    error: Option<String>,
    appointments: Vec<Appointment>,
    // Request epochs per selection dimension. A fetch captures the epoch
    // before awaiting and only applies its response if the epoch is still
    // current, so superseding selections always win regardless of response
    // arrival order.
    doctor_epoch: u64,
    date_epoch: u64,
}

struct DraftSubmission {
    doctor_id: i64,
    patient_id: i64,
    date: NaiveDate,
    time: String,
    note: Option<String>,
}

/// The single authoritative owner of booking state. Presentation surfaces
/// share one instance behind an `Arc` and drive it with user selections;
/// every network result is folded back into the state here.
///
/// State is only written on the caller's task and never held across an
/// await, so interleaved operations see a consistent draft.
pub struct BookingCoordinator {
    api: Arc<ApiClient>,
    state: RwLock<BookingState>,
}

impl BookingCoordinator {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            state: RwLock::new(BookingState::default()),
        }
    }

    /// Starts a booking flow for `doctor`: clears any previous date, time,
    /// and availability, then fetches the doctor's weekly template.
    ///
    /// On fetch failure the doctor selection is kept (so the user sees which
    /// doctor is chosen) while availability stays unset, allowing retry.
    pub async fn select_doctor(&self, doctor: Doctor, auth_token: &str) -> Result<(), BookingError> {
        let doctor_id = doctor.id;
        let epoch = {
            let mut s = self.state.write().await;
            s.doctor_epoch += 1;
            // Pending slot fetches for the previous doctor must not land either.
            s.date_epoch += 1;
            s.doctor = Some(doctor);
            s.date = None;
            s.time = None;
            s.availability = None;
            s.slots.clear();
            s.error = None;
            s.doctor_epoch
        };

        debug!("Fetching availability template for doctor {}", doctor_id);
        let path = format!("/doctors/{}", doctor_id);
        let result = self
            .api
            .request::<Envelope<Doctor>>(Method::GET, &path, Some(auth_token), None)
            .await;

        let mut s = self.state.write().await;
        match result {
            Ok(envelope) => {
                if s.doctor_epoch != epoch {
                    debug!("Discarding stale availability response for doctor {}", doctor_id);
                    return Ok(());
                }
                s.availability = envelope.data.availability;
                Ok(())
            }
            Err(e) => {
                warn!("Availability fetch failed for doctor {}: {}", doctor_id, e);
                if s.doctor_epoch == epoch {
                    s.error = Some("Failed to fetch doctor availability".to_string());
                }
                Err(BookingError::AvailabilityFetch(e))
            }
        }
    }

    /// Selects a calendar date, invalidating any previously chosen time, and
    /// recomputes the free slots against the server's existing bookings for
    /// (doctor, date). A no-op when no doctor is selected.
    pub async fn select_date(
        &self,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<TimeSlot>, BookingError> {
        let (doctor_id, availability, epoch) = {
            let mut s = self.state.write().await;
            let Some(doctor) = s.doctor.as_ref() else {
                return Ok(Vec::new());
            };
            let doctor_id = doctor.id;
            s.date_epoch += 1;
            s.date = Some(date);
            s.time = None;
            s.error = None;
            (doctor_id, s.availability.clone(), s.date_epoch)
        };

        debug!("Fetching existing bookings for doctor {} on {}", doctor_id, date);
        let query = [
            ("doctor_id", doctor_id.to_string()),
            ("appointment_date", date.format("%Y-%m-%d").to_string()),
        ];
        let result = self
            .api
            .request_with_query::<Envelope<AppointmentListData>>(
                Method::GET,
                "/appointments",
                &query,
                Some(auth_token),
                None,
            )
            .await;

        let mut s = self.state.write().await;
        match result {
            Ok(envelope) => {
                let slots = compute_slots(availability.as_ref(), date, &envelope.data.appointment);
                if s.date_epoch != epoch {
                    debug!("Discarding stale slot response for {}", date);
                    return Ok(slots);
                }
                debug!("Computed {} slots for {}", slots.len(), date);
                s.slots = slots.clone();
                Ok(slots)
            }
            Err(e) => {
                warn!("Booking fetch failed for doctor {} on {}: {}", doctor_id, date, e);
                if s.date_epoch == epoch {
                    s.slots.clear();
                    s.error = Some("Failed to fetch available time slots".to_string());
                }
                Err(BookingError::SlotFetch(e))
            }
        }
    }

    /// Records the chosen start time. Callers are expected to offer only
    /// slots whose `is_available` is true; availability is not re-validated
    /// here, the server rejects a taken slot at submission.
    pub async fn select_time(&self, time: &str) {
        let mut s = self.state.write().await;
        s.time = Some(time.to_string());
    }

    /// Records which patient profile the appointment is for. Independent of
    /// the doctor/date/time flow; may happen at any point before submission.
    pub async fn select_patient(&self, patient: Patient) {
        let mut s = self.state.write().await;
        s.patient = Some(patient);
    }

    pub async fn set_note(&self, note: &str) {
        let mut s = self.state.write().await;
        s.note = Some(note.to_string());
    }

    /// Submits the draft. Requires doctor, date, time, and patient; otherwise
    /// fails locally without touching the network. On success the whole draft
    /// is cleared and the confirmed appointment is appended to the cache; on
    /// failure the draft is preserved so the user can edit and retry.
    pub async fn book_appointment(&self, auth_token: &str) -> Result<Appointment, BookingError> {
        let draft = {
            let mut s = self.state.write().await;
            match (&s.doctor, &s.date, &s.time, &s.patient) {
                (Some(doctor), Some(date), Some(time), Some(patient)) => {
                    let draft = DraftSubmission {
                        doctor_id: doctor.id,
                        patient_id: patient.id,
                        date: *date,
                        time: time.clone(),
                        note: s.note.clone(),
                    };
                    s.error = None;
                    draft
                }
                _ => {
                    s.error = Some("Please fill in all required fields".to_string());
                    return Err(BookingError::IncompleteSelection);
                }
            }
        };

        info!(
            "Submitting booking for doctor {} on {} at {}",
            draft.doctor_id, draft.date, draft.time
        );
        let body = json!({
            "doctor_profile_id": draft.doctor_id,
            "patient_profile_id": draft.patient_id,
            "appointment_date": draft.date.format("%Y-%m-%d").to_string(),
            "appointment_time": draft.time,
            "notes": draft.note,
        });

        let result = self
            .api
            .request::<Envelope<AppointmentData>>(
                Method::POST,
                "/appointments/patient",
                Some(auth_token),
                Some(body),
            )
            .await;

        let mut s = self.state.write().await;
        match result {
            Ok(envelope) => {
                let appointment = envelope.data.appointment;
                // The draft is finished; bump epochs so an in-flight fetch
                // for it cannot resurrect cleared state.
                s.doctor_epoch += 1;
                s.date_epoch += 1;
                s.doctor = None;
                s.date = None;
                s.time = None;
                s.patient = None;
                s.availability = None;
                s.slots.clear();
                s.note = None;
                s.error = None;
                s.appointments.push(appointment.clone());
                info!("Appointment {} booked", appointment.id);
                Ok(appointment)
            }
            Err(e) => {
                warn!("Booking submission failed: {}", e);
                s.error = Some("Failed to book appointment".to_string());
                Err(BookingError::Submission(e))
            }
        }
    }

    /// Replaces the cached appointment list wholesale with the identity's
    /// appointments as reported by the server.
    pub async fn refresh_appointments(&self, auth_token: &str) -> Result<Vec<Appointment>, BookingError> {
        debug!("Refreshing appointment list");

        let result = self
            .api
            .request::<Envelope<Vec<Appointment>>>(
                Method::GET,
                "/patients/appointments",
                Some(auth_token),
                None,
            )
            .await;

        let mut s = self.state.write().await;
        match result {
            Ok(envelope) => {
                s.appointments = envelope.data.clone();
                Ok(envelope.data)
            }
            Err(e) => {
                warn!("Appointment refresh failed: {}", e);
                s.error = Some("Failed to fetch appointments".to_string());
                Err(BookingError::AppointmentsFetch(e))
            }
        }
    }

    pub async fn snapshot(&self) -> BookingSnapshot {
        let s = self.state.read().await;
        BookingSnapshot {
            doctor: s.doctor.clone(),
            date: s.date,
            time: s.time.clone(),
            patient: s.patient.clone(),
            availability: s.availability.clone(),
            slots: s.slots.clone(),
            note: s.note.clone(),
            error: s.error.clone(),
            appointments: s.appointments.clone(),
        }
    }

    pub async fn available_slots(&self) -> Vec<TimeSlot> {
        self.state.read().await.slots.clone()
    }

    pub async fn appointments(&self) -> Vec<Appointment> {
        self.state.read().await.appointments.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }
}
