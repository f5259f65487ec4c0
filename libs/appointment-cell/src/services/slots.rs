use chrono::{Datelike, Duration, NaiveDate, Weekday};

use doctor_cell::models::WeeklyAvailability;

use crate::models::{Appointment, TimeSlot};

/// Upper bound on how far ahead the booking flow lets a date be picked. UX
/// constraint only; the server remains the source of truth.
pub const BOOKING_WINDOW_DAYS: i64 = 30;

/// Template keys use fixed Gregorian short weekday names so client and
/// server agree regardless of locale.
pub fn weekday_key(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Derives the candidate slots for a doctor and date: one slot per template
/// time for that date's weekday, marked unavailable when an existing booking
/// starts at that time. Server times may carry seconds, so occupancy is a
/// prefix match on the time string.
pub fn compute_slots(
    availability: Option<&WeeklyAvailability>,
    date: NaiveDate,
    booked: &[Appointment],
) -> Vec<TimeSlot> {
    let Some(template) = availability else {
        return Vec::new();
    };

    let Some(times) = template.get(weekday_key(date)) else {
        // No template entry for this weekday: nothing bookable, not an error.
        return Vec::new();
    };

    times
        .iter()
        .map(|time| TimeSlot {
            time: time.clone(),
            is_available: !booked
                .iter()
                .any(|app| app.appointment_time.starts_with(time.as_str())),
        })
        .collect()
}

pub fn is_bookable_date(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today && date <= today + Duration::days(BOOKING_WINDOW_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use std::collections::HashMap;

    fn template(entries: &[(&str, &[&str])]) -> WeeklyAvailability {
        entries
            .iter()
            .map(|(day, times)| {
                (
                    day.to_string(),
                    times.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect::<HashMap<_, _>>()
    }

    fn booked_at(time: &str) -> Appointment {
        Appointment {
            id: 1,
            patient_profile_id: 10,
            doctor_profile_id: 20,
            appointment_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            appointment_time: time.to_string(),
            status: AppointmentStatus::Confirmed,
            notes: None,
        }
    }

    #[test]
    fn weekday_keys_are_fixed_short_names() {
        // 2025-06-02 is a Monday.
        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(weekday_key(monday), "Mon");
        assert_eq!(weekday_key(monday + Duration::days(1)), "Tue");
        assert_eq!(weekday_key(monday + Duration::days(2)), "Wed");
        assert_eq!(weekday_key(monday + Duration::days(3)), "Thu");
        assert_eq!(weekday_key(monday + Duration::days(4)), "Fri");
        assert_eq!(weekday_key(monday + Duration::days(5)), "Sat");
        assert_eq!(weekday_key(monday + Duration::days(6)), "Sun");
    }

    #[test]
    fn slots_mirror_the_template_entries_exactly() {
        let avail = template(&[("Mon", &["09:00", "10:00", "11:00"])]);
        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();

        let slots = compute_slots(Some(&avail), monday, &[]);

        let times: Vec<&str> = slots.iter().map(|s| s.time.as_str()).collect();
        assert_eq!(times, vec!["09:00", "10:00", "11:00"]);
        assert!(slots.iter().all(|s| s.is_available));
    }

    #[test]
    fn booked_time_with_seconds_marks_slot_unavailable() {
        let avail = template(&[("Mon", &["09:00", "10:00"])]);
        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();

        let slots = compute_slots(Some(&avail), monday, &[booked_at("09:00:00")]);

        assert_eq!(
            slots,
            vec![
                TimeSlot { time: "09:00".to_string(), is_available: false },
                TimeSlot { time: "10:00".to_string(), is_available: true },
            ]
        );
    }

    #[test]
    fn missing_weekday_entry_yields_no_slots() {
        let avail = template(&[("Mon", &["09:00"])]);
        // 2025-06-03 is a Tuesday, absent from the template.
        let tuesday = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();

        assert!(compute_slots(Some(&avail), tuesday, &[]).is_empty());
    }

    #[test]
    fn missing_template_yields_no_slots() {
        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert!(compute_slots(None, monday, &[]).is_empty());
    }

    #[test]
    fn recomputation_is_idempotent() {
        let avail = template(&[("Mon", &["09:00", "10:00"])]);
        let monday = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let booked = vec![booked_at("10:00:00")];

        let first = compute_slots(Some(&avail), monday, &booked);
        let second = compute_slots(Some(&avail), monday, &booked);
        assert_eq!(first, second);
    }

    #[test]
    fn booking_window_bounds() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();

        assert!(is_bookable_date(today, today));
        assert!(is_bookable_date(today + Duration::days(BOOKING_WINDOW_DAYS), today));
        assert!(!is_bookable_date(today - Duration::days(1), today));
        assert!(!is_bookable_date(today + Duration::days(BOOKING_WINDOW_DAYS + 1), today));
    }
}
