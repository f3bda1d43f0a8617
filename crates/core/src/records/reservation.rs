use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::{is_valid_email, is_valid_time, require_non_blank};
use super::{Document, ValidationError};

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// A table reservation made by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub customer_email: String,
    pub date: NaiveDate,
    /// Wall-clock time as entered, `HH:MM` or `HH:MM:SS`.
    pub time: String,
    #[serde(default)]
    pub status: ReservationStatus,
    pub number_of_people: u32,
}

impl Reservation {
    /// Creates a pending reservation.
    pub fn new(
        customer_email: impl Into<String>,
        date: NaiveDate,
        time: impl Into<String>,
        number_of_people: u32,
    ) -> Self {
        Self {
            customer_email: customer_email.into(),
            date,
            time: time.into(),
            status: ReservationStatus::Pending,
            number_of_people,
        }
    }

    /// Sets the status for this reservation.
    pub fn with_status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }
}

/// Partial update for a [`Reservation`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_people: Option<u32>,
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    require_non_blank("customerEmail", email)?;
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

fn validate_time(time: &str) -> Result<(), ValidationError> {
    if !is_valid_time(time) {
        return Err(ValidationError::InvalidTime(time.to_string()));
    }
    Ok(())
}

fn validate_party_size(number_of_people: u32) -> Result<(), ValidationError> {
    if number_of_people < 1 {
        return Err(ValidationError::TooFewPeople(number_of_people));
    }
    Ok(())
}

impl Document for Reservation {
    type Patch = ReservationPatch;

    const KIND: &'static str = "reservation";
    const ENTITY_TYPE: &'static str = "Reservation";
    const REQUIRED_FIELDS: &'static [&'static str] =
        &["customerEmail", "date", "time", "numberOfPeople"];

    fn apply_patch(&mut self, patch: ReservationPatch) {
        if let Some(customer_email) = patch.customer_email {
            self.customer_email = customer_email.trim().to_string();
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(number_of_people) = patch.number_of_people {
            self.number_of_people = number_of_people;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.customer_email)?;
        validate_time(&self.time)?;
        validate_party_size(self.number_of_people)
    }

    fn validate_patch(patch: &ReservationPatch) -> Result<(), ValidationError> {
        if let Some(email) = &patch.customer_email {
            validate_email(email)?;
        }
        if let Some(time) = &patch.time {
            validate_time(time)?;
        }
        if let Some(number_of_people) = patch.number_of_people {
            validate_party_size(number_of_people)?;
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.customer_email = self.customer_email.trim().to_string();
        self.time = self.time.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_status_defaults_to_pending() {
        let reservation: Reservation = serde_json::from_value(json!({
            "customerEmail": "ana@example.com",
            "date": "2024-06-15",
            "time": "20:00",
            "numberOfPeople": 4
        }))
        .unwrap();

        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(reservation.date, date());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = serde_json::from_value::<Reservation>(json!({
            "customerEmail": "ana@example.com",
            "date": "2024-06-15",
            "time": "20:00",
            "numberOfPeople": 4,
            "status": "archived"
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        assert!(Reservation::new("ana@example.com", date(), "20:00", 2)
            .validate()
            .is_ok());
        assert_eq!(
            Reservation::new("ana@example.com", date(), "20:00", 0).validate(),
            Err(ValidationError::TooFewPeople(0))
        );
        assert_eq!(
            Reservation::new("not-an-email", date(), "20:00", 2).validate(),
            Err(ValidationError::InvalidEmail("not-an-email".to_string()))
        );
        assert_eq!(
            Reservation::new("ana@example.com", date(), "dinner", 2).validate(),
            Err(ValidationError::InvalidTime("dinner".to_string()))
        );
    }

    #[test]
    fn test_apply_patch_only_touches_set_fields() {
        let mut reservation = Reservation::new("ana@example.com", date(), "20:00", 2);

        reservation.apply_patch(ReservationPatch {
            status: Some(ReservationStatus::Confirmed),
            number_of_people: Some(6),
            ..Default::default()
        });

        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_eq!(reservation.number_of_people, 6);
        assert_eq!(reservation.customer_email, "ana@example.com");
        assert_eq!(reservation.time, "20:00");
    }

    #[test]
    fn test_patch_serialization_skips_unset_fields() {
        let patch = ReservationPatch {
            time: Some("21:00".to_string()),
            ..Default::default()
        };

        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "time": "21:00" }));
    }

    #[test]
    fn test_normalize_trims_email_and_time() {
        let mut reservation = Reservation::new("  ana@example.com ", date(), " 20:00 ", 2);
        reservation.normalize();

        assert_eq!(reservation.customer_email, "ana@example.com");
        assert_eq!(reservation.time, "20:00");
    }
}
