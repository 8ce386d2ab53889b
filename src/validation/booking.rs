use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::booking::{NewBooking, Service},
};

/// The raw booking form as submitted. Every field optional so that missing
/// ones surface as a 400, not a deserialization rejection.
#[derive(Deserialize, Debug)]
pub struct BookingForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub service: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub stripe_session_id: Option<String>,
}

fn required(field: Option<String>) -> Result<String> {
    match field {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(AppError::Validation(
            "Please fill all required fields.".to_string(),
        )),
    }
}

impl BookingForm {
    /// Validates the form against `today` and produces a persistable booking.
    ///
    /// Checks, in order: presence of name/email/service/date/time, service
    /// within the enumerated set, date well-formed, date not before `today`
    /// (day granularity). Runs before any persistence side effect.
    pub fn validate(self, today: NaiveDate) -> Result<NewBooking> {
        let name = required(self.name)?;
        let email = required(self.email)?.to_lowercase();
        let service_raw = required(self.service)?;
        let date_raw = required(self.date)?;
        let time = required(self.time)?;

        let service = Service::parse(&service_raw).ok_or_else(|| {
            AppError::Validation("Please select a valid service.".to_string())
        })?;

        let date = NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d").map_err(|_| {
            AppError::Validation("Booking date must be a valid date (YYYY-MM-DD).".to_string())
        })?;

        if date < today {
            return Err(AppError::Validation(
                "Booking date must be in the future.".to_string(),
            ));
        }

        Ok(NewBooking {
            name,
            email,
            service,
            date,
            time,
            notes: self.notes.unwrap_or_default().trim().to_string(),
            stripe_session_id: self.stripe_session_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> BookingForm {
        BookingForm {
            name: Some("Ann".to_string()),
            email: Some("A@X.com".to_string()),
            service: Some("consultation".to_string()),
            date: Some("2030-06-15".to_string()),
            time: Some("10:00".to_string()),
            notes: None,
            stripe_session_id: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 6, 1).unwrap()
    }

    #[test]
    fn accepts_a_complete_future_booking() {
        let new = form().validate(today()).unwrap();
        assert_eq!(new.name, "Ann");
        assert_eq!(new.email, "a@x.com");
        assert_eq!(new.service, Service::Consultation);
        assert_eq!(new.notes, "");
    }

    #[test]
    fn rejects_each_missing_required_field() {
        for strip in 0..5 {
            let mut f = form();
            match strip {
                0 => f.name = None,
                1 => f.email = Some("   ".to_string()),
                2 => f.service = None,
                3 => f.date = None,
                _ => f.time = None,
            }
            let err = f.validate(today()).unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m.contains("required")));
        }
    }

    #[test]
    fn notes_are_optional() {
        let mut f = form();
        f.notes = Some("  please call ahead  ".to_string());
        assert_eq!(f.validate(today()).unwrap().notes, "please call ahead");
    }

    #[test]
    fn rejects_unlisted_service() {
        let mut f = form();
        f.service = Some("haircut".to_string());
        let err = f.validate(today()).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("service")));
    }

    #[test]
    fn rejects_malformed_date() {
        let mut f = form();
        f.date = Some("15/06/2030".to_string());
        assert!(f.validate(today()).is_err());
    }

    #[test]
    fn rejects_date_strictly_before_today() {
        let mut f = form();
        f.date = Some("2030-05-31".to_string());
        let err = f.validate(today()).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("future")));
    }

    #[test]
    fn accepts_booking_for_today() {
        let mut f = form();
        f.date = Some("2030-06-01".to_string());
        assert!(f.validate(today()).is_ok());
    }

    #[test]
    fn carries_external_payment_session_id() {
        let mut f = form();
        f.stripe_session_id = Some("cs_test_123".to_string());
        let new = f.validate(today()).unwrap();
        assert_eq!(new.stripe_session_id.as_deref(), Some("cs_test_123"));
    }
}
