use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of services a client can book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Service {
    WebsiteDesign,
    WebDevelopment,
    Consultation,
    Maintenance,
}

impl Service {
    /// The wire value, as submitted by the booking form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::WebsiteDesign => "website-design",
            Service::WebDevelopment => "web-development",
            Service::Consultation => "consultation",
            Service::Maintenance => "maintenance",
        }
    }

    /// Parses a wire value. `None` for anything outside the enumerated set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "website-design" => Some(Service::WebsiteDesign),
            "web-development" => Some(Service::WebDevelopment),
            "consultation" => Some(Service::Consultation),
            "maintenance" => Some(Service::Maintenance),
            _ => None,
        }
    }

    /// Human-readable label used in confirmation emails.
    pub fn label(&self) -> String {
        self.as_str().replace('-', " ").to_uppercase()
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An opaque, backend-normalized booking identifier.
///
/// The postgres backend assigns UUIDs and the sqlite backend integer rowids;
/// both are carried as strings so callers never branch on id shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A client's reservation request for a service at a date/time.
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    /// The backend-assigned identifier, normalized to a string.
    pub id: BookingId,
    /// The client's name.
    pub name: String,
    /// The client's email address.
    pub email: String,
    /// The booked service.
    pub service: Service,
    /// The requested date.
    pub date: NaiveDate,
    /// The requested time, as submitted (e.g. "10:00").
    pub time: String,
    /// Free-text notes from the client.
    pub notes: String,
    /// Whether the booking has been paid. Defaults to false.
    pub paid: bool,
    /// Id of an external payment session, when one was produced.
    pub stripe_session_id: Option<String>,
    /// The timestamp when the booking was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the booking was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The validated fields of a booking about to be persisted.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub service: Service,
    pub date: NaiveDate,
    pub time: String,
    pub notes: String,
    pub stripe_session_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_parses_every_listed_value() {
        for raw in ["website-design", "web-development", "consultation", "maintenance"] {
            let service = Service::parse(raw).unwrap();
            assert_eq!(service.as_str(), raw);
        }
    }

    #[test]
    fn service_rejects_unlisted_values() {
        assert_eq!(Service::parse("haircut"), None);
        assert_eq!(Service::parse(""), None);
        assert_eq!(Service::parse("Consultation"), None);
    }

    #[test]
    fn service_label_is_uppercased_without_hyphens() {
        assert_eq!(Service::WebsiteDesign.label(), "WEBSITE DESIGN");
        assert_eq!(Service::Consultation.label(), "CONSULTATION");
    }

    #[test]
    fn booking_id_serializes_as_plain_string() {
        let id = BookingId::new("42");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""42""#);
    }
}
