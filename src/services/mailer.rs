use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::{config::Config, models::booking::Booking};

/// Errors internal to mail delivery. These are logged inside the dispatch
/// task and never surfaced to the HTTP caller.
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Message build error: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Mailer is not configured")]
    NotConfigured,
}

/// Best-effort outbound email.
///
/// Missing SMTP credentials degrade to a disabled mailer with a startup
/// warning. Sends are handed to `tokio::spawn`, so a request task never
/// waits on SMTP latency, and a failed send never affects the booking or
/// contact submission that triggered it.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<String>,
    contact_to: Option<String>,
}

/// Escapes user-supplied text before interpolation into an HTML email body.
pub fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Builds the confirmation body sent to the client after a booking.
fn booking_confirmation_body(booking: &Booking) -> String {
    let notes = if booking.notes.is_empty() {
        "None".to_string()
    } else {
        escape_html(&booking.notes)
    };
    format!(
        "<h2>Booking Confirmation</h2>\
         <p>Dear {name},</p>\
         <p>Your booking has been received with the following details:</p>\
         <ul>\
         <li><strong>Service:</strong> {service}</li>\
         <li><strong>Date:</strong> {date}</li>\
         <li><strong>Time:</strong> {time}</li>\
         <li><strong>Notes:</strong> {notes}</li>\
         </ul>\
         <p>Please complete your payment to secure your booking. We will \
         contact you with payment instructions.</p>\
         <p>Thank you for choosing our services!</p>",
        name = escape_html(&booking.name),
        service = escape_html(&booking.service.label()),
        date = booking.date.format("%Y-%m-%d"),
        time = escape_html(&booking.time),
        notes = notes,
    )
}

/// Builds the operator-facing body for a contact form submission.
fn contact_message_body(name: &str, email: &str, message: &str) -> String {
    format!(
        "<h2>New Contact Message</h2>\
         <p><strong>Name:</strong> {name}</p>\
         <p><strong>Email:</strong> {email}</p>\
         <p><strong>Message:</strong></p>\
         <p>{message}</p>",
        name = escape_html(name),
        email = escape_html(email),
        message = escape_html(message).replace('\n', "<br>"),
    )
}

impl Mailer {
    /// Builds the mailer from config. Never fails; missing credentials give
    /// a disabled mailer.
    pub fn from_config(config: &Config) -> Self {
        let transport = match (&config.smtp_username, &config.smtp_password) {
            (Some(user), Some(pass)) => {
                match AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_relay) {
                    Ok(builder) => Some(
                        builder
                            .credentials(Credentials::new(user.clone(), pass.clone()))
                            .build(),
                    ),
                    Err(e) => {
                        tracing::error!("Invalid SMTP relay '{}': {}", config.smtp_relay, e);
                        None
                    }
                }
            }
            _ => {
                tracing::warn!("SMTP credentials not configured. Emails will not be sent.");
                None
            }
        };

        Self {
            transport,
            from: config.mail_from.clone(),
            contact_to: config.contact_to.clone(),
        }
    }

    /// A mailer that drops everything. Used by tests.
    pub fn disabled() -> Self {
        Self {
            transport: None,
            from: None,
            contact_to: None,
        }
    }

    /// Whether a transport is configured.
    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    fn build_booking_confirmation(&self, booking: &Booking) -> Result<Message, MailError> {
        let from = self.from.as_deref().ok_or(MailError::NotConfigured)?;
        Ok(Message::builder()
            .from(from.parse::<Mailbox>()?)
            .to(booking.email.parse::<Mailbox>()?)
            .subject("Booking Confirmation - Payment Required")
            .header(ContentType::TEXT_HTML)
            .body(booking_confirmation_body(booking))?)
    }

    fn build_contact_message(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<Message, MailError> {
        let from = self.from.as_deref().ok_or(MailError::NotConfigured)?;
        let to = self.contact_to.as_deref().ok_or(MailError::NotConfigured)?;
        Ok(Message::builder()
            .from(from.parse::<Mailbox>()?)
            .to(to.parse::<Mailbox>()?)
            .reply_to(email.parse::<Mailbox>()?)
            .subject(format!("New contact message from {}", name))
            .header(ContentType::TEXT_HTML)
            .body(contact_message_body(name, email, message))?)
    }

    /// Queues the client confirmation email for a new booking.
    pub fn dispatch_booking_confirmation(&self, booking: &Booking) {
        let recipient = booking.email.clone();
        match self.build_booking_confirmation(booking) {
            Ok(message) => self.dispatch(message, recipient),
            Err(MailError::NotConfigured) => {
                tracing::warn!("Mailer disabled; skipping confirmation to {}", recipient);
            }
            Err(e) => {
                tracing::warn!("Could not build confirmation for {}: {}", recipient, e);
            }
        }
    }

    /// Queues the operator email for a contact form submission.
    pub fn dispatch_contact_message(&self, name: &str, email: &str, message: &str) {
        match self.build_contact_message(name, email, message) {
            Ok(msg) => self.dispatch(msg, self.contact_to.clone().unwrap_or_default()),
            Err(MailError::NotConfigured) => {
                tracing::warn!("Mailer disabled; dropping contact message from {}", email);
            }
            Err(e) => {
                tracing::warn!("Could not build contact message from {}: {}", email, e);
            }
        }
    }

    /// Hands a message to a background task. Delivery is eventual, not
    /// guaranteed; failures are logged and swallowed.
    fn dispatch(&self, message: Message, recipient: String) {
        let Some(transport) = self.transport.clone() else {
            tracing::warn!("Mailer disabled; dropping message to {}", recipient);
            return;
        };
        tokio::spawn(async move {
            match transport.send(message).await {
                Ok(_) => tracing::info!("Email sent to {}", recipient),
                Err(e) => tracing::error!("Email sending failed for {}: {}", recipient, e),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::{BookingId, Service};
    use chrono::{NaiveDate, Utc};

    fn booking_with(name: &str, notes: &str) -> Booking {
        Booking {
            id: BookingId::new("1"),
            name: name.to_string(),
            email: "a@x.com".to_string(),
            service: Service::Consultation,
            date: NaiveDate::from_ymd_opt(2030, 1, 2).unwrap(),
            time: "10:00".to_string(),
            notes: notes.to_string(),
            paid: false,
            stripe_session_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html(r#"<b>"bold" & 'bad'</b>"#),
            "&lt;b&gt;&quot;bold&quot; &amp; &#39;bad&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn confirmation_body_escapes_user_fields() {
        let booking = booking_with("<script>alert(1)</script>", "a < b");
        let body = booking_confirmation_body(&booking);
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
        assert!(body.contains("a &lt; b"));
    }

    #[test]
    fn confirmation_body_defaults_empty_notes_to_none() {
        let booking = booking_with("Ann", "");
        let body = booking_confirmation_body(&booking);
        assert!(body.contains("<strong>Notes:</strong> None"));
    }

    #[test]
    fn contact_body_keeps_line_breaks_but_not_markup() {
        let body = contact_message_body("Ann", "a@x.com", "hi\nthere <img>");
        assert!(body.contains("hi<br>there"));
        assert!(body.contains("&lt;img&gt;"));
    }

    #[test]
    fn disabled_mailer_drops_messages_without_error() {
        let mailer = Mailer::disabled();
        assert!(!mailer.is_enabled());
        mailer.dispatch_contact_message("Ann", "a@x.com", "hello");
        mailer.dispatch_booking_confirmation(&booking_with("Ann", ""));
    }
}
