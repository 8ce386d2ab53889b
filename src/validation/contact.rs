use serde::Deserialize;

use crate::error::{AppError, Result};

/// The raw contact form as submitted.
#[derive(Deserialize, Debug)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// A validated contact message ready to forward.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Requires all three fields to be present and non-blank.
    pub fn validate(self) -> Result<ContactMessage> {
        let missing = || {
            AppError::Validation("Name, email and message are required.".to_string())
        };
        let take = |field: Option<String>| -> Result<String> {
            match field {
                Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
                _ => Err(missing()),
            }
        };
        Ok(ContactMessage {
            name: take(self.name)?,
            email: take(self.email)?,
            message: take(self.message)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_complete_message() {
        let msg = ContactForm {
            name: Some("Ann".to_string()),
            email: Some("a@x.com".to_string()),
            message: Some("hello".to_string()),
        }
        .validate()
        .unwrap();
        assert_eq!(msg.name, "Ann");
    }

    #[test]
    fn rejects_missing_or_blank_fields() {
        let cases = [
            (None, Some("a@x.com"), Some("hi")),
            (Some("Ann"), None, Some("hi")),
            (Some("Ann"), Some("a@x.com"), Some("  ")),
        ];
        for (name, email, message) in cases {
            let form = ContactForm {
                name: name.map(str::to_string),
                email: email.map(str::to_string),
                message: message.map(str::to_string),
            };
            assert!(matches!(form.validate(), Err(AppError::Validation(_))));
        }
    }
}
