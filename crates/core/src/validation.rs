//! Lead submission validation.
//!
//! Field-shape checks applied before a lead row is written. Failures are
//! reported as [`CoreError::Validation`] with a message naming the field.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Maximum lead title length.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum lead description length.
pub const MAX_DESCRIPTION_LEN: usize = 10_000;

/// Maximum number of photos per lead.
pub const MAX_PHOTOS: usize = 12;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ().-]{5,19}$").expect("valid phone regex"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s]+\.[^\s]+$").expect("valid url regex"));

fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_max_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Validate an email address shape.
pub fn validate_email(field: &str, value: &str) -> Result<(), CoreError> {
    if !EMAIL_RE.is_match(value) {
        return Err(CoreError::Validation(format!(
            "{field} is not a valid email address"
        )));
    }
    Ok(())
}

/// Validate a phone number shape (digits, separators, optional leading +).
pub fn validate_phone(field: &str, value: &str) -> Result<(), CoreError> {
    if !PHONE_RE.is_match(value) {
        return Err(CoreError::Validation(format!(
            "{field} is not a valid phone number"
        )));
    }
    Ok(())
}

/// Validate an http(s) URL shape.
pub fn validate_url(field: &str, value: &str) -> Result<(), CoreError> {
    if !URL_RE.is_match(value) {
        return Err(CoreError::Validation(format!("{field} is not a valid URL")));
    }
    Ok(())
}

/// The submittable fields of a lead, as received from the API layer.
#[derive(Debug, Clone)]
pub struct LeadFields<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub contact_email: &'a str,
    pub contact_phone: Option<&'a str>,
    pub contact_website: Option<&'a str>,
    pub budget_cents: Option<i64>,
    pub photo_urls: &'a [String],
}

/// Validate all fields of a lead submission or edit.
pub fn validate_lead_fields(fields: &LeadFields<'_>) -> Result<(), CoreError> {
    require_non_empty("title", fields.title)?;
    require_max_len("title", fields.title, MAX_TITLE_LEN)?;
    require_non_empty("description", fields.description)?;
    require_max_len("description", fields.description, MAX_DESCRIPTION_LEN)?;
    require_non_empty("category", fields.category)?;
    validate_email("contact_email", fields.contact_email)?;

    if let Some(phone) = fields.contact_phone {
        validate_phone("contact_phone", phone)?;
    }
    if let Some(website) = fields.contact_website {
        validate_url("contact_website", website)?;
    }
    if let Some(budget) = fields.budget_cents {
        if budget <= 0 {
            return Err(CoreError::Validation(
                "budget_cents must be positive when provided".into(),
            ));
        }
    }
    if fields.photo_urls.len() > MAX_PHOTOS {
        return Err(CoreError::Validation(format!(
            "at most {MAX_PHOTOS} photos are allowed"
        )));
    }
    for url in fields.photo_urls {
        validate_url("photo_urls", url)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_fields() -> LeadFields<'static> {
        LeadFields {
            title: "CRM migration for mid-size logistics firm",
            description: "They are moving off a legacy system next quarter.",
            category: "IT Services",
            contact_email: "ops@example.com",
            contact_phone: Some("+1 555 123-4567"),
            contact_website: Some("https://example.com"),
            budget_cents: Some(500_000),
            photo_urls: &[],
        }
    }

    #[test]
    fn valid_submission_passes() {
        assert!(validate_lead_fields(&valid_fields()).is_ok());
    }

    #[test]
    fn empty_title_rejected() {
        let mut fields = valid_fields();
        fields.title = "   ";
        assert_matches!(
            validate_lead_fields(&fields),
            Err(CoreError::Validation(msg)) if msg.contains("title")
        );
    }

    #[test]
    fn malformed_email_rejected() {
        let mut fields = valid_fields();
        fields.contact_email = "not-an-email";
        assert_matches!(
            validate_lead_fields(&fields),
            Err(CoreError::Validation(msg)) if msg.contains("contact_email")
        );
    }

    #[test]
    fn malformed_phone_rejected() {
        let mut fields = valid_fields();
        fields.contact_phone = Some("call me maybe");
        assert!(validate_lead_fields(&fields).is_err());
    }

    #[test]
    fn malformed_website_rejected() {
        let mut fields = valid_fields();
        fields.contact_website = Some("ftp://example.com");
        assert!(validate_lead_fields(&fields).is_err());
    }

    #[test]
    fn missing_optionals_accepted() {
        let mut fields = valid_fields();
        fields.contact_phone = None;
        fields.contact_website = None;
        fields.budget_cents = None;
        assert!(validate_lead_fields(&fields).is_ok());
    }

    #[test]
    fn non_positive_budget_rejected() {
        let mut fields = valid_fields();
        fields.budget_cents = Some(0);
        assert!(validate_lead_fields(&fields).is_err());
    }

    #[test]
    fn too_many_photos_rejected() {
        let photos: Vec<String> = (0..13).map(|i| format!("https://img.example.com/{i}.jpg")).collect();
        let mut fields = valid_fields();
        fields.photo_urls = &photos;
        assert!(validate_lead_fields(&fields).is_err());
    }
}
