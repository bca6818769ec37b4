//! Field validation and normalization rules for user input.
//!
//! Rules run independently per field so that callers can collect every
//! violation into a single [`FieldErrors`] report.

use std::borrow::Cow;
use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use validator::{ValidateEmail, ValidationError, ValidationErrors};

use crate::constants::{is_disposable_domain, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MIN_NAME_LENGTH};

/// Cyrillic or Latin letters, spaces and hyphens. The length bound is part of the pattern.
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^[а-яА-ЯёЁa-zA-Z \-]{{{},{}}}$",
        MIN_NAME_LENGTH, MAX_NAME_LENGTH
    ))
    .expect("name pattern is a valid regex")
});

pub const NAME_FORMAT_MESSAGE: &str = "name must contain only letters, spaces, and hyphens";
pub const EMAIL_FORMAT_MESSAGE: &str = "invalid email address";
pub const EMAIL_DISPOSABLE_MESSAGE: &str = "disposable emails not allowed";

/// Trim surrounding whitespace from a name.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_string()
}

/// Case-folded form of a name, used for case-insensitive search.
pub fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Trim and lowercase an email address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Build a validation error with a human-readable message.
pub fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Validate a raw (untrimmed) name.
pub fn validate_name(raw: &str) -> Result<(), ValidationError> {
    if NAME_PATTERN.is_match(raw.trim()) {
        Ok(())
    } else {
        Err(field_error("name_format", NAME_FORMAT_MESSAGE))
    }
}

/// Validate a raw (untrimmed) email, returning every violated rule.
pub fn check_email(raw: &str) -> Vec<ValidationError> {
    let email = raw.trim();
    let mut violations = Vec::new();

    if email.chars().count() > MAX_EMAIL_LENGTH {
        violations.push(field_error(
            "email_length",
            format!("email must be at most {} characters", MAX_EMAIL_LENGTH),
        ));
    }

    if !email.validate_email() {
        violations.push(field_error("email_format", EMAIL_FORMAT_MESSAGE));
    } else if let Some((_, domain)) = email.rsplit_once('@') {
        if is_disposable_domain(domain) {
            violations.push(field_error("email_disposable", EMAIL_DISPOSABLE_MESSAGE));
        }
    }

    violations
}

/// Error raised for a required field that is missing.
pub fn required(field: &str) -> ValidationError {
    field_error("required", format!("{} is required", field))
}

/// Error raised for an optional field that was explicitly sent as null.
pub fn not_null(field: &str) -> ValidationError {
    field_error("null", format!("{} may not be null", field))
}

/// Per-field validation report: field name to list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut report = FieldErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors.iter() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                report.add(field.to_string(), message);
            }
        }
        report
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        FieldErrors::from(&errors)
    }
}
