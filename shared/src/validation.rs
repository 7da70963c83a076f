//! Input validation functions
//!
//! Custom field validators plugged into the `validator` derive rules on the
//! operation inputs in [`crate::types`].

use crate::models::RequestType;
use std::borrow::Cow;
use validator::{ValidateEmail, ValidateLength, ValidationError};

/// Minimum password length, in characters
pub const PASSWORD_MIN_LENGTH: u64 = 6;

/// Input fields whose JSON name differs from the Rust field name
const RENAMED_FIELDS: [(&str, &str); 1] = [("request_type", "type")];

/// JSON name of an input field, as reported in validation failures
pub fn wire_field_name(field: &str) -> &str {
    RENAMED_FIELDS
        .iter()
        .find(|(rust, _)| *rust == field)
        .map(|(_, wire)| *wire)
        .unwrap_or(field)
}

/// Reject empty and whitespace-only values
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(Cow::Borrowed("Value is required"));
        return Err(err);
    }
    Ok(())
}

/// Accept only the supported HTTP verbs (exact, uppercase)
pub fn validate_request_type(value: &str) -> Result<(), ValidationError> {
    value.parse::<RequestType>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("request_type");
        err.message = Some(Cow::Owned(format!(
            "Must be one of: {}",
            RequestType::ALL
                .iter()
                .map(RequestType::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )));
        err
    })
}

/// Optional email: blank means "unchanged", anything else must be an address
pub fn validate_optional_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email"))
}

/// Optional password: blank means "unchanged", anything else needs the
/// minimum length
pub fn validate_optional_password(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.validate_length(Some(PASSWORD_MIN_LENGTH), None, None) {
        return Ok(());
    }
    Err(ValidationError::new("length"))
}

/// Optional request verb: blank means no verb
pub fn validate_optional_request_type(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validate_request_type(value)
}
