//! Input validation helpers.
//!
//! Field-level rules (lengths, ranges) are declared with `validator` derives on
//! the DTOs; [`validate_input`] folds their errors into a [`CoreError`].

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Run `validator` rules for `input`, mapping failures to [`CoreError::Validation`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

/// Require a text field to be present and non-blank, returning it trimmed.
pub fn require_text(field: &str, value: Option<&str>) -> Result<String, CoreError> {
    match value.map(str::trim) {
        Some(v) if v.contains('\0') => Err(CoreError::Validation(format!(
            "{field} must not contain NUL characters"
        ))),
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CoreError::Validation(format!("{field} is required"))),
    }
}

/// Reject a supplied-but-blank text field. `None` passes through untouched.
pub fn optional_text(field: &str, value: Option<&str>) -> Result<Option<String>, CoreError> {
    match value {
        None => Ok(None),
        Some(v) => require_text(field, Some(v)).map(Some),
    }
}

/// Render validation errors as `field: message` pairs in a stable order.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages: Vec<String> = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            format!("{field}: {}", messages.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
