//! Boundary validation for `TodoRequest`.
//!
//! Constraints are declared on the DTO with `validator`; this module runs them
//! and flattens the result into one message per field.

use std::borrow::Cow;
use std::collections::BTreeMap;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::types::TodoRequest;

/// Field name to human-readable message, sorted by field.
pub type FieldErrors = BTreeMap<String, String>;

const NOT_BLANK: &str = "not_blank";

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new(NOT_BLANK);
        error.message = Some(Cow::Borrowed("Title is required"));
        return Err(error);
    }
    Ok(())
}

/// Check a request against its declared constraints.
pub fn validate_request(request: &TodoRequest) -> Result<(), FieldErrors> {
    request.validate().map_err(|errors| flatten(&errors))
}

/// A blank value is reported instead of any other failure on the same field.
fn flatten(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, failures)| {
            let chosen = failures
                .iter()
                .find(|failure| failure.code == NOT_BLANK)
                .or_else(|| failures.first())?;
            let message = chosen
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| format!("{field} is invalid"));
            Some((field.to_string(), message))
        })
        .collect()
}
