//! Assertion helpers for validation results.

use chrono::NaiveDate;

use crate::request::PaymentRequest;
use crate::validation::ValidationError;
use crate::{CardkitError, CardkitErrorCode, Result};

/// Assert that `errors` concern exactly `fields`, in order.
///
/// # Panics
/// Panics if the failing fields differ.
pub fn assert_field_errors(errors: &[ValidationError], fields: &[&str]) {
    let actual: Vec<&str> = errors.iter().map(|e| e.field_id.as_str()).collect();
    assert_eq!(actual, fields, "unexpected validation errors: {errors:?}");
}

/// Assert that `request` validates on `today`.
///
/// # Panics
/// Panics if any field fails validation.
pub fn assert_valid(request: &PaymentRequest, today: NaiveDate) {
    let errors = request.validate_at(today);
    assert!(errors.is_empty(), "request should be valid, got {errors:?}");
}

/// Assert that `result` failed validation on `field`.
///
/// # Panics
/// Panics if the result succeeded or failed for another reason.
pub fn assert_validation_failed<T: std::fmt::Debug>(result: &Result<T>, field: &str) {
    match result {
        Ok(value) => panic!("expected validation failure on {field}, got {value:?}"),
        Err(err @ CardkitError::ValidationFailed(errors)) => {
            assert_eq!(err.code(), CardkitErrorCode::ValidationFailed);
            assert!(
                errors.iter().any(|e| e.field_id == field),
                "expected a validation error on {field}, got {errors:?}"
            );
        }
        Err(other) => panic!("expected validation failure on {field}, got {other}"),
    }
}
