//! Shared form validation, applied identically on create and update.
//!
//! Due-date presence is enforced structurally: create inputs carry a
//! required `NaiveDate`, so a missing date never reaches the domain layer.
//! What is left to check here is text content and, inside the database
//! operations, referential existence.

use crate::error::{Error, Result};

/// Require a non-blank text field. Returns the trimmed value.
///
/// The field name travels in the error so the caller can re-show the form
/// with the offending field highlighted and the rest of the input intact.
pub fn non_blank(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}
