//! Declaration validation utilities.

use crate::types::{Error, Result};

/// Validate that a string is not empty.
pub fn validate_non_empty(s: &str, field: &str) -> Result<()> {
    if s.trim().is_empty() {
        return Err(Error::validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Validate that a SQL fragment name is a plain identifier (`[A-Za-z0-9_]`,
/// not starting with a digit).
pub fn validate_identifier(s: &str, field: &str) -> Result<()> {
    let mut chars = s.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::validation(format!(
            "{} must be a plain identifier, got {:?}",
            field, s
        )));
    }
    Ok(())
}
