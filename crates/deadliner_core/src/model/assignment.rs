//! Assignment domain model.
//!
//! # Responsibility
//! - Define the single persisted record shape.
//! - Own name validation shared by create and update paths.
//!
//! # Invariants
//! - `id` is assigned by storage on insert and never changes.
//! - `deadline` is always a canonical Gregorian date.
//! - `deadline_jalali` is derived on read; it never round-trips to storage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable row identifier assigned by SQLite on insert.
pub type AssignmentId = i64;

/// One tracked course assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Storage-assigned identifier, immutable for the record lifetime.
    pub id: AssignmentId,
    /// Unique course/assignment name, case-sensitive as stored.
    pub name: String,
    /// Canonical Gregorian deadline, serialized as ISO `YYYY-MM-DD`.
    pub deadline: NaiveDate,
    /// Difficulty rating. Storage enforces no upper bound; the UI shell
    /// clamps input to 1-7.
    pub stars: i64,
    /// Jalali display form of `deadline`; absent when the calendar backend
    /// cannot convert it.
    pub deadline_jalali: Option<String>,
}

/// Field-level validation failure for assignment input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentValidationError {
    /// Name is empty after trimming whitespace.
    EmptyName,
}

impl Display for AssignmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "assignment name cannot be empty"),
        }
    }
}

impl Error for AssignmentValidationError {}

/// Trims a raw name and rejects empty results.
///
/// Shared by the create and update write paths so both enforce the same
/// rule.
pub fn validate_name(raw: &str) -> Result<String, AssignmentValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AssignmentValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{validate_name, AssignmentValidationError};

    #[test]
    fn validate_name_trims_surrounding_whitespace() {
        assert_eq!(validate_name("  Algorithms  ").unwrap(), "Algorithms");
    }

    #[test]
    fn validate_name_rejects_blank_input() {
        assert_eq!(
            validate_name("   ").unwrap_err(),
            AssignmentValidationError::EmptyName
        );
        assert_eq!(
            validate_name("").unwrap_err(),
            AssignmentValidationError::EmptyName
        );
    }
}
