//! Domain model for the assignment tracker.
//!
//! # Responsibility
//! - Define the canonical assignment record and its field-level rules.
//!
//! # Invariants
//! - Assignment names are trimmed and non-empty before persistence.
//! - Deadlines are canonical Gregorian dates; alternate-calendar forms
//!   exist only at the input/display boundary.

pub mod assignment;
