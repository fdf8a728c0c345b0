//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the CRUD contract the UI shell consumes.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate names and normalize deadlines before SQL runs.
//! - Repository APIs return semantic errors (`DuplicateName`) in addition
//!   to DB transport errors.

pub mod assignment_repo;
