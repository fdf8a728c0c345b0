//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `deadliner_core` linkage,
//!   including SQLite bootstrap and calendar backend wiring.
//! - Keep output deterministic for quick local sanity checks.

use deadliner_core::db::open_db_in_memory;
use deadliner_core::{
    AssignmentRepository, DateNormalizer, SqliteAssignmentRepository,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("deadliner_core version={}", deadliner_core::core_version());

    let normalizer = DateNormalizer::with_default_backend();
    println!("jalali_backend={}", normalizer.backend_available());

    let conn = open_db_in_memory()?;
    let repo = SqliteAssignmentRepository::try_new(&conn, normalizer)?;
    println!("assignments={}", repo.count()?);

    Ok(())
}
