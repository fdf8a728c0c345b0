//! Core domain logic for Deadliner, a single-user assignment tracker.
//! This crate is the single source of truth for business invariants.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::{DateNormalizer, IcuJalaliBackend, InvalidDateError, JalaliBackend};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::assignment::{Assignment, AssignmentId, AssignmentValidationError};
pub use repo::assignment_repo::{
    days_remaining, days_remaining_from, AssignmentPatch, AssignmentRepository, ListOrder,
    OrderField, RepoError, RepoResult, SqliteAssignmentRepository,
};
pub use service::assignment_service::{AssignmentService, DeadlinePressure};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
