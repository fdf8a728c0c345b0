//! Assignment use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for UI shells.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or normalization.
//! - Service layer remains storage-agnostic.

use crate::model::assignment::{Assignment, AssignmentId};
use crate::repo::assignment_repo::{
    AssignmentPatch, AssignmentRepository, ListOrder, RepoResult,
};

/// Days-remaining threshold at or below which a row gets a warning tint.
pub const WARNING_DAYS: i64 = 7;
/// Days-remaining threshold at or below which a row is critical and earns
/// a tooltip.
pub const CRITICAL_DAYS: i64 = 3;

/// Row urgency derived from days remaining until the deadline.
///
/// Thresholds match the table-highlight contract the UI shell renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlinePressure {
    Normal,
    Warning,
    /// Includes overdue assignments (negative days remaining).
    Critical,
}

impl DeadlinePressure {
    /// Classifies a signed days-remaining value.
    pub fn for_days_remaining(days: i64) -> Self {
        if days <= CRITICAL_DAYS {
            Self::Critical
        } else if days <= WARNING_DAYS {
            Self::Warning
        } else {
            Self::Normal
        }
    }
}

/// Use-case service wrapper for assignment CRUD operations.
pub struct AssignmentService<R: AssignmentRepository> {
    repo: R,
}

impl<R: AssignmentRepository> AssignmentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an assignment from raw user input.
    ///
    /// # Contract
    /// - `name` is trimmed; empty names are rejected.
    /// - `deadline_input` may be Jalali or ISO; it is normalized before
    ///   persistence.
    /// - Returns the storage-assigned id.
    pub fn add(&self, name: &str, deadline_input: &str, stars: i64) -> RepoResult<AssignmentId> {
        self.repo.add(name, deadline_input, stars)
    }

    /// Gets one assignment by id.
    pub fn get_by_id(&self, id: AssignmentId) -> RepoResult<Option<Assignment>> {
        self.repo.get_by_id(id)
    }

    /// Lists all assignments; the UI re-reads this after every mutation.
    pub fn get_all(&self, order: ListOrder) -> RepoResult<Vec<Assignment>> {
        self.repo.get_all(order)
    }

    /// Case-insensitive substring search on assignment names.
    pub fn search(&self, needle: &str) -> RepoResult<Vec<Assignment>> {
        self.repo.search(needle)
    }

    /// Applies a partial update; returns whether a row actually changed.
    pub fn update_by_id(&self, id: AssignmentId, patch: &AssignmentPatch) -> RepoResult<bool> {
        self.repo.update_by_id(id, patch)
    }

    /// Deletes one assignment; returns whether a row was removed.
    pub fn delete_by_id(&self, id: AssignmentId) -> RepoResult<bool> {
        self.repo.delete_by_id(id)
    }

    /// Returns the total number of assignments.
    pub fn count(&self) -> RepoResult<u64> {
        self.repo.count()
    }

    /// Lists assignments due within the next `days` days, inclusive.
    pub fn get_upcoming(&self, days: i64) -> RepoResult<Vec<Assignment>> {
        self.repo.get_upcoming(days)
    }
}
