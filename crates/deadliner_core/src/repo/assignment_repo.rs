//! Assignment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the canonical `assignments` table.
//! - Normalize deadline input and derive the Jalali display form at the
//!   storage boundary.
//!
//! # Invariants
//! - Every persisted deadline is canonical Gregorian ISO `YYYY-MM-DD`.
//! - UNIQUE violations on `name` surface as `RepoError::DuplicateName`,
//!   never as raw SQLite errors.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::calendar::{DateNormalizer, InvalidDateError};
use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::assignment::{
    validate_name, Assignment, AssignmentId, AssignmentValidationError,
};
use chrono::{Duration, Local, NaiveDate};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

const ASSIGNMENT_SELECT_SQL: &str = "SELECT id, name, deadline, stars FROM assignments";

const REQUIRED_COLUMNS: &[&str] = &["id", "name", "deadline", "stars"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for assignment persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(AssignmentValidationError),
    InvalidDate(InvalidDateError),
    /// An insert or rename collided with an existing assignment name.
    DuplicateName(String),
    Db(DbError),
    InvalidData(String),
    /// Connection schema version does not match this binary's migrations.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::DuplicateName(name) => {
                write!(f, "an assignment named `{name}` already exists")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted assignment data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it via db::open_db first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidDate(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AssignmentValidationError> for RepoError {
    fn from(value: AssignmentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<InvalidDateError> for RepoError {
    fn from(value: InvalidDateError) -> Self {
        Self::InvalidDate(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Sortable columns for [`AssignmentRepository::get_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderField {
    #[default]
    Deadline,
    Stars,
    Name,
    Id,
}

impl OrderField {
    fn column(self) -> &'static str {
        match self {
            Self::Deadline => "deadline",
            Self::Stars => "stars",
            Self::Name => "name",
            Self::Id => "id",
        }
    }
}

/// Ordering options for listing assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOrder {
    pub field: OrderField,
    pub ascending: bool,
}

impl Default for ListOrder {
    fn default() -> Self {
        Self {
            field: OrderField::Deadline,
            ascending: true,
        }
    }
}

/// Partial update for one assignment; `None` fields are left untouched.
///
/// `name` and `deadline` carry raw user input and are re-validated and
/// re-normalized with the same rules as `add`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentPatch {
    pub name: Option<String>,
    pub deadline: Option<String>,
    pub stars: Option<i64>,
}

impl AssignmentPatch {
    /// Returns whether the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.deadline.is_none() && self.stars.is_none()
    }
}

/// Repository interface for assignment CRUD operations.
pub trait AssignmentRepository {
    /// Inserts a new assignment and returns its storage-assigned id.
    fn add(&self, name: &str, deadline_input: &str, stars: i64) -> RepoResult<AssignmentId>;
    /// Gets one assignment by id.
    fn get_by_id(&self, id: AssignmentId) -> RepoResult<Option<Assignment>>;
    /// Lists all assignments in the requested order.
    fn get_all(&self, order: ListOrder) -> RepoResult<Vec<Assignment>>;
    /// Case-insensitive substring match on `name`, deadline ascending.
    fn search(&self, needle: &str) -> RepoResult<Vec<Assignment>>;
    /// Applies a partial update; returns whether a row actually changed.
    fn update_by_id(&self, id: AssignmentId, patch: &AssignmentPatch) -> RepoResult<bool>;
    /// Deletes one assignment; returns whether a row was removed.
    fn delete_by_id(&self, id: AssignmentId) -> RepoResult<bool>;
    /// Returns the total number of assignments.
    fn count(&self) -> RepoResult<u64>;
    /// Lists assignments due within `[today, today + days]` inclusive.
    fn get_upcoming(&self, days: i64) -> RepoResult<Vec<Assignment>>;
}

/// SQLite-backed assignment repository.
pub struct SqliteAssignmentRepository<'conn> {
    conn: &'conn Connection,
    normalizer: DateNormalizer,
}

impl<'conn> SqliteAssignmentRepository<'conn> {
    /// Wraps a connection after verifying its schema is usable.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were never applied or
    ///   the version does not match this binary.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   shape diverges from what queries expect.
    pub fn try_new(conn: &'conn Connection, normalizer: DateNormalizer) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn, normalizer })
    }

    /// Deterministic-clock variant of [`AssignmentRepository::get_upcoming`].
    pub fn get_upcoming_from(&self, today: NaiveDate, days: i64) -> RepoResult<Vec<Assignment>> {
        let upper = today + Duration::days(days);
        let mut stmt = self.conn.prepare(&format!(
            "{ASSIGNMENT_SELECT_SQL}
             WHERE deadline BETWEEN ?1 AND ?2
             ORDER BY deadline ASC, id ASC;"
        ))?;

        let mut rows = stmt.query(params![today.to_string(), upper.to_string()])?;
        collect_assignments(&mut rows, &self.normalizer)
    }
}

impl AssignmentRepository for SqliteAssignmentRepository<'_> {
    fn add(&self, name: &str, deadline_input: &str, stars: i64) -> RepoResult<AssignmentId> {
        let name = validate_name(name)?;
        let deadline = self.normalizer.normalize(deadline_input)?;

        self.conn
            .execute(
                "INSERT INTO assignments (name, deadline, stars) VALUES (?1, ?2, ?3);",
                params![name.as_str(), deadline.to_string(), stars],
            )
            .map_err(|err| duplicate_name_or(err, &name))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_by_id(&self, id: AssignmentId) -> RepoResult<Option<Assignment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ASSIGNMENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_assignment_row(row, &self.normalizer)?));
        }

        Ok(None)
    }

    fn get_all(&self, order: ListOrder) -> RepoResult<Vec<Assignment>> {
        let direction = if order.ascending { "ASC" } else { "DESC" };
        // Secondary `id` sort keeps output stable when the ordered column
        // has duplicate values.
        let mut stmt = self.conn.prepare(&format!(
            "{ASSIGNMENT_SELECT_SQL} ORDER BY {} {direction}, id ASC;",
            order.field.column()
        ))?;

        let mut rows = stmt.query([])?;
        collect_assignments(&mut rows, &self.normalizer)
    }

    fn search(&self, needle: &str) -> RepoResult<Vec<Assignment>> {
        let pattern = format!("%{}%", escape_like(needle.trim()));
        let mut stmt = self.conn.prepare(&format!(
            "{ASSIGNMENT_SELECT_SQL}
             WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY deadline ASC, id ASC;"
        ))?;

        let mut rows = stmt.query(params![pattern])?;
        collect_assignments(&mut rows, &self.normalizer)
    }

    fn update_by_id(&self, id: AssignmentId, patch: &AssignmentPatch) -> RepoResult<bool> {
        if patch.is_empty() {
            return Ok(false);
        }

        let mut set_clauses: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        let mut new_name: Option<String> = None;

        if let Some(raw_name) = patch.name.as_deref() {
            let name = validate_name(raw_name)?;
            set_clauses.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
            new_name = Some(name);
        }
        if let Some(raw_deadline) = patch.deadline.as_deref() {
            let deadline = self.normalizer.normalize(raw_deadline)?;
            set_clauses.push("deadline = ?");
            bind_values.push(Value::Text(deadline.to_string()));
        }
        if let Some(stars) = patch.stars {
            set_clauses.push("stars = ?");
            bind_values.push(Value::Integer(stars));
        }

        bind_values.push(Value::Integer(id));
        let sql = format!(
            "UPDATE assignments SET {} WHERE id = ?;",
            set_clauses.join(", ")
        );

        let changed = self
            .conn
            .execute(&sql, params_from_iter(bind_values))
            .map_err(|err| match new_name {
                Some(ref name) => duplicate_name_or(err, name),
                None => err.into(),
            })?;

        Ok(changed > 0)
    }

    fn delete_by_id(&self, id: AssignmentId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM assignments WHERE id = ?1;", params![id])?;
        Ok(changed > 0)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM assignments;", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn get_upcoming(&self, days: i64) -> RepoResult<Vec<Assignment>> {
        self.get_upcoming_from(today_local(), days)
    }
}

/// Signed days from today until `deadline`; negative means overdue.
pub fn days_remaining(deadline: NaiveDate) -> i64 {
    days_remaining_from(deadline, today_local())
}

/// Deterministic-clock variant of [`days_remaining`].
pub fn days_remaining_from(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 =
        conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'assignments'
        );",
        [],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable("assignments"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(assignments);")?;
    let mut rows = stmt.query([])?;
    let mut columns: HashSet<String> = HashSet::new();
    while let Some(row) = rows.next()? {
        columns.insert(row.get("name")?);
    }

    for column in REQUIRED_COLUMNS {
        if !columns.contains(*column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "assignments",
                column,
            });
        }
    }

    Ok(())
}

fn collect_assignments(
    rows: &mut rusqlite::Rows<'_>,
    normalizer: &DateNormalizer,
) -> RepoResult<Vec<Assignment>> {
    let mut assignments = Vec::new();
    while let Some(row) = rows.next()? {
        assignments.push(parse_assignment_row(row, normalizer)?);
    }
    Ok(assignments)
}

fn parse_assignment_row(row: &Row<'_>, normalizer: &DateNormalizer) -> RepoResult<Assignment> {
    let deadline_text: String = row.get("deadline")?;
    let deadline = NaiveDate::parse_from_str(&deadline_text, "%Y-%m-%d").map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid deadline value `{deadline_text}` in assignments.deadline"
        ))
    })?;

    // Display conversion failure is per-record and non-fatal: the UI shows
    // a blank cell instead of the whole list failing.
    let deadline_jalali = normalizer.to_display(deadline).ok();

    Ok(Assignment {
        id: row.get("id")?,
        name: row.get("name")?,
        deadline,
        stars: row.get("stars")?,
        deadline_jalali,
    })
}

fn duplicate_name_or(err: rusqlite::Error, name: &str) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::DuplicateName(name.to_string())
    } else {
        err.into()
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
