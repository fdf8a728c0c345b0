//! Deadline date normalization between Gregorian and Jalali calendars.
//!
//! # Responsibility
//! - Validate date strings at the storage boundary.
//! - Convert Jalali input to the canonical Gregorian ISO form and back.
//!
//! # Invariants
//! - Canonical form is Gregorian ISO `YYYY-MM-DD`; storage never sees
//!   anything else.
//! - Backend presence is decided once at normalizer construction, never
//!   probed per call.

use chrono::{Datelike, NaiveDate};
use icu_calendar::persian::Persian;
use icu_calendar::Date;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for calendar conversion and validation.
pub type CalendarResult<T> = Result<T, InvalidDateError>;

/// Error raised for unparseable or unconvertible date strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidDateError {
    /// Input matches neither the Jalali pattern nor ISO `YYYY-MM-DD`.
    Unparseable { input: String },
    /// Input parsed but the calendar backend could not convert it.
    Unconvertible { input: String },
    /// No Jalali backend was injected into the normalizer.
    BackendUnavailable,
}

impl Display for InvalidDateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unparseable { input } => {
                write!(f, "date `{input}` is neither Jalali nor ISO `YYYY-MM-DD`")
            }
            Self::Unconvertible { input } => {
                write!(f, "date `{input}` cannot be converted between calendars")
            }
            Self::BackendUnavailable => write!(f, "no Jalali calendar backend is available"),
        }
    }
}

impl Error for InvalidDateError {}

/// Conversion capability for the Jalali (Solar Hijri) calendar.
///
/// Injected into [`DateNormalizer`] so that backend absence is a
/// construction-time state instead of a per-call probe.
pub trait JalaliBackend {
    /// Builds a Gregorian date from Jalali year/month/day components.
    ///
    /// Returns `None` when the components do not form a real Jalali date.
    fn to_gregorian(&self, year: i32, month: u8, day: u8) -> Option<NaiveDate>;

    /// Converts a Gregorian date into Jalali year/month/day components.
    fn from_gregorian(&self, date: NaiveDate) -> Option<(i32, u8, u8)>;
}

/// Jalali backend implemented over `icu_calendar`'s Persian calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcuJalaliBackend;

impl JalaliBackend for IcuJalaliBackend {
    fn to_gregorian(&self, year: i32, month: u8, day: u8) -> Option<NaiveDate> {
        let persian = Date::try_new_persian_date(year, month, day).ok()?;
        let iso = persian.to_iso();
        NaiveDate::from_ymd_opt(iso.year().number, iso.month().ordinal, iso.day_of_month().0)
    }

    fn from_gregorian(&self, date: NaiveDate) -> Option<(i32, u8, u8)> {
        let month = u8::try_from(date.month()).ok()?;
        let day = u8::try_from(date.day()).ok()?;
        let iso = Date::try_new_iso_date(date.year(), month, day).ok()?;
        let persian = iso.to_calendar(Persian);
        let p_month = u8::try_from(persian.month().ordinal).ok()?;
        let p_day = u8::try_from(persian.day_of_month().0).ok()?;
        Some((persian.year().number, p_month, p_day))
    }
}

/// Boundary validator/converter between user date input and canonical form.
pub struct DateNormalizer {
    backend: Option<Box<dyn JalaliBackend>>,
}

impl DateNormalizer {
    /// Creates a normalizer with the ICU-backed Jalali capability.
    pub fn with_default_backend() -> Self {
        Self::with_backend(Box::new(IcuJalaliBackend))
    }

    /// Creates a normalizer around a caller-provided backend.
    pub fn with_backend(backend: Box<dyn JalaliBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Creates a normalizer with no Jalali capability.
    ///
    /// Canonical ISO input is still accepted; Jalali-form input and display
    /// conversion fail deterministically with
    /// [`InvalidDateError::BackendUnavailable`].
    pub fn without_backend() -> Self {
        Self { backend: None }
    }

    /// Returns whether a Jalali backend was injected.
    pub fn backend_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Normalizes a user-entered date string to a canonical Gregorian date.
    ///
    /// Jalali-looking input (see [`looks_like_jalali`]) is converted via the
    /// backend; anything else must already be a real ISO `YYYY-MM-DD` date.
    ///
    /// # Errors
    /// - `Unparseable` for malformed input in either representation.
    /// - `Unconvertible` when the Jalali components form no real date.
    /// - `BackendUnavailable` for Jalali-form input without a backend.
    pub fn normalize(&self, input: &str) -> CalendarResult<NaiveDate> {
        let trimmed = input.trim();

        if looks_like_jalali(trimmed) {
            let backend = self
                .backend
                .as_deref()
                .ok_or(InvalidDateError::BackendUnavailable)?;
            let (year, month, day) = parse_jalali_parts(trimmed)?;
            return backend
                .to_gregorian(year, month, day)
                .ok_or_else(|| InvalidDateError::Unconvertible {
                    input: trimmed.to_string(),
                });
        }

        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| InvalidDateError::Unparseable {
            input: trimmed.to_string(),
        })
    }

    /// Converts a canonical date to its Jalali `YYYY-MM-DD` display string.
    ///
    /// Callers rendering records must treat failure as non-fatal and leave
    /// the display field absent instead of aborting.
    pub fn to_display(&self, date: NaiveDate) -> CalendarResult<String> {
        let backend = self
            .backend
            .as_deref()
            .ok_or(InvalidDateError::BackendUnavailable)?;
        let (year, month, day) =
            backend
                .from_gregorian(date)
                .ok_or_else(|| InvalidDateError::Unconvertible {
                    input: date.to_string(),
                })?;
        Ok(format!("{year:04}-{month:02}-{day:02}"))
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::with_default_backend()
    }
}

/// Routing heuristic for raw date input.
///
/// Jalali years are currently in the 14xx range while incoming Gregorian
/// dates are 20xx, so a `14` prefix on the first group routes the string to
/// the Jalali parser. Gregorian dates in years 1400-1499 are misrouted by
/// this check; known limitation inherited from the original tool, kept
/// rather than silently tightened.
pub fn looks_like_jalali(input: &str) -> bool {
    input.matches('-').count() == 2 && input.starts_with("14")
}

fn parse_jalali_parts(input: &str) -> CalendarResult<(i32, u8, u8)> {
    let unparseable = || InvalidDateError::Unparseable {
        input: input.to_string(),
    };

    let mut groups = input.split('-');
    let year = groups
        .next()
        .and_then(|part| part.parse::<i32>().ok())
        .ok_or_else(unparseable)?;
    let month = groups
        .next()
        .and_then(|part| part.parse::<u8>().ok())
        .ok_or_else(unparseable)?;
    let day = groups
        .next()
        .and_then(|part| part.parse::<u8>().ok())
        .ok_or_else(unparseable)?;

    if groups.next().is_some() {
        return Err(unparseable());
    }

    Ok((year, month, day))
}
