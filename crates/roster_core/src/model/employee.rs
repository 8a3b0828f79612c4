//! Employee domain model and input validation.
//!
//! # Responsibility
//! - Define `Employee` (persisted) and `NewEmployee` (validated insert input).
//! - Parse user input (`dd.MM.yyyy` dates, decimal salaries).
//! - Encode/decode the `YYYY-MM-DD` storage date form.
//!
//! # Invariants
//! - `name` is never empty or whitespace-only; it is stored as entered.
//! - `salary` is finite and non-negative.
//! - `birth_date` year is within `0..=9999`, so the storage form round-trips
//!   exactly: `parse_storage_date(&format_storage_date(d)) == Ok(d)`.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier. Monotonic, never reused.
pub type EmployeeId = i64;

static STORAGE_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid storage date regex")
});
static INPUT_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").expect("valid input date regex")
});

const MAX_YEAR: i32 = 9999;

/// One persisted roster entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// Serialized as `YYYY-MM-DD`.
    pub birth_date: NaiveDate,
    pub salary: f64,
}

/// Validated payload for inserting one employee.
///
/// The identifier is deliberately absent: only the store assigns it.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name: String,
    pub birth_date: NaiveDate,
    pub salary: f64,
}

/// Rejection reasons for user-provided employee input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    /// Name is empty or whitespace-only.
    EmptyName,
    /// Date text is not a valid `dd.MM.yyyy` calendar date.
    BadDate(String),
    /// Salary text is not a finite, non-negative decimal.
    BadSalary(String),
}

impl EmployeeValidationError {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::BadDate(_) => "bad_date",
            Self::BadSalary(_) => "bad_salary",
        }
    }
}

impl Display for EmployeeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::BadDate(value) => {
                write!(f, "invalid birth date `{value}`; expected dd.MM.yyyy")
            }
            Self::BadSalary(value) => write!(
                f,
                "invalid salary `{value}`; expected a non-negative decimal number"
            ),
        }
    }
}

impl Error for EmployeeValidationError {}

impl NewEmployee {
    /// Builds a payload from typed values, enforcing store-side constraints.
    pub fn new(
        name: impl Into<String>,
        birth_date: NaiveDate,
        salary: f64,
    ) -> Result<Self, EmployeeValidationError> {
        let employee = Self {
            name: name.into(),
            birth_date,
            salary,
        };
        employee.validate()?;
        Ok(employee)
    }

    /// Parses raw form input: name, `dd.MM.yyyy` date text and salary text.
    ///
    /// Checks run in field order, so the first invalid field is reported.
    pub fn parse(
        name: &str,
        birth_date_text: &str,
        salary_text: &str,
    ) -> Result<Self, EmployeeValidationError> {
        if name.trim().is_empty() {
            return Err(EmployeeValidationError::EmptyName);
        }
        let birth_date = parse_input_date(birth_date_text)?;
        let salary = parse_salary(salary_text)?;
        Self::new(name, birth_date, salary)
    }

    /// Re-checks invariants; called by stores before any write.
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.name.trim().is_empty() {
            return Err(EmployeeValidationError::EmptyName);
        }
        if !year_in_range(self.birth_date) {
            return Err(EmployeeValidationError::BadDate(
                self.birth_date.to_string(),
            ));
        }
        if !self.salary.is_finite() || self.salary < 0.0 {
            return Err(EmployeeValidationError::BadSalary(self.salary.to_string()));
        }
        Ok(())
    }
}

/// Encodes a date in the `YYYY-MM-DD` storage form.
pub fn format_storage_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Decodes the `YYYY-MM-DD` storage form.
///
/// Returns `None` for anything that is not exactly that shape or not a real
/// calendar date.
pub fn parse_storage_date(value: &str) -> Option<NaiveDate> {
    let captures = STORAGE_DATE_RE.captures(value)?;
    ymd_from_parts(&captures[1], &captures[2], &captures[3])
}

/// Parses a user-entered `dd.MM.yyyy` date.
///
/// Day and month may be written with one or two digits (`2.5.1990`).
pub fn parse_input_date(value: &str) -> Result<NaiveDate, EmployeeValidationError> {
    let trimmed = value.trim();
    INPUT_DATE_RE
        .captures(trimmed)
        .and_then(|captures| ymd_from_parts(&captures[3], &captures[2], &captures[1]))
        .ok_or_else(|| EmployeeValidationError::BadDate(trimmed.to_string()))
}

/// Renders a date in the `dd.MM.yyyy` display form.
pub fn format_display_date(date: NaiveDate) -> String {
    format!("{:02}.{:02}.{:04}", date.day(), date.month(), date.year())
}

/// Parses a salary as a finite, non-negative decimal.
pub fn parse_salary(value: &str) -> Result<f64, EmployeeValidationError> {
    let trimmed = value.trim();
    let bad = || EmployeeValidationError::BadSalary(trimmed.to_string());
    let salary = trimmed.parse::<f64>().map_err(|_| bad())?;
    if !salary.is_finite() || salary < 0.0 {
        return Err(bad());
    }
    // Normalize `-0` so it never renders as a negative amount.
    Ok(salary.abs())
}

/// Renders a salary the way the roster table shows it, e.g. `$5000.00`.
pub fn format_salary(salary: f64) -> String {
    format!("${salary:.2}")
}

fn ymd_from_parts(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    let day = day.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn year_in_range(date: NaiveDate) -> bool {
    (0..=MAX_YEAR).contains(&date.year())
}
