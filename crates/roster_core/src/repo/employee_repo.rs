//! Employee store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create-table, insert, delete-by-id and full-scan APIs over the
//!   `employees` table.
//! - Classify failures as storage-unavailable, write or read failures.
//!
//! # Invariants
//! - Identifiers are assigned by SQLite only, ascending and never reused.
//! - `scan_all` returns rows ordered by ascending identifier.
//! - Deleting an absent identifier is a successful no-op.

use crate::db::{ensure_schema, open_db, open_db_in_memory, DbError};
use crate::model::employee::{
    format_storage_date, parse_storage_date, Employee, EmployeeId, EmployeeValidationError,
    NewEmployee,
};
use log::{debug, error, info};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    name,
    birth_date,
    salary
FROM employees
ORDER BY id ASC";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure taxonomy for the durable store.
#[derive(Debug)]
pub enum StoreError {
    /// Storage could not be opened or the schema could not be created.
    StorageUnavailable(DbError),
    /// Insert payload violated record invariants; nothing was written.
    Validation(EmployeeValidationError),
    WriteFailed(DbError),
    ReadFailed(DbError),
    /// A persisted row could not be decoded. Counts as a read failure.
    CorruptRow { id: EmployeeId, detail: String },
}

/// Coarse classification of `StoreError` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    StorageUnavailable,
    Validation,
    WriteFailed,
    ReadFailed,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::StorageUnavailable(_) => StoreErrorKind::StorageUnavailable,
            Self::Validation(_) => StoreErrorKind::Validation,
            Self::WriteFailed(_) => StoreErrorKind::WriteFailed,
            Self::ReadFailed(_) | Self::CorruptRow { .. } => StoreErrorKind::ReadFailed,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Validation(err) => err.code(),
            Self::WriteFailed(_) => "write_failed",
            Self::ReadFailed(_) => "read_failed",
            Self::CorruptRow { .. } => "corrupt_row",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::WriteFailed(err) => write!(f, "write failed: {err}"),
            Self::ReadFailed(err) => write!(f, "read failed: {err}"),
            Self::CorruptRow { id, detail } => {
                write!(f, "read failed: corrupt employee row {id}: {detail}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable(err) | Self::WriteFailed(err) | Self::ReadFailed(err) => {
                Some(err)
            }
            Self::Validation(err) => Some(err),
            Self::CorruptRow { .. } => None,
        }
    }
}

impl From<EmployeeValidationError> for StoreError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Storage contract for employee rows.
///
/// Implementations are driven from one thread, one call at a time.
pub trait EmployeeStore {
    /// Ensures backing storage is ready. Idempotent.
    fn initialize(&self) -> StoreResult<()>;
    /// Persists one row and returns its assigned identifier.
    fn insert(&self, employee: &NewEmployee) -> StoreResult<EmployeeId>;
    /// Removes the row if present. Returns whether a row was removed.
    fn delete_by_id(&self, id: EmployeeId) -> StoreResult<bool>;
    /// Reads every row, ascending by identifier.
    fn scan_all(&self) -> StoreResult<Vec<Employee>>;
}

/// SQLite-backed employee store.
///
/// Owns its connection for the lifetime of the store.
pub struct SqliteEmployeeStore {
    conn: Connection,
}

impl SqliteEmployeeStore {
    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = open_db(path).map_err(StoreError::StorageUnavailable)?;
        Ok(Self { conn })
    }

    /// Opens an isolated in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_db_in_memory().map_err(StoreError::StorageUnavailable)?;
        Ok(Self { conn })
    }

    /// Wraps an existing connection. Call `initialize` before use.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl EmployeeStore for SqliteEmployeeStore {
    fn initialize(&self) -> StoreResult<()> {
        ensure_schema(&self.conn).map_err(StoreError::StorageUnavailable)
    }

    fn insert(&self, employee: &NewEmployee) -> StoreResult<EmployeeId> {
        employee.validate()?;
        let started_at = Instant::now();

        let inserted = self.conn.execute(
            "INSERT INTO employees (name, birth_date, salary) VALUES (?1, ?2, ?3);",
            params![
                employee.name.as_str(),
                format_storage_date(employee.birth_date),
                employee.salary,
            ],
        );

        match inserted {
            Ok(_) => {
                let id = self.conn.last_insert_rowid();
                info!(
                    "event=employee_insert module=store status=ok id={} duration_ms={}",
                    id,
                    started_at.elapsed().as_millis()
                );
                Ok(id)
            }
            Err(err) => {
                error!(
                    "event=employee_insert module=store status=error duration_ms={} error_code=write_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(StoreError::WriteFailed(err.into()))
            }
        }
    }

    fn delete_by_id(&self, id: EmployeeId) -> StoreResult<bool> {
        let started_at = Instant::now();

        match self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])
        {
            Ok(changed) => {
                info!(
                    "event=employee_delete module=store status=ok id={} removed={} duration_ms={}",
                    id,
                    changed,
                    started_at.elapsed().as_millis()
                );
                Ok(changed > 0)
            }
            Err(err) => {
                error!(
                    "event=employee_delete module=store status=error id={} duration_ms={} error_code=write_failed error={}",
                    id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(StoreError::WriteFailed(err.into()))
            }
        }
    }

    fn scan_all(&self) -> StoreResult<Vec<Employee>> {
        let started_at = Instant::now();

        match scan_rows(&self.conn) {
            Ok(employees) => {
                debug!(
                    "event=employee_scan module=store status=ok rows={} duration_ms={}",
                    employees.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(employees)
            }
            Err(err) => {
                error!(
                    "event=employee_scan module=store status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn scan_rows(conn: &Connection) -> StoreResult<Vec<Employee>> {
    let mut stmt = conn.prepare(EMPLOYEE_SELECT_SQL).map_err(read_failed)?;
    let mut rows = stmt.query([]).map_err(read_failed)?;
    let mut employees = Vec::new();

    while let Some(row) = rows.next().map_err(read_failed)? {
        employees.push(parse_employee_row(row)?);
    }

    Ok(employees)
}

fn parse_employee_row(row: &Row<'_>) -> StoreResult<Employee> {
    let id: EmployeeId = row.get("id").map_err(read_failed)?;
    let corrupt = |detail: String| StoreError::CorruptRow { id, detail };

    let name: String = row.get("name").map_err(read_failed)?;
    if name.trim().is_empty() {
        return Err(corrupt("empty value in employees.name".to_string()));
    }

    let birth_date_text: String = row.get("birth_date").map_err(read_failed)?;
    let birth_date = parse_storage_date(&birth_date_text).ok_or_else(|| {
        corrupt(format!(
            "invalid date `{birth_date_text}` in employees.birth_date"
        ))
    })?;

    let salary: f64 = row.get("salary").map_err(read_failed)?;
    if !salary.is_finite() || salary < 0.0 {
        return Err(corrupt(format!("invalid value `{salary}` in employees.salary")));
    }

    Ok(Employee {
        id,
        name,
        birth_date,
        salary,
    })
}

fn read_failed(err: rusqlite::Error) -> StoreError {
    StoreError::ReadFailed(err.into())
}
