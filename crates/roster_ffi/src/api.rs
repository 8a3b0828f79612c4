//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the roster boundary (init, add, delete, view) to Dart via FRB.
//! - Translate core errors into stable response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - The process holds at most one roster; every call locks it, so calls
//!   from the UI isolate are serialized one at a time.

use log::warn;
use roster_core::config::resolve_db_path;
use roster_core::{
    core_version as core_version_inner, format_display_date, init_logging as init_logging_inner,
    ping as ping_inner, EmployeeId, LogLevel, LoggingConfig, RosterError, RosterManager,
    SqliteEmployeeStore,
};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

type RosterSlot = Mutex<Option<RosterManager<SqliteEmployeeStore>>>;

static ROSTER: RosterSlot = Mutex::new(None);

const NOT_INITIALIZED_CODE: &str = "not_initialized";

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = match LogLevel::parse(&level) {
        Ok(level) => level,
        Err(err) => return err.to_string(),
    };
    let config = LoggingConfig::new(level, PathBuf::from(log_dir.trim()));
    match init_logging_inner(&config) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Result envelope for roster mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Stable reason code on failure (`empty_name`, `bad_date`, ...).
    pub error_code: Option<String>,
    /// Identifier of the created employee (add only).
    pub employee_id: Option<i64>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl RosterActionResponse {
    fn success(message: impl Into<String>, employee_id: Option<EmployeeId>) -> Self {
        Self {
            ok: true,
            error_code: None,
            employee_id,
            message: message.into(),
        }
    }

    fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_code: Some(code.to_string()),
            employee_id: None,
            message: message.into(),
        }
    }

    fn from_error(operation: &str, err: &RosterError) -> Self {
        Self::failure(err.code(), format!("{operation} failed: {err}"))
    }
}

/// One table row as the UI renders it.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterViewRow {
    /// 1-based display position.
    pub position: u32,
    /// Stable identifier to pass to `roster_delete`.
    pub employee_id: i64,
    pub name: String,
    /// `dd.MM.yyyy`.
    pub birth_date: String,
    pub salary: f64,
}

/// Snapshot of the roster for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterViewResponse {
    pub rows: Vec<RosterViewRow>,
    pub message: String,
    /// True when a recent write is persisted but not yet visible.
    pub stale: bool,
}

/// Opens the roster database and loads it into memory.
///
/// `db_path = None` resolves `ROSTER_DB_PATH`, then `employees.db`.
/// Calling again replaces the active roster.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_init(db_path: Option<String>) -> RosterActionResponse {
    init_in(&ROSTER, db_path)
}

/// Adds an employee from form input and reloads the roster.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_add(name: String, birth_date: String, salary: String) -> RosterActionResponse {
    add_in(&ROSTER, &name, &birth_date, &salary)
}

/// Deletes an employee by stable identifier and reloads the roster.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_delete(employee_id: i64) -> RosterActionResponse {
    delete_in(&ROSTER, employee_id)
}

/// Returns the current roster rows.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_view() -> RosterViewResponse {
    view_in(&ROSTER)
}

fn lock(slot: &RosterSlot) -> MutexGuard<'_, Option<RosterManager<SqliteEmployeeStore>>> {
    // The roster stays consistent after any failed call, so a poisoned lock is usable.
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn init_in(slot: &RosterSlot, db_path: Option<String>) -> RosterActionResponse {
    let explicit = db_path
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    let db_path = resolve_db_path(explicit);

    match RosterManager::open(&db_path) {
        Ok(roster) => {
            let message = format!("Roster loaded with {} employee(s).", roster.len());
            *lock(slot) = Some(roster);
            RosterActionResponse::success(message, None)
        }
        Err(err) => {
            warn!(
                "event=ffi_roster_init module=ffi status=error error_code={}",
                err.code()
            );
            RosterActionResponse::from_error("roster_init", &err)
        }
    }
}

fn add_in(slot: &RosterSlot, name: &str, birth_date: &str, salary: &str) -> RosterActionResponse {
    let mut guard = lock(slot);
    let Some(roster) = guard.as_mut() else {
        return not_initialized();
    };
    match roster.add(name, birth_date, salary) {
        Ok(id) => RosterActionResponse::success("Employee added.", Some(id)),
        Err(err) => RosterActionResponse::from_error("roster_add", &err),
    }
}

fn delete_in(slot: &RosterSlot, employee_id: EmployeeId) -> RosterActionResponse {
    let mut guard = lock(slot);
    let Some(roster) = guard.as_mut() else {
        return not_initialized();
    };
    match roster.delete(employee_id) {
        Ok(()) => RosterActionResponse::success("Employee deleted.", None),
        Err(err) => RosterActionResponse::from_error("roster_delete", &err),
    }
}

fn view_in(slot: &RosterSlot) -> RosterViewResponse {
    let guard = lock(slot);
    let Some(roster) = guard.as_ref() else {
        return RosterViewResponse {
            rows: Vec::new(),
            message: "roster not initialized".to_string(),
            stale: false,
        };
    };

    let rows = roster
        .view()
        .map(|row| RosterViewRow {
            position: u32::try_from(row.position).unwrap_or(u32::MAX),
            employee_id: row.employee.id,
            name: row.employee.name.clone(),
            birth_date: format_display_date(row.employee.birth_date),
            salary: row.employee.salary,
        })
        .collect::<Vec<_>>();
    let message = if rows.is_empty() {
        "No employees.".to_string()
    } else {
        format!("{} employee(s).", rows.len())
    };

    RosterViewResponse {
        rows,
        message,
        stale: roster.is_stale(),
    }
}

fn not_initialized() -> RosterActionResponse {
    RosterActionResponse::failure(
        NOT_INITIALIZED_CODE,
        "roster not initialized; call roster_init first",
    )
}
