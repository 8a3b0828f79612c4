//! Roster manager: the authoritative in-memory employee list.
//!
//! # Responsibility
//! - Own the in-memory list and keep it equal to persisted state.
//! - Route every mutation through the store, then reload in full.
//! - Expose a read-only, position-numbered view for display.
//!
//! # Invariants
//! - After any successful operation, the in-memory list equals a fresh
//!   `scan_all()` item for item, ordered by ascending identifier.
//! - A failed reload never overwrites the list partially; the previous
//!   list stays in place.
//! - A failed `add`/`delete` leaves the visible list exactly as it was.
//!
//! # Concurrency
//! No internal synchronization. Hosts that call from several threads must
//! serialize calls themselves.

use crate::model::employee::{Employee, EmployeeId, EmployeeValidationError, NewEmployee};
use crate::repo::employee_repo::{EmployeeStore, SqliteEmployeeStore, StoreError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

pub type RosterResult<T> = Result<T, RosterError>;

/// Error surfaced by roster operations.
#[derive(Debug)]
pub enum RosterError {
    /// User input was rejected; no state changed.
    Validation(EmployeeValidationError),
    /// The store failed; in-memory state is intact but may be stale.
    Store(StoreError),
}

impl RosterError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.code(),
            Self::Store(err) => err.code(),
        }
    }
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RosterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<EmployeeValidationError> for RosterError {
    fn from(value: EmployeeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RosterError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

/// One display row: a 1-based position paired with its record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterRow<'a> {
    pub position: usize,
    pub employee: &'a Employee,
}

/// In-memory roster synchronized with a durable store.
///
/// Only constructible through `initialize`, so every instance is ready.
pub struct RosterManager<S: EmployeeStore> {
    store: S,
    employees: Vec<Employee>,
    stale: bool,
}

impl RosterManager<SqliteEmployeeStore> {
    /// Opens a SQLite database file and loads the roster from it.
    pub fn open(path: impl AsRef<Path>) -> RosterResult<Self> {
        Self::initialize(SqliteEmployeeStore::open(path)?)
    }

    /// Builds a roster over an isolated in-memory database.
    pub fn open_in_memory() -> RosterResult<Self> {
        Self::initialize(SqliteEmployeeStore::open_in_memory()?)
    }
}

impl<S: EmployeeStore> RosterManager<S> {
    /// Initializes the store, then performs the first full load.
    pub fn initialize(store: S) -> RosterResult<Self> {
        let started_at = Instant::now();

        if let Err(err) = store.initialize() {
            error!(
                "event=roster_init module=roster status=error duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
            return Err(err.into());
        }

        let mut roster = Self {
            store,
            employees: Vec::new(),
            stale: false,
        };
        roster.load()?;

        info!(
            "event=roster_init module=roster status=ok rows={} duration_ms={}",
            roster.employees.len(),
            started_at.elapsed().as_millis()
        );
        Ok(roster)
    }

    /// Replaces the in-memory list with a full scan of the store.
    ///
    /// On failure the previous list is kept untouched.
    pub fn load(&mut self) -> RosterResult<()> {
        let started_at = Instant::now();
        match self.store.scan_all() {
            Ok(employees) => {
                self.employees = employees;
                self.stale = false;
                info!(
                    "event=roster_load module=roster status=ok rows={} duration_ms={}",
                    self.employees.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=roster_load module=roster status=error duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Validates form input, persists one employee and reloads.
    ///
    /// Input: `birth_date_text` in `dd.MM.yyyy`, `salary_text` as a decimal.
    /// Returns the identifier assigned by the store.
    pub fn add(
        &mut self,
        name: &str,
        birth_date_text: &str,
        salary_text: &str,
    ) -> RosterResult<EmployeeId> {
        let employee = match NewEmployee::parse(name, birth_date_text, salary_text) {
            Ok(employee) => employee,
            Err(err) => {
                warn!(
                    "event=roster_add module=roster status=rejected error_code={}",
                    err.code()
                );
                return Err(err.into());
            }
        };
        self.add_employee(&employee)
    }

    /// Persists an already-validated payload and reloads.
    pub fn add_employee(&mut self, employee: &NewEmployee) -> RosterResult<EmployeeId> {
        let id = self.store.insert(employee)?;
        self.reload_after_write("roster_add", id)?;
        Ok(id)
    }

    /// Deletes by stable identifier and reloads.
    ///
    /// Deleting an identifier that does not exist succeeds without change.
    pub fn delete(&mut self, id: EmployeeId) -> RosterResult<()> {
        self.store.delete_by_id(id)?;
        self.reload_after_write("roster_delete", id)
    }

    /// Current list paired with 1-based display positions.
    pub fn view(&self) -> impl ExactSizeIterator<Item = RosterRow<'_>> + '_ {
        self.employees
            .iter()
            .enumerate()
            .map(|(index, employee)| RosterRow {
                position: index + 1,
                employee,
            })
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn get(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.id == id)
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// True when a write reached storage but the reload after it failed.
    ///
    /// Cleared by the next successful `load`.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn reload_after_write(&mut self, event: &str, id: EmployeeId) -> RosterResult<()> {
        match self.load() {
            Ok(()) => {
                info!(
                    "event={} module=roster status=ok id={} rows={}",
                    event,
                    id,
                    self.employees.len()
                );
                Ok(())
            }
            Err(err) => {
                self.stale = true;
                warn!(
                    "event={} module=roster status=stale id={} error_code={}",
                    event,
                    id,
                    err.code()
                );
                Err(err)
            }
        }
    }
}
