//! Core domain logic for the employee roster.
//! This crate is the single source of truth for roster invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::RosterConfig;
pub use logging::{
    default_log_level, init_logging, logging_status, LogLevel, LoggingConfig, LoggingError,
};
pub use model::employee::{
    format_display_date, format_salary, format_storage_date, parse_input_date, parse_salary,
    parse_storage_date, Employee, EmployeeId, EmployeeValidationError, NewEmployee,
};
pub use repo::employee_repo::{
    EmployeeStore, SqliteEmployeeStore, StoreError, StoreErrorKind, StoreResult,
};
pub use service::roster_manager::{RosterError, RosterManager, RosterResult, RosterRow};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
