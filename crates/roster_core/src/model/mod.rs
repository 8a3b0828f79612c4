//! Domain model for the employee roster.
//!
//! # Responsibility
//! - Define the canonical employee record and its insert payload.
//! - Own the text codecs for dates (storage and user-facing forms).
//!
//! # Invariants
//! - Every persisted employee is identified by a store-assigned `EmployeeId`.
//! - Records are immutable once persisted; there is no update path.

pub mod employee;
