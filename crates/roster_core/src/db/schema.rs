//! Employee table definition.
//!
//! `AUTOINCREMENT` keeps identifiers monotonic and never reused, even after
//! the highest row is deleted.

use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

pub const EMPLOYEES_TABLE: &str = "employees";

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the `employees` table when absent.
///
/// Safe to call any number of times on the same database.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    let started_at = Instant::now();
    match conn.execute_batch(SCHEMA_SQL) {
        Ok(()) => {
            info!(
                "event=schema_ensure module=db status=ok table={} duration_ms={}",
                EMPLOYEES_TABLE,
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=schema_ensure module=db status=error table={} duration_ms={} error_code=schema_create_failed error={}",
                EMPLOYEES_TABLE,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}
