//! Durable Store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract the roster manager writes through.
//! - Isolate SQLite query details from roster synchronization logic.
//!
//! # Invariants
//! - Write paths validate `NewEmployee` before SQL mutations.
//! - Read paths reject corrupt persisted rows instead of masking them.
//! - Errors are never swallowed; every failure reaches the caller.

pub mod employee_repo;
