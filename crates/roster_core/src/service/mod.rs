//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the roster use cases.
//! - Keep presentation layers decoupled from storage details.

pub mod roster_manager;
