//! Flutter-facing bindings for the employee roster.

pub mod api;
