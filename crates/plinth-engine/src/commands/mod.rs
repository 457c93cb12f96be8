//! Command orchestration layer.
//!
//! Each command begins a `SqliteSession`, runs the core operation inside
//! it, and commits. Failures roll back with the dropped session.

pub mod audit;
pub mod lookup;
