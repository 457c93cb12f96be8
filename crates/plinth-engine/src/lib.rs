//! Plinth Engine - Service command layer
//!
//! The surface an outer transport layer (REST, CLI, ...) calls. Each
//! command owns one transaction over a `rusqlite::Connection` and the
//! lifecycle logging for the operation it performs.

pub mod commands;
