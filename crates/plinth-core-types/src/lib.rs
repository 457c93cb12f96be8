//! Core types shared across Plinth facilities
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation types**: RequestId, RequestContext
//! - **Identity**: Principal, the acting identity captured on every write
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod principal;
pub mod schema;

pub use correlation::{RequestContext, RequestId};
pub use principal::Principal;
