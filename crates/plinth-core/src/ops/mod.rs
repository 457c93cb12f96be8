//! Operations over sessions

pub mod filter;
pub mod lookup_ops;
pub mod memory;

pub use memory::MemorySession;
