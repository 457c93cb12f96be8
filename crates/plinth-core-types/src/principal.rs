//! Acting-principal identity
//!
//! Every mutating operation runs on behalf of a principal; the principal's
//! display name is captured into the audit revision written for that
//! operation, so history reads attribute each change to whoever made it.

use serde::{Deserialize, Serialize};

/// The identity an operation is performed under
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    /// Create a principal from its display name
    pub fn new(name: String) -> Self {
        Self(name)
    }

    /// The display name recorded in audit revisions
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
