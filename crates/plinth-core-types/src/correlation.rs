//! Correlation types for request tracking
//!
//! These types enable correlation of operations across service boundaries
//! and tie log events back to the request that caused them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::principal::Principal;

/// Unique identifier for a single request or operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through operation boundaries for correlation
///
/// Pairs the request identifier with the acting principal; service commands
/// take one of these and record the request id on their log events while
/// the principal is captured into audit revisions.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub principal: Principal,
}

impl RequestContext {
    /// Create a new context with a fresh RequestId
    pub fn new(principal: Principal) -> Self {
        Self {
            request_id: RequestId::new(),
            principal,
        }
    }

    /// Create a context with an existing RequestId
    pub fn with_request_id(request_id: RequestId, principal: Principal) -> Self {
        Self {
            request_id,
            principal,
        }
    }
}
