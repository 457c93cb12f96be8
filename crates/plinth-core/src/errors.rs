//! Error types and the stable error catalog for Plinth
//!
//! Two layers live here:
//! - `PlinthError`: the domain error enum returned by every fallible operation
//! - the error catalog: the mapping from stable, client-facing error codes to
//!   messages and HTTP status codes
//!
//! Error codes are opaque strings. Callers match on codes, never on message
//! text, so messages can be reworded without breaking clients.

use thiserror::Error;

use crate::model::{EntityId, Version};

/// Result type alias for Plinth operations
pub type Result<T> = std::result::Result<T, PlinthError>;

/// Result type alias for session-layer operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

// ========================================================================
// Error Codes
// ========================================================================

/// Stable error codes surfaced to clients.
///
/// Numeric codes are business rejections; `F`-prefixed codes come from the
/// persistence engine itself.
pub mod codes {
    /// Parent id in the request context disagrees with the payload
    pub const PARENT_CONTEXT_MISMATCH: &str = "0001";
    /// Referenced parent lookup value does not exist
    pub const PARENT_ID_INVALID: &str = "0002";
    /// Child value declares the same list name as its parent
    pub const LIST_NAME_MATCHES_PARENT: &str = "0003";
    /// Duplicate (list name, display value, parent) tuple
    pub const DUPLICATE_LOOKUP_VALUE: &str = "0004";
    /// Payload id disagrees with the id the request addressed
    pub const ID_MISMATCH: &str = "0005";
    /// Addressed lookup value does not exist
    pub const LOOKUP_VALUE_ID_INVALID: &str = "0006";
    /// Effective-date filter value is not a valid `yyyy-MM-dd` date
    pub const INVALID_EFFECTIVE_DATE: &str = "0007";
    /// Lookup value still has children and cannot be deleted
    pub const DELETE_WITH_CHILDREN: &str = "0008";
    /// Optimistic-lock version check failed
    pub const STALE_VERSION: &str = "F001";
    /// Update carried no change to any updatable field
    pub const NO_FIELDS_UPDATED: &str = "F002";
}

// ========================================================================
// Error Catalog
// ========================================================================

/// One entry of the error catalog: code, human-readable message, HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub message: &'static str,
    pub http_status: u16,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        code: codes::PARENT_CONTEXT_MISMATCH,
        message: "The parent id of the lookup value does not match the parent id of the request",
        http_status: 400,
    },
    CatalogEntry {
        code: codes::PARENT_ID_INVALID,
        message: "The parent id of the lookup value is invalid",
        http_status: 400,
    },
    CatalogEntry {
        code: codes::LIST_NAME_MATCHES_PARENT,
        message: "The lookup list name of the value cannot be the same as the lookup list name of its parent",
        http_status: 400,
    },
    CatalogEntry {
        code: codes::DUPLICATE_LOOKUP_VALUE,
        message: "The lookup value already exists in this list",
        http_status: 400,
    },
    CatalogEntry {
        code: codes::ID_MISMATCH,
        message: "The id of the lookup value does not match the id of the request",
        http_status: 400,
    },
    CatalogEntry {
        code: codes::LOOKUP_VALUE_ID_INVALID,
        message: "The id of the lookup value is invalid",
        http_status: 404,
    },
    CatalogEntry {
        code: codes::INVALID_EFFECTIVE_DATE,
        message: "The effective date is invalid, the format should be yyyy-MM-dd",
        http_status: 400,
    },
    CatalogEntry {
        code: codes::DELETE_WITH_CHILDREN,
        message: "The lookup value cannot be deleted because it has children",
        http_status: 400,
    },
    CatalogEntry {
        code: codes::STALE_VERSION,
        message: "The entity has been updated since it has been retrieved",
        http_status: 400,
    },
    CatalogEntry {
        code: codes::NO_FIELDS_UPDATED,
        message: "None of the updatable fields were updated",
        http_status: 400,
    },
];

/// Look up a catalog entry by its stable code
pub fn catalog_entry(code: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.code == code)
}

// ========================================================================
// Session Errors
// ========================================================================

/// Failures raised by a session backend.
///
/// Sessions report constraint violations by the schema-level constraint
/// name; translating names into client-facing error codes is the engine's
/// job, not the session's.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A named store constraint rejected the write
    #[error("Constraint '{constraint}' was violated")]
    ConstraintViolated { constraint: String },

    /// The stored version no longer matches the version the write asserted
    #[error("Stored entity {entity_id} changed since it was read")]
    StaleWrite { entity_id: EntityId },

    /// No stored entity carries the given id
    #[error("No stored entity with id {entity_id}")]
    NotFound { entity_id: EntityId },

    /// A revision snapshot could not be serialized or deserialized
    #[error("Snapshot failure: {message}")]
    Snapshot { message: String },

    /// The backend failed for a reason outside the domain vocabulary
    #[error("Session backend failure: {message}")]
    Backend { message: String },
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Snapshot {
            message: err.to_string(),
        }
    }
}

// ========================================================================
// Domain Errors
// ========================================================================

/// Domain errors for Plinth operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlinthError {
    // ===== Parent / Hierarchy Errors =====
    /// The payload's parent id disagrees with the parent the request addressed
    #[error("Parent id of the payload ({payload:?}) does not match the parent id of the request ({context:?})")]
    ParentContextMismatch {
        context: Option<EntityId>,
        payload: Option<EntityId>,
    },

    /// The referenced parent lookup value does not exist
    #[error("Parent lookup value not found: {parent_id}")]
    ParentNotFound { parent_id: EntityId },

    /// A child value cannot live in the same list as its parent
    #[error("Lookup value and its parent share the list name '{list_name}'")]
    ListNameMatchesParent { list_name: String },

    // ===== Addressing Errors =====
    /// The payload carries an id different from the one the request addressed
    #[error("Payload id {payload} does not match addressed id {addressed}")]
    IdMismatch {
        addressed: EntityId,
        payload: EntityId,
    },

    /// No lookup value is stored under the addressed id
    #[error("Lookup value not found: {entity_id}")]
    LookupValueNotFound { entity_id: EntityId },

    // ===== Field Validation Errors =====
    /// A field failed its structural validation rule
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// An effective-date filter value did not parse as `yyyy-MM-dd`
    #[error("Invalid effective date '{input}', the format should be yyyy-MM-dd")]
    InvalidDate { input: String },

    // ===== Optimistic Concurrency Errors =====
    /// The incoming version does not match the stored version
    #[error("The entity has been updated since it has been retrieved")]
    StaleVersion {
        asserted: Option<Version>,
        stored: Option<Version>,
    },

    /// The update carried no change to any updatable field
    #[error("None of the updatable fields were updated")]
    NoFieldsUpdated,

    // ===== Constraint Translation =====
    /// A store constraint violation with a registered business code
    #[error("Constraint '{constraint}' was violated (code {code})")]
    ConstraintViolation { code: String, constraint: String },

    /// A store constraint violation no mapping was registered for
    #[error("Unmapped constraint violation: '{constraint}'")]
    UnmappedViolation { constraint: String },

    // ===== Infrastructure =====
    /// A session-layer failure that carries no business meaning
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl PlinthError {
    /// Stable client-facing code for this error, if it has one.
    ///
    /// Infrastructure errors and unmapped violations have no code; they
    /// surface as internal failures.
    pub fn code(&self) -> Option<&str> {
        match self {
            PlinthError::ParentContextMismatch { .. } => Some(codes::PARENT_CONTEXT_MISMATCH),
            PlinthError::ParentNotFound { .. } => Some(codes::PARENT_ID_INVALID),
            PlinthError::ListNameMatchesParent { .. } => Some(codes::LIST_NAME_MATCHES_PARENT),
            PlinthError::IdMismatch { .. } => Some(codes::ID_MISMATCH),
            PlinthError::LookupValueNotFound { .. } => Some(codes::LOOKUP_VALUE_ID_INVALID),
            PlinthError::InvalidDate { .. } => Some(codes::INVALID_EFFECTIVE_DATE),
            PlinthError::StaleVersion { .. } => Some(codes::STALE_VERSION),
            PlinthError::NoFieldsUpdated => Some(codes::NO_FIELDS_UPDATED),
            PlinthError::ConstraintViolation { code, .. } => Some(code),
            PlinthError::InvalidField { .. }
            | PlinthError::UnmappedViolation { .. }
            | PlinthError::Session(_) => None,
        }
    }

    /// HTTP status an outer transport layer should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            PlinthError::UnmappedViolation { .. } | PlinthError::Session(_) => 500,
            PlinthError::InvalidField { .. } => 400,
            other => other
                .code()
                .and_then(catalog_entry)
                .map(|entry| entry.http_status)
                // Registered codes outside the catalog are business
                // rejections by definition.
                .unwrap_or(400),
        }
    }

    /// Variant name for structured log fields
    pub fn kind_name(&self) -> &'static str {
        match self {
            PlinthError::ParentContextMismatch { .. } => "ParentContextMismatch",
            PlinthError::ParentNotFound { .. } => "ParentNotFound",
            PlinthError::ListNameMatchesParent { .. } => "ListNameMatchesParent",
            PlinthError::IdMismatch { .. } => "IdMismatch",
            PlinthError::LookupValueNotFound { .. } => "LookupValueNotFound",
            PlinthError::InvalidField { .. } => "InvalidField",
            PlinthError::InvalidDate { .. } => "InvalidDate",
            PlinthError::StaleVersion { .. } => "StaleVersion",
            PlinthError::NoFieldsUpdated => "NoFieldsUpdated",
            PlinthError::ConstraintViolation { .. } => "ConstraintViolation",
            PlinthError::UnmappedViolation { .. } => "UnmappedViolation",
            PlinthError::Session(_) => "Session",
        }
    }
}
