//! Revision log records
//!
//! Every engine write appends one row to an append-only revision log. The
//! stored form (`RevisionRecord`) carries a JSON field snapshot; the
//! reconstructed form (`AuditRevision`) carries the typed entity again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::EntityId;

/// Kind of change one revision records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RevisionType {
    Add,
    Mod,
    Del,
}

impl RevisionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevisionType::Add => "ADD",
            RevisionType::Mod => "MOD",
            RevisionType::Del => "DEL",
        }
    }

    /// Parse the stored tag back into the enum
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ADD" => Some(RevisionType::Add),
            "MOD" => Some(RevisionType::Mod),
            "DEL" => Some(RevisionType::Del),
            _ => None,
        }
    }
}

impl std::fmt::Display for RevisionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored row of the revision log
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionRecord {
    /// Id of the entity the revision belongs to
    pub entity_id: EntityId,
    /// Per-entity monotonic sequence, assigned by the session at append time
    pub sequence: i64,
    pub revision_type: RevisionType,
    /// Display name of the principal who performed the change
    pub user_name: String,
    /// Full field snapshot at that point; absent for deletions
    pub snapshot: Option<Value>,
    pub recorded_at: DateTime<Utc>,
}

/// One reconstructed revision of an entity's audit trail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRevision<E> {
    pub sequence: i64,
    pub revision_type: RevisionType,
    pub user_name: String,
    /// Entity state after the change; absent for deletions
    pub entity: Option<E>,
}
