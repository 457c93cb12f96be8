//! Audit trail reconstruction
//!
//! Replays the revision log of one entity back into typed history. Each
//! ADD/MOD revision carries a full JSON snapshot which is deserialized
//! into the entity type; DEL revisions carry none and reconstruct with an
//! absent entity.

use serde::de::DeserializeOwned;

use crate::errors::{PlinthError, Result, SessionError};
use crate::model::{AuditRevision, EntityId, VersionedEntity};
use crate::session::EntitySession;

/// The full audit trail of one entity id, oldest revision first.
///
/// An id with no history yields an empty vector, not an error, so callers
/// cannot distinguish "never existed" from "no revisions" here; address
/// checks belong to the caller. Reconstruction survives deletion of the
/// entity itself because the revision log is append-only.
pub fn audit_trail<E, S>(session: &S, entity_id: EntityId) -> Result<Vec<AuditRevision<E>>>
where
    E: VersionedEntity + DeserializeOwned,
    S: EntitySession<E>,
{
    let records = session.revisions(entity_id).map_err(PlinthError::Session)?;

    let mut trail = Vec::with_capacity(records.len());
    for record in records {
        let entity = match record.snapshot {
            Some(snapshot) => {
                let parsed = serde_json::from_value(snapshot).map_err(|e| {
                    PlinthError::Session(SessionError::Snapshot {
                        message: format!(
                            "revision {} of entity {}: {}",
                            record.sequence, entity_id, e
                        ),
                    })
                })?;
                Some(parsed)
            }
            None => None,
        };
        trail.push(AuditRevision {
            sequence: record.sequence,
            revision_type: record.revision_type,
            user_name: record.user_name,
            entity,
        });
    }

    Ok(trail)
}
