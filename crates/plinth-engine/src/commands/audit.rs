//! Audit trail query command.
//!
//! Read-only: replays the revision log of one lookup value into its
//! ordered history. The session is dropped without commit, which is a
//! no-op rollback.

use plinth_core::audit::audit_trail;
use plinth_core::errors::Result;
use plinth_core::model::{AuditRevision, EntityId, LookupValue};
use plinth_core::PlinthError;
use plinth_core::{log_op_end, log_op_error, log_op_start};
use plinth_core_types::RequestContext;
use plinth_store::SqliteSession;
use rusqlite::Connection;

/// The full audit trail of one lookup value, oldest revision first
///
/// ## Returns
///
/// One revision per historical write (ADD/MOD/DEL), each attributed to
/// the principal who performed it. An id with no history returns an
/// empty vector.
pub fn lookup_value_audit_trail(
    ctx: &RequestContext,
    entity_id: EntityId,
    conn: &mut Connection,
) -> Result<Vec<AuditRevision<LookupValue>>> {
    log_op_start!(
        "lookup_value_audit_trail",
        request_id = ctx.request_id.as_str(),
        entity_id = entity_id.as_i64()
    );
    let start = std::time::Instant::now();

    let session = SqliteSession::begin(conn).map_err(PlinthError::Session)?;
    let trail = audit_trail(&session, entity_id).map_err(|e| {
        log_op_error!(
            "lookup_value_audit_trail",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = ctx.request_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "lookup_value_audit_trail",
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = ctx.request_id.as_str(),
        entity_id = entity_id.as_i64(),
        revision_count = trail.len() as u64
    );

    Ok(trail)
}
