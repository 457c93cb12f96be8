//! Optimistic persistence engine
//!
//! The engine is the single write path for versioned entities. It layers
//! three behaviors over a raw session:
//!
//! - optimistic concurrency: updates assert the version the caller read,
//!   and a mismatch fails before anything is written
//! - no-op detection: an update that changes no updatable field is
//!   rejected instead of silently bumping the version
//! - constraint translation: schema-level constraint names raised by the
//!   session are translated into client-facing error codes through a
//!   per-instance mapping registered by the caller
//!
//! Every successful write also appends one revision-log row inside the
//! same unit of work, attributed to the principal the engine was built
//! with.

use std::collections::HashMap;
use std::marker::PhantomData;

use plinth_core_types::Principal;
use serde::Serialize;

use crate::errors::{PlinthError, Result, SessionError};
use crate::model::{RevisionType, VersionedEntity};
use crate::session::EntitySession;

/// Write path for one entity type over one session.
///
/// An engine instance is cheap and short-lived: callers build one per
/// operation, register the constraint mappings that operation cares
/// about, and drop it with the session.
pub struct PersistenceEngine<'s, E, S>
where
    E: VersionedEntity + Serialize,
    S: EntitySession<E>,
{
    session: &'s mut S,
    principal: Principal,
    constraint_mappings: HashMap<String, String>,
    _entity: PhantomData<E>,
}

impl<'s, E, S> PersistenceEngine<'s, E, S>
where
    E: VersionedEntity + Serialize,
    S: EntitySession<E>,
{
    pub fn new(session: &'s mut S, principal: Principal) -> Self {
        Self {
            session,
            principal,
            constraint_mappings: HashMap::new(),
            _entity: PhantomData,
        }
    }

    /// Register a translation from a store constraint name to the error
    /// code this operation answers that violation with.
    ///
    /// Violations of constraints with no registered mapping surface as
    /// [`PlinthError::UnmappedViolation`], an internal failure.
    pub fn add_constraint_mapping(&mut self, constraint_name: &str, error_code: &str) -> &mut Self {
        self.constraint_mappings
            .insert(constraint_name.to_string(), error_code.to_string());
        self
    }

    /// Insert a brand-new entity and append its ADD revision.
    ///
    /// The store assigns the id and version 0; the returned entity
    /// carries both.
    pub fn persist(&mut self, mut entity: E) -> Result<E> {
        self.session
            .insert(&mut entity)
            .map_err(|e| self.translate(e))?;

        let entity_id = entity
            .id()
            .ok_or_else(|| backend_invariant("insert did not assign an id"))?;
        let snapshot = snapshot_of(&entity)?;
        self.session
            .append_revision(
                entity_id,
                RevisionType::Add,
                self.principal.name(),
                Some(snapshot),
            )
            .map_err(PlinthError::Session)?;

        Ok(entity)
    }

    /// Merge `incoming` onto `stored`, write the result, and append its
    /// MOD revision.
    ///
    /// `stored` must be the currently stored state (the caller just read
    /// it); `incoming` is the caller-supplied edit. The version check runs
    /// first, then no-op detection, and only then is anything written:
    ///
    /// - `incoming`'s version must equal `stored`'s, else
    ///   [`PlinthError::StaleVersion`]
    /// - at least one updatable field must differ, else
    ///   [`PlinthError::NoFieldsUpdated`]
    ///
    /// A stale read fails even when the attempted edit is a no-op, so a
    /// caller holding outdated state always learns about the lost race.
    /// Only updatable fields are taken from `incoming`; everything else
    /// keeps its stored value. The returned entity carries the version
    /// the store assigned.
    pub fn update(&mut self, stored: E, incoming: &E) -> Result<E> {
        if incoming.version() != stored.version() {
            return Err(PlinthError::StaleVersion {
                asserted: incoming.version(),
                stored: stored.version(),
            });
        }
        if stored.updatable_fields_eq(incoming) {
            return Err(PlinthError::NoFieldsUpdated);
        }

        let mut updated = stored;
        updated.apply_updatable(incoming);
        self.session
            .update(&mut updated)
            .map_err(|e| self.translate(e))?;

        let entity_id = updated
            .id()
            .ok_or_else(|| backend_invariant("updated entity lost its id"))?;
        let snapshot = snapshot_of(&updated)?;
        self.session
            .append_revision(
                entity_id,
                RevisionType::Mod,
                self.principal.name(),
                Some(snapshot),
            )
            .map_err(PlinthError::Session)?;

        Ok(updated)
    }

    /// Delete a stored entity and append its DEL revision.
    ///
    /// DEL revisions carry no snapshot; the pre-delete state is already
    /// the snapshot of the previous revision.
    pub fn delete(&mut self, stored: E) -> Result<()> {
        let entity_id = stored
            .id()
            .ok_or_else(|| backend_invariant("cannot delete an unpersisted entity"))?;

        self.session
            .delete(entity_id)
            .map_err(|e| self.translate(e))?;
        self.session
            .append_revision(entity_id, RevisionType::Del, self.principal.name(), None)
            .map_err(PlinthError::Session)?;

        Ok(())
    }

    /// Map a session failure into the domain vocabulary
    fn translate(&self, err: SessionError) -> PlinthError {
        match err {
            SessionError::ConstraintViolated { constraint } => {
                match self.constraint_mappings.get(&constraint) {
                    Some(code) => PlinthError::ConstraintViolation {
                        code: code.clone(),
                        constraint,
                    },
                    None => {
                        tracing::warn!(
                            constraint = %constraint,
                            "store constraint violated with no registered mapping"
                        );
                        PlinthError::UnmappedViolation { constraint }
                    }
                }
            }
            SessionError::StaleWrite { .. } => PlinthError::StaleVersion {
                asserted: None,
                stored: None,
            },
            other => PlinthError::Session(other),
        }
    }
}

fn snapshot_of<E: Serialize>(entity: &E) -> Result<serde_json::Value> {
    serde_json::to_value(entity)
        .map_err(|e| PlinthError::Session(SessionError::Snapshot { message: e.to_string() }))
}

fn backend_invariant(message: &str) -> PlinthError {
    PlinthError::Session(SessionError::Backend {
        message: message.to_string(),
    })
}
