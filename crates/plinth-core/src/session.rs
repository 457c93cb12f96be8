//! Session abstraction over a transactional store
//!
//! A session is one atomic unit of work. Everything written through a
//! session either commits together or not at all; in particular an entity
//! write and its revision-log row always share one session.
//!
//! Sessions speak the session vocabulary (`SessionError`), not the domain
//! one: a violated store constraint is reported by its schema-level name
//! and translated into a client-facing code higher up, by the engine.

use serde_json::Value;

use crate::errors::SessionResult;
use crate::model::{EntityId, LookupValue, RevisionRecord, RevisionType, VersionedEntity};

/// Transactional persistence operations for one entity type.
///
/// Implementations must be transactional as a whole: a dropped session
/// without an explicit commit discards every write made through it.
pub trait EntitySession<E: VersionedEntity> {
    /// Insert a brand-new record.
    ///
    /// Assigns the store id and version 0 to `entity`. Fails with
    /// [`SessionError::ConstraintViolated`] when a named store constraint
    /// rejects the row.
    ///
    /// [`SessionError::ConstraintViolated`]: crate::errors::SessionError::ConstraintViolated
    fn insert(&mut self, entity: &mut E) -> SessionResult<()>;

    /// Overwrite the stored record carrying `entity`'s id.
    ///
    /// The write asserts `entity`'s version against the stored one and
    /// fails with [`SessionError::StaleWrite`] when they differ; on
    /// success the stored version is incremented by one and assigned back
    /// onto `entity`.
    ///
    /// [`SessionError::StaleWrite`]: crate::errors::SessionError::StaleWrite
    fn update(&mut self, entity: &mut E) -> SessionResult<()>;

    /// Remove the record with the given id.
    fn delete(&mut self, entity_id: EntityId) -> SessionResult<()>;

    /// Typed lookup by id
    fn find(&self, entity_id: EntityId) -> SessionResult<Option<E>>;

    /// Append one revision-log row inside the current unit of work.
    ///
    /// Returns the per-entity sequence number assigned to the row.
    fn append_revision(
        &mut self,
        entity_id: EntityId,
        revision_type: RevisionType,
        user_name: &str,
        snapshot: Option<Value>,
    ) -> SessionResult<i64>;

    /// The ordered revision log for one entity id, oldest first.
    ///
    /// An id with no history yields an empty vector, not an error; the
    /// log survives deletion of the entity itself.
    fn revisions(&self, entity_id: EntityId) -> SessionResult<Vec<RevisionRecord>>;
}

/// Indexed field-equality queries over stored lookup values.
///
/// Result ordering is part of the contract: ascending id, which is
/// insertion order for store-assigned ids.
pub trait LookupIndex {
    /// Every value of one list, top-level and children alike
    fn find_by_list_name(&self, list_name: &str) -> SessionResult<Vec<LookupValue>>;

    /// Every value of one list under one parent
    fn find_by_list_name_and_parent(
        &self,
        list_name: &str,
        parent_id: EntityId,
    ) -> SessionResult<Vec<LookupValue>>;

    /// Number of stored values whose `parent_id` references the given id
    fn count_children(&self, entity_id: EntityId) -> SessionResult<usize>;
}
