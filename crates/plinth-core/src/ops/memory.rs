//! In-memory session
//!
//! Reference implementation of the session abstraction. It enforces the
//! same named constraints a relational schema would, which makes it both
//! the unit-test backend and the behavioral model any durable session
//! must match.

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::Value;

use crate::errors::{SessionError, SessionResult};
use crate::model::{
    EntityId, LookupValue, RevisionRecord, RevisionType, Version, VersionedEntity,
};
use crate::session::{EntitySession, LookupIndex};

/// In-memory lookup value store with a per-entity revision log.
///
/// Ids are assigned from 1 upward. BTreeMap keys keep iteration in
/// ascending-id order, which is what the index queries promise.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: BTreeMap<i64, LookupValue>,
    revision_log: BTreeMap<i64, Vec<RevisionRecord>>,
    next_id: i64,
}

impl MemorySession {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            revision_log: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when another stored value occupies the candidate's
    /// (list name, display value, parent) slot.
    fn unique_slot_taken(&self, candidate: &LookupValue, exclude: Option<EntityId>) -> bool {
        self.values.values().any(|existing| {
            exclude.is_none_or(|ex| existing.id != Some(ex))
                && existing.lookup_list_name == candidate.lookup_list_name
                && existing.display_value == candidate.display_value
                && existing.parent_id == candidate.parent_id
        })
    }

    fn parent_exists(&self, parent_id: EntityId) -> bool {
        self.values.contains_key(&parent_id.as_i64())
    }
}

impl EntitySession<LookupValue> for MemorySession {
    fn insert(&mut self, entity: &mut LookupValue) -> SessionResult<()> {
        if let Some(parent_id) = entity.parent_id {
            if !self.parent_exists(parent_id) {
                return Err(SessionError::ConstraintViolated {
                    constraint: LookupValue::PARENT_FK_CONSTRAINT.to_string(),
                });
            }
        }
        if self.unique_slot_taken(entity, None) {
            return Err(SessionError::ConstraintViolated {
                constraint: LookupValue::UNIQUE_VALUE_CONSTRAINT.to_string(),
            });
        }

        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        entity.assign_id(id);
        entity.assign_version(Version::initial());
        self.values.insert(id.as_i64(), entity.clone());
        Ok(())
    }

    fn update(&mut self, entity: &mut LookupValue) -> SessionResult<()> {
        let id = match entity.id() {
            Some(id) => id,
            None => {
                return Err(SessionError::Backend {
                    message: "update requires a persisted entity".to_string(),
                })
            }
        };

        let stored_version = match self.values.get(&id.as_i64()) {
            Some(stored) => stored.version(),
            None => return Err(SessionError::NotFound { entity_id: id }),
        };
        if entity.version() != stored_version {
            return Err(SessionError::StaleWrite { entity_id: id });
        }

        if let Some(parent_id) = entity.parent_id {
            if !self.parent_exists(parent_id) {
                return Err(SessionError::ConstraintViolated {
                    constraint: LookupValue::PARENT_FK_CONSTRAINT.to_string(),
                });
            }
        }
        if self.unique_slot_taken(entity, Some(id)) {
            return Err(SessionError::ConstraintViolated {
                constraint: LookupValue::UNIQUE_VALUE_CONSTRAINT.to_string(),
            });
        }

        let bumped = match stored_version {
            Some(version) => version.next(),
            None => Version::initial(),
        };
        entity.assign_version(bumped);
        self.values.insert(id.as_i64(), entity.clone());
        Ok(())
    }

    fn delete(&mut self, entity_id: EntityId) -> SessionResult<()> {
        if !self.values.contains_key(&entity_id.as_i64()) {
            return Err(SessionError::NotFound { entity_id });
        }
        let has_children = self
            .values
            .values()
            .any(|value| value.parent_id == Some(entity_id));
        if has_children {
            return Err(SessionError::ConstraintViolated {
                constraint: LookupValue::PARENT_FK_CONSTRAINT.to_string(),
            });
        }
        self.values.remove(&entity_id.as_i64());
        Ok(())
    }

    fn find(&self, entity_id: EntityId) -> SessionResult<Option<LookupValue>> {
        Ok(self.values.get(&entity_id.as_i64()).cloned())
    }

    fn append_revision(
        &mut self,
        entity_id: EntityId,
        revision_type: RevisionType,
        user_name: &str,
        snapshot: Option<Value>,
    ) -> SessionResult<i64> {
        let log = self.revision_log.entry(entity_id.as_i64()).or_default();
        let sequence = log.len() as i64;
        log.push(RevisionRecord {
            entity_id,
            sequence,
            revision_type,
            user_name: user_name.to_string(),
            snapshot,
            recorded_at: Utc::now(),
        });
        Ok(sequence)
    }

    fn revisions(&self, entity_id: EntityId) -> SessionResult<Vec<RevisionRecord>> {
        Ok(self
            .revision_log
            .get(&entity_id.as_i64())
            .cloned()
            .unwrap_or_default())
    }
}

impl LookupIndex for MemorySession {
    fn find_by_list_name(&self, list_name: &str) -> SessionResult<Vec<LookupValue>> {
        Ok(self
            .values
            .values()
            .filter(|value| value.lookup_list_name == list_name)
            .cloned()
            .collect())
    }

    fn find_by_list_name_and_parent(
        &self,
        list_name: &str,
        parent_id: EntityId,
    ) -> SessionResult<Vec<LookupValue>> {
        Ok(self
            .values
            .values()
            .filter(|value| {
                value.lookup_list_name == list_name && value.parent_id == Some(parent_id)
            })
            .cloned()
            .collect())
    }

    fn count_children(&self, entity_id: EntityId) -> SessionResult<usize> {
        Ok(self
            .values
            .values()
            .filter(|value| value.parent_id == Some(entity_id))
            .count())
    }
}
