//! Lookup value operations
//!
//! The write operations validate caller-enforced rules first, then drive
//! the persistence engine with the constraint mappings each operation
//! answers for. All of them are generic over the session so the same
//! logic runs against the in-memory backend in tests and a durable one in
//! production.

use plinth_core_types::Principal;

use crate::engine::PersistenceEngine;
use crate::errors::{codes, PlinthError, Result};
use crate::model::{EntityId, LookupValue};
use crate::ops::filter::{filter_by_active_status, filter_by_effective_date, parse_effective_date};
use crate::rules::validation::validate_lookup_value;
use crate::session::{EntitySession, LookupIndex};

/// Create a new lookup value.
///
/// `parent_context` is the parent id the request addressed, if any. The
/// payload parent must equal it exactly: a payload carrying a parent
/// without an addressed one (or the other way around) is rejected before
/// any store access, the same as two different ids.
///
/// # Errors
///
/// - `ParentContextMismatch` (0001) when the payload parent differs from
///   the addressed parent
/// - `ParentNotFound` (0002) when the referenced parent does not exist
/// - `ListNameMatchesParent` (0003) when the value declares its parent's
///   list name
/// - `ConstraintViolation` (0004) when the (list name, display value,
///   parent) slot is already taken
/// - `InvalidField` when a field fails structural validation
pub fn create_lookup_value<S>(
    session: &mut S,
    principal: &Principal,
    parent_context: Option<EntityId>,
    value: LookupValue,
) -> Result<LookupValue>
where
    S: EntitySession<LookupValue> + LookupIndex,
{
    validate_lookup_value(&value)?;

    if value.parent_id != parent_context {
        return Err(PlinthError::ParentContextMismatch {
            context: parent_context,
            payload: value.parent_id,
        });
    }

    if let Some(parent_id) = value.parent_id {
        let parent = session
            .find(parent_id)
            .map_err(PlinthError::Session)?
            .ok_or(PlinthError::ParentNotFound { parent_id })?;
        if parent.lookup_list_name == value.lookup_list_name {
            return Err(PlinthError::ListNameMatchesParent {
                list_name: value.lookup_list_name.clone(),
            });
        }
    }

    let mut engine = PersistenceEngine::new(session, principal.clone());
    engine.add_constraint_mapping(
        LookupValue::UNIQUE_VALUE_CONSTRAINT,
        codes::DUPLICATE_LOOKUP_VALUE,
    );
    engine.persist(value)
}

/// Fetch one lookup value by id, failing with 0006 when absent
pub fn read_lookup_value<S>(session: &S, entity_id: EntityId) -> Result<LookupValue>
where
    S: EntitySession<LookupValue>,
{
    session
        .find(entity_id)
        .map_err(PlinthError::Session)?
        .ok_or(PlinthError::LookupValueNotFound { entity_id })
}

/// Query the values of one list.
///
/// `parent_id` narrows to children of one parent. `active` and
/// `effective_date` filter the result in that order; both pass everything
/// through when absent. The date filter is strict `yyyy-MM-dd` and fails
/// fast on a malformed value, before any store access. Results come back
/// in ascending id order and an empty result is a valid answer.
pub fn find_lookup_values<S>(
    session: &S,
    list_name: &str,
    parent_id: Option<EntityId>,
    active: Option<bool>,
    effective_date: Option<&str>,
) -> Result<Vec<LookupValue>>
where
    S: EntitySession<LookupValue> + LookupIndex,
{
    let date = match effective_date {
        Some(raw) => Some(parse_effective_date(raw)?),
        None => None,
    };

    let candidates = match parent_id {
        Some(parent_id) => session.find_by_list_name_and_parent(list_name, parent_id),
        None => session.find_by_list_name(list_name),
    }
    .map_err(PlinthError::Session)?;

    let candidates = filter_by_active_status(candidates, active);
    Ok(filter_by_effective_date(candidates, date))
}

/// Update the lookup value stored under `entity_id`.
///
/// A payload that carries its own id must agree with the addressed one;
/// a payload without an id is taken to address `entity_id`. The engine
/// then enforces the optimistic version check (F001) and no-op detection
/// (F002), in that order, before writing. Only updatable fields are
/// taken from the payload.
///
/// # Errors
///
/// - `IdMismatch` (0005) when the payload id differs from `entity_id`
/// - `LookupValueNotFound` (0006) when nothing is stored under `entity_id`
/// - `StaleVersion` (F001) when the payload version is not the stored one
/// - `NoFieldsUpdated` (F002) when no updatable field changed
/// - `ConstraintViolation` (0004) when the edit collides with an existing
///   slot
pub fn update_lookup_value<S>(
    session: &mut S,
    principal: &Principal,
    entity_id: EntityId,
    incoming: LookupValue,
) -> Result<LookupValue>
where
    S: EntitySession<LookupValue> + LookupIndex,
{
    if let Some(payload_id) = incoming.id {
        if payload_id != entity_id {
            return Err(PlinthError::IdMismatch {
                addressed: entity_id,
                payload: payload_id,
            });
        }
    }
    validate_lookup_value(&incoming)?;

    let stored = session
        .find(entity_id)
        .map_err(PlinthError::Session)?
        .ok_or(PlinthError::LookupValueNotFound { entity_id })?;

    let mut engine = PersistenceEngine::new(session, principal.clone());
    engine.add_constraint_mapping(
        LookupValue::UNIQUE_VALUE_CONSTRAINT,
        codes::DUPLICATE_LOOKUP_VALUE,
    );
    engine.update(stored, &incoming)
}

/// Delete the lookup value stored under `entity_id`.
///
/// A value that still has children cannot be deleted; the store's
/// referential constraint reports that as 0008.
pub fn delete_lookup_value<S>(
    session: &mut S,
    principal: &Principal,
    entity_id: EntityId,
) -> Result<()>
where
    S: EntitySession<LookupValue> + LookupIndex,
{
    let stored = session
        .find(entity_id)
        .map_err(PlinthError::Session)?
        .ok_or(PlinthError::LookupValueNotFound { entity_id })?;

    let mut engine = PersistenceEngine::new(session, principal.clone());
    engine.add_constraint_mapping(
        LookupValue::PARENT_FK_CONSTRAINT,
        codes::DELETE_WITH_CHILDREN,
    );
    engine.delete(stored)
}
