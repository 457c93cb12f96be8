//! Lookup value command handlers with boundary logging.
//!
//! Commands mirror the lookup operations of plinth-core, wrapped in one
//! transaction each: create, read, find, update, delete.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for lookup operations:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal
//! details.

use plinth_core::errors::Result;
use plinth_core::model::{EntityId, LookupValue};
use plinth_core::ops::lookup_ops;
use plinth_core::PlinthError;
use plinth_core::{log_op_end, log_op_error, log_op_start};
use plinth_core_types::RequestContext;
use plinth_store::SqliteSession;
use rusqlite::Connection;

/// Create a new lookup value
///
/// ## Arguments
///
/// - `ctx`: Request context (request id, acting principal)
/// - `parent_context`: Parent id the request addressed, if the value was
///   created under a parent
/// - `value`: The value to create
/// - `conn`: Database connection
///
/// ## Returns
///
/// The created value with its assigned id and version 0
///
/// ## Errors
///
/// - `ParentContextMismatch` (0001), `ParentNotFound` (0002),
///   `ListNameMatchesParent` (0003): write-time hierarchy rules
/// - `ConstraintViolation` (0004): the value already exists
/// - `InvalidField`: structural validation failed
pub fn lookup_value_create(
    ctx: &RequestContext,
    parent_context: Option<EntityId>,
    value: LookupValue,
    conn: &mut Connection,
) -> Result<LookupValue> {
    log_op_start!(
        "lookup_value_create",
        request_id = ctx.request_id.as_str(),
        lookup_list_name = value.lookup_list_name.as_str()
    );
    let start = std::time::Instant::now();

    let created = lookup_value_create_impl(ctx, parent_context, value, conn).map_err(|e| {
        log_op_error!(
            "lookup_value_create",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = ctx.request_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "lookup_value_create",
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = ctx.request_id.as_str(),
        entity_id = created.id.map(|id| id.as_i64()).unwrap_or_default()
    );

    Ok(created)
}

fn lookup_value_create_impl(
    ctx: &RequestContext,
    parent_context: Option<EntityId>,
    value: LookupValue,
    conn: &mut Connection,
) -> Result<LookupValue> {
    let mut session = SqliteSession::begin(conn).map_err(PlinthError::Session)?;
    let created = lookup_ops::create_lookup_value(&mut session, &ctx.principal, parent_context, value)?;
    session.commit().map_err(PlinthError::Session)?;
    Ok(created)
}

/// Read one lookup value by id
///
/// ## Errors
///
/// - `LookupValueNotFound` (0006): nothing is stored under the id
pub fn lookup_value_read(
    ctx: &RequestContext,
    entity_id: EntityId,
    conn: &mut Connection,
) -> Result<LookupValue> {
    log_op_start!(
        "lookup_value_read",
        request_id = ctx.request_id.as_str(),
        entity_id = entity_id.as_i64()
    );
    let start = std::time::Instant::now();

    let session = SqliteSession::begin(conn).map_err(PlinthError::Session)?;
    let value = lookup_ops::read_lookup_value(&session, entity_id).map_err(|e| {
        log_op_error!(
            "lookup_value_read",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = ctx.request_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "lookup_value_read",
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = ctx.request_id.as_str(),
        entity_id = entity_id.as_i64()
    );

    Ok(value)
}

/// Query the values of one lookup list
///
/// ## Arguments
///
/// - `list_name`: The list to query
/// - `parent_id`: Narrow to children of this parent
/// - `active`: Keep only values with this active flag
/// - `effective_date`: Keep only values effective on this `yyyy-MM-dd` date
///
/// ## Returns
///
/// The filtered values in ascending id order; an empty result is valid
///
/// ## Errors
///
/// - `InvalidDate` (0007): the date string failed to parse
pub fn lookup_value_find(
    ctx: &RequestContext,
    list_name: &str,
    parent_id: Option<EntityId>,
    active: Option<bool>,
    effective_date: Option<&str>,
    conn: &mut Connection,
) -> Result<Vec<LookupValue>> {
    log_op_start!(
        "lookup_value_find",
        request_id = ctx.request_id.as_str(),
        lookup_list_name = list_name
    );
    let start = std::time::Instant::now();

    let session = SqliteSession::begin(conn).map_err(PlinthError::Session)?;
    let values =
        lookup_ops::find_lookup_values(&session, list_name, parent_id, active, effective_date)
            .map_err(|e| {
                log_op_error!(
                    "lookup_value_find",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    request_id = ctx.request_id.as_str()
                );
                e
            })?;

    log_op_end!(
        "lookup_value_find",
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = ctx.request_id.as_str(),
        result_count = values.len() as u64
    );

    Ok(values)
}

/// Update the lookup value stored under `entity_id`
///
/// ## Errors
///
/// - `IdMismatch` (0005): payload id differs from the addressed id
/// - `LookupValueNotFound` (0006): nothing is stored under the id
/// - `StaleVersion` (F001): payload version is not the stored one
/// - `NoFieldsUpdated` (F002): no updatable field changed
/// - `ConstraintViolation` (0004): the edit collides with an existing value
pub fn lookup_value_update(
    ctx: &RequestContext,
    entity_id: EntityId,
    incoming: LookupValue,
    conn: &mut Connection,
) -> Result<LookupValue> {
    log_op_start!(
        "lookup_value_update",
        request_id = ctx.request_id.as_str(),
        entity_id = entity_id.as_i64()
    );
    let start = std::time::Instant::now();

    let updated = lookup_value_update_impl(ctx, entity_id, incoming, conn).map_err(|e| {
        log_op_error!(
            "lookup_value_update",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = ctx.request_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "lookup_value_update",
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = ctx.request_id.as_str(),
        entity_id = entity_id.as_i64()
    );

    Ok(updated)
}

fn lookup_value_update_impl(
    ctx: &RequestContext,
    entity_id: EntityId,
    incoming: LookupValue,
    conn: &mut Connection,
) -> Result<LookupValue> {
    let mut session = SqliteSession::begin(conn).map_err(PlinthError::Session)?;
    let updated = lookup_ops::update_lookup_value(&mut session, &ctx.principal, entity_id, incoming)?;
    session.commit().map_err(PlinthError::Session)?;
    Ok(updated)
}

/// Delete the lookup value stored under `entity_id`
///
/// ## Errors
///
/// - `LookupValueNotFound` (0006): nothing is stored under the id
/// - `ConstraintViolation` (0008): the value still has children
pub fn lookup_value_delete(
    ctx: &RequestContext,
    entity_id: EntityId,
    conn: &mut Connection,
) -> Result<()> {
    log_op_start!(
        "lookup_value_delete",
        request_id = ctx.request_id.as_str(),
        entity_id = entity_id.as_i64()
    );
    let start = std::time::Instant::now();

    lookup_value_delete_impl(ctx, entity_id, conn).map_err(|e| {
        log_op_error!(
            "lookup_value_delete",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = ctx.request_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "lookup_value_delete",
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = ctx.request_id.as_str(),
        entity_id = entity_id.as_i64()
    );

    Ok(())
}

fn lookup_value_delete_impl(
    ctx: &RequestContext,
    entity_id: EntityId,
    conn: &mut Connection,
) -> Result<()> {
    let mut session = SqliteSession::begin(conn).map_err(PlinthError::Session)?;
    lookup_ops::delete_lookup_value(&mut session, &ctx.principal, entity_id)?;
    session.commit().map_err(PlinthError::Session)?;
    Ok(())
}
