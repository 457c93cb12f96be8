// Full-stack tests for the lookup service commands over SQLite
// Covers CRUD, filtering, optimistic concurrency, constraint translation,
// transaction rollback, and boundary logging.

mod common;

use common::{ctx, seed_vehicle_lists, setup_db, VEHICLE_MAKE, VEHICLE_MODEL};
use plinth_core::logging_facility::test_capture::init_test_capture;
use plinth_core::model::{EntityId, LookupValue, Version};
use plinth_core::PlinthError;
use plinth_engine::commands::lookup;

// ===== CREATE / READ =====

#[test]
fn test_create_assigns_id_and_version_zero() {
    let (_tmp, mut conn) = setup_db();
    let ctx = ctx("alice");

    let created = lookup::lookup_value_create(
        &ctx,
        None,
        LookupValue::new(VEHICLE_MAKE, "Ford"),
        &mut conn,
    )
    .unwrap();

    assert!(created.id.is_some());
    assert_eq!(created.version, Some(Version::initial()));

    let read = lookup::lookup_value_read(&ctx, created.id.unwrap(), &mut conn).unwrap();
    assert_eq!(read, created);
}

#[test]
fn test_read_unknown_id_is_0006() {
    let (_tmp, mut conn) = setup_db();
    let err =
        lookup::lookup_value_read(&ctx("alice"), EntityId::new(404), &mut conn).unwrap_err();
    assert!(matches!(err, PlinthError::LookupValueNotFound { .. }));
    assert_eq!(err.code(), Some("0006"));
    assert_eq!(err.http_status(), 404);
}

#[test]
fn test_duplicate_create_is_0004() {
    let (_tmp, mut conn) = setup_db();
    let ctx = ctx("alice");

    lookup::lookup_value_create(&ctx, None, LookupValue::new(VEHICLE_MAKE, "Ford"), &mut conn)
        .unwrap();
    let err = lookup::lookup_value_create(
        &ctx,
        None,
        LookupValue::new(VEHICLE_MAKE, "Ford"),
        &mut conn,
    )
    .unwrap_err();

    assert!(matches!(err, PlinthError::ConstraintViolation { .. }));
    assert_eq!(err.code(), Some("0004"));
}

#[test]
fn test_create_hierarchy_rules() {
    let (_tmp, mut conn) = setup_db();
    let ctx = ctx("alice");
    let ford = lookup::lookup_value_create(
        &ctx,
        None,
        LookupValue::new(VEHICLE_MAKE, "Ford"),
        &mut conn,
    )
    .unwrap();
    let ford_id = ford.id.unwrap();

    // Addressed parent disagrees with the payload parent.
    let err = lookup::lookup_value_create(
        &ctx,
        Some(EntityId::new(999)),
        LookupValue::new(VEHICLE_MODEL, "Focus").with_parent(ford_id),
        &mut conn,
    )
    .unwrap_err();
    assert_eq!(err.code(), Some("0001"));

    // Payload carries a parent when none was addressed.
    let err = lookup::lookup_value_create(
        &ctx,
        None,
        LookupValue::new(VEHICLE_MODEL, "Focus").with_parent(ford_id),
        &mut conn,
    )
    .unwrap_err();
    assert_eq!(err.code(), Some("0001"));

    // Addressed parent does not exist.
    let err = lookup::lookup_value_create(
        &ctx,
        Some(EntityId::new(999)),
        LookupValue::new(VEHICLE_MODEL, "Focus").with_parent(EntityId::new(999)),
        &mut conn,
    )
    .unwrap_err();
    assert_eq!(err.code(), Some("0002"));

    // Child in the same list as its parent.
    let err = lookup::lookup_value_create(
        &ctx,
        Some(ford_id),
        LookupValue::new(VEHICLE_MAKE, "Fiesta").with_parent(ford_id),
        &mut conn,
    )
    .unwrap_err();
    assert_eq!(err.code(), Some("0003"));
}

// ===== FIND / FILTERING =====

#[test]
fn test_find_composes_filters_under_a_parent() {
    let (_tmp, mut conn) = setup_db();
    let (ford_id, _) = seed_vehicle_lists(&mut conn);
    let ctx = ctx("alice");

    // No filters: every Ford model, ascending id.
    let all = lookup::lookup_value_find(&ctx, VEHICLE_MODEL, Some(ford_id), None, None, &mut conn)
        .unwrap();
    let names: Vec<&str> = all.iter().map(|v| v.display_value.as_str()).collect();
    assert_eq!(names, vec!["Focus", "Escort", "Sierra"]);

    // Active only: Escort drops out.
    let active =
        lookup::lookup_value_find(&ctx, VEHICLE_MODEL, Some(ford_id), Some(true), None, &mut conn)
            .unwrap();
    let names: Vec<&str> = active.iter().map(|v| v.display_value.as_str()).collect();
    assert_eq!(names, vec!["Focus", "Sierra"]);

    // Active and effective in 2017: Sierra's window has closed.
    let current = lookup::lookup_value_find(
        &ctx,
        VEHICLE_MODEL,
        Some(ford_id),
        Some(true),
        Some("2017-06-01"),
        &mut conn,
    )
    .unwrap();
    let names: Vec<&str> = current.iter().map(|v| v.display_value.as_str()).collect();
    assert_eq!(names, vec!["Focus"]);

    // Inclusive window bound: Sierra is still effective on its last day.
    let boundary = lookup::lookup_value_find(
        &ctx,
        VEHICLE_MODEL,
        Some(ford_id),
        Some(true),
        Some("2016-12-31"),
        &mut conn,
    )
    .unwrap();
    assert_eq!(boundary.len(), 2);
}

#[test]
fn test_find_without_parent_spans_the_whole_list() {
    let (_tmp, mut conn) = setup_db();
    seed_vehicle_lists(&mut conn);

    let models =
        lookup::lookup_value_find(&ctx("alice"), VEHICLE_MODEL, None, None, None, &mut conn)
            .unwrap();
    assert_eq!(models.len(), 4); // Focus, Escort, Sierra, Polo
}

#[test]
fn test_find_empty_result_is_ok() {
    let (_tmp, mut conn) = setup_db();
    let values =
        lookup::lookup_value_find(&ctx("alice"), "no_such_list", None, None, None, &mut conn)
            .unwrap();
    assert!(values.is_empty());
}

#[test]
fn test_malformed_date_is_0007() {
    let (_tmp, mut conn) = setup_db();
    seed_vehicle_lists(&mut conn);

    let err = lookup::lookup_value_find(
        &ctx("alice"),
        VEHICLE_MODEL,
        None,
        None,
        Some("2016-01"),
        &mut conn,
    )
    .unwrap_err();
    assert!(matches!(err, PlinthError::InvalidDate { .. }));
    assert_eq!(err.code(), Some("0007"));
}

// ===== UPDATE =====

#[test]
fn test_update_bumps_version_and_persists() {
    let (_tmp, mut conn) = setup_db();
    let ctx = ctx("alice");
    let created = lookup::lookup_value_create(
        &ctx,
        None,
        LookupValue::new(VEHICLE_MAKE, "Ford"),
        &mut conn,
    )
    .unwrap();
    let id = created.id.unwrap();

    let mut incoming = created.clone();
    incoming.display_value = "Ford Motor Company".to_string();
    let updated = lookup::lookup_value_update(&ctx, id, incoming, &mut conn).unwrap();
    assert_eq!(updated.version, Some(Version::new(1)));

    let read = lookup::lookup_value_read(&ctx, id, &mut conn).unwrap();
    assert_eq!(read.display_value, "Ford Motor Company");
    assert_eq!(read.version, Some(Version::new(1)));
}

#[test]
fn test_stale_version_is_rejected_and_nothing_changes() {
    let (_tmp, mut conn) = setup_db();
    let ctx = ctx("alice");
    let created = lookup::lookup_value_create(
        &ctx,
        None,
        LookupValue::new(VEHICLE_MAKE, "Ford"),
        &mut conn,
    )
    .unwrap();
    let id = created.id.unwrap();

    let mut first = created.clone();
    first.display_value = "Ford Motor Company".to_string();
    lookup::lookup_value_update(&ctx, id, first, &mut conn).unwrap();

    // Second writer still holds version 0.
    let mut stale = created.clone();
    stale.display_value = "Fords".to_string();
    let err = lookup::lookup_value_update(&ctx, id, stale, &mut conn).unwrap_err();
    assert!(matches!(err, PlinthError::StaleVersion { .. }));
    assert_eq!(err.code(), Some("F001"));

    let read = lookup::lookup_value_read(&ctx, id, &mut conn).unwrap();
    assert_eq!(read.display_value, "Ford Motor Company");
    assert_eq!(read.version, Some(Version::new(1)));
}

#[test]
fn test_noop_update_is_rejected_even_with_nonupdatable_change() {
    let (_tmp, mut conn) = setup_db();
    let ctx = ctx("alice");
    let created = lookup::lookup_value_create(
        &ctx,
        None,
        LookupValue::new(VEHICLE_MAKE, "Ford"),
        &mut conn,
    )
    .unwrap();
    let id = created.id.unwrap();

    // Only the non-updatable list name differs: still a no-op.
    let mut incoming = created.clone();
    incoming.lookup_list_name = "something_else".to_string();
    let err = lookup::lookup_value_update(&ctx, id, incoming, &mut conn).unwrap_err();
    assert!(matches!(err, PlinthError::NoFieldsUpdated));
    assert_eq!(err.code(), Some("F002"));

    let read = lookup::lookup_value_read(&ctx, id, &mut conn).unwrap();
    assert_eq!(read.version, Some(Version::initial()));
    assert_eq!(read.lookup_list_name, VEHICLE_MAKE);
}

#[test]
fn test_update_with_foreign_payload_id_is_0005() {
    let (_tmp, mut conn) = setup_db();
    let ctx = ctx("alice");
    let created = lookup::lookup_value_create(
        &ctx,
        None,
        LookupValue::new(VEHICLE_MAKE, "Ford"),
        &mut conn,
    )
    .unwrap();

    let mut incoming = created.clone();
    incoming.id = Some(EntityId::new(999));
    incoming.display_value = "Fords".to_string();
    let err =
        lookup::lookup_value_update(&ctx, created.id.unwrap(), incoming, &mut conn).unwrap_err();
    assert!(matches!(err, PlinthError::IdMismatch { .. }));
    assert_eq!(err.code(), Some("0005"));
}

#[test]
fn test_update_collision_with_existing_slot_is_0004() {
    let (_tmp, mut conn) = setup_db();
    let ctx = ctx("alice");
    lookup::lookup_value_create(&ctx, None, LookupValue::new(VEHICLE_MAKE, "Ford"), &mut conn)
        .unwrap();
    let vw = lookup::lookup_value_create(
        &ctx,
        None,
        LookupValue::new(VEHICLE_MAKE, "Volkswagen"),
        &mut conn,
    )
    .unwrap();

    let mut incoming = vw.clone();
    incoming.display_value = "Ford".to_string();
    let err =
        lookup::lookup_value_update(&ctx, vw.id.unwrap(), incoming, &mut conn).unwrap_err();
    assert_eq!(err.code(), Some("0004"));

    // The rejected write rolled back with its session.
    let read = lookup::lookup_value_read(&ctx, vw.id.unwrap(), &mut conn).unwrap();
    assert_eq!(read.display_value, "Volkswagen");
    assert_eq!(read.version, Some(Version::initial()));
}

// ===== DELETE =====

#[test]
fn test_delete_with_children_is_0008_until_children_are_gone() {
    let (_tmp, mut conn) = setup_db();
    let ctx = ctx("alice");
    let ford = lookup::lookup_value_create(
        &ctx,
        None,
        LookupValue::new(VEHICLE_MAKE, "Ford"),
        &mut conn,
    )
    .unwrap();
    let ford_id = ford.id.unwrap();
    let focus = lookup::lookup_value_create(
        &ctx,
        Some(ford_id),
        LookupValue::new(VEHICLE_MODEL, "Focus").with_parent(ford_id),
        &mut conn,
    )
    .unwrap();

    let err = lookup::lookup_value_delete(&ctx, ford_id, &mut conn).unwrap_err();
    assert!(matches!(err, PlinthError::ConstraintViolation { .. }));
    assert_eq!(err.code(), Some("0008"));

    lookup::lookup_value_delete(&ctx, focus.id.unwrap(), &mut conn).unwrap();
    lookup::lookup_value_delete(&ctx, ford_id, &mut conn).unwrap();

    let err = lookup::lookup_value_read(&ctx, ford_id, &mut conn).unwrap_err();
    assert_eq!(err.code(), Some("0006"));
}

#[test]
fn test_delete_unknown_id_is_0006() {
    let (_tmp, mut conn) = setup_db();
    let err =
        lookup::lookup_value_delete(&ctx("alice"), EntityId::new(404), &mut conn).unwrap_err();
    assert_eq!(err.code(), Some("0006"));
}

// ===== LOGGING =====

#[test]
fn test_commands_emit_lifecycle_events() {
    let capture = init_test_capture();
    let (_tmp, mut conn) = setup_db();
    let ctx = ctx("alice");

    let created = lookup::lookup_value_create(
        &ctx,
        None,
        LookupValue::new("log_test_list", "Value"),
        &mut conn,
    )
    .unwrap();
    capture.assert_event_exists("lookup_value_create", "start");
    capture.assert_event_exists("lookup_value_create", "end");

    let err =
        lookup::lookup_value_read(&ctx, EntityId::new(40404), &mut conn).unwrap_err();
    assert_eq!(err.code(), Some("0006"));
    capture.assert_event_exists("lookup_value_read", "end_error");

    let error_events = capture.count_events(|e| {
        e.op.as_deref() == Some("lookup_value_read")
            && e.event.as_deref() == Some("end_error")
            && e.fields.get("err.code").map(String::as_str) == Some("0006")
    });
    assert!(error_events >= 1, "error event should carry the stable code");

    // Success path of read logs end, not end_error.
    lookup::lookup_value_read(&ctx, created.id.unwrap(), &mut conn).unwrap();
    capture.assert_event_exists("lookup_value_read", "end");
}
