use chrono::NaiveDate;
use plinth_core::model::{EntityId, LookupValue};
use plinth_core::ops::lookup_ops;
use plinth_core::MemorySession;
use plinth_core_types::Principal;

pub const VEHICLE_MAKE: &str = "vehicle_make";
pub const VEHICLE_MODEL: &str = "vehicle_model";

/// Create a new empty in-memory session for testing
#[allow(dead_code)]
pub fn new_session() -> MemorySession {
    MemorySession::new()
}

/// The principal all test writes are attributed to
#[allow(dead_code)]
pub fn principal() -> Principal {
    Principal::new("test".to_string())
}

#[allow(dead_code)]
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Seed two dependent lookup lists:
///
/// - `vehicle_make`: Ford, Volkswagen
/// - `vehicle_model` under Ford: Focus (open window), Escort (inactive),
///   Sierra (effective 2016-01-01 to 2016-12-31)
/// - `vehicle_model` under Volkswagen: Polo
///
/// Returns (ford_id, volkswagen_id).
#[allow(dead_code)]
pub fn seed_vehicle_lists(session: &mut MemorySession) -> (EntityId, EntityId) {
    let user = principal();

    let ford = lookup_ops::create_lookup_value(
        session,
        &user,
        None,
        LookupValue::new(VEHICLE_MAKE, "Ford"),
    )
    .unwrap();
    let volkswagen = lookup_ops::create_lookup_value(
        session,
        &user,
        None,
        LookupValue::new(VEHICLE_MAKE, "Volkswagen"),
    )
    .unwrap();
    let ford_id = ford.id.unwrap();
    let volkswagen_id = volkswagen.id.unwrap();

    lookup_ops::create_lookup_value(
        session,
        &user,
        Some(ford_id),
        LookupValue::new(VEHICLE_MODEL, "Focus").with_parent(ford_id),
    )
    .unwrap();
    lookup_ops::create_lookup_value(
        session,
        &user,
        Some(ford_id),
        LookupValue::new(VEHICLE_MODEL, "Escort")
            .with_parent(ford_id)
            .inactive(),
    )
    .unwrap();
    lookup_ops::create_lookup_value(
        session,
        &user,
        Some(ford_id),
        LookupValue::new(VEHICLE_MODEL, "Sierra")
            .with_parent(ford_id)
            .with_effective_window(Some(date("2016-01-01")), Some(date("2016-12-31"))),
    )
    .unwrap();
    lookup_ops::create_lookup_value(
        session,
        &user,
        Some(volkswagen_id),
        LookupValue::new(VEHICLE_MODEL, "Polo").with_parent(volkswagen_id),
    )
    .unwrap();

    (ford_id, volkswagen_id)
}
