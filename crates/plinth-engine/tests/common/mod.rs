use chrono::NaiveDate;
use plinth_core::model::{EntityId, LookupValue};
use plinth_core_types::{Principal, RequestContext};
use plinth_engine::commands::lookup;
use rusqlite::Connection;
use tempfile::TempDir;

pub const VEHICLE_MAKE: &str = "vehicle_make";
pub const VEHICLE_MODEL: &str = "vehicle_model";

/// File-backed database with migrations applied
#[allow(dead_code)]
pub fn setup_db() -> (TempDir, Connection) {
    let temp_dir = TempDir::new().unwrap();
    let mut conn = plinth_store::db::open(temp_dir.path().join("test.db")).unwrap();
    plinth_store::migrations::apply_migrations(&mut conn).unwrap();
    (temp_dir, conn)
}

#[allow(dead_code)]
pub fn ctx(user: &str) -> RequestContext {
    RequestContext::new(Principal::new(user.to_string()))
}

#[allow(dead_code)]
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Seed two dependent lookup lists through the service commands:
///
/// - `vehicle_make`: Ford, Volkswagen
/// - `vehicle_model` under Ford: Focus (open window), Escort (inactive),
///   Sierra (effective 2016-01-01 to 2016-12-31)
/// - `vehicle_model` under Volkswagen: Polo
///
/// Returns (ford_id, volkswagen_id).
#[allow(dead_code)]
pub fn seed_vehicle_lists(conn: &mut Connection) -> (EntityId, EntityId) {
    let ctx = ctx("seeder");

    let ford = lookup::lookup_value_create(
        &ctx,
        None,
        LookupValue::new(VEHICLE_MAKE, "Ford"),
        conn,
    )
    .unwrap();
    let volkswagen = lookup::lookup_value_create(
        &ctx,
        None,
        LookupValue::new(VEHICLE_MAKE, "Volkswagen"),
        conn,
    )
    .unwrap();
    let ford_id = ford.id.unwrap();
    let volkswagen_id = volkswagen.id.unwrap();

    lookup::lookup_value_create(
        &ctx,
        Some(ford_id),
        LookupValue::new(VEHICLE_MODEL, "Focus").with_parent(ford_id),
        conn,
    )
    .unwrap();
    lookup::lookup_value_create(
        &ctx,
        Some(ford_id),
        LookupValue::new(VEHICLE_MODEL, "Escort")
            .with_parent(ford_id)
            .inactive(),
        conn,
    )
    .unwrap();
    lookup::lookup_value_create(
        &ctx,
        Some(ford_id),
        LookupValue::new(VEHICLE_MODEL, "Sierra")
            .with_parent(ford_id)
            .with_effective_window(Some(date("2016-01-01")), Some(date("2016-12-31"))),
        conn,
    )
    .unwrap();
    lookup::lookup_value_create(
        &ctx,
        Some(volkswagen_id),
        LookupValue::new(VEHICLE_MODEL, "Polo").with_parent(volkswagen_id),
        conn,
    )
    .unwrap();

    (ford_id, volkswagen_id)
}
