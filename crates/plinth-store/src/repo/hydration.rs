//! Hydration layer - maps SQLite rows back into domain types
//!
//! The mapping functions return `rusqlite::Result` so they plug straight
//! into `query_row`/`query_map` closures; a malformed stored value turns
//! into a conversion failure naming the offending column.

use chrono::{DateTime, NaiveDate, Utc};
use plinth_core::model::{EntityId, LookupValue, RevisionRecord, RevisionType, Version};
use rusqlite::types::Type;
use rusqlite::Row;

/// Column list every lookup_values SELECT uses, in hydration order
pub const LOOKUP_VALUE_COLUMNS: &str =
    "id, version, lookup_list_name, display_value, active, effective_from, effective_to, parent_id";

/// Column list every lookup_value_revisions SELECT uses, in hydration order
pub const REVISION_COLUMNS: &str =
    "entity_id, sequence, revision_type, user_name, snapshot, recorded_at";

/// Hydrate one lookup_values row
pub fn lookup_value_from_row(row: &Row<'_>) -> rusqlite::Result<LookupValue> {
    let id: i64 = row.get(0)?;
    let version: i64 = row.get(1)?;
    let lookup_list_name: String = row.get(2)?;
    let display_value: String = row.get(3)?;
    let active: bool = row.get(4)?;
    let effective_from = date_from_column(row, 5)?;
    let effective_to = date_from_column(row, 6)?;
    let parent_id: Option<i64> = row.get(7)?;

    Ok(LookupValue {
        id: Some(EntityId::new(id)),
        version: Some(Version::new(version)),
        lookup_list_name,
        display_value,
        active,
        effective_from,
        effective_to,
        parent_id: parent_id.map(EntityId::new),
    })
}

/// Hydrate one lookup_value_revisions row
pub fn revision_from_row(row: &Row<'_>) -> rusqlite::Result<RevisionRecord> {
    let entity_id: i64 = row.get(0)?;
    let sequence: i64 = row.get(1)?;
    let revision_type: String = row.get(2)?;
    let user_name: String = row.get(3)?;
    let snapshot: Option<String> = row.get(4)?;
    let recorded_at: String = row.get(5)?;

    let revision_type = RevisionType::parse(&revision_type).ok_or_else(|| {
        conversion_failure(2, format!("unknown revision type '{revision_type}'"))
    })?;

    let snapshot = match snapshot {
        Some(raw) => Some(
            serde_json::from_str(&raw)
                .map_err(|e| conversion_failure(4, format!("snapshot is not JSON: {e}")))?,
        ),
        None => None,
    };

    let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
        .map_err(|e| conversion_failure(5, format!("recorded_at is not RFC 3339: {e}")))?
        .with_timezone(&Utc);

    Ok(RevisionRecord {
        entity_id: EntityId::new(entity_id),
        sequence,
        revision_type,
        user_name,
        snapshot,
        recorded_at,
    })
}

/// Serialize an optional date bound for storage
pub fn date_to_sql(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn date_from_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(index)?;
    match raw {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| conversion_failure(index, format!("not a yyyy-MM-dd date: {e}"))),
        None => Ok(None),
    }
}

fn conversion_failure(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, message.into())
}
