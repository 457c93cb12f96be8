//! SQLite session implementation
//!
//! `SqliteSession` wraps one `rusqlite::Transaction` and implements the
//! core's `EntitySession` and `LookupIndex` traits over it. Dropping the
//! session without `commit()` rolls every write back, which is exactly the
//! atomicity the persistence engine relies on: an entity write and its
//! revision-log append share one session and land together or not at all.
//!
//! SQLite reports unique-index violations by index name inside the error
//! message, and foreign-key violations only by extended result code, so
//! this module translates both back into the declared constraint names the
//! engine's mapping table expects.

use chrono::Utc;
use plinth_core::errors::{SessionError, SessionResult};
use plinth_core::model::{
    EntityId, LookupValue, RevisionRecord, RevisionType, Version, VersionedEntity,
};
use plinth_core::session::{EntitySession, LookupIndex};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde_json::Value;

use crate::errors::{from_rusqlite, Result};
use crate::repo::hydration::{
    date_to_sql, lookup_value_from_row, revision_from_row, LOOKUP_VALUE_COLUMNS, REVISION_COLUMNS,
};

/// Named unique constraints whose names appear in SQLite error messages
const DECLARED_UNIQUE_CONSTRAINTS: &[&str] = &[LookupValue::UNIQUE_VALUE_CONSTRAINT];

/// One transactional unit of work over a SQLite database.
///
/// Borrows the connection for its lifetime; `commit()` makes the writes
/// durable, dropping without it discards them.
pub struct SqliteSession<'c> {
    tx: Transaction<'c>,
}

impl<'c> SqliteSession<'c> {
    /// Begin a new unit of work on the given connection
    pub fn begin(conn: &'c mut Connection) -> Result<Self> {
        let tx = conn.transaction().map_err(from_rusqlite)?;
        Ok(Self { tx })
    }

    /// Commit every write made through this session
    pub fn commit(self) -> Result<()> {
        self.tx.commit().map_err(from_rusqlite)
    }
}

/// Map a failed write into the session vocabulary.
///
/// Constraint violations come back under their declared names; the
/// schema's only foreign key is the parent reference, so the bare
/// foreign-key extended code is unambiguous.
fn translate_write_error(err: rusqlite::Error) -> SessionError {
    if let rusqlite::Error::SqliteFailure(ffi_err, ref message) = err {
        if ffi_err.code == rusqlite::ErrorCode::ConstraintViolation {
            if let Some(message) = message {
                for name in DECLARED_UNIQUE_CONSTRAINTS {
                    if message.contains(name) {
                        return SessionError::ConstraintViolated {
                            constraint: (*name).to_string(),
                        };
                    }
                }
            }
            if ffi_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
                return SessionError::ConstraintViolated {
                    constraint: LookupValue::PARENT_FK_CONSTRAINT.to_string(),
                };
            }
        }
    }
    from_rusqlite(err)
}

impl EntitySession<LookupValue> for SqliteSession<'_> {
    fn insert(&mut self, entity: &mut LookupValue) -> SessionResult<()> {
        self.tx
            .execute(
                "INSERT INTO lookup_values
                    (version, lookup_list_name, display_value, active,
                     effective_from, effective_to, parent_id)
                 VALUES (0, ?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entity.lookup_list_name,
                    entity.display_value,
                    entity.active,
                    date_to_sql(entity.effective_from),
                    date_to_sql(entity.effective_to),
                    entity.parent_id.map(|id| id.as_i64()),
                ],
            )
            .map_err(translate_write_error)?;

        let id = self.tx.last_insert_rowid();
        entity.assign_id(EntityId::new(id));
        entity.assign_version(Version::initial());

        tracing::debug!(entity_id = id, lookup_list_name = %entity.lookup_list_name, "inserted lookup value");
        Ok(())
    }

    fn update(&mut self, entity: &mut LookupValue) -> SessionResult<()> {
        let id = entity.id().ok_or_else(|| SessionError::Backend {
            message: "update requires a persisted entity".to_string(),
        })?;
        let asserted = entity.version().ok_or_else(|| SessionError::Backend {
            message: "update requires a versioned entity".to_string(),
        })?;

        // The optimistic write: the version bump and the version assertion
        // are one statement, so a concurrent writer can never slip between
        // check and write.
        let affected = self
            .tx
            .execute(
                "UPDATE lookup_values
                    SET lookup_list_name = ?1, display_value = ?2, active = ?3,
                        effective_from = ?4, effective_to = ?5, parent_id = ?6,
                        version = version + 1
                  WHERE id = ?7 AND version = ?8",
                params![
                    entity.lookup_list_name,
                    entity.display_value,
                    entity.active,
                    date_to_sql(entity.effective_from),
                    date_to_sql(entity.effective_to),
                    entity.parent_id.map(|p| p.as_i64()),
                    id.as_i64(),
                    asserted.as_i64(),
                ],
            )
            .map_err(translate_write_error)?;

        if affected == 0 {
            return match self.find(id)? {
                Some(_) => Err(SessionError::StaleWrite { entity_id: id }),
                None => Err(SessionError::NotFound { entity_id: id }),
            };
        }

        let bumped = asserted.next();
        entity.assign_version(bumped);
        tracing::debug!(entity_id = id.as_i64(), version = bumped.as_i64(), "updated lookup value");
        Ok(())
    }

    fn delete(&mut self, entity_id: EntityId) -> SessionResult<()> {
        let affected = self
            .tx
            .execute(
                "DELETE FROM lookup_values WHERE id = ?1",
                [entity_id.as_i64()],
            )
            .map_err(translate_write_error)?;

        if affected == 0 {
            return Err(SessionError::NotFound { entity_id });
        }

        tracing::debug!(entity_id = entity_id.as_i64(), "deleted lookup value");
        Ok(())
    }

    fn find(&self, entity_id: EntityId) -> SessionResult<Option<LookupValue>> {
        self.tx
            .query_row(
                &format!("SELECT {LOOKUP_VALUE_COLUMNS} FROM lookup_values WHERE id = ?1"),
                [entity_id.as_i64()],
                lookup_value_from_row,
            )
            .optional()
            .map_err(from_rusqlite)
    }

    fn append_revision(
        &mut self,
        entity_id: EntityId,
        revision_type: RevisionType,
        user_name: &str,
        snapshot: Option<Value>,
    ) -> SessionResult<i64> {
        let sequence: i64 = self
            .tx
            .query_row(
                "SELECT COALESCE(MAX(sequence) + 1, 0)
                   FROM lookup_value_revisions WHERE entity_id = ?1",
                [entity_id.as_i64()],
                |row| row.get(0),
            )
            .map_err(from_rusqlite)?;

        self.tx
            .execute(
                "INSERT INTO lookup_value_revisions
                    (entity_id, sequence, revision_type, user_name, snapshot, recorded_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entity_id.as_i64(),
                    sequence,
                    revision_type.as_str(),
                    user_name,
                    snapshot.map(|v| v.to_string()),
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(from_rusqlite)?;

        tracing::debug!(
            entity_id = entity_id.as_i64(),
            revision_seq = sequence,
            revision_type = revision_type.as_str(),
            "appended revision"
        );
        Ok(sequence)
    }

    fn revisions(&self, entity_id: EntityId) -> SessionResult<Vec<RevisionRecord>> {
        let mut stmt = self
            .tx
            .prepare(&format!(
                "SELECT {REVISION_COLUMNS} FROM lookup_value_revisions
                  WHERE entity_id = ?1 ORDER BY sequence"
            ))
            .map_err(from_rusqlite)?;

        let records = stmt
            .query_map([entity_id.as_i64()], revision_from_row)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        Ok(records)
    }
}

impl LookupIndex for SqliteSession<'_> {
    fn find_by_list_name(&self, list_name: &str) -> SessionResult<Vec<LookupValue>> {
        let mut stmt = self
            .tx
            .prepare(&format!(
                "SELECT {LOOKUP_VALUE_COLUMNS} FROM lookup_values
                  WHERE lookup_list_name = ?1 ORDER BY id"
            ))
            .map_err(from_rusqlite)?;

        let values = stmt
            .query_map([list_name], lookup_value_from_row)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        Ok(values)
    }

    fn find_by_list_name_and_parent(
        &self,
        list_name: &str,
        parent_id: EntityId,
    ) -> SessionResult<Vec<LookupValue>> {
        let mut stmt = self
            .tx
            .prepare(&format!(
                "SELECT {LOOKUP_VALUE_COLUMNS} FROM lookup_values
                  WHERE lookup_list_name = ?1 AND parent_id = ?2 ORDER BY id"
            ))
            .map_err(from_rusqlite)?;

        let values = stmt
            .query_map(
                params![list_name, parent_id.as_i64()],
                lookup_value_from_row,
            )
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        Ok(values)
    }

    fn count_children(&self, entity_id: EntityId) -> SessionResult<usize> {
        let count: i64 = self
            .tx
            .query_row(
                "SELECT COUNT(*) FROM lookup_values WHERE parent_id = ?1",
                [entity_id.as_i64()],
                |row| row.get(0),
            )
            .map_err(from_rusqlite)?;
        Ok(count as usize)
    }
}
