//! Versioned-entity building blocks
//!
//! Every persistable entity pairs a store-assigned surrogate id with an
//! optimistic-lock version. The traits here are the seam between the
//! generic persistence engine and concrete domain types.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Surrogate identifier, assigned by the store on first persist
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optimistic-lock counter.
///
/// Starts at zero when the store first persists an entity and is bumped by
/// the store, never the caller, on every successful update.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    pub fn initial() -> Self {
        Self(0)
    }

    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// The version the store assigns on the next successful update
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entity the persistence engine can store, update and delete.
///
/// `id` and `version` are absent until the first persist. The two
/// field-level hooks draw the line between updatable fields (covered by
/// no-op detection and carried into merged updates) and everything else,
/// which the engine leaves untouched.
pub trait VersionedEntity: Clone {
    /// Stable kind tag used in logs and the revision log
    const KIND: &'static str;

    fn id(&self) -> Option<EntityId>;

    fn assign_id(&mut self, id: EntityId);

    fn version(&self) -> Option<Version>;

    fn assign_version(&mut self, version: Version);

    /// True when no updatable field of `self` differs from `incoming`.
    ///
    /// Non-updatable fields never participate in this comparison.
    fn updatable_fields_eq(&self, incoming: &Self) -> bool;

    /// Copy every updatable field of `incoming` onto `self`, leaving
    /// non-updatable fields as stored.
    fn apply_updatable(&mut self, incoming: &Self);
}

/// Entities carrying an active/inactive flag
pub trait Activatable {
    fn is_active(&self) -> bool;
}

/// Entities bounded by an optional inclusive effective-date window
pub trait EffectiveDated {
    fn effective_from(&self) -> Option<NaiveDate>;

    fn effective_to(&self) -> Option<NaiveDate>;

    /// True when `date` falls inside the effective window.
    ///
    /// An absent bound is unbounded on that side; both bounds are
    /// inclusive, so a value is effective on its own boundary dates.
    fn is_effective_on(&self, date: NaiveDate) -> bool {
        let from_ok = self.effective_from().is_none_or(|from| from <= date);
        let to_ok = self.effective_to().is_none_or(|to| date <= to);
        from_ok && to_ok
    }
}
