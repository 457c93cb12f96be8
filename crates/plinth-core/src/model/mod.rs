//! Domain model types

pub mod entity;
pub mod lookup;
pub mod revision;

pub use entity::{Activatable, EffectiveDated, EntityId, Version, VersionedEntity};
pub use lookup::LookupValue;
pub use revision::{AuditRevision, RevisionRecord, RevisionType};
