//! Lookup value model
//!
//! A lookup value is one entry of a named reference list (country codes,
//! vehicle makes, ...). Values may form a hierarchy: a value can point at a
//! parent value that lives in a different list, which is how dependent
//! lists (make -> model) are expressed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::entity::{Activatable, EffectiveDated, EntityId, Version, VersionedEntity};

/// One entry of a named, hierarchical lookup list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupValue {
    /// Surrogate identifier, absent until first persisted
    pub id: Option<EntityId>,
    /// Optimistic-lock version, absent until first persisted
    pub version: Option<Version>,
    /// Name of the list this value belongs to
    pub lookup_list_name: String,
    /// The value as presented to users
    pub display_value: String,
    /// Whether the value is currently offered for selection
    pub active: bool,
    /// Inclusive start of the effective window; absent means unbounded
    pub effective_from: Option<NaiveDate>,
    /// Inclusive end of the effective window; absent means unbounded
    pub effective_to: Option<NaiveDate>,
    /// Parent value in another list; absent for top-level values
    pub parent_id: Option<EntityId>,
}

impl LookupValue {
    /// Named uniqueness constraint over (list name, display value, parent)
    pub const UNIQUE_VALUE_CONSTRAINT: &'static str = "UC_LOOKUP_LIST_VALUE";
    /// Named referential constraint from `parent_id` to an existing value
    pub const PARENT_FK_CONSTRAINT: &'static str = "FK_LOOKUP_VALUE_PARENT";

    /// Length bounds on `lookup_list_name`
    pub const LIST_NAME_MIN: usize = 3;
    pub const LIST_NAME_MAX: usize = 100;

    /// A new, unpersisted, active value with an unbounded effective window
    pub fn new(lookup_list_name: impl Into<String>, display_value: impl Into<String>) -> Self {
        Self {
            id: None,
            version: None,
            lookup_list_name: lookup_list_name.into(),
            display_value: display_value.into(),
            active: true,
            effective_from: None,
            effective_to: None,
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: EntityId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_effective_window(
        mut self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Self {
        self.effective_from = from;
        self.effective_to = to;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl VersionedEntity for LookupValue {
    const KIND: &'static str = "lookup_value";

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn version(&self) -> Option<Version> {
        self.version
    }

    fn assign_version(&mut self, version: Version) {
        self.version = Some(version);
    }

    // Updatable fields: display_value, active, effective_from, effective_to.
    // The list name, parent link, id and version are fixed after creation.
    fn updatable_fields_eq(&self, incoming: &Self) -> bool {
        self.display_value == incoming.display_value
            && self.active == incoming.active
            && self.effective_from == incoming.effective_from
            && self.effective_to == incoming.effective_to
    }

    fn apply_updatable(&mut self, incoming: &Self) {
        self.display_value = incoming.display_value.clone();
        self.active = incoming.active;
        self.effective_from = incoming.effective_from;
        self.effective_to = incoming.effective_to;
    }
}

impl Activatable for LookupValue {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl EffectiveDated for LookupValue {
    fn effective_from(&self) -> Option<NaiveDate> {
        self.effective_from
    }

    fn effective_to(&self) -> Option<NaiveDate> {
        self.effective_to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_new_value_is_active_and_unpersisted() {
        let value = LookupValue::new("vehicle_make", "Ford");
        assert!(value.active);
        assert!(!value.is_persisted());
        assert_eq!(value.version, None);
        assert_eq!(value.parent_id, None);
    }

    #[test]
    fn test_effective_window_bounds_are_inclusive() {
        let value = LookupValue::new("vehicle_model", "Sierra")
            .with_effective_window(Some(date("2016-01-01")), Some(date("2016-12-31")));

        assert!(!value.is_effective_on(date("2015-12-31")));
        assert!(value.is_effective_on(date("2016-01-01")));
        assert!(value.is_effective_on(date("2016-06-15")));
        assert!(value.is_effective_on(date("2016-12-31")));
        assert!(!value.is_effective_on(date("2017-01-01")));
    }

    #[test]
    fn test_absent_bounds_are_unbounded() {
        let open = LookupValue::new("vehicle_model", "Focus");
        assert!(open.is_effective_on(date("1970-01-01")));
        assert!(open.is_effective_on(date("2999-12-31")));

        let from_only =
            LookupValue::new("vehicle_model", "Escort").with_effective_window(Some(date("2016-01-01")), None);
        assert!(!from_only.is_effective_on(date("2015-12-31")));
        assert!(from_only.is_effective_on(date("2999-12-31")));
    }

    #[test]
    fn test_updatable_comparison_ignores_fixed_fields() {
        let mut stored = LookupValue::new("vehicle_make", "Ford");
        stored.assign_id(EntityId::new(1));
        stored.assign_version(Version::initial());

        // Same updatable fields, different id and version: still equal.
        let mut incoming = LookupValue::new("vehicle_make", "Ford");
        incoming.assign_id(EntityId::new(2));
        incoming.assign_version(Version::new(9));
        assert!(stored.updatable_fields_eq(&incoming));

        // A changed parent link alone does not count as an update either.
        let reparented = LookupValue::new("vehicle_make", "Ford").with_parent(EntityId::new(3));
        assert!(stored.updatable_fields_eq(&reparented));

        let renamed = LookupValue::new("vehicle_make", "Volkswagen");
        assert!(!stored.updatable_fields_eq(&renamed));
    }

    #[test]
    fn test_apply_updatable_leaves_identity_alone() {
        let mut stored = LookupValue::new("vehicle_make", "Ford").with_parent(EntityId::new(7));
        stored.assign_id(EntityId::new(1));
        stored.assign_version(Version::new(3));

        let incoming = LookupValue::new("ignored_list", "Fiesta")
            .with_parent(EntityId::new(99))
            .with_effective_window(Some(date("2020-01-01")), None)
            .inactive();

        stored.apply_updatable(&incoming);

        assert_eq!(stored.display_value, "Fiesta");
        assert!(!stored.active);
        assert_eq!(stored.effective_from, Some(date("2020-01-01")));
        assert_eq!(stored.effective_to, None);
        // Fixed fields keep their stored values.
        assert_eq!(stored.lookup_list_name, "vehicle_make");
        assert_eq!(stored.parent_id, Some(EntityId::new(7)));
        assert_eq!(stored.id, Some(EntityId::new(1)));
        assert_eq!(stored.version, Some(Version::new(3)));
    }

    #[test]
    fn test_serializes_with_plain_field_names() {
        let mut value = LookupValue::new("vehicle_make", "Ford");
        value.assign_id(EntityId::new(1));
        value.assign_version(Version::initial());

        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["version"], 0);
        assert_eq!(json["lookup_list_name"], "vehicle_make");
        assert_eq!(json["display_value"], "Ford");
        assert_eq!(json["active"], true);
        assert!(json["parent_id"].is_null());
    }
}
