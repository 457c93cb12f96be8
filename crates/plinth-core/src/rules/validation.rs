//! Field-level validation rules for lookup values

use crate::errors::{PlinthError, Result};
use crate::model::LookupValue;

/// Validate the structural field rules of a lookup value.
///
/// Checks field shape only; relational rules (parent existence, list-name
/// collisions, uniqueness) are enforced by the write path.
pub fn validate_lookup_value(value: &LookupValue) -> Result<()> {
    let name_len = value.lookup_list_name.chars().count();
    if name_len < LookupValue::LIST_NAME_MIN || name_len > LookupValue::LIST_NAME_MAX {
        return Err(PlinthError::InvalidField {
            field: "lookup_list_name",
            reason: format!(
                "length must be between {} and {} characters, got {}",
                LookupValue::LIST_NAME_MIN,
                LookupValue::LIST_NAME_MAX,
                name_len
            ),
        });
    }

    if value.display_value.trim().is_empty() {
        return Err(PlinthError::InvalidField {
            field: "display_value",
            reason: "must not be blank".to_string(),
        });
    }

    Ok(())
}
