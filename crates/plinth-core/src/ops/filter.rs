//! Query-time filters for lookup value lists
//!
//! Filters are optional and compose in a fixed order: active status first,
//! then effective date. An absent filter passes everything through
//! untouched, and input order is always preserved.

use chrono::NaiveDate;

use crate::errors::{PlinthError, Result};
use crate::model::{Activatable, EffectiveDated};

/// Strict `yyyy-MM-dd` parse for the effective-date query parameter.
///
/// Anything else, including other date formats and empty strings, is
/// rejected so a typo never degrades into an unfiltered result.
pub fn parse_effective_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| PlinthError::InvalidDate {
        input: raw.to_string(),
    })
}

/// Keep values whose active flag equals the requested one
pub fn filter_by_active_status<E: Activatable>(values: Vec<E>, active: Option<bool>) -> Vec<E> {
    match active {
        Some(wanted) => values
            .into_iter()
            .filter(|value| value.is_active() == wanted)
            .collect(),
        None => values,
    }
}

/// Keep values whose effective window contains the given date
pub fn filter_by_effective_date<E: EffectiveDated>(
    values: Vec<E>,
    date: Option<NaiveDate>,
) -> Vec<E> {
    match date {
        Some(date) => values
            .into_iter()
            .filter(|value| value.is_effective_on(date))
            .collect(),
        None => values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LookupValue;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_accepts_iso_dates_only() {
        assert_eq!(parse_effective_date("2016-01-01").unwrap(), date("2016-01-01"));

        for bad in ["01-01-2016", "2016/01/01", "2016-13-01", "yesterday", ""] {
            let err = parse_effective_date(bad).unwrap_err();
            assert!(
                matches!(err, PlinthError::InvalidDate { ref input } if input == bad),
                "expected InvalidDate for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_active_filter_keeps_matching_flag_and_order() {
        let values = vec![
            LookupValue::new("vehicle_model", "Focus"),
            LookupValue::new("vehicle_model", "Escort").inactive(),
            LookupValue::new("vehicle_model", "Sierra"),
        ];

        let active: Vec<String> = filter_by_active_status(values.clone(), Some(true))
            .into_iter()
            .map(|v| v.display_value)
            .collect();
        assert_eq!(active, vec!["Focus", "Sierra"]);

        let inactive = filter_by_active_status(values.clone(), Some(false));
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].display_value, "Escort");

        assert_eq!(filter_by_active_status(values, None).len(), 3);
    }

    #[test]
    fn test_effective_filter_passes_through_when_absent() {
        let values = vec![LookupValue::new("vehicle_model", "Sierra")
            .with_effective_window(Some(date("2016-01-01")), Some(date("2016-12-31")))];

        assert_eq!(filter_by_effective_date(values.clone(), None).len(), 1);
        assert!(filter_by_effective_date(values.clone(), Some(date("2015-06-01"))).is_empty());
        assert_eq!(
            filter_by_effective_date(values, Some(date("2016-06-01"))).len(),
            1
        );
    }

    #[test]
    fn test_filters_can_produce_empty_results() {
        let values = vec![LookupValue::new("vehicle_model", "Focus").inactive()];
        assert!(filter_by_active_status(values, Some(true)).is_empty());
    }
}
