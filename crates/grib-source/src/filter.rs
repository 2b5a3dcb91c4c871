//! Key/value filtering of GRIB2 messages.
//!
//! Some GRIB2 products (`GFSPRS.GrbF##` and friends) carry the same field at
//! many level types, which a labeled dataset cannot represent in one go. The
//! filter narrows a load to one hypercube per field, the same way operators
//! pass `typeOfLevel`/`shortName` pairs to other GRIB tooling.

use std::collections::BTreeMap;

use crate::error::{GribResult, GribSourceError};
use crate::reader::MessageMeta;

/// Metadata keys a filter may constrain.
pub const SUPPORTED_KEYS: &[&str] = &["shortName", "typeOfLevel", "level"];

/// A conjunction of metadata key → expected value constraints.
///
/// An empty filter matches everything; that is the single "no filter"
/// representation (no separate null sentinel).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyFilter {
    entries: BTreeMap<String, String>,
}

impl KeyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a filter from paired `-k`/`-v` argument lists.
    pub fn from_pairs(keys: &[String], values: &[String]) -> GribResult<Self> {
        if keys.len() != values.len() {
            return Err(GribSourceError::MismatchedFilterPairs {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let mut entries = BTreeMap::new();
        for (key, value) in keys.iter().zip(values) {
            if !SUPPORTED_KEYS.contains(&key.as_str()) {
                return Err(GribSourceError::UnsupportedFilterKey { key: key.clone() });
            }
            if entries.insert(key.clone(), value.clone()).is_some() {
                return Err(GribSourceError::DuplicateFilterKey(key.clone()));
            }
        }
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a message's metadata satisfies every constraint.
    pub fn matches(&self, meta: &MessageMeta) -> bool {
        self.entries
            .iter()
            .all(|(key, expected)| meta.key_value(key).as_deref() == Some(expected.as_str()))
    }

    /// The `{key}{value}_{key}{value}` concatenation appended to store names
    /// to disambiguate multiple filtered extracts of one source file.
    /// Keys contribute in sorted order.
    pub fn suffix(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{}{}", k, v))
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Render for error messages, `key=value` pairs.
    pub fn describe(&self) -> String {
        if self.entries.is_empty() {
            return "no filter".to_string();
        }
        self.entries
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn meta(short_name: &str, type_of_level: &str, level: i64) -> MessageMeta {
        MessageMeta {
            short_name: short_name.to_string(),
            type_of_level: type_of_level.to_string(),
            level,
            forecast_time: None,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = KeyFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&meta("tmp", "surface", 0)));
    }

    #[test]
    fn test_matches_on_all_pairs() {
        let filter = KeyFilter::from_pairs(
            &strings(&["typeOfLevel", "shortName"]),
            &strings(&["surface", "tmp"]),
        )
        .unwrap();

        assert!(filter.matches(&meta("tmp", "surface", 0)));
        assert!(!filter.matches(&meta("tmp", "isobaric_surface", 0)));
        assert!(!filter.matches(&meta("ugrd", "surface", 0)));
    }

    #[test]
    fn test_level_matches_numerically_rendered() {
        let filter =
            KeyFilter::from_pairs(&strings(&["level"]), &strings(&["850"])).unwrap();
        assert!(filter.matches(&meta("tmp", "isobaric_surface", 850)));
        assert!(!filter.matches(&meta("tmp", "isobaric_surface", 500)));
    }

    #[test]
    fn test_mismatched_pairs_rejected() {
        let result = KeyFilter::from_pairs(&strings(&["typeOfLevel"]), &strings(&[]));
        assert!(matches!(
            result,
            Err(GribSourceError::MismatchedFilterPairs { keys: 1, values: 0 })
        ));
    }

    #[test]
    fn test_unknown_and_duplicate_keys_rejected() {
        assert!(matches!(
            KeyFilter::from_pairs(&strings(&["stepType"]), &strings(&["instant"])),
            Err(GribSourceError::UnsupportedFilterKey { .. })
        ));
        assert!(matches!(
            KeyFilter::from_pairs(
                &strings(&["level", "level"]),
                &strings(&["1", "2"])
            ),
            Err(GribSourceError::DuplicateFilterKey(_))
        ));
    }

    #[test]
    fn test_suffix_concatenation() {
        let filter = KeyFilter::from_pairs(
            &strings(&["typeOfLevel", "shortName"]),
            &strings(&["surface", "sm"]),
        )
        .unwrap();
        // Sorted key order: shortName before typeOfLevel.
        assert_eq!(filter.suffix(), "shortNamesm_typeOfLevelsurface");
    }
}
