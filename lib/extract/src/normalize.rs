//! Coercions applied to raw field values.
//!
//! Absence is never an error here: every coercion has a defined result for
//! `None`.

use std::collections::HashSet;

/// Separator for list-valued fields.
pub const LIST_DELIMITER: char = ',';

/// `true` only for the exact literal `"true"`.
#[must_use]
pub fn boolean(raw: Option<&str>) -> bool {
    raw == Some("true")
}

/// Splits on commas, trims and lowercases each piece.
///
/// Empty pieces are kept: `"a,,b"` yields `["a", "", "b"]`. A missing value
/// yields an empty list.
#[must_use]
pub fn delimited_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(LIST_DELIMITER)
            .map(|piece| piece.trim().to_lowercase())
            .collect()
    })
    .unwrap_or_default()
}

/// Like [`delimited_list`], keeping only the first occurrence of each value.
#[must_use]
pub fn deduplicated_list(raw: Option<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    delimited_list(raw)
        .into_iter()
        .filter(|piece| seen.insert(piece.clone()))
        .collect()
}

/// Passes free text through unchanged.
#[must_use]
pub fn identity(raw: Option<&str>) -> Option<String> {
    raw.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_is_strict() {
        assert!(boolean(Some("true")));
        assert!(!boolean(Some("TRUE")));
        assert!(!boolean(Some("True")));
        assert!(!boolean(Some(" true")));
        assert!(!boolean(Some("false")));
        assert!(!boolean(Some("yes")));
        assert!(!boolean(None));
    }

    #[test]
    fn list_trims_and_lowercases() {
        assert_eq!(
            delimited_list(Some(" Shoes ,BAGS,  Hats")),
            vec!["shoes", "bags", "hats"]
        );
    }

    #[test]
    fn list_keeps_duplicates_and_order() {
        assert_eq!(
            delimited_list(Some("Nike,Puma,nike")),
            vec!["nike", "puma", "nike"]
        );
    }

    #[test]
    fn list_keeps_empty_pieces() {
        assert_eq!(delimited_list(Some("a,,b")), vec!["a", "", "b"]);
        assert_eq!(delimited_list(Some("")), vec![""]);
    }

    #[test]
    fn missing_list_is_empty() {
        assert!(delimited_list(None).is_empty());
        assert!(deduplicated_list(None).is_empty());
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        assert_eq!(
            deduplicated_list(Some("Shoes, RUNNING , shoes")),
            vec!["shoes", "running"]
        );
    }

    #[test]
    fn identity_passes_through() {
        assert_eq!(identity(Some("  Mixed Case, kept ")).as_deref(), Some("  Mixed Case, kept "));
        assert_eq!(identity(None), None);
    }
}
