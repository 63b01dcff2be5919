#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Postcode text handling for the locality engine.
//!
//! Provides a deterministic normalization applied symmetrically wherever
//! postcodes are compared: user input, index keys, sample-table keys, and
//! weather-lookup prefixes all pass through [`normalize`] so that
//! `"ec1a 1bb"` and `"EC1A1BB"` produce the same key.
//!
//! This is purely textual. No validation against real UK postcode grammar
//! is performed; malformed input normalizes and formats without error.

use regex::Regex;
use std::sync::LazyLock;

/// Regex matching runs of whitespace to strip during normalization.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Outward codes are 2-4 characters; prefix candidates never exceed this.
const MAX_PREFIX_LEN: usize = 4;

/// Shortest prefix worth looking up; below this the outward code is
/// ambiguous.
const MIN_PREFIX_LEN: usize = 2;

/// Normalizes postcode text: strips all whitespace and uppercases the
/// remainder. Empty input yields an empty string.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(input: &str) -> String {
    WHITESPACE_RE.replace_all(input, "").to_uppercase()
}

/// Formats a postcode for display using the outward/inward convention:
/// a single space is inserted before the final 3 characters. Normalized
/// codes of 3 characters or fewer are returned unchanged.
#[must_use]
pub fn format(value: &str) -> String {
    let cleaned = normalize(value);
    let chars: Vec<char> = cleaned.chars().collect();
    if chars.len() <= 3 {
        return cleaned;
    }
    let split = chars.len() - 3;
    let outward: String = chars[..split].iter().collect();
    let inward: String = chars[split..].iter().collect();
    format!("{outward} {inward}")
}

/// Generates outward-prefix candidates for a normalized postcode, longest
/// first: lengths `min(len, 4)` down to 2 inclusive. The longest prefix
/// approximates the most specific postal district, so callers should take
/// the first candidate that matches their table.
///
/// Codes shorter than 2 characters yield no candidates.
#[must_use]
pub fn prefix_candidates(normalized: &str) -> Vec<String> {
    let chars: Vec<char> = normalized.chars().collect();
    let max_len = chars.len().min(MAX_PREFIX_LEN);
    if max_len < MIN_PREFIX_LEN {
        return Vec::new();
    }
    (MIN_PREFIX_LEN..=max_len)
        .rev()
        .map(|len| chars[..len].iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_mixed_case_and_whitespace() {
        assert_eq!(normalize(" ec1a 1bb "), "EC1A1BB");
        assert_eq!(normalize("SW1A\t0AA"), "SW1A0AA");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize("e c 1 a 1 b b");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalizes_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn formats_standard_postcode() {
        assert_eq!(format("ec1a1bb"), "EC1A 1BB");
        assert_eq!(format("m1 1ae"), "M1 1AE");
    }

    #[test]
    fn formats_short_code_unchanged() {
        assert_eq!(format("EC1"), "EC1");
        assert_eq!(format("m1"), "M1");
    }

    #[test]
    fn formats_without_grammar_validation() {
        // All-digit input is not a real postcode but must not error.
        assert_eq!(format("1234567"), "1234 567");
    }

    #[test]
    fn prefix_candidates_longest_first() {
        assert_eq!(
            prefix_candidates("EC1A1BB"),
            vec!["EC1A", "EC1", "EC"]
        );
    }

    #[test]
    fn prefix_candidates_short_code() {
        assert_eq!(prefix_candidates("M1"), vec!["M1"]);
        assert_eq!(prefix_candidates("M1A"), vec!["M1A", "M1"]);
    }

    #[test]
    fn prefix_candidates_below_minimum() {
        assert!(prefix_candidates("M").is_empty());
        assert!(prefix_candidates("").is_empty());
    }
}
