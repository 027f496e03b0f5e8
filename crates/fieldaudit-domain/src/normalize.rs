//! Normalized keys for addressing cached document text

use serde::{Deserialize, Serialize};
use std::fmt;

/// A lower-cased file name with every non-word character removed
///
/// Two different file names that normalize to the same key address the same
/// cache entry. This is a known limitation of keying by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether normalization removed every character
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a file name (or any identifier) into a cache key
///
/// Lower-cases the input, then keeps only letters, digits and underscores.
///
/// # Examples
///
/// ```
/// use fieldaudit_domain::normalize;
///
/// assert_eq!(normalize("Job Report #42.pdf").as_str(), "jobreport42pdf");
/// assert_eq!(normalize("job_report-42.PDF").as_str(), "job_report42pdf");
/// ```
pub fn normalize(name: &str) -> NormalizedKey {
    let key = name
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    NormalizedKey(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_punctuation_and_spaces() {
        assert_eq!(normalize("  Service Report (final).pdf ").as_str(), "servicereportfinalpdf");
    }

    #[test]
    fn test_keeps_underscores_and_digits() {
        assert_eq!(normalize("WO_2024_0107.pdf").as_str(), "wo_2024_0107pdf");
    }

    #[test]
    fn test_collisions_share_a_key() {
        assert_eq!(normalize("report-1.pdf"), normalize("Report 1.PDF"));
    }

    #[test]
    fn test_all_punctuation_is_empty() {
        assert!(normalize("--- . ---").is_empty());
    }

    #[test]
    fn test_non_ascii_letters_survive() {
        assert_eq!(normalize("Rapport Été.pdf").as_str(), "rapportétépdf");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(name in "[ -~À-ÿ]{0,64}") {
            let once = normalize(&name);
            let twice = normalize(once.as_str());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_output_has_only_word_chars(name in "[ -~]{0,64}") {
            let key = normalize(&name);
            prop_assert!(key.as_str().chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
            prop_assert!(!key.as_str().chars().any(|c| c.is_ascii_uppercase()));
        }
    }
}
