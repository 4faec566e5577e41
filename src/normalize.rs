//! Case and accent folding for catalog search.
//!
//! Food names arrive from user input and external catalogs in mixed scripts,
//! so substring search folds both the stored name and the query: NFD
//! decomposition, combining marks stripped, then lowercased. "Açaí" and
//! "acai" fold to the same string.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Folds a string for accent- and case-insensitive comparison.
pub fn fold(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns `true` if `haystack` contains `needle` after folding both sides.
pub fn folded_contains(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(&fold(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_case() {
        assert_eq!(fold("Açaí"), "acai");
        assert_eq!(fold("Crème Brûlée"), "creme brulee");
        assert_eq!(fold("JALAPEÑO"), "jalapeno");
    }

    #[test]
    fn plain_ascii_is_lowercased_only() {
        assert_eq!(fold("Apple Pie"), "apple pie");
    }

    #[test]
    fn contains_is_symmetric_over_accents() {
        assert!(folded_contains("Crème Brûlée", "creme"));
        assert!(folded_contains("creme brulee", "Brûlée"));
        assert!(!folded_contains("Apple", "pear"));
    }
}
