//! Detection of placeholder labels.
//!
//! Export tools name files `Screenshot_2023...`, `IMG_0042`, `Sin título`
//! and so on. Such stems carry no title information and would otherwise
//! fuzzy-match short catalog entries, so the lexical path skips them.

use crate::normalize::normalize;

/// Pre-normalized generic vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericLabelFilter {
    needles: Vec<String>,
}

impl GenericLabelFilter {
    /// Build a filter from raw vocabulary entries. Entries that normalize to
    /// the empty string are dropped, since they would match every label.
    #[must_use]
    pub fn new<S: AsRef<str>>(basenames: &[S]) -> Self {
        let mut needles: Vec<String> = Vec::with_capacity(basenames.len());
        for word in basenames {
            let needle = normalize(word.as_ref());
            if !needle.is_empty() && !needles.contains(&needle) {
                needles.push(needle);
            }
        }
        Self { needles }
    }

    /// True if the normalized label contains any normalized vocabulary entry.
    #[must_use]
    pub fn is_generic(&self, label: &str) -> bool {
        let key = normalize(label);
        self.needles.iter().any(|needle| key.contains(needle.as_str()))
    }
}

impl Default for GenericLabelFilter {
    fn default() -> Self {
        Self::new(crate::vocabulary::DEFAULT_GENERIC_BASENAMES)
    }
}

/// [`GenericLabelFilter::is_generic`] with the default vocabulary.
#[must_use]
pub fn is_generic(label: &str) -> bool {
    GenericLabelFilter::default().is_generic(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_is_generic() {
        assert!(is_generic("Screenshot_2023"));
        assert!(is_generic("Captura de pantalla 2024-01-02"));
        assert!(is_generic("IMG_0042"));
        assert!(is_generic("Sin título"));
    }

    #[test]
    fn test_titles_are_not_generic() {
        assert!(!is_generic("the_matrix_2"));
        assert!(!is_generic("Inception"));
        assert!(!is_generic("Star Wars"));
    }

    #[test]
    fn test_vocabulary_is_matched_as_substring() {
        assert!(!is_generic("Imagine"));
        assert!(is_generic("imgur_upload"));
    }

    #[test]
    fn test_custom_vocabulary() {
        let filter = GenericLabelFilter::new(&["Cartel", "   "]);
        assert!(filter.is_generic("cartel_final"));
        assert!(!filter.is_generic("Screenshot"));
    }
}
