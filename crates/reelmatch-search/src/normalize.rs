//! Text normalization for label and title comparison.
//!
//! Two related forms are produced from any string:
//!
//! - the *folded* form: lower-cased, diacritics removed, smart punctuation
//!   mapped to ASCII, separators kept. Tokens are read from this form.
//! - the *normalized* form: the folded form with everything outside
//!   `[a-z0-9]` removed. This is the comparison key.
//!
//! Because the normalized form has no separators left, tokens must always
//! be taken from the folded form; `tokenize(s)` joined back together equals
//! `normalize(s)`.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Typographic characters replaced by their ASCII counterpart while folding.
const PUNCTUATION_MAP: &[(char, char)] = &[
    ('\u{2018}', '\''), // left single quote
    ('\u{2019}', '\''), // right single quote
    ('\u{201C}', '"'),  // left double quote
    ('\u{201D}', '"'),  // right double quote
    ('\u{2013}', '-'),  // en dash
    ('\u{2014}', '-'),  // em dash
    ('\u{00B4}', '\''), // acute accent
];

/// A trailing counter such as `_16`, `-2`, ` 3` or `(1)`.
#[allow(clippy::expect_used)]
static NUMERIC_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s_\-]*(\(\d+\)|\d+)$").expect("numeric suffix pattern is valid")
});

fn map_punctuation(c: char) -> char {
    PUNCTUATION_MAP
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Lower-case, strip diacritics and map smart punctuation, keeping
/// separators.
#[must_use]
pub fn fold(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(map_punctuation)
        .collect()
}

/// Reduce a string to its `[a-z0-9]*` comparison key.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
#[must_use]
pub fn normalize(s: &str) -> String {
    fold(s).chars().filter(|c| is_key_char(*c)).collect()
}

/// Remove known file-naming prefixes from the start of `name`.
///
/// Each prefix is tried once, in list order; a strip never restarts the
/// scan, so `"img_m_x"` loses `img_` but keeps `m_` (which comes earlier in
/// the default list). Matching is case-sensitive.
#[must_use]
pub fn strip_prefixes<S: AsRef<str>>(name: &str, prefixes: &[S]) -> String {
    let mut stripped = name;
    for prefix in prefixes {
        if let Some(rest) = stripped.strip_prefix(prefix.as_ref()) {
            stripped = rest;
        }
    }
    stripped.to_string()
}

/// Remove one trailing counter (`_16`, `-2`, `(1)`, ...) from `name`.
#[must_use]
pub fn strip_numeric_suffix(name: &str) -> String {
    NUMERIC_SUFFIX.replace(name, "").into_owned()
}

/// Clean a file stem before normalization: prefixes, then the trailing
/// counter.
#[must_use]
pub fn clean_label<S: AsRef<str>>(stem: &str, prefixes: &[S]) -> String {
    strip_numeric_suffix(&strip_prefixes(stem, prefixes))
}

/// The comparison key of a file stem: `strip_prefixes`, then
/// `strip_numeric_suffix`, then `normalize`.
#[must_use]
pub fn normalize_label<S: AsRef<str>>(stem: &str, prefixes: &[S]) -> String {
    normalize(&clean_label(stem, prefixes))
}

/// Maximal `[a-z0-9]` runs of the folded form of `s`.
#[must_use]
pub fn tokenize(s: &str) -> BTreeSet<String> {
    fold(s)
        .split(|c: char| !is_key_char(c))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokens of a file stem, taken after prefix and counter stripping.
#[must_use]
pub fn label_tokens<S: AsRef<str>>(stem: &str, prefixes: &[S]) -> BTreeSet<String> {
    tokenize(&clean_label(stem, prefixes))
}
