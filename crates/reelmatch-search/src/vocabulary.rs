//! Fixed word lists used around the matchers.
//!
//! Kept as ordered data rather than inline literals so another catalog
//! (posters, album covers, ...) can substitute its own.

use serde::{Deserialize, Serialize};

/// File-naming artifacts stripped from the front of a file stem, tried once
/// each in this order.
pub const DEFAULT_PREFIXES: &[&str] = &[
    "m_",
    "poster_",
    "cover_",
    "img_",
    "image_",
    "foto_",
    "screenshot_",
    "cap_",
    "captura_",
    "sin_titulo_",
    "sintitulo_",
    "unnamed_",
];

/// Placeholder names that never identify a record (English and Spanish
/// export defaults).
pub const DEFAULT_GENERIC_BASENAMES: &[&str] = &[
    "captura",
    "sintitulo",
    "sin titulo",
    "sintítul",
    "unnamed",
    "default",
    "image",
    "img",
    "photo",
    "foto",
    "screenshot",
];

/// Image extensions accepted by the folder scan, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// The configurable word lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub prefixes: Vec<String>,
    pub generic_basenames: Vec<String>,
    pub image_extensions: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            prefixes: to_owned(DEFAULT_PREFIXES),
            generic_basenames: to_owned(DEFAULT_GENERIC_BASENAMES),
            image_extensions: to_owned(IMAGE_EXTENSIONS),
        }
    }
}

impl Vocabulary {
    /// Whether `ext` (without the dot) is an accepted image extension.
    #[must_use]
    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.image_extensions
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(ext))
    }
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}
