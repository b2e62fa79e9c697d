//! Filename-derived language routing.
//!
//! Language is never inferred from image content; it is decided once, from
//! a substring of the source filename, and threaded explicitly through
//! every later stage as a `LanguageSet` value. Keeping that decision in one
//! module means every other component just consumes the resulting value.

use serde::{Deserialize, Serialize};

/// The language pack(s) required to OCR a document, and the Tesseract
/// language string used to invoke the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageSet {
    English,
    TamilEnglish,
}

impl LanguageSet {
    /// `-TAM-` in the filename selects Tamil+English; `-ENG-` (or anything
    /// else) selects English-only. Checked case-insensitively.
    #[must_use]
    pub fn detect_from_filename(filename: &str) -> Self {
        let upper = filename.to_uppercase();
        if upper.contains("-TAM-") {
            LanguageSet::TamilEnglish
        } else {
            LanguageSet::English
        }
    }

    /// Tesseract `-l` language code, e.g. `"eng"` or `"tam+eng"`.
    #[must_use]
    pub fn tesseract_code(self) -> &'static str {
        match self {
            LanguageSet::English => "eng",
            LanguageSet::TamilEnglish => "tam+eng",
        }
    }

    /// Individual Tesseract language packs required (for the precondition
    /// check run before any OCR job starts).
    #[must_use]
    pub fn required_packs(self) -> &'static [&'static str] {
        match self {
            LanguageSet::English => &["eng"],
            LanguageSet::TamilEnglish => &["tam", "eng"],
        }
    }

    /// Number of leading cover pages for this language.
    #[must_use]
    pub fn cover_page_count(self) -> usize {
        match self {
            LanguageSet::English => 2,
            LanguageSet::TamilEnglish => 3,
        }
    }

    /// First 1-based page number that belongs to the voter grid.
    #[must_use]
    pub fn voter_start_page(self) -> u32 {
        self.cover_page_count() as u32 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_tamil_from_filename() {
        assert_eq!(
            LanguageSet::detect_from_filename("test-TAM-001-WI.pdf"),
            LanguageSet::TamilEnglish
        );
    }

    #[test]
    fn detects_english_from_filename() {
        assert_eq!(
            LanguageSet::detect_from_filename("test-ENG-001-WI.pdf"),
            LanguageSet::English
        );
    }

    #[test]
    fn defaults_to_english_when_unmarked() {
        assert_eq!(
            LanguageSet::detect_from_filename("plain-roll.pdf"),
            LanguageSet::English
        );
    }

    #[test]
    fn is_case_insensitive() {
        assert_eq!(
            LanguageSet::detect_from_filename("test-tam-001-wi.pdf"),
            LanguageSet::TamilEnglish
        );
    }

    #[test]
    fn tamil_requires_both_packs() {
        assert_eq!(
            LanguageSet::TamilEnglish.required_packs(),
            &["tam", "eng"]
        );
        assert_eq!(LanguageSet::English.required_packs(), &["eng"]);
    }

    #[test]
    fn voter_start_page_matches_cover_count() {
        assert_eq!(LanguageSet::English.voter_start_page(), 3);
        assert_eq!(LanguageSet::TamilEnglish.voter_start_page(), 4);
    }
}
