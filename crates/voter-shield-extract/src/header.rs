//! Parses a voter-grid page's header strip (`<page>_street.txt`) into
//! `assembly`/`part_no`/`street`, grounded on `parse_page_metadata` in the
//! original implementation. Tamil label vocabulary is not present in the
//! retrieved source (§14 open question 1); the Tamil variant below mirrors
//! the English two-line structure against the standard Tamil electoral-roll
//! header labels.

use regex::Regex;
use std::sync::OnceLock;
use voter_shield_common::{LanguageSet, PageHeader};

fn assembly_en_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Name\s*:\s*([A-Za-z0-9\- ]+?)\s+Part").unwrap())
}

fn part_no_en_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Part\s*No\.?\s*[:\-]?\s*(\d+)").unwrap())
}

fn street_en_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Section\s+No\s+and\s+Name\s*[:\-]?\s*(.+)$").unwrap())
}

fn assembly_tam_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"பெயர்\s*[:\-]?\s*([^\d]+?)\s+பாகம்").unwrap())
}

fn part_no_tam_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"பாகம்\s*எண்\s*[:\-]?\s*(\d+)").unwrap())
}

fn street_tam_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"பிரிவு\s*எண்\s*மற்றும்\s*பெயர்\s*[:\-]?\s*(.+)$").unwrap())
}

/// Parses header text for a document's language set. Any or all of the
/// three fields may be absent; parsing never fails.
#[must_use]
pub fn parse_page_header(text: &str, language_set: LanguageSet) -> PageHeader {
    match language_set {
        LanguageSet::English => parse_page_header_en(text),
        LanguageSet::TamilEnglish => parse_page_header_tam(text),
    }
}

fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

fn parse_page_header_en(text: &str) -> PageHeader {
    let lines = non_blank_lines(text);
    let mut header = PageHeader::default();
    if lines.len() < 2 {
        return header;
    }

    let (line1, line2) = (lines[0], lines[1]);

    if let Some(caps) = assembly_en_re().captures(line1) {
        header.assembly = Some(caps[1].trim().to_string());
    }
    if let Some(caps) = part_no_en_re().captures(line1) {
        header.part_no = caps[1].parse().ok();
    }
    if let Some(caps) = street_en_re().captures(line2) {
        header.street = Some(caps[1].trim().to_string());
    }

    header
}

fn parse_page_header_tam(text: &str) -> PageHeader {
    let lines = non_blank_lines(text);
    let mut header = PageHeader::default();
    if lines.len() < 2 {
        return header;
    }

    let (line1, line2) = (lines[0], lines[1]);

    if let Some(caps) = assembly_tam_re().captures(line1) {
        header.assembly = Some(caps[1].trim().to_string());
    }
    if let Some(caps) = part_no_tam_re().captures(line1) {
        header.part_no = caps[1].parse().ok();
    }
    if let Some(caps) = street_tam_re().captures(line2) {
        header.street = Some(caps[1].trim().to_string());
    }

    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english_header_fields() {
        let text = "Assembly Name: Anna Nagar Part No. 12\nSection No and Name: 4th Street\n";
        let header = parse_page_header(text, LanguageSet::English);
        assert_eq!(header.assembly.as_deref(), Some("Anna Nagar"));
        assert_eq!(header.part_no, Some(12));
        assert_eq!(header.street.as_deref(), Some("4th Street"));
    }

    #[test]
    fn parses_tamil_header_fields() {
        let text = "பெயர்: அண்ணா நகர் பாகம் எண் 12\nபிரிவு எண் மற்றும் பெயர்: 4வது தெரு\n";
        let header = parse_page_header(text, LanguageSet::TamilEnglish);
        assert_eq!(header.part_no, Some(12));
        assert!(header.street.is_some());
    }

    #[test]
    fn fewer_than_two_lines_yields_empty_header() {
        let header = parse_page_header("only one line", LanguageSet::English);
        assert!(header.assembly.is_none());
        assert!(header.part_no.is_none());
        assert!(header.street.is_none());
    }
}
