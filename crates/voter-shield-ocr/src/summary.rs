//! Best-effort parsing of the summary page's declared totals, grounded on
//! `parse_summary_totals` in the original implementation: regex scans for
//! Male/Female/Third Gender/Total, falling back to the Tamil total token
//! when no English "Total" is found. Never fails — every field is optional.

use regex::Regex;
use std::sync::OnceLock;
use voter_shield_common::SummaryTotals;

const TAMIL_TOTAL: &str = "மொத்தம்";

fn male_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bMale\b[^0-9]{0,20}(\d{1,7})").unwrap())
}

fn female_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bFemale\b[^0-9]{0,20}(\d{1,7})").unwrap())
}

fn third_gender_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bThird\s*Gender\b[^0-9]{0,20}(\d{1,7})").unwrap())
}

fn total_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bTotal\b[^0-9]{0,30}(\d{1,7})").unwrap())
}

fn tamil_total_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"{}[^0-9]{{0,30}}(\d{{1,7}})", regex::escape(TAMIL_TOTAL))).unwrap()
    })
}

fn first_u32(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Parses the OCR text of a summary page into best-effort totals. Absence
/// of any individual count is expected and not an error.
#[must_use]
pub fn parse_summary_totals(ocr_text: &str) -> SummaryTotals {
    if ocr_text.trim().is_empty() {
        return SummaryTotals::default();
    }

    let total_male = first_u32(male_re(), ocr_text);
    let total_female = first_u32(female_re(), ocr_text);
    let total_third_gender = first_u32(third_gender_re(), ocr_text);

    let total_voters_expected = first_u32(total_re(), ocr_text)
        .or_else(|| ocr_text.contains(TAMIL_TOTAL).then(|| first_u32(tamil_total_re(), ocr_text)).flatten());

    SummaryTotals {
        total_male,
        total_female,
        total_third_gender,
        total_voters_expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_four_fields_from_english_summary() {
        let text = "Summary\nMale: 120\nFemale: 130\nThird Gender: 2\nTotal: 252\n";
        let totals = parse_summary_totals(text);
        assert_eq!(totals.total_male, Some(120));
        assert_eq!(totals.total_female, Some(130));
        assert_eq!(totals.total_third_gender, Some(2));
        assert_eq!(totals.total_voters_expected, Some(252));
    }

    #[test]
    fn falls_back_to_tamil_total_token() {
        let text = format!("ஆண் 10 பெண் 12 {} 22", TAMIL_TOTAL);
        let totals = parse_summary_totals(&text);
        assert_eq!(totals.total_voters_expected, Some(22));
    }

    #[test]
    fn empty_text_yields_all_none() {
        let totals = parse_summary_totals("");
        assert_eq!(totals.total_male, None);
        assert_eq!(totals.total_voters_expected, None);
    }

    #[test]
    fn missing_total_without_tamil_fallback_is_none() {
        let totals = parse_summary_totals("Male 10 Female 12");
        assert_eq!(totals.total_voters_expected, None);
    }
}
