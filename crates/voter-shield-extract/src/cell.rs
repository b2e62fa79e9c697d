//! Parses one cell's OCR chunk into voter-record fields.
//!
//! The original's per-cell extraction (`csv_extract.clean_and_extract_csv_v2`)
//! was not present in the retrieved source (§14 open question 1). This
//! implements the documented contract — "the cell chunk lists labelled
//! relationships; pick the first matching label line" — against the
//! standard Indian electoral-roll label vocabulary, independently per
//! field: each field's regex is tried against every line of the chunk in
//! order and the first match wins.

use regex::Regex;
use std::sync::OnceLock;
use voter_shield_common::{Gender, LanguageSet};

fn epic_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Z]{2,4}[0-9]{6,8}\b").unwrap())
}

struct FieldLabels {
    name: &'static Regex,
    father_name: &'static Regex,
    mother_name: &'static Regex,
    husband_name: &'static Regex,
    other_name: &'static Regex,
    house_no: &'static Regex,
    age: &'static Regex,
    gender: &'static Regex,
}

fn labels_en() -> &'static FieldLabels {
    static NAME: OnceLock<Regex> = OnceLock::new();
    static FATHER: OnceLock<Regex> = OnceLock::new();
    static MOTHER: OnceLock<Regex> = OnceLock::new();
    static HUSBAND: OnceLock<Regex> = OnceLock::new();
    static OTHER: OnceLock<Regex> = OnceLock::new();
    static HOUSE: OnceLock<Regex> = OnceLock::new();
    static AGE: OnceLock<Regex> = OnceLock::new();
    static GENDER: OnceLock<Regex> = OnceLock::new();
    static LABELS: OnceLock<FieldLabels> = OnceLock::new();

    LABELS.get_or_init(|| FieldLabels {
        name: NAME.get_or_init(|| Regex::new(r"(?i)^(?:Elector'?s?\s*)?Name\s*[:\-]\s*(.+)$").unwrap()),
        father_name: FATHER
            .get_or_init(|| Regex::new(r"(?i)^Father'?s?\s*Name\s*[:\-]\s*(.+)$").unwrap()),
        mother_name: MOTHER
            .get_or_init(|| Regex::new(r"(?i)^Mother'?s?\s*Name\s*[:\-]\s*(.+)$").unwrap()),
        husband_name: HUSBAND
            .get_or_init(|| Regex::new(r"(?i)^Husband'?s?\s*Name\s*[:\-]\s*(.+)$").unwrap()),
        other_name: OTHER.get_or_init(|| {
            Regex::new(r"(?i)^(?:Other'?s?|Relation'?s?)\s*Name\s*[:\-]\s*(.+)$").unwrap()
        }),
        house_no: HOUSE
            .get_or_init(|| Regex::new(r"(?i)^House\s*(?:No\.?|Number)\s*[:\-]\s*(.+)$").unwrap()),
        age: AGE.get_or_init(|| Regex::new(r"(?i)^Age\s*[:\-]\s*(\d{1,3})").unwrap()),
        gender: GENDER.get_or_init(|| {
            Regex::new(r"(?i)^(?:Gender|Sex)\s*[:\-]\s*(Male|Female|Third\s*Gender|M|F)\b")
                .unwrap()
        }),
    })
}

fn labels_tam() -> &'static FieldLabels {
    static NAME: OnceLock<Regex> = OnceLock::new();
    static FATHER: OnceLock<Regex> = OnceLock::new();
    static MOTHER: OnceLock<Regex> = OnceLock::new();
    static HUSBAND: OnceLock<Regex> = OnceLock::new();
    static OTHER: OnceLock<Regex> = OnceLock::new();
    static HOUSE: OnceLock<Regex> = OnceLock::new();
    static AGE: OnceLock<Regex> = OnceLock::new();
    static GENDER: OnceLock<Regex> = OnceLock::new();
    static LABELS: OnceLock<FieldLabels> = OnceLock::new();

    LABELS.get_or_init(|| FieldLabels {
        name: NAME.get_or_init(|| Regex::new(r"^பெயர்\s*[:\-]\s*(.+)$").unwrap()),
        father_name: FATHER
            .get_or_init(|| Regex::new(r"^தந்தையின்\s*பெயர்\s*[:\-]\s*(.+)$").unwrap()),
        mother_name: MOTHER
            .get_or_init(|| Regex::new(r"^தாயின்\s*பெயர்\s*[:\-]\s*(.+)$").unwrap()),
        husband_name: HUSBAND
            .get_or_init(|| Regex::new(r"^கணவரின்\s*பெயர்\s*[:\-]\s*(.+)$").unwrap()),
        other_name: OTHER
            .get_or_init(|| Regex::new(r"^(?:மற்றவரின்|உறவினரின்)\s*பெயர்\s*[:\-]\s*(.+)$").unwrap()),
        house_no: HOUSE.get_or_init(|| Regex::new(r"^வீட்டு\s*எண்\s*[:\-]\s*(.+)$").unwrap()),
        age: AGE.get_or_init(|| Regex::new(r"^வயது\s*[:\-]\s*(\d{1,3})").unwrap()),
        gender: GENDER.get_or_init(|| Regex::new(r"^பாலினம்\s*[:\-]\s*(ஆண்|பெண்|மூன்றாம்\s*பாலினம்)").unwrap()),
    })
}

fn first_line_match<'a>(text: &'a str, re: &Regex) -> Option<&'a str> {
    text.lines()
        .map(str::trim)
        .find_map(|line| re.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str()))
}

fn parse_gender(raw: &str) -> Option<Gender> {
    let normalized = raw.trim().to_lowercase();
    match normalized.as_str() {
        "male" | "m" | "ஆண்" => Some(Gender::Male),
        "female" | "f" | "பெண்" => Some(Gender::Female),
        _ if normalized.starts_with("third") || normalized.contains("மூன்றாம்") => {
            Some(Gender::ThirdGender)
        }
        _ => None,
    }
}

/// One cell chunk's parsed voter fields, before coordinates/serial number
/// are attached.
#[derive(Debug, Clone, Default)]
pub struct CellFields {
    pub epic_id: Option<String>,
    pub name: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub husband_name: Option<String>,
    pub other_name: Option<String>,
    pub house_no: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<Gender>,
}

/// Parses one cell's OCR chunk. Every field is optional and parsing never
/// fails — absence simply leaves the field `None`.
#[must_use]
pub fn parse_cell(chunk: &str, language_set: LanguageSet) -> CellFields {
    let labels = match language_set {
        LanguageSet::English => labels_en(),
        LanguageSet::TamilEnglish => labels_tam(),
    };

    let epic_id = epic_id_re().find(chunk).map(|m| m.as_str().to_string());
    let age = first_line_match(chunk, labels.age)
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|&a| (1..=120).contains(&a));
    let gender = first_line_match(chunk, labels.gender).and_then(parse_gender);

    CellFields {
        epic_id,
        name: first_line_match(chunk, labels.name).map(str::trim).map(str::to_string),
        father_name: first_line_match(chunk, labels.father_name).map(str::trim).map(str::to_string),
        mother_name: first_line_match(chunk, labels.mother_name).map(str::trim).map(str::to_string),
        husband_name: first_line_match(chunk, labels.husband_name).map(str::trim).map(str::to_string),
        other_name: first_line_match(chunk, labels.other_name).map(str::trim).map(str::to_string),
        house_no: first_line_match(chunk, labels.house_no).map(str::trim).map(str::to_string),
        age,
        gender,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_english_cell() {
        let chunk = "EPIC No: ABC1234567\nName: RAMASAMY S\nFather's Name: SELVAM\nHouse No: 12\nAge: 45\nGender: Male\n";
        let fields = parse_cell(chunk, LanguageSet::English);
        assert_eq!(fields.epic_id.as_deref(), Some("ABC1234567"));
        assert_eq!(fields.name.as_deref(), Some("RAMASAMY S"));
        assert_eq!(fields.father_name.as_deref(), Some("SELVAM"));
        assert_eq!(fields.house_no.as_deref(), Some("12"));
        assert_eq!(fields.age, Some(45));
        assert_eq!(fields.gender, Some(Gender::Male));
    }

    #[test]
    fn rejects_out_of_range_age() {
        let chunk = "Name: X\nAge: 200\n";
        let fields = parse_cell(chunk, LanguageSet::English);
        assert_eq!(fields.age, None);
    }

    #[test]
    fn missing_fields_are_none() {
        let fields = parse_cell("garbled noise only", LanguageSet::English);
        assert!(fields.name.is_none());
        assert!(fields.epic_id.is_none());
        assert!(fields.gender.is_none());
    }

    #[test]
    fn picks_first_matching_label_line_when_duplicated() {
        let chunk = "Name: FIRST\nName: SECOND\n";
        let fields = parse_cell(chunk, LanguageSet::English);
        assert_eq!(fields.name.as_deref(), Some("FIRST"));
    }

    #[test]
    fn parses_tamil_cell_fields() {
        let chunk = "பெயர்: முருகன்\nதந்தையின் பெயர்: கோவிந்தன்\nவயது: 40\nபாலினம்: ஆண்\n";
        let fields = parse_cell(chunk, LanguageSet::TamilEnglish);
        assert_eq!(fields.name.as_deref(), Some("முருகன்"));
        assert_eq!(fields.father_name.as_deref(), Some("கோவிந்தன்"));
        assert_eq!(fields.age, Some(40));
        assert_eq!(fields.gender, Some(Gender::Male));
    }
}
