//! Quality-flag annotation, grounded on `quality_flags.py`.

use voter_shield_common::VoterRecord;

const CHECKED_FIELDS: &[(&str, fn(&VoterRecord) -> bool)] = &[
    ("missing_epic_id", |r| is_missing(&r.epic_id)),
    ("missing_name", |r| is_missing(&r.name)),
    ("missing_house_no", |r| is_missing(&r.house_no)),
    ("missing_age", |r| r.age.is_none()),
    ("missing_gender", |r| r.gender.is_none()),
];

fn is_missing(v: &Option<String>) -> bool {
    v.as_deref().map(str::trim).map_or(true, str::is_empty)
}

/// Sets `total_flags`, `flag_reasons`, and `explanation_1` on one record
/// from the emptiness of exactly `epic_id`, `name`, `house_no`, `age`,
/// `gender` (§4.7).
pub fn flag_record(record: &mut VoterRecord) {
    let reasons: Vec<String> = CHECKED_FIELDS
        .iter()
        .filter(|(_, check)| check(record))
        .map(|(reason, _)| reason.to_string())
        .collect();

    record.total_flags = reasons.len() as u32;
    record.explanation_1 = if reasons.is_empty() {
        String::new()
    } else {
        let fields: Vec<&str> = reasons.iter().map(|r| r.trim_start_matches("missing_")).collect();
        format!("Missing: {}", fields.join(", "))
    };
    record.flag_reasons = reasons;
}

/// Annotates every record in place.
pub fn add_quality_flags(records: &mut [VoterRecord]) {
    for record in records {
        flag_record(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_all_five_missing_fields() {
        let mut record = VoterRecord::default();
        flag_record(&mut record);
        assert_eq!(record.total_flags, 5);
        assert_eq!(
            record.flag_reasons,
            vec![
                "missing_epic_id",
                "missing_name",
                "missing_house_no",
                "missing_age",
                "missing_gender"
            ]
        );
        assert_eq!(
            record.explanation_1,
            "Missing: epic_id, name, house_no, age, gender"
        );
    }

    #[test]
    fn no_flags_when_all_five_present() {
        let mut record = VoterRecord {
            epic_id: Some("ABC1234567".into()),
            name: Some("X".into()),
            house_no: Some("1".into()),
            age: Some(30),
            gender: Some(voter_shield_common::Gender::Male),
            ..Default::default()
        };
        flag_record(&mut record);
        assert_eq!(record.total_flags, 0);
        assert!(record.flag_reasons.is_empty());
        assert_eq!(record.explanation_1, "");
    }

    #[test]
    fn father_name_does_not_affect_flags() {
        let mut record = VoterRecord {
            epic_id: Some("ABC1234567".into()),
            name: Some("X".into()),
            house_no: Some("1".into()),
            age: Some(30),
            gender: Some(voter_shield_common::Gender::Male),
            father_name: None,
            ..Default::default()
        };
        flag_record(&mut record);
        assert_eq!(record.total_flags, 0);
    }

    #[test]
    fn total_flags_equals_reason_count() {
        let mut record = VoterRecord {
            name: Some("X".into()),
            ..Default::default()
        };
        flag_record(&mut record);
        assert_eq!(record.total_flags as usize, record.flag_reasons.len());
    }
}
