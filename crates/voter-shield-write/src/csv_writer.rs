//! Per-document and combined CSV writing, grounded on `write_pdf_csv_atomic`
//! / `write_final_csv` in the original implementation.

use crate::{Result, WriteError};
use std::path::Path;
use voter_shield_common::{atomic::write_atomic_with, VoterRecord};

/// Writes `records` as CSV to `path` atomically. Column order is the fixed
/// preferred order (`VoterRecord::column_order`) — our typed record has no
/// dynamic extra keys, so there is nothing further to append alphabetically.
pub fn write_csv_atomic(records: &[VoterRecord], path: &Path) -> Result<()> {
    write_atomic_with(path, |tmp_path| {
        let mut writer = csv::Writer::from_path(tmp_path)
            .map_err(|e| voter_shield_common::VoterShieldError::Csv(e.to_string()))?;

        writer
            .write_record(VoterRecord::column_order())
            .map_err(|e| voter_shield_common::VoterShieldError::Csv(e.to_string()))?;

        for record in records {
            let row: Vec<String> = record.to_columns().into_iter().map(|(_, v)| v).collect();
            writer
                .write_record(&row)
                .map_err(|e| voter_shield_common::VoterShieldError::Csv(e.to_string()))?;
        }

        writer
            .flush()
            .map_err(voter_shield_common::VoterShieldError::Io)
    })
    .map_err(WriteError::Common)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use voter_shield_common::Gender;

    #[test]
    fn writes_header_then_rows_in_fixed_column_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.csv");
        let record = VoterRecord {
            doc_id: "doc".into(),
            serial_no: 1,
            name: Some("RAMASAMY".into()),
            gender: Some(Gender::Male),
            ..Default::default()
        };
        write_csv_atomic(&[record], &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next().unwrap(), "assembly,part_no,street,serial_no,epic_id,name,father_name,mother_name,husband_name,other_name,house_no,age,gender,TOTAL_FLAGS,FLAG_REASONS,EXPLANATION_1");
        assert!(lines.next().unwrap().contains("RAMASAMY"));
    }

    #[test]
    fn writes_empty_csv_with_only_header_for_no_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv_atomic(&[], &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }
}
