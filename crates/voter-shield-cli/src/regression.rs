//! `--regression` mode: when Tesseract is unavailable, short-circuits the
//! whole pipeline and writes a bundled fixture straight through the normal
//! writers, tagged `mode: "regression_fixture_no_tesseract"` in the report
//! (§12). Lets an install be smoke-tested without a working OCR engine.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use voter_shield_common::{utc_now_iso, DocStatus, Gender, VoterRecord};
use voter_shield_runstate::RunState;
use voter_shield_write::{DocumentReport, IntegrityBlock, OutputFormat};

const FIXTURE_DIR: &str = "tests/fixtures";
const FIXTURE_CSV: &str = "expected_final_voter_data.csv";

/// Runs the regression fixture path: reads the bundled CSV and a fixture
/// PDF, writes them through the ordinary per-document/report/combined
/// writers, and records the run as completed. Returns `Ok(())` on success;
/// a missing fixture is a fatal preconditional error, just as in the
/// original (`raise RuntimeError`).
#[allow(clippy::too_many_arguments)]
pub fn run(
    csv_dir: &Path,
    output_format: OutputFormat,
    combined: bool,
    run_id: &str,
    pipeline_version: Option<&str>,
    run_state: &mut RunState,
) -> Result<()> {
    let fixture_dir = Path::new(FIXTURE_DIR);
    let expected_csv = fixture_dir.join(FIXTURE_CSV);
    if !expected_csv.exists() {
        bail!("missing regression fixture: {}", expected_csv.display());
    }

    let pdf_path = first_fixture_pdf(fixture_dir)
        .context("missing regression fixture PDF in tests/fixtures")?;
    let pdf_stem = pdf_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("fixture")
        .to_string();
    let pdf_name = pdf_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("fixture.pdf")
        .to_string();

    let started_at_utc = utc_now_iso();
    let records = read_fixture_records(&expected_csv)?;

    std::fs::create_dir_all(csv_dir)?;
    let report_path = csv_dir.join(format!("{pdf_stem}.report.json"));

    run_state.set_status(&pdf_stem, &pdf_name, DocStatus::InProgress, Some("fixture"))?;
    voter_shield_write::write_document_output(&records, csv_dir, &pdf_stem, output_format)?;
    if combined {
        voter_shield_write::write_combined_output(&records, csv_dir, output_format)?;
    }

    let report = DocumentReport {
        run_id: run_id.to_string(),
        pipeline_version: pipeline_version.map(str::to_string),
        started_at_utc,
        finished_at_utc: utc_now_iso(),
        source_pdf_name: pdf_name.clone(),
        source_pdf_path: pdf_path.display().to_string(),
        doc_id: pdf_stem.clone(),
        dpi: 0,
        ocr_workers: 0,
        pages_total: None,
        extracted_voters: records.len(),
        summary: None,
        integrity: IntegrityBlock::from_split_counts(&[], Vec::new()),
        mode: Some("regression_fixture_no_tesseract".to_string()),
    };
    voter_shield_write::write_report_atomic(&report, &report_path)?;

    run_state.set_metrics(&pdf_stem, &pdf_name, Some(records.len() as u32), None, None, None, None)?;
    run_state.set_status(&pdf_stem, &pdf_name, DocStatus::Completed, Some("done"))?;

    Ok(())
}

fn first_fixture_pdf(fixture_dir: &Path) -> Option<PathBuf> {
    let mut pdfs: Vec<PathBuf> = std::fs::read_dir(fixture_dir)
        .ok()?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("pdf")))
        .collect();
    pdfs.sort();
    pdfs.into_iter().next()
}

fn read_fixture_records(path: &Path) -> Result<Vec<VoterRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("reading regression fixture {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize::<std::collections::HashMap<String, String>>() {
        let row = row?;
        records.push(record_from_row(&row));
    }
    Ok(records)
}

fn record_from_row(row: &std::collections::HashMap<String, String>) -> VoterRecord {
    let get = |k: &str| row.get(k).filter(|v| !v.is_empty()).cloned();
    let gender = get("gender").and_then(|g| match g.to_lowercase().as_str() {
        "male" => Some(Gender::Male),
        "female" => Some(Gender::Female),
        "third-gender" | "third_gender" => Some(Gender::ThirdGender),
        _ => None,
    });

    VoterRecord {
        doc_id: String::new(),
        page_no: 0,
        intra_page_index: 0,
        assembly: get("assembly"),
        part_no: get("part_no").and_then(|v| v.parse().ok()),
        street: get("street"),
        serial_no: get("serial_no").and_then(|v| v.parse().ok()).unwrap_or(0),
        epic_id: get("epic_id"),
        name: get("name"),
        father_name: get("father_name"),
        mother_name: get("mother_name"),
        husband_name: get("husband_name"),
        other_name: get("other_name"),
        house_no: get("house_no"),
        age: get("age").and_then(|v| v.parse().ok()),
        gender,
        total_flags: get("TOTAL_FLAGS").and_then(|v| v.parse().ok()).unwrap_or(0),
        flag_reasons: get("FLAG_REASONS")
            .map(|s| s.split(';').filter(|r| !r.is_empty()).map(str::to_string).collect())
            .unwrap_or_default(),
        explanation_1: get("EXPLANATION_1").unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_fixture_csv_into_voter_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fixture.csv");
        std::fs::write(
            &path,
            "assembly,part_no,street,serial_no,epic_id,name,father_name,mother_name,husband_name,other_name,house_no,age,gender,TOTAL_FLAGS,FLAG_REASONS,EXPLANATION_1\nA,1,B,1,ABC1234567,Name,,,,,10,30,male,0,,\n",
        )
        .unwrap();

        let records = read_fixture_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].serial_no, 1);
        assert_eq!(records[0].gender, Some(Gender::Male));
    }

    #[test]
    fn record_from_row_parses_flag_reasons() {
        let mut row = std::collections::HashMap::new();
        row.insert("FLAG_REASONS".to_string(), "missing_epic_id;missing_age".to_string());
        let record = record_from_row(&row);
        assert_eq!(record.flag_reasons, vec!["missing_epic_id", "missing_age"]);
    }
}
