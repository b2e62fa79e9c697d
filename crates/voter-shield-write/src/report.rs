//! Per-document `report.json`, grounded on the report literal assembled in
//! `main.py` and written atomically via `write_report_json_atomic`.

use crate::{Result, WriteError};
use serde::Serialize;
use std::path::Path;
use voter_shield_common::{atomic::write_atomic, LowSplitPage, SummaryTotals};

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityBlock {
    pub marker_splits_total: Option<usize>,
    pub marker_splits_min_page: Option<usize>,
    pub marker_splits_failed_pages: Vec<LowSplitPage>,
}

impl IntegrityBlock {
    #[must_use]
    pub fn from_split_counts(split_counts: &[usize], failed_pages: Vec<LowSplitPage>) -> Self {
        Self {
            marker_splits_total: (!split_counts.is_empty()).then(|| split_counts.iter().sum()),
            marker_splits_min_page: split_counts.iter().min().copied(),
            marker_splits_failed_pages: failed_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub run_id: String,
    pub pipeline_version: Option<String>,
    pub started_at_utc: String,
    pub finished_at_utc: String,
    pub source_pdf_name: String,
    pub source_pdf_path: String,
    pub doc_id: String,
    pub dpi: u32,
    pub ocr_workers: usize,
    pub pages_total: Option<u32>,
    pub extracted_voters: usize,
    pub summary: Option<SummaryTotals>,
    pub integrity: IntegrityBlock,
    /// Set to `"regression_fixture_no_tesseract"` when `--regression` ran
    /// without a usable Tesseract install; absent otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Writes the per-document report atomically as pretty-printed JSON with a
/// trailing newline, matching the original's `json.dump(..., indent=2)` +
/// explicit `"\n"`.
pub fn write_report_atomic(report: &DocumentReport, path: &Path) -> Result<()> {
    let mut json = serde_json::to_string_pretty(report).map_err(WriteError::Json)?;
    json.push('\n');
    write_atomic(path, json.as_bytes()).map_err(WriteError::Common)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_report() -> DocumentReport {
        DocumentReport {
            run_id: "run1".into(),
            pipeline_version: None,
            started_at_utc: "2026-01-01T00:00:00+00:00".into(),
            finished_at_utc: "2026-01-01T00:01:00+00:00".into(),
            source_pdf_name: "test-ENG-001-WI.pdf".into(),
            source_pdf_path: "pdf/test-ENG-001-WI.pdf".into(),
            doc_id: "test-ENG-001-WI".into(),
            dpi: 300,
            ocr_workers: 2,
            pages_total: Some(1),
            extracted_voters: 30,
            summary: None,
            integrity: IntegrityBlock::from_split_counts(&[30], Vec::new()),
            mode: None,
        }
    }

    #[test]
    fn writes_pretty_json_with_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.report.json");
        write_report_atomic(&sample_report(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with('\n'));
        assert!(contents.contains("\"extracted_voters\": 30"));
    }

    #[test]
    fn integrity_block_computes_total_and_min_from_split_counts() {
        let block = IntegrityBlock::from_split_counts(&[30, 30, 18], Vec::new());
        assert_eq!(block.marker_splits_total, Some(78));
        assert_eq!(block.marker_splits_min_page, Some(18));
    }

    #[test]
    fn integrity_block_is_none_for_no_pages() {
        let block = IntegrityBlock::from_split_counts(&[], Vec::new());
        assert_eq!(block.marker_splits_total, None);
        assert_eq!(block.marker_splits_min_page, None);
    }
}
