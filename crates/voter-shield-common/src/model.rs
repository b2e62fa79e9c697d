//! Shared data model: documents, pages, cells, voter records, run state.

use crate::language::LanguageSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One input PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: String,
    pub source_path: String,
    pub language_set: LanguageSet,
}

/// Classification of a single page within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageClass {
    Cover,
    VoterGrid,
    Summary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub doc_id: String,
    pub page_no: u32,
    pub class: PageClass,
}

/// One of the 30 voter-record regions on a voter-grid page, row-major
/// (10 rows x 3 columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellId {
    pub page_no: u32,
    pub row: u32,
    pub col: u32,
}

impl CellId {
    /// 1-based intra-page index in row-major order, matching the order
    /// voter cells are stacked into the tall crop image.
    #[must_use]
    pub fn intra_page_index(self) -> u32 {
        self.row * 3 + self.col + 1
    }
}

/// The top strip of a voter-grid page: assembly / part number / street.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageHeader {
    pub assembly: Option<String>,
    pub part_no: Option<i64>,
    pub street: Option<String>,
}

/// Best-effort counts parsed from a document's summary page. Any field may
/// be absent; parsing never fails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryTotals {
    pub total_male: Option<u32>,
    pub total_female: Option<u32>,
    pub total_third_gender: Option<u32>,
    pub total_voters_expected: Option<u32>,
}

/// Normalized gender value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    ThirdGender,
}

/// One extracted voter row, keyed to `(doc_id, serial_no)` once assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoterRecord {
    pub doc_id: String,
    pub page_no: u32,
    /// 1-based intra-page order, used only to order records within a page
    /// before serial-number assignment.
    pub intra_page_index: u32,

    pub assembly: Option<String>,
    pub part_no: Option<i64>,
    pub street: Option<String>,

    /// Assigned during serial-number assignment; 0 until then.
    pub serial_no: u32,

    pub epic_id: Option<String>,
    pub name: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub husband_name: Option<String>,
    pub other_name: Option<String>,
    pub house_no: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<Gender>,

    pub total_flags: u32,
    pub flag_reasons: Vec<String>,
    pub explanation_1: String,
}

impl VoterRecord {
    /// Emit the record as an ordered map of column name -> scalar value,
    /// for CSV/XLSX writing, using the fixed preferred column order
    /// followed by nothing else (every field here is already named).
    #[must_use]
    pub fn to_columns(&self) -> Vec<(&'static str, String)> {
        vec![
            ("assembly", opt_str(&self.assembly)),
            ("part_no", opt_num(self.part_no)),
            ("street", opt_str(&self.street)),
            ("serial_no", self.serial_no.to_string()),
            ("epic_id", opt_str(&self.epic_id)),
            ("name", opt_str(&self.name)),
            ("father_name", opt_str(&self.father_name)),
            ("mother_name", opt_str(&self.mother_name)),
            ("husband_name", opt_str(&self.husband_name)),
            ("other_name", opt_str(&self.other_name)),
            ("house_no", opt_str(&self.house_no)),
            ("age", opt_num(self.age)),
            ("gender", gender_str(self.gender)),
            ("TOTAL_FLAGS", self.total_flags.to_string()),
            ("FLAG_REASONS", self.flag_reasons.join(";")),
            ("EXPLANATION_1", self.explanation_1.clone()),
        ]
    }

    /// The fixed column order itself, independent of any record instance.
    #[must_use]
    pub fn column_order() -> &'static [&'static str] {
        &[
            "assembly",
            "part_no",
            "street",
            "serial_no",
            "epic_id",
            "name",
            "father_name",
            "mother_name",
            "husband_name",
            "other_name",
            "house_no",
            "age",
            "gender",
            "TOTAL_FLAGS",
            "FLAG_REASONS",
            "EXPLANATION_1",
        ]
    }
}

fn opt_str(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

fn opt_num(v: Option<i64>) -> String {
    v.map_or_else(String::new, |n| n.to_string())
}

fn gender_str(g: Option<Gender>) -> String {
    match g {
        Some(Gender::Male) => "male".to_string(),
        Some(Gender::Female) => "female".to_string(),
        Some(Gender::ThirdGender) => "third-gender".to_string(),
        None => String::new(),
    }
}

/// Per-document lifecycle status, persisted in the run-state ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Incomplete,
}

impl DocStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DocStatus::Pending => "pending",
            DocStatus::InProgress => "in_progress",
            DocStatus::Completed => "completed",
            DocStatus::Failed => "failed",
            DocStatus::Incomplete => "incomplete",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(DocStatus::Pending),
            "in_progress" => Some(DocStatus::InProgress),
            "completed" => Some(DocStatus::Completed),
            "failed" => Some(DocStatus::Failed),
            "incomplete" => Some(DocStatus::Incomplete),
            _ => None,
        }
    }
}

/// Per-document state tracked in the run ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfState {
    pub pdf_name: String,
    pub status: DocStatus,
    pub stage: Option<String>,
    pub started_at_utc: Option<String>,
    pub finished_at_utc: Option<String>,
    pub extracted_voters: Option<u32>,
    pub total_voters_expected: Option<u32>,
    pub completeness_ratio: Option<f64>,
    pub warnings: Option<String>,
    pub error: Option<String>,
}

impl PdfState {
    #[must_use]
    pub fn new(pdf_name: String) -> Self {
        Self {
            pdf_name,
            status: DocStatus::Pending,
            stage: None,
            started_at_utc: None,
            finished_at_utc: None,
            extracted_voters: None,
            total_voters_expected: None,
            completeness_ratio: None,
            warnings: None,
            error: None,
        }
    }
}

/// One pipeline execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub run_id: String,
    pub pipeline_version: Option<String>,
    pub started_at_utc: String,
    pub docs: HashMap<String, PdfState>,
}

/// A single low-split integrity event for a voter-grid page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowSplitPage {
    pub page_no: u32,
    pub source_image: String,
    pub marker_splits: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intra_page_index_is_row_major_one_based() {
        assert_eq!(CellId { page_no: 1, row: 0, col: 0 }.intra_page_index(), 1);
        assert_eq!(CellId { page_no: 1, row: 0, col: 2 }.intra_page_index(), 3);
        assert_eq!(CellId { page_no: 1, row: 9, col: 2 }.intra_page_index(), 30);
    }

    #[test]
    fn to_columns_matches_column_order() {
        let record = VoterRecord {
            doc_id: "doc".into(),
            serial_no: 1,
            name: Some("A".into()),
            total_flags: 0,
            ..Default::default()
        };
        let columns = record.to_columns();
        let names: Vec<&str> = columns.iter().map(|(k, _)| *k).collect();
        assert_eq!(names, VoterRecord::column_order());
    }

    #[test]
    fn doc_status_roundtrips_through_str() {
        for s in ["pending", "in_progress", "completed", "failed", "incomplete"] {
            assert_eq!(DocStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(DocStatus::parse("bogus").is_none());
    }
}
