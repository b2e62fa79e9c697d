//! Writer: emits per-document CSV/XLSX and `report.json`, plus an optional
//! combined output across all documents in a run.

pub mod csv_writer;
pub mod report;
pub mod xlsx_writer;

pub use csv_writer::write_csv_atomic;
pub use report::{DocumentReport, IntegrityBlock, write_report_atomic};
pub use xlsx_writer::write_xlsx_atomic;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use voter_shield_common::VoterRecord;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error(transparent)]
    Common(#[from] voter_shield_common::VoterShieldError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WriteError>;

/// Output format selector, mirroring the CLI's `--output-format` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Xlsx,
}

impl OutputFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
        }
    }
}

/// Writes `records` to `dir/<doc_id>.<ext>` in the given format.
pub fn write_document_output(
    records: &[VoterRecord],
    dir: &Path,
    doc_id: &str,
    format: OutputFormat,
) -> Result<()> {
    let path = dir.join(format!("{doc_id}.{}", format.extension()));
    match format {
        OutputFormat::Csv => write_csv_atomic(records, &path),
        OutputFormat::Xlsx => write_xlsx_atomic(records, &path),
    }
}

/// Writes the combined `final_voter_data.<ext>` across all processed
/// documents in a run.
pub fn write_combined_output(records: &[VoterRecord], dir: &Path, format: OutputFormat) -> Result<()> {
    let path = dir.join(format!("final_voter_data.{}", format.extension()));
    match format {
        OutputFormat::Csv => write_csv_atomic(records, &path),
        OutputFormat::Xlsx => write_xlsx_atomic(records, &path),
    }
}
