//! Shared types for the voter-shield pipeline: the data model, the
//! filename-derived language classifier, the shared error type, and the
//! atomic-write helper used by every stage that persists output.

pub mod atomic;
pub mod language;
pub mod model;

pub use language::LanguageSet;
pub use model::{
    CellId, DocStatus, Document, Gender, LowSplitPage, Page, PageClass, PageHeader, PdfState, Run,
    SummaryTotals, VoterRecord,
};

use thiserror::Error;

/// Errors shared across pipeline stages. Stage-specific crates define their
/// own error enums and convert into this one at their public boundary where
/// a caller needs a single type.
#[derive(Error, Debug)]
pub enum VoterShieldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(String),

    #[error("(de)serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, VoterShieldError>;

/// Current UTC time as an RFC 3339 string, the timestamp format used
/// throughout run-state events and reports.
#[must_use]
pub fn utc_now_iso() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Best-effort `git rev-parse HEAD`, used to stamp `pipeline_version` in
/// every report. Returns `None` rather than failing the run when not in a
/// git checkout or `git` is unavailable.
#[must_use]
pub fn pipeline_version() -> Option<String> {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_now_iso_is_rfc3339() {
        let ts = utc_now_iso();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
