//! Append-only event log, grounded on `RunState.log_event` in the original
//! implementation: one JSON object per line, `{ts_utc, event, pdf_stem,
//! ...fields}`, opened in append mode so a crash loses at most the
//! in-flight event.

use crate::Result;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use voter_shield_common::utc_now_iso;

#[derive(Serialize)]
struct EventEnvelope<'a, T: Serialize> {
    ts_utc: String,
    event: &'static str,
    pdf_stem: &'a str,
    #[serde(flatten)]
    fields: T,
}

#[derive(Serialize)]
pub struct StatusEventFields<'a> {
    pub status: &'a str,
    pub stage: Option<&'a str>,
}

#[derive(Serialize, Default)]
pub struct MetricsEventFields {
    pub extracted_voters: Option<u32>,
    pub total_voters_expected: Option<u32>,
    pub completeness_ratio: Option<f64>,
    pub warnings: Option<String>,
    pub error: Option<String>,
}

pub fn append_event<T: Serialize>(
    events_path: &Path,
    event: &'static str,
    pdf_stem: &str,
    fields: T,
) -> Result<()> {
    let envelope = EventEnvelope { ts_utc: utc_now_iso(), event, pdf_stem, fields };
    let line = serde_json::to_string(&envelope)?;

    if let Some(parent) = events_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(events_path)?;
    writeln!(file, "{line}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn appends_one_json_line_per_event() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        append_event(&path, "status", "doc1", StatusEventFields { status: "pending", stage: None }).unwrap();
        append_event(&path, "status", "doc1", StatusEventFields { status: "in_progress", stage: Some("convert") }).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.lines().next().unwrap().contains("\"event\":\"status\""));
    }
}
