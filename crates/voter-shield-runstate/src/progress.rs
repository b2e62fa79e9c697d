//! `progress.csv` snapshot: full rewrite after every mutation, sorted by
//! `doc_id`, grounded on `RunState.write_snapshot` / `RunState.load`.
//! Rewritten atomically (write temp + rename) so a crash loses at most the
//! in-flight event (§4.9).

use crate::Result;
use std::collections::HashMap;
use std::path::Path;
use voter_shield_common::{atomic::write_atomic, DocStatus, PdfState};

const FIELDNAMES: &[&str] = &[
    "pdf_stem",
    "pdf_name",
    "status",
    "stage",
    "started_at_utc",
    "finished_at_utc",
    "extracted_voters",
    "total_voters_expected",
    "completeness_ratio",
    "warnings",
    "error",
];

fn opt_str(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

fn opt_num<T: ToString>(v: Option<T>) -> String {
    v.map_or_else(String::new, |n| n.to_string())
}

/// Writes the full progress snapshot for `docs`, sorted by `doc_id`.
pub fn write_snapshot(path: &Path, docs: &HashMap<String, PdfState>) -> Result<()> {
    let mut doc_ids: Vec<&String> = docs.keys().collect();
    doc_ids.sort();

    let mut out = csv::Writer::from_writer(Vec::new());
    out.write_record(FIELDNAMES)?;
    for doc_id in doc_ids {
        let s = &docs[doc_id];
        out.write_record([
            doc_id.as_str(),
            s.pdf_name.as_str(),
            s.status.as_str(),
            opt_str(&s.stage).as_str(),
            opt_str(&s.started_at_utc).as_str(),
            opt_str(&s.finished_at_utc).as_str(),
            opt_num(s.extracted_voters).as_str(),
            opt_num(s.total_voters_expected).as_str(),
            opt_num(s.completeness_ratio).as_str(),
            opt_str(&s.warnings).as_str(),
            opt_str(&s.error).as_str(),
        ])?;
    }
    let bytes = out.into_inner().map_err(|e| {
        voter_shield_common::VoterShieldError::Csv(e.to_string())
    })?;

    write_atomic(path, &bytes)?;
    Ok(())
}

/// Loads a progress snapshot, promoting any `in_progress` row to `pending`
/// (§4.9's resume rule) and treating unparseable numeric fields as absent.
/// Returns an empty map if `path` doesn't exist.
pub fn load_snapshot(path: &Path) -> Result<HashMap<String, PdfState>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut docs = HashMap::new();

    for record in reader.deserialize::<HashMap<String, String>>() {
        let row = record?;
        let get = |k: &str| row.get(k).filter(|v| !v.is_empty()).cloned();

        let doc_id = row.get("pdf_stem").cloned().unwrap_or_default();
        if doc_id.is_empty() {
            continue;
        }

        let mut status = get("status").and_then(|s| DocStatus::parse(&s)).unwrap_or(DocStatus::Pending);
        if status == DocStatus::InProgress {
            status = DocStatus::Pending;
        }

        docs.insert(
            doc_id.clone(),
            PdfState {
                pdf_name: get("pdf_name").unwrap_or(doc_id),
                status,
                stage: get("stage"),
                started_at_utc: get("started_at_utc"),
                finished_at_utc: get("finished_at_utc"),
                extracted_voters: get("extracted_voters").and_then(|v| v.parse().ok()),
                total_voters_expected: get("total_voters_expected").and_then(|v| v.parse().ok()),
                completeness_ratio: get("completeness_ratio").and_then(|v| v.parse().ok()),
                warnings: get("warnings"),
                error: get("error"),
            },
        );
    }

    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trips_a_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.csv");

        let mut docs = HashMap::new();
        let mut state = PdfState::new("test-ENG-001-WI.pdf".into());
        state.status = DocStatus::Completed;
        state.extracted_voters = Some(30);
        docs.insert("test-ENG-001-WI".to_string(), state);

        write_snapshot(&path, &docs).unwrap();
        let loaded = load_snapshot(&path).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["test-ENG-001-WI"].status, DocStatus::Completed);
        assert_eq!(loaded["test-ENG-001-WI"].extracted_voters, Some(30));
    }

    #[test]
    fn in_progress_rows_are_promoted_to_pending_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.csv");

        let mut docs = HashMap::new();
        let mut state = PdfState::new("doc.pdf".into());
        state.status = DocStatus::InProgress;
        docs.insert("doc".to_string(), state);

        write_snapshot(&path, &docs).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded["doc"].status, DocStatus::Pending);
    }

    #[test]
    fn missing_file_yields_empty_map() {
        let dir = tempdir().unwrap();
        let loaded = load_snapshot(&dir.path().join("nope.csv")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn unparseable_numeric_field_is_absent_not_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.csv");
        std::fs::write(
            &path,
            "pdf_stem,pdf_name,status,stage,started_at_utc,finished_at_utc,extracted_voters,total_voters_expected,completeness_ratio,warnings,error\ndoc,doc.pdf,completed,done,,,not-a-number,,,,\n",
        )
        .unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded["doc"].extracted_voters, None);
    }
}
