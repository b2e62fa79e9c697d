//! Run State: a durable, resumable per-document status ledger.
//!
//! Two files live inside `runs/<run_id>/`: `progress.csv`, a full snapshot
//! rewritten atomically after every mutation, and `events.jsonl`, an
//! append-only audit log. Grounded on `RunState` in the original
//! implementation.

pub mod event;
pub mod progress;

use event::{append_event, MetricsEventFields, StatusEventFields};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;
use voter_shield_common::{utc_now_iso, DocStatus, PdfState};

#[derive(Error, Debug)]
pub enum RunStateError {
    #[error(transparent)]
    Common(#[from] voter_shield_common::VoterShieldError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, RunStateError>;

/// Generates a run id in the original's `<timestamp>_<random-suffix>`
/// shape.
#[must_use]
pub fn generate_run_id() -> String {
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{stamp}_{}", &suffix[..8])
}

/// The durable per-run status ledger.
pub struct RunState {
    pub run_id: String,
    pub root_dir: PathBuf,
    pub docs: HashMap<String, PdfState>,
}

impl RunState {
    /// Starts a fresh run: creates `<root_dir>/<run_id>/` and returns an
    /// empty ledger.
    pub fn new(run_id: String, root_dir: PathBuf) -> Result<Self> {
        let state = Self { run_id, root_dir, docs: HashMap::new() };
        std::fs::create_dir_all(state.run_dir())?;
        Ok(state)
    }

    /// Loads an existing run's `progress.csv`, if any, promoting any
    /// `in_progress` row back to `pending` (§4.9).
    pub fn load(run_id: String, root_dir: PathBuf) -> Result<Self> {
        let mut state = Self::new(run_id, root_dir)?;
        state.docs = progress::load_snapshot(&state.progress_path())?;
        Ok(state)
    }

    #[must_use]
    pub fn run_dir(&self) -> PathBuf {
        self.root_dir.join(&self.run_id)
    }

    #[must_use]
    pub fn events_path(&self) -> PathBuf {
        self.run_dir().join("events.jsonl")
    }

    #[must_use]
    pub fn progress_path(&self) -> PathBuf {
        self.run_dir().join("progress.csv")
    }

    fn upsert(&mut self, doc_id: &str, pdf_name: &str) -> &mut PdfState {
        self.docs
            .entry(doc_id.to_string())
            .or_insert_with(|| PdfState::new(pdf_name.to_string()))
    }

    /// Records a status transition, logs the event, and rewrites the
    /// snapshot.
    pub fn set_status(
        &mut self,
        doc_id: &str,
        pdf_name: &str,
        status: DocStatus,
        stage: Option<&str>,
    ) -> Result<()> {
        {
            let s = self.upsert(doc_id, pdf_name);
            if status == DocStatus::InProgress && s.started_at_utc.is_none() {
                s.started_at_utc = Some(utc_now_iso());
            }
            if matches!(status, DocStatus::Completed | DocStatus::Failed | DocStatus::Incomplete) {
                s.finished_at_utc = Some(utc_now_iso());
            }
            s.status = status;
            if let Some(stage) = stage {
                s.stage = Some(stage.to_string());
            }
        }

        append_event(
            &self.events_path(),
            "status",
            doc_id,
            StatusEventFields { status: status.as_str(), stage },
        )?;
        self.write_snapshot()
    }

    /// Records metric updates (only `Some` fields overwrite), logs the
    /// event, and rewrites the snapshot.
    #[allow(clippy::too_many_arguments)]
    pub fn set_metrics(
        &mut self,
        doc_id: &str,
        pdf_name: &str,
        extracted_voters: Option<u32>,
        total_voters_expected: Option<u32>,
        completeness_ratio: Option<f64>,
        warnings: Option<String>,
        error: Option<String>,
    ) -> Result<()> {
        {
            let s = self.upsert(doc_id, pdf_name);
            if extracted_voters.is_some() {
                s.extracted_voters = extracted_voters;
            }
            if total_voters_expected.is_some() {
                s.total_voters_expected = total_voters_expected;
            }
            if completeness_ratio.is_some() {
                s.completeness_ratio = completeness_ratio;
            }
            if warnings.is_some() {
                s.warnings = warnings.clone();
            }
            if error.is_some() {
                s.error = error.clone();
            }
        }

        append_event(
            &self.events_path(),
            "metrics",
            doc_id,
            MetricsEventFields {
                extracted_voters,
                total_voters_expected,
                completeness_ratio,
                warnings,
                error,
            },
        )?;
        self.write_snapshot()
    }

    pub fn write_snapshot(&self) -> Result<()> {
        progress::write_snapshot(&self.progress_path(), &self.docs)
    }

    /// Whether `doc_id` should be skipped on resume: `completed` in the
    /// ledger and its per-document output file still exists.
    #[must_use]
    pub fn is_already_completed(&self, doc_id: &str, output_path: &Path) -> bool {
        self.docs
            .get(doc_id)
            .is_some_and(|s| s.status == DocStatus::Completed)
            && output_path.exists()
    }
}
