//! Pipeline: per-document stage orchestration (render -> crop -> OCR ->
//! extract -> write), the bounded-worker-pool abstraction shared by the
//! cropper and OCR runner, and the configuration record threaded through
//! every stage (§9's "explicit configuration record" / "per-run context"
//! redesign guidance replaces the original's ad hoc option dicts and
//! module-level globals).
//!
//! The multi-document driver loop (discovery, resume skip logic, fetch,
//! combined output, upload, exit-code mapping) lives in `voter-shield-cli`;
//! this crate only knows how to process one document and one task list.

pub mod document;
pub mod pool;

pub use document::process_one_document;
pub use pool::run_bounded;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use voter_shield_common::VoterRecord;
use voter_shield_write::OutputFormat;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Render(#[from] voter_shield_render::RenderError),

    #[error(transparent)]
    Crop(#[from] voter_shield_crop::CropError),

    #[error(transparent)]
    Ocr(#[from] voter_shield_ocr::OcrError),

    #[error(transparent)]
    Extract(#[from] voter_shield_extract::ExtractError),

    #[error(transparent)]
    Write(#[from] voter_shield_write::WriteError),

    #[error(transparent)]
    RunState(#[from] voter_shield_runstate::RunStateError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("background task panicked: {0}")]
    TaskPanicked(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Every directory path, pool size, and run option, constructed once from
/// parsed CLI flags and threaded explicitly through every stage (§9: no
/// string-keyed option bags, no process-wide globals).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub pdf_dir: PathBuf,
    pub jpg_dir: PathBuf,
    pub crops_dir: PathBuf,
    pub ocr_dir: PathBuf,
    pub csv_dir: PathBuf,
    pub state_dir: PathBuf,
    pub dpi: u32,
    pub crop_workers: usize,
    pub ocr_workers: usize,
    pub strict: bool,
    pub combined: bool,
    pub output_format: OutputFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pdf_dir: PathBuf::from("pdf"),
            jpg_dir: PathBuf::from("jpg"),
            crops_dir: PathBuf::from("crops"),
            ocr_dir: PathBuf::from("ocr"),
            csv_dir: PathBuf::from("csv"),
            state_dir: PathBuf::from("runs"),
            dpi: 300,
            crop_workers: 4,
            ocr_workers: 2,
            strict: false,
            combined: true,
            output_format: OutputFormat::Xlsx,
        }
    }
}

impl PipelineConfig {
    /// The directories reset by `--delete-old`: the intermediate work
    /// areas, never `pdf/` (the fetcher's contract) or `runs/` (resume
    /// needs it to survive).
    #[must_use]
    pub fn intermediate_dirs(&self) -> [&Path; 4] {
        [
            self.jpg_dir.as_path(),
            self.crops_dir.as_path(),
            self.ocr_dir.as_path(),
            self.csv_dir.as_path(),
        ]
    }
}

/// The outcome of processing one document, successful path only — failures
/// surface as `Err(PipelineError)` at the call site instead of a variant
/// here, per §9's result-kind discriminator (the driver translates both
/// into run-state transitions).
#[derive(Debug)]
pub enum DocumentOutcome {
    Ok(DocumentSummary),
}

/// Per-document counts the driver needs after processing: to decide
/// strict-mode exit status and to fold into the combined output.
#[derive(Debug, Clone)]
pub struct DocumentSummary {
    pub records: Vec<VoterRecord>,
    pub extracted_voters: usize,
    pub total_voters_expected: Option<u32>,
    pub completeness_ratio: Option<f64>,
    pub incomplete: bool,
}

/// Discovers input PDFs in `pdf_dir`, sorted by file name (lexicographic
/// `doc_id` order is the combined-output order per §5).
#[must_use]
pub fn discover_pdfs(pdf_dir: &Path) -> Vec<PathBuf> {
    let mut pdfs: Vec<PathBuf> = fs::read_dir(pdf_dir)
        .into_iter()
        .flatten()
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    pdfs.sort();
    pdfs
}

/// Resets a directory: removes it recursively and recreates it empty.
/// On a permission error, falls back to best-effort per-file deletion
/// rather than aborting the run (§12's `reset_dir` semantics).
pub fn reset_dir(dir: &Path) -> io::Result<()> {
    if dir.exists() {
        if let Err(_err) = fs::remove_dir_all(dir) {
            best_effort_clear(dir)?;
        }
    }
    fs::create_dir_all(dir)
}

fn best_effort_clear(dir: &Path) -> io::Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(()),
    };
    for entry in entries.filter_map(std::result::Result::ok) {
        let path = entry.path();
        let _ = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discover_pdfs_filters_by_extension_and_sorts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b-ENG-.pdf"), b"x").unwrap();
        fs::write(dir.path().join("a-ENG-.pdf"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let pdfs = discover_pdfs(dir.path());
        let names: Vec<_> = pdfs.iter().map(|p| p.file_name().unwrap().to_str().unwrap()).collect();
        assert_eq!(names, vec!["a-ENG-.pdf", "b-ENG-.pdf"]);
    }

    #[test]
    fn discover_pdfs_on_missing_dir_is_empty() {
        let dir = tempdir().unwrap();
        assert!(discover_pdfs(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn reset_dir_removes_existing_contents() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("work");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("stale.jpg"), b"x").unwrap();

        reset_dir(&target).unwrap();

        assert!(target.exists());
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn reset_dir_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("brand-new");
        reset_dir(&target).unwrap();
        assert!(target.exists());
    }

    #[test]
    fn intermediate_dirs_excludes_pdf_and_state() {
        let cfg = PipelineConfig::default();
        let dirs = cfg.intermediate_dirs();
        assert!(!dirs.contains(&cfg.pdf_dir.as_path()));
        assert!(!dirs.contains(&cfg.state_dir.as_path()));
        assert!(dirs.contains(&cfg.jpg_dir.as_path()));
        assert!(dirs.contains(&cfg.csv_dir.as_path()));
    }
}
