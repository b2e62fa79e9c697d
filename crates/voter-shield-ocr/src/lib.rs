//! OCR Runner: enumerates OCR jobs for a document, verifies the Tesseract
//! engine and required language packs before any job runs, and executes
//! jobs through a bounded worker pool (owned by `voter-shield-pipeline`),
//! writing one cleaned UTF-8 text file beside each source image.
//!
//! Tesseract is invoked as a subprocess rather than through an FFI binding:
//! the original implementation drives `pytesseract`, which itself shells
//! out to the `tesseract` binary, so `--psm`/`--oem`/`--tessdata-dir` are
//! literal CLI flags here too, and the precondition check below is a
//! direct parse of `tesseract --list-langs` output.

pub mod jobs;
pub mod summary;

pub use jobs::{enumerate_jobs, run_job, OcrJob, OcrJobKind};
pub use summary::parse_summary_totals;

use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("tesseract is not installed or not on PATH (set TESSERACT_CMD to override)")]
    EngineUnavailable,

    #[error("failed to spawn tesseract: {0}")]
    Spawn(String),

    #[error("tesseract failed on {image}: {stderr}")]
    EngineFailed { image: PathBuf, stderr: String },

    #[error("missing Tesseract language data: {0}")]
    MissingLanguage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OcrError>;

/// Per-run OCR context: the engine binary path and tessdata directory,
/// both resolvable from environment variables but threaded explicitly
/// rather than read ad hoc from inside the OCR stage (per the "module-level
/// mutable state becomes a per-run context" redesign guidance).
#[derive(Debug, Clone, Default)]
pub struct OcrContext {
    /// Overrides the `tesseract` binary looked up on `PATH`, from
    /// `TESSERACT_CMD`.
    pub tesseract_cmd: Option<String>,
    /// `--tessdata-dir` passed to every invocation, from `TESSDATA_DIR`.
    pub tessdata_dir: Option<String>,
}

impl OcrContext {
    /// Builds a context from the conventional environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            tesseract_cmd: std::env::var("TESSERACT_CMD").ok().filter(|s| !s.is_empty()),
            tessdata_dir: std::env::var("TESSDATA_DIR")
                .ok()
                .filter(|s| !s.is_empty() && std::path::Path::new(s).exists()),
        }
    }

    #[must_use]
    pub fn tesseract_cmd(&self) -> &str {
        self.tesseract_cmd.as_deref().unwrap_or("tesseract")
    }
}

/// Whether the `tesseract` binary resolves at all, ignoring language packs.
/// Used by `--regression` to decide whether to run the real pipeline or
/// fall back to the bundled fixture.
#[must_use]
pub fn engine_available(ctx: &OcrContext) -> bool {
    ctx.tesseract_cmd.is_some() || which::which("tesseract").is_ok()
}

/// Fatal preconditional check run once before any document is processed:
/// the engine binary must resolve and every language pack required by
/// every job already enumerated for this run must be installed.
pub fn check_preconditions(ctx: &OcrContext, required_packs: &[&str]) -> Result<()> {
    if !engine_available(ctx) {
        return Err(OcrError::EngineUnavailable);
    }

    let installed = installed_languages(ctx)?;
    let missing: Vec<&str> = required_packs
        .iter()
        .filter(|p| !installed.contains(&p.to_string()))
        .copied()
        .collect();

    if !missing.is_empty() {
        warn!(?missing, "required Tesseract language packs not installed");
        return Err(OcrError::MissingLanguage(missing.join(", ")));
    }

    Ok(())
}

fn installed_languages(ctx: &OcrContext) -> Result<Vec<String>> {
    let mut cmd = Command::new(ctx.tesseract_cmd());
    cmd.arg("--list-langs");
    if let Some(dir) = ctx.tessdata_dir.as_deref() {
        cmd.arg("--tessdata-dir").arg(dir);
    }

    let output = cmd.output().map_err(|e| OcrError::Spawn(e.to_string()))?;
    let text = String::from_utf8_lossy(&output.stdout);
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.to_lowercase().starts_with("list of available"))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_from_env_ignores_empty_overrides() {
        std::env::remove_var("TESSERACT_CMD");
        std::env::remove_var("TESSDATA_DIR");
        let ctx = OcrContext::from_env();
        assert_eq!(ctx.tesseract_cmd(), "tesseract");
        assert!(ctx.tessdata_dir.is_none());
    }

    #[test]
    fn tesseract_cmd_defaults_without_override() {
        let ctx = OcrContext::default();
        assert_eq!(ctx.tesseract_cmd(), "tesseract");
    }
}
