//! Job enumeration and invocation for the Tesseract OCR stage.
//!
//! Jobs are built in a fixed order — stacked voter crops, header strips,
//! cover pages, summary page — mirroring `ocr_images_for_pdf` in the
//! original implementation. Each job is run by shelling out to the
//! `tesseract` binary, exactly as the original's `pytesseract` wrapper
//! does under the hood, so `--psm`/`--oem`/`--tessdata-dir` map directly
//! onto real CLI flags rather than a guessed library binding.

use crate::{OcrContext, OcrError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use voter_shield_common::LanguageSet;

/// Which of the four OCR job classes a job belongs to, in enumeration
/// order (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrJobKind {
    StackedCrop,
    HeaderStrip,
    Cover,
    Summary,
}

impl OcrJobKind {
    /// Tesseract `--psm` value used for this job class.
    #[must_use]
    pub fn psm(self) -> u8 {
        6
    }

    /// Tesseract `--oem` value, or `None` when the flag is omitted
    /// (header strips use Tesseract's default engine mode).
    #[must_use]
    pub fn oem(self) -> Option<u8> {
        match self {
            OcrJobKind::HeaderStrip => None,
            _ => Some(1),
        }
    }
}

/// One image -> text OCR job.
#[derive(Debug, Clone)]
pub struct OcrJob {
    pub kind: OcrJobKind,
    pub image_path: PathBuf,
    pub text_path: PathBuf,
    pub language_set: LanguageSet,
}

/// Builds the full job list for one document: stacked crops, header
/// strips, cover pages, then the summary page, each sorted lexicographically
/// within its class (page numbers are zero-padded, so lexicographic order
/// equals page order).
#[must_use]
pub fn enumerate_jobs(
    jpg_dir: &Path,
    crops_dir: &Path,
    ocr_dir: &Path,
    language_set: LanguageSet,
) -> Vec<OcrJob> {
    let mut jobs = Vec::new();

    for path in sorted_matching(crops_dir, |name| name.ends_with("_stacked_crops.jpg")) {
        let text_path = ocr_dir.join(
            file_stem_name(&path).replace("_stacked_crops.jpg", "_stacked_ocr.txt"),
        );
        jobs.push(OcrJob {
            kind: OcrJobKind::StackedCrop,
            image_path: path,
            text_path,
            language_set,
        });
    }

    for path in sorted_matching(crops_dir, |name| {
        name.ends_with("_street.jpg") || name.ends_with("_street.png")
    }) {
        let stem = file_stem_name(&path);
        let text_path = ocr_dir.join(
            stem.replace("_street.png", "_street.txt")
                .replace("_street.jpg", "_street.txt"),
        );
        jobs.push(OcrJob {
            kind: OcrJobKind::HeaderStrip,
            image_path: path,
            text_path,
            language_set,
        });
    }

    for path in sorted_matching(jpg_dir, |name| name.contains("_cover_") && name.ends_with(".jpg")) {
        let text_path = ocr_dir.join(file_stem_name(&path).replace(".jpg", "_ocr.txt"));
        jobs.push(OcrJob {
            kind: OcrJobKind::Cover,
            image_path: path,
            text_path,
            language_set,
        });
    }

    for path in sorted_matching(jpg_dir, |name| name.ends_with("_summary.jpg")) {
        let text_path = ocr_dir.join(file_stem_name(&path).replace(".jpg", "_ocr.txt"));
        jobs.push(OcrJob {
            kind: OcrJobKind::Summary,
            image_path: path,
            text_path,
            language_set,
        });
    }

    jobs
}

fn file_stem_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

fn sorted_matching(dir: &Path, predicate: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    let mut matches: Vec<PathBuf> = fs::read_dir(dir)
        .into_iter()
        .flatten()
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| predicate(&n.to_lowercase()))
                .unwrap_or(false)
        })
        .collect();
    matches.sort();
    matches
}

/// Runs one OCR job: invokes `tesseract` on `job.image_path`, cleans the
/// resulting text (trimmed, non-empty lines joined by `\n`), writes it to
/// `job.text_path`, and returns the cleaned text.
pub fn run_job(ctx: &OcrContext, job: &OcrJob) -> Result<String> {
    if let Some(parent) = job.text_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let out_stem = job.text_path.with_extension("");
    let mut cmd = Command::new(ctx.tesseract_cmd());
    cmd.arg(&job.image_path)
        .arg(&out_stem)
        .arg("-l")
        .arg(job.language_set.tesseract_code())
        .arg("--psm")
        .arg(job.kind.psm().to_string());

    if let Some(oem) = job.kind.oem() {
        cmd.arg("--oem").arg(oem.to_string());
    }
    if let Some(tessdata_dir) = ctx.tessdata_dir.as_deref() {
        cmd.arg("--tessdata-dir").arg(tessdata_dir);
    }

    let output = cmd.output().map_err(|e| OcrError::Spawn(e.to_string()))?;
    if !output.status.success() {
        return Err(OcrError::EngineFailed {
            image: job.image_path.clone(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let raw = fs::read_to_string(&job.text_path).unwrap_or_default();
    let cleaned = clean_ocr_text(&raw);
    fs::write(&job.text_path, &cleaned)?;
    Ok(cleaned)
}

/// Trims every line and drops blank ones, joining what remains with `\n` —
/// the exact transform `extract_text_from_image_path` applies in the
/// original before writing the per-image text file.
#[must_use]
pub fn clean_ocr_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn enumerate_jobs_orders_by_class_then_name() {
        let jpg = tempdir().unwrap();
        let crops = tempdir().unwrap();
        let ocr = tempdir().unwrap();

        touch(crops.path(), "doc_page_02_stacked_crops.jpg");
        touch(crops.path(), "doc_page_01_stacked_crops.jpg");
        touch(crops.path(), "doc_page_01_street.jpg");
        touch(jpg.path(), "doc_cover_01.jpg");
        touch(jpg.path(), "doc_summary.jpg");

        let jobs = enumerate_jobs(jpg.path(), crops.path(), ocr.path(), LanguageSet::English);
        let kinds: Vec<OcrJobKind> = jobs.iter().map(|j| j.kind).collect();
        assert_eq!(
            kinds,
            vec![
                OcrJobKind::StackedCrop,
                OcrJobKind::StackedCrop,
                OcrJobKind::HeaderStrip,
                OcrJobKind::Cover,
                OcrJobKind::Summary,
            ]
        );
        // stacked crops sorted lexicographically (zero-padded -> page order).
        assert!(jobs[0].image_path.to_string_lossy().contains("page_01"));
        assert!(jobs[1].image_path.to_string_lossy().contains("page_02"));
    }

    #[test]
    fn stacked_crop_and_cover_use_oem_one_header_strip_does_not() {
        assert_eq!(OcrJobKind::StackedCrop.oem(), Some(1));
        assert_eq!(OcrJobKind::Cover.oem(), Some(1));
        assert_eq!(OcrJobKind::Summary.oem(), Some(1));
        assert_eq!(OcrJobKind::HeaderStrip.oem(), None);
    }

    #[test]
    fn clean_ocr_text_drops_blank_lines_and_trims() {
        let raw = "  Hello  \n\n   \nWorld\n";
        assert_eq!(clean_ocr_text(raw), "Hello\nWorld");
    }

    #[test]
    fn text_path_for_stacked_crop_replaces_suffix() {
        let jpg = tempdir().unwrap();
        let crops = tempdir().unwrap();
        let ocr = tempdir().unwrap();
        touch(crops.path(), "mydoc_page_01_stacked_crops.jpg");

        let jobs = enumerate_jobs(jpg.path(), crops.path(), ocr.path(), LanguageSet::English);
        assert_eq!(
            jobs[0].text_path.file_name().unwrap().to_str().unwrap(),
            "mydoc_page_01_stacked_ocr.txt"
        );
    }
}
