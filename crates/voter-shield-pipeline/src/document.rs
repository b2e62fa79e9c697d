//! Per-document stage orchestration: render → crop → OCR → extract → write,
//! with run-state transitions recorded between stages and low-split pages
//! snapshotted into the run's debug area. The Rust counterpart of the
//! per-PDF loop body in the original implementation's driver.

use crate::pool::run_bounded;
use crate::{DocumentOutcome, DocumentSummary, PipelineConfig, PipelineError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use voter_shield_common::{utc_now_iso, DocStatus, LanguageSet, LowSplitPage, SummaryTotals};
use voter_shield_crop::PageCropOutput;
use voter_shield_ocr::OcrContext;
use voter_shield_render::ConversionInfo;
use voter_shield_runstate::RunState;
use voter_shield_write::{DocumentReport, IntegrityBlock};

/// Processes one document end to end, recording every status transition on
/// `run_state` as it goes. Errors returned here are caught by the caller and
/// translated into a `failed` status; they never abort the run.
#[allow(clippy::too_many_arguments)]
pub async fn process_one_document(
    cfg: &PipelineConfig,
    ocr_ctx: &OcrContext,
    pdf_path: &Path,
    doc_id: &str,
    pdf_name: &str,
    run_state: &mut RunState,
    run_id: &str,
    pipeline_version: Option<&str>,
) -> Result<DocumentOutcome, PipelineError> {
    let started_at_utc = utc_now_iso();
    run_state.set_status(doc_id, pdf_name, DocStatus::InProgress, Some("convert"))?;

    let jpg_dir = cfg.jpg_dir.join(doc_id);
    let crops_dir = cfg.crops_dir.join(doc_id);
    let ocr_dir = cfg.ocr_dir.join(doc_id);
    for dir in [&jpg_dir, &crops_dir, &ocr_dir] {
        fs::create_dir_all(dir)?;
    }

    let conversion = render_stage(pdf_path.to_path_buf(), jpg_dir.clone(), cfg.dpi).await?;

    run_state.set_status(doc_id, pdf_name, DocStatus::InProgress, Some("crop"))?;
    crop_stage(&conversion, &crops_dir, doc_id, cfg.crop_workers).await?;

    run_state.set_status(doc_id, pdf_name, DocStatus::InProgress, Some("ocr"))?;
    ocr_stage(
        ocr_ctx,
        &jpg_dir,
        &crops_dir,
        &ocr_dir,
        conversion.language_set,
        cfg.ocr_workers,
    )
    .await?;

    run_state.set_status(doc_id, pdf_name, DocStatus::InProgress, Some("extract"))?;
    let extracted = voter_shield_extract::extract_document(&ocr_dir, doc_id, conversion.language_set)?;

    snapshot_low_split_debug(
        &cfg.state_dir,
        run_id,
        doc_id,
        &extracted.low_split_pages,
        &crops_dir,
        &ocr_dir,
    )?;

    let summary_totals = summary_totals_for(&conversion, &ocr_dir);
    let extracted_voters = extracted.records.len();
    let total_expected = summary_totals.as_ref().and_then(|s| s.total_voters_expected);
    let completeness_ratio = total_expected
        .filter(|t| *t > 0)
        .map(|t| extracted_voters as f64 / f64::from(t));

    voter_shield_write::write_document_output(&extracted.records, &cfg.csv_dir, doc_id, cfg.output_format)?;

    run_state.set_metrics(
        doc_id,
        pdf_name,
        Some(extracted_voters as u32),
        total_expected,
        completeness_ratio,
        None,
        None,
    )?;

    let report = DocumentReport {
        run_id: run_id.to_string(),
        pipeline_version: pipeline_version.map(str::to_string),
        started_at_utc,
        finished_at_utc: utc_now_iso(),
        source_pdf_name: pdf_name.to_string(),
        source_pdf_path: pdf_path.display().to_string(),
        doc_id: doc_id.to_string(),
        dpi: cfg.dpi,
        ocr_workers: cfg.ocr_workers,
        pages_total: Some(conversion.pages_total),
        extracted_voters,
        summary: summary_totals,
        integrity: IntegrityBlock::from_split_counts(&extracted.split_counts, extracted.low_split_pages.clone()),
        mode: None,
    };
    let report_path = cfg.csv_dir.join(format!("{doc_id}.report.json"));
    voter_shield_write::write_report_atomic(&report, &report_path)?;

    let incomplete = cfg.strict
        && total_expected.is_some_and(|t| t != extracted_voters as u32);

    run_state.set_status(
        doc_id,
        pdf_name,
        if incomplete { DocStatus::Incomplete } else { DocStatus::Completed },
        Some("done"),
    )?;

    info!(doc = %doc_id, extracted_voters, incomplete, "document processed");

    Ok(DocumentOutcome::Ok(DocumentSummary {
        records: extracted.records,
        extracted_voters,
        total_voters_expected: total_expected,
        completeness_ratio,
        incomplete,
    }))
}

async fn render_stage(pdf_path: PathBuf, jpg_dir: PathBuf, dpi: u32) -> Result<ConversionInfo, PipelineError> {
    tokio::task::spawn_blocking(move || voter_shield_render::convert_pdf_to_jpgs(&pdf_path, &jpg_dir, dpi))
        .await
        .map_err(|e| PipelineError::TaskPanicked(e.to_string()))?
        .map_err(PipelineError::from)
}

async fn crop_stage(
    conversion: &ConversionInfo,
    crops_dir: &Path,
    stem: &str,
    crop_workers: usize,
) -> Result<Vec<PageCropOutput>, PipelineError> {
    let items: Vec<(PathBuf, u32)> = conversion
        .voter_page_paths
        .iter()
        .cloned()
        .enumerate()
        .map(|(idx, path)| (path, (idx + 1) as u32))
        .collect();

    let crops_dir = crops_dir.to_path_buf();
    let stem = stem.to_string();
    run_bounded(items, crop_workers, move |(path, page_idx)| {
        Ok(voter_shield_crop::crop_and_stack_page(&path, &crops_dir, &stem, page_idx)?)
    })
    .await
}

async fn ocr_stage(
    ctx: &OcrContext,
    jpg_dir: &Path,
    crops_dir: &Path,
    ocr_dir: &Path,
    language_set: LanguageSet,
    ocr_workers: usize,
) -> Result<(), PipelineError> {
    let jobs = voter_shield_ocr::enumerate_jobs(jpg_dir, crops_dir, ocr_dir, language_set);
    let ctx = ctx.clone();
    run_bounded(jobs, ocr_workers, move |job| {
        voter_shield_ocr::run_job(&ctx, &job)?;
        Ok(())
    })
    .await?;
    Ok(())
}

/// Reads the OCR text of the summary page (if the document has one) and
/// parses it into best-effort totals.
fn summary_totals_for(conversion: &ConversionInfo, ocr_dir: &Path) -> Option<SummaryTotals> {
    let summary_path = conversion.summary_path.as_ref()?;
    let stem = summary_path.file_stem()?.to_str()?;
    let ocr_path = ocr_dir.join(format!("{stem}_ocr.txt"));
    let text = fs::read_to_string(&ocr_path).ok()?;
    Some(voter_shield_ocr::parse_summary_totals(&text))
}

/// Copies the stacked crop image, raw OCR text, and an integrity JSON into
/// `state_dir/<run_id>/debug/<doc_id>/` for every page whose marker split
/// fell below the expected count. Mirrors the debug snapshot written in the
/// original implementation's driver loop.
fn snapshot_low_split_debug(
    state_dir: &Path,
    run_id: &str,
    doc_id: &str,
    low_split_pages: &[LowSplitPage],
    crops_dir: &Path,
    ocr_dir: &Path,
) -> Result<(), PipelineError> {
    if low_split_pages.is_empty() {
        return Ok(());
    }

    let debug_root = state_dir.join(run_id).join("debug").join(doc_id);
    fs::create_dir_all(&debug_root)?;

    for page in low_split_pages {
        let base = page.source_image.trim_end_matches("_stacked_ocr.txt");

        let stacked_img = crops_dir.join(format!("{base}_stacked_crops.jpg"));
        if stacked_img.exists() {
            fs::copy(&stacked_img, debug_root.join(format!("{base}_stacked_crops.jpg")))?;
        }

        let ocr_text = fs::read_to_string(ocr_dir.join(&page.source_image)).unwrap_or_default();
        fs::write(debug_root.join(format!("{base}_ocr.txt")), ocr_text)?;

        let integrity_json = serde_json::to_string_pretty(page)?;
        fs::write(debug_root.join(format!("{base}_integrity.json")), integrity_json)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_a_no_op_when_no_low_split_pages() {
        let dir = tempfile::tempdir().unwrap();
        snapshot_low_split_debug(dir.path(), "run1", "doc1", &[], dir.path(), dir.path()).unwrap();
        assert!(!dir.path().join("run1").exists());
    }

    #[test]
    fn snapshot_writes_integrity_json_and_ocr_text() {
        let dir = tempfile::tempdir().unwrap();
        let crops_dir = dir.path().join("crops");
        let ocr_dir = dir.path().join("ocr");
        fs::create_dir_all(&crops_dir).unwrap();
        fs::create_dir_all(&ocr_dir).unwrap();
        fs::write(ocr_dir.join("doc_page_01_stacked_ocr.txt"), "some text").unwrap();

        let pages = vec![LowSplitPage {
            page_no: 1,
            source_image: "doc_page_01_stacked_ocr.txt".into(),
            marker_splits: 18,
        }];
        snapshot_low_split_debug(dir.path(), "run1", "doc1", &pages, &crops_dir, &ocr_dir).unwrap();

        let debug_root = dir.path().join("run1").join("debug").join("doc1");
        assert!(debug_root.join("doc_page_01_ocr.txt").exists());
        assert!(debug_root.join("doc_page_01_integrity.json").exists());
    }
}
