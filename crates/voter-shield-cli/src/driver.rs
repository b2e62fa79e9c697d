//! Multi-document driver loop: directory setup, optional S3 input/output,
//! the OCR precondition gate, the per-PDF loop, combined output, and the
//! final exit-code decision. The Rust counterpart of `main()` in the
//! original implementation.

use crate::args::Cli;
use crate::regression;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{error, info, warn};
use voter_shield_common::{pipeline_version, DocStatus, LanguageSet};
use voter_shield_ocr::{check_preconditions, engine_available, OcrContext};
use voter_shield_pipeline::{discover_pdfs, process_one_document, reset_dir, DocumentOutcome, PipelineConfig};
use voter_shield_runstate::{generate_run_id, RunState};
use voter_shield_storage::{download_pdfs, upload_directory, S3Config};
use voter_shield_write::write_combined_output;

/// Completed successfully; no document was incomplete under `--strict`.
pub const EXIT_OK: i32 = 0;
/// `--strict` was set and at least one document finished incomplete.
pub const EXIT_STRICT_INCOMPLETE: i32 = 1;
/// The OCR engine or a required language pack was unavailable; nothing was
/// processed.
pub const EXIT_PRECONDITION_FAILED: i32 = 2;

fn config_from_cli(cli: &Cli) -> PipelineConfig {
    PipelineConfig {
        pdf_dir: PathBuf::from(&cli.pdf_dir),
        jpg_dir: PathBuf::from(&cli.jpg_dir),
        crops_dir: PathBuf::from(&cli.crops_dir),
        ocr_dir: PathBuf::from(&cli.ocr_dir),
        csv_dir: PathBuf::from(&cli.csv_dir),
        state_dir: PathBuf::from(&cli.state_dir),
        dpi: cli.dpi,
        crop_workers: cli.crop_workers,
        ocr_workers: cli.ocr_workers,
        strict: cli.strict,
        combined: !cli.no_combined,
        output_format: cli.output_format.into(),
    }
}

/// Runs the full pipeline for one invocation and returns the process exit
/// code to use.
pub async fn run(cli: Cli) -> Result<i32> {
    let cfg = config_from_cli(&cli);

    std::fs::create_dir_all(&cfg.pdf_dir)?;
    std::fs::create_dir_all(&cfg.state_dir)?;
    for dir in cfg.intermediate_dirs() {
        std::fs::create_dir_all(dir)?;
    }

    if cli.delete_old {
        info!("--delete-old: resetting intermediate directories");
        for dir in cfg.intermediate_dirs() {
            reset_dir(dir)?;
        }
    }

    let s3_config = S3Config::default();
    let s3_inputs = cli.s3_input_uris();
    if !s3_inputs.is_empty() {
        reset_dir(&cfg.pdf_dir)?;
        let fetched = download_pdfs(&s3_inputs, &cfg.pdf_dir, s3_config.clone()).await?;
        info!(count = fetched.len(), "fetched input PDFs from object storage");
    }

    let run_id = cli.run_id.clone().unwrap_or_else(generate_run_id);
    let mut run_state = if cli.resume {
        RunState::load(run_id.clone(), cfg.state_dir.clone())?
    } else {
        RunState::new(run_id.clone(), cfg.state_dir.clone())?
    };
    let pipeline_version = pipeline_version();

    let ocr_ctx = OcrContext::from_env();

    if cli.regression && !engine_available(&ocr_ctx) {
        warn!("tesseract unavailable; running --regression in bundled-fixture mode");
        regression::run(
            &cfg.csv_dir,
            cfg.output_format,
            cfg.combined,
            &run_id,
            pipeline_version.as_deref(),
            &mut run_state,
        )?;
        return Ok(EXIT_OK);
    }

    let pdfs = discover_pdfs(&cfg.pdf_dir);
    if pdfs.is_empty() {
        warn!(dir = %cfg.pdf_dir.display(), "no input PDFs found");
    }

    let required_packs = required_packs_for(&pdfs);
    if let Err(err) = check_preconditions(&ocr_ctx, &required_packs) {
        error!(%err, "OCR engine precondition check failed");
        return Ok(EXIT_PRECONDITION_FAILED);
    }

    let mut combined_records = Vec::new();
    let mut any_incomplete = false;

    let progress = document_progress_bar(pdfs.len() as u64);

    for pdf_path in &pdfs {
        let pdf_name = pdf_path.file_name().unwrap_or_default().to_string_lossy().to_string();
        let doc_id = pdf_path.file_stem().unwrap_or_default().to_string_lossy().to_string();
        let output_path = cfg.csv_dir.join(format!("{doc_id}.{}", cfg.output_format.extension()));
        progress.set_message(doc_id.clone());

        if cli.resume && run_state.is_already_completed(&doc_id, &output_path) {
            info!(doc = %doc_id, "skipping already-completed document");
            progress.inc(1);
            continue;
        }

        match process_one_document(
            &cfg,
            &ocr_ctx,
            pdf_path,
            &doc_id,
            &pdf_name,
            &mut run_state,
            &run_id,
            pipeline_version.as_deref(),
        )
        .await
        {
            Ok(DocumentOutcome::Ok(summary)) => {
                any_incomplete |= summary.incomplete;
                combined_records.extend(summary.records);
            }
            Err(err) => {
                error!(doc = %doc_id, %err, "document processing failed");
                run_state.set_status(&doc_id, &pdf_name, DocStatus::Failed, Some("error"))?;
                run_state.set_metrics(&doc_id, &pdf_name, None, None, None, None, Some(err.to_string()))?;
            }
        }
        progress.inc(1);
    }
    progress.finish_with_message("done");

    if cfg.combined {
        write_combined_output(&combined_records, &cfg.csv_dir, cfg.output_format)?;
    }

    if let Some(dest) = cli.s3_output.as_deref() {
        let uploaded = upload_directory(&cfg.csv_dir, dest, s3_config).await?;
        info!(count = uploaded, dest, "uploaded output directory");
    }

    if cli.strict && any_incomplete {
        Ok(EXIT_STRICT_INCOMPLETE)
    } else {
        Ok(EXIT_OK)
    }
}

/// A per-document progress bar for the driver loop; falls back to a plain
/// counter template if the fancy one fails to parse (it never does, but
/// `ProgressStyle::template` returns a `Result`).
fn document_progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

/// Union of Tesseract language packs needed across every discovered PDF's
/// filename-derived language set, checked once before any document runs.
fn required_packs_for(pdfs: &[PathBuf]) -> Vec<&'static str> {
    let mut packs: Vec<&'static str> = pdfs
        .iter()
        .map(|p| LanguageSet::detect_from_filename(&p.file_name().unwrap_or_default().to_string_lossy()))
        .flat_map(|lang| lang.required_packs().iter().copied())
        .collect();
    packs.sort_unstable();
    packs.dedup();
    packs
}
