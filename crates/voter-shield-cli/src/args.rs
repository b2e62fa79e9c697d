//! Command-line surface, matching the flag table in the original
//! specification's external-interfaces section one-for-one
//! (`#[derive(Parser)]`, in the teacher CLI crate's style).

use clap::Parser;
use voter_shield_write::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "voter-shield",
    version,
    about = "Voter-roll extraction pipeline: PDF -> JPEG -> cropped cells -> OCR -> structured records"
)]
pub struct Cli {
    /// Reset intermediate directories (jpg, crops, ocr, csv) before running.
    #[arg(long)]
    pub delete_old: bool,

    /// Use bundled fixtures; skip OCR if the engine is absent.
    #[arg(long)]
    pub regression: bool,

    /// Reserved for future document-level parallelism; any value other
    /// than 1 is accepted and logged, not honored.
    #[arg(long, default_value_t = 1)]
    pub pdf_workers: usize,

    /// OCR worker pool size.
    #[arg(long, default_value_t = 2)]
    pub ocr_workers: usize,

    /// Crop worker pool size (per document).
    #[arg(long, default_value_t = 4)]
    pub crop_workers: usize,

    /// Skip documents already completed in a prior run; requires --run-id.
    #[arg(long)]
    pub resume: bool,

    /// Exit non-zero if any document is incomplete after processing.
    #[arg(long)]
    pub strict: bool,

    /// Run-state root directory.
    #[arg(long, default_value = "runs")]
    pub state_dir: String,

    /// Explicit run identifier; generated if omitted.
    #[arg(long)]
    pub run_id: Option<String>,

    /// Do not emit the combined output across all documents.
    #[arg(long)]
    pub no_combined: bool,

    /// Per-PDF and combined output format.
    #[arg(long, value_enum, default_value = "xlsx")]
    pub output_format: OutputFormatArg,

    /// Comma-separated object-store URIs to fetch input PDFs from.
    #[arg(long)]
    pub s3_input: Option<String>,

    /// Object-store URI to upload the output directory to after the run.
    #[arg(long)]
    pub s3_output: Option<String>,

    /// Input PDF directory.
    #[arg(long, default_value = "pdf")]
    pub pdf_dir: String,

    /// Rendered-page JPEG directory.
    #[arg(long, default_value = "jpg")]
    pub jpg_dir: String,

    /// Cropped-cell/header-strip directory.
    #[arg(long, default_value = "crops")]
    pub crops_dir: String,

    /// OCR text output directory.
    #[arg(long, default_value = "ocr")]
    pub ocr_dir: String,

    /// Per-document and combined output directory.
    #[arg(long, default_value = "csv")]
    pub csv_dir: String,

    /// Render DPI.
    #[arg(long, default_value_t = 300)]
    pub dpi: u32,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormatArg {
    Csv,
    Xlsx,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Csv => OutputFormat::Csv,
            OutputFormatArg::Xlsx => OutputFormat::Xlsx,
        }
    }
}

impl Cli {
    /// `--resume` requires an explicit `--run-id`, mirroring the original
    /// CLI's `parser.error(...)` precondition.
    #[must_use]
    pub fn validate(&self) -> Result<(), String> {
        if self.resume && self.run_id.is_none() {
            return Err("--resume requires --run-id".to_string());
        }
        Ok(())
    }

    #[must_use]
    pub fn s3_input_uris(&self) -> Vec<String> {
        self.s3_input
            .as_deref()
            .map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect())
            .unwrap_or_default()
    }
}
