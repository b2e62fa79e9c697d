//! Renderer: rasterizes PDF pages to JPEG at a fixed DPI and
//! classifies them into cover / voter-grid / summary by page position.
//!
//! Page count is read first, then pages are rendered one at a time —
//! pdfium is not reentered from more than one thread per document, so
//! rendering stays single-threaded per PDF regardless of how many
//! documents run concurrently — and JPEGs are written at quality ~95.

pub mod layout;

pub use layout::PageLayout;

use image::codecs::jpeg::JpegEncoder;
use image::ImageEncoder;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use voter_shield_common::LanguageSet;

const JPEG_QUALITY: u8 = 95;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to bind to pdfium library: {0}")]
    Bind(String),

    #[error("failed to open PDF: {0}")]
    OpenPdf(String),

    #[error("could not determine page count for {0}")]
    PageCountUnknown(String),

    #[error("failed to render page {page}: {source}")]
    RenderPage { page: u32, source: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encode error: {0}")]
    Image(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// The result of converting one PDF's pages to JPEGs (report.json's
/// `pages_total` and friends are derived from this).
#[derive(Debug, Clone)]
pub struct ConversionInfo {
    pub pages_total: u32,
    pub language_set: LanguageSet,
    pub layout: PageLayout,
    pub cover_paths: Vec<PathBuf>,
    pub voter_page_paths: Vec<PathBuf>,
    pub summary_path: Option<PathBuf>,
}

/// Renders every page of `pdf_path` to JPEG in `jpg_dir`, classifying pages
/// by position per [`PageLayout`]. Single-threaded: callers bound
/// parallelism across documents, never within one.
pub fn convert_pdf_to_jpgs(pdf_path: &Path, jpg_dir: &Path, dpi: u32) -> Result<ConversionInfo> {
    std::fs::create_dir_all(jpg_dir)?;

    let stem = pdf_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();
    let file_name = pdf_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(&stem);
    let language_set = LanguageSet::detect_from_filename(file_name);

    let pdfium = Pdfium::new(
        Pdfium::bind_to_system_library()
            .or_else(|_| Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./")))
            .map_err(|e| RenderError::Bind(e.to_string()))?,
    );

    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| RenderError::OpenPdf(e.to_string()))?;

    let mut pages_total = u32::try_from(document.pages().len()).unwrap_or(0);
    if pages_total == 0 {
        pages_total = fallback_page_count(pdf_path)?;
    }

    info!(pdf = %file_name, pages_total, ?language_set, "converting PDF to JPEG");

    let layout = PageLayout::compute(pages_total, language_set);
    let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);

    let mut cover_paths = Vec::new();
    for (idx, page_no) in layout.cover_pages.iter().enumerate() {
        let out = jpg_dir.join(format!("{stem}_cover_{:02}.jpg", idx + 1));
        render_page(&document, *page_no, &render_config, &out)?;
        cover_paths.push(out);
    }

    let mut voter_page_paths = Vec::new();
    for (idx, page_no) in layout.voter_pages.iter().enumerate() {
        let out = jpg_dir.join(format!("{stem}_page_{:02}.jpg", idx + 1));
        render_page(&document, *page_no, &render_config, &out)?;
        voter_page_paths.push(out);
    }

    let summary_path = if let Some(page_no) = layout.summary_page {
        let out = jpg_dir.join(format!("{stem}_summary.jpg"));
        render_page(&document, page_no, &render_config, &out)?;
        Some(out)
    } else {
        None
    };

    Ok(ConversionInfo {
        pages_total,
        language_set,
        layout,
        cover_paths,
        voter_page_paths,
        summary_path,
    })
}

/// Secondary page-count probe, used only when the primary renderer's page
/// collection comes back empty (a PDF that opens but reports no pages).
/// Opens the file directly through an independent, pure-Rust PDF parser
/// rather than retrying the same binding.
fn fallback_page_count(pdf_path: &Path) -> Result<u32> {
    let mut doc = pdf_oxide::Document::open(pdf_path)
        .map_err(|e| RenderError::PageCountUnknown(format!("{}: {e}", pdf_path.display())))?;
    let count = doc
        .page_count()
        .map_err(|e| RenderError::PageCountUnknown(format!("{}: {e}", pdf_path.display())))?;

    let count = u32::try_from(count).unwrap_or(0);
    if count == 0 {
        return Err(RenderError::PageCountUnknown(pdf_path.display().to_string()));
    }
    info!(pdf = %pdf_path.display(), count, "recovered page count via fallback PDF parser");
    Ok(count)
}

fn render_page(
    document: &PdfDocument,
    page_no: u32,
    config: &PdfRenderConfig,
    out_path: &Path,
) -> Result<()> {
    let page = document
        .pages()
        .get(page_no.saturating_sub(1) as u16)
        .map_err(|e| RenderError::RenderPage {
            page: page_no,
            source: e.to_string(),
        })?;

    let bitmap = page
        .render_with_config(config)
        .map_err(|e| RenderError::RenderPage {
            page: page_no,
            source: e.to_string(),
        })?;

    let image = bitmap.as_image().into_rgb8();
    let file = std::fs::File::create(out_path)?;
    let writer = std::io::BufWriter::new(file);
    JpegEncoder::new_with_quality(writer, JPEG_QUALITY)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| RenderError::Image(e.to_string()))?;

    Ok(())
}
