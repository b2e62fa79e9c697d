//! Extractor: turns OCR text back into structured voter records.
//!
//! Splits each stacked-cell transcript on the end-of-record marker, parses
//! header and per-cell fields (English and Tamil+English label sets),
//! assigns dense per-document serial numbers, and attaches quality flags —
//! the stage between the OCR Runner and the Writer.

pub mod cell;
pub mod document;
pub mod filename;
pub mod header;
pub mod marker;
pub mod quality;
pub mod serial;

pub use cell::{parse_cell, CellFields};
pub use document::{extract_document, ExtractedDocument};
pub use filename::{header_strip_filename, parse_stacked_ocr_filename};
pub use header::parse_page_header;
pub use marker::{split_voters_from_page_ocr, MIN_EXPECTED_SPLITS};
pub use quality::{add_quality_flags, flag_record};
pub use serial::assign_serial_numbers;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
