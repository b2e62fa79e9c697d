//! Per-document extraction driver: reads stacked-cell OCR files from one
//! document's OCR directory, splits them on the end-of-record marker,
//! parses header and cell fields, and assigns serial numbers and quality
//! flags — the Rust counterpart of `extract_pages_from_ocr_dir` plus the
//! per-page loop in the original `main.py`.

use crate::cell::parse_cell;
use crate::filename::{header_strip_filename, parse_stacked_ocr_filename};
use crate::header::parse_page_header;
use crate::marker::{split_voters_from_page_ocr, MIN_EXPECTED_SPLITS};
use crate::quality::add_quality_flags;
use crate::serial::assign_serial_numbers;
use crate::{ExtractError, Result};
use std::fs;
use std::path::Path;
use tracing::warn;
use voter_shield_common::{LanguageSet, LowSplitPage, VoterRecord};

/// The result of extracting one document's OCR output.
#[derive(Debug, Default)]
pub struct ExtractedDocument {
    pub records: Vec<VoterRecord>,
    pub low_split_pages: Vec<LowSplitPage>,
    pub split_counts: Vec<usize>,
}

/// Extracts every voter-grid page's stacked OCR file under `ocr_dir` into
/// voter records, assigns serial numbers, and attaches quality flags.
/// Records the marker-split count for every page, and every page whose
/// split count falls below `MIN_EXPECTED_SPLITS` in `low_split_pages`.
pub fn extract_document(
    ocr_dir: &Path,
    doc_id: &str,
    language_set: LanguageSet,
) -> Result<ExtractedDocument> {
    let mut stacked_files: Vec<_> = fs::read_dir(ocr_dir)
        .map_err(ExtractError::Io)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.to_lowercase().ends_with("_stacked_ocr.txt"))
                .unwrap_or(false)
        })
        .collect();
    stacked_files.sort();

    let mut records = Vec::new();
    let mut low_split_pages = Vec::new();
    let mut split_counts = Vec::new();

    for path in stacked_files {
        let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string();
        let ocr_text = fs::read_to_string(&path).map_err(ExtractError::Io)?;
        if ocr_text.trim().is_empty() {
            continue;
        }

        let Some((_, page_no)) = parse_stacked_ocr_filename(&filename) else {
            warn!(%filename, "failed to parse metadata from filename, skipping");
            continue;
        };

        let header_path = ocr_dir.join(header_strip_filename(&filename));
        let header_text = fs::read_to_string(&header_path).unwrap_or_default();
        let header = parse_page_header(&header_text, language_set);

        let chunks = split_voters_from_page_ocr(&ocr_text);
        split_counts.push(chunks.len());

        if chunks.len() < MIN_EXPECTED_SPLITS {
            low_split_pages.push(LowSplitPage {
                page_no,
                source_image: filename.clone(),
                marker_splits: chunks.len(),
            });
        }

        for (idx, chunk) in chunks.iter().enumerate() {
            let fields = parse_cell(chunk, language_set);
            records.push(VoterRecord {
                doc_id: doc_id.to_string(),
                page_no,
                intra_page_index: (idx + 1) as u32,
                assembly: header.assembly.clone(),
                part_no: header.part_no,
                street: header.street.clone(),
                serial_no: 0,
                epic_id: fields.epic_id,
                name: fields.name,
                father_name: fields.father_name,
                mother_name: fields.mother_name,
                husband_name: fields.husband_name,
                other_name: fields.other_name,
                house_no: fields.house_no,
                age: fields.age,
                gender: fields.gender,
                total_flags: 0,
                flag_reasons: Vec::new(),
                explanation_1: String::new(),
            });
        }
    }

    let mut records = assign_serial_numbers(records);
    add_quality_flags(&mut records);

    Ok(ExtractedDocument { records, low_split_pages, split_counts })
}
