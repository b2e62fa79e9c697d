//! Splits one page's stacked-cell OCR text back into per-cell chunks on
//! the end-of-record marker, grounded on `split_voters_from_page_ocr` in
//! the original implementation.
//!
//! The marker is recognized as any line containing the literal token
//! `VOTEREND` (case-insensitive), since OCR engine variance can alter
//! surrounding whitespace or case but reliably transcribes the baked-in
//! uppercase word.

pub const MARKER_TOKEN: &str = "VOTEREND";

/// Minimum chunk count below which a page is flagged as a low-split
/// integrity event (§4.5 item 1 / §4.10).
pub const MIN_EXPECTED_SPLITS: usize = 25;

/// Splits `page_ocr_text` into cell chunks on marker lines. A well-formed
/// voter-grid page yields 30 chunks, one per cell, in top-to-bottom order.
/// Marker lines themselves are dropped; empty trailing chunks are dropped.
#[must_use]
pub fn split_voters_from_page_ocr(page_ocr_text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in page_ocr_text.lines() {
        if line.to_uppercase().contains(MARKER_TOKEN) {
            if !current.is_empty() {
                chunks.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        current.push(line);
    }

    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks.into_iter().filter(|c| !c.trim().is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_marker_lines() {
        let text = "EPIC1\nName A\nVOTEREND\nEPIC2\nName B\nVOTEREND\n";
        let chunks = split_voters_from_page_ocr(text);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].contains("EPIC1"));
        assert!(chunks[1].contains("EPIC2"));
    }

    #[test]
    fn marker_match_is_case_insensitive_and_tolerates_noise() {
        let text = "Cell1\nvoterend garbled\nCell2\nVoterEnd\n";
        let chunks = split_voters_from_page_ocr(text);
        assert_eq!(chunks, vec!["Cell1".to_string(), "Cell2".to_string()]);
    }

    #[test]
    fn drops_empty_chunks() {
        let text = "VOTEREND\nVOTEREND\nOnly\nVOTEREND\n";
        let chunks = split_voters_from_page_ocr(text);
        assert_eq!(chunks, vec!["Only".to_string()]);
    }

    #[test]
    fn low_split_page_is_below_threshold() {
        let chunks: Vec<String> = (0..18).map(|i| format!("cell {i}")).collect();
        assert!(chunks.len() < MIN_EXPECTED_SPLITS);
    }
}
