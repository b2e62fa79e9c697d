//! Filename parsing for stacked-OCR text files, grounded on
//! `FILENAME_RE`/`parse_filename` in the original implementation.

use regex::Regex;
use std::sync::OnceLock;

fn stacked_ocr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?P<doc>.+?)_page_(?P<page>\d+)_stacked_ocr\.txt$").unwrap()
    })
}

/// `doc_id` and 1-based `page_no` parsed from a `<doc>_page_<NN>_stacked_ocr.txt`
/// filename, or `None` if the name doesn't match that shape.
#[must_use]
pub fn parse_stacked_ocr_filename(filename: &str) -> Option<(String, u32)> {
    let caps = stacked_ocr_re().captures(filename)?;
    let doc_id = caps.name("doc")?.as_str().to_string();
    let page_no: u32 = caps.name("page")?.as_str().parse().ok()?;
    Some((doc_id, page_no))
}

/// The companion header-strip filename for a stacked-OCR filename, found by
/// substituting `stacked_ocr` for `street` (case preserved as written by the
/// OCR stage).
#[must_use]
pub fn header_strip_filename(stacked_ocr_filename: &str) -> String {
    stacked_ocr_filename.replace("stacked_ocr", "street")
}
