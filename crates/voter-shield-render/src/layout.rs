//! Page-classification math: which 1-based PDF page numbers
//! are cover pages, voter-grid pages, and the summary page, for a given
//! total page count and language set.

use voter_shield_common::LanguageSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    pub pages_total: u32,
    pub language_set: LanguageSet,
    pub voter_start_page: u32,
    /// 1-based PDF page numbers rendered as cover pages, in order.
    pub cover_pages: Vec<u32>,
    /// 1-based PDF page numbers rendered as voter-grid pages, in order
    /// (renumbered from 1 in the output filename).
    pub voter_pages: Vec<u32>,
    /// 1-based PDF page number of the summary page, if the document has
    /// enough pages to have one.
    pub summary_page: Option<u32>,
}

impl PageLayout {
    /// Builds the layout for a document with `pages_total` pages.
    ///
    /// Cover pages are `1..voter_start_page-1` clamped to `pages_total`; the
    /// summary page is `pages_total` only when `pages_total >=
    /// voter_start_page`; everything strictly between is a voter-grid page
    /// (never including the summary page itself).
    #[must_use]
    pub fn compute(pages_total: u32, language_set: LanguageSet) -> Self {
        let voter_start_page = language_set.voter_start_page();

        let last_cover = (voter_start_page - 1).min(pages_total);
        let cover_pages: Vec<u32> = (1..=last_cover).collect();

        let (voter_pages, summary_page) = if pages_total >= voter_start_page {
            let voter_pages: Vec<u32> = (voter_start_page..pages_total).collect();
            (voter_pages, Some(pages_total))
        } else {
            (Vec::new(), None)
        };

        Self {
            pages_total,
            language_set,
            voter_start_page,
            cover_pages,
            voter_pages,
            summary_page,
        }
    }
}
