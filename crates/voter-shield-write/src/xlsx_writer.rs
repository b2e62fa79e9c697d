//! Per-document and combined XLSX writing, grounded on
//! `write_pdf_xlsx_atomic` / `write_final_xlsx` in the original
//! implementation (there: `openpyxl` write-only workbook; here:
//! `rust_xlsxwriter`, the teacher's XLSX crate).

use crate::{Result, WriteError};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use voter_shield_common::{atomic::write_atomic_with, VoterRecord, VoterShieldError};

/// Writes `records` as a single-sheet XLSX workbook to `path` atomically.
pub fn write_xlsx_atomic(records: &[VoterRecord], path: &Path) -> Result<()> {
    write_atomic_with(path, |tmp_path| {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet().set_name("voters").map_err(xlsx_err)?;

        for (col, name) in VoterRecord::column_order().iter().enumerate() {
            sheet.write_string(0, col as u16, *name).map_err(xlsx_err)?;
        }

        for (row_idx, record) in records.iter().enumerate() {
            let row = (row_idx + 1) as u32;
            for (col, (_, value)) in record.to_columns().into_iter().enumerate() {
                sheet.write_string(row, col as u16, value).map_err(xlsx_err)?;
            }
        }

        workbook.save(tmp_path).map_err(xlsx_err)
    })
    .map_err(WriteError::Common)
}

fn xlsx_err(e: rust_xlsxwriter::XlsxError) -> VoterShieldError {
    VoterShieldError::Other(e.to_string())
}
