//! Applies the geometry in [`crate::geometry`] to an actual rendered page:
//! partitions it into 30 cells, erases the photo, relocates the EPIC-ID
//! text out from under the photo, and pastes the VOTER_END sentinel.

use crate::geometry::{self, Rect};
use crate::marker::voter_end_marker;
use image::{imageops, Rgb, RgbImage};

/// One processed voter cell, ready to be stacked.
pub fn process_cell(page: &RgbImage, cell: Rect) -> RgbImage {
    let (x, y, w, h) = cell.to_pixels();
    let w = w.min(page.width().saturating_sub(x));
    let h = h.min(page.height().saturating_sub(y));
    let mut img = imageops::crop_imm(page, x, y, w, h).to_image();

    erase_photo(&mut img);
    relocate_epic(&mut img);
    paste_marker(&mut img);

    img
}

fn erase_photo(cell: &mut RgbImage) {
    let rect = geometry::photo_erase_rect(cell.width() as f32, cell.height() as f32);
    fill_white(cell, rect);
}

fn relocate_epic(cell: &mut RgbImage) {
    let (cw, ch) = (cell.width() as f32, cell.height() as f32);
    let source = geometry::epic_source_rect(cw, ch);
    let (sx, sy, sw, sh) = source.to_pixels();
    if sw == 0 || sh == 0 || sx >= cell.width() || sy >= cell.height() {
        return;
    }
    let sw = sw.min(cell.width() - sx);
    let sh = sh.min(cell.height() - sy);
    let epic_crop = imageops::crop_imm(cell, sx, sy, sw, sh).to_image();

    fill_white(cell, source);

    let (tx, ty) = geometry::epic_target_origin(ch, sh as f32);
    imageops::overlay(cell, &epic_crop, tx as i64, ty as i64);
}

fn paste_marker(cell: &mut RgbImage) {
    let marker = voter_end_marker();
    let scale = geometry::marker_scale();
    let scaled_w = (marker.width() as f32 * scale).round().max(1.0) as u32;
    let scaled_h = (marker.height() as f32 * scale).round().max(1.0) as u32;
    let scaled = imageops::resize(marker, scaled_w, scaled_h, imageops::FilterType::Nearest);

    let (x, y) = geometry::marker_origin(
        cell.width() as f32,
        cell.height() as f32,
        marker.width() as f32,
        marker.height() as f32,
    );
    imageops::overlay(cell, &scaled, x as i64, y as i64);
}

fn fill_white(img: &mut RgbImage, rect: Rect) {
    let (x, y, w, h) = rect.to_pixels();
    let w = w.min(img.width().saturating_sub(x));
    let h = h.min(img.height().saturating_sub(y));
    for yy in y..y + h {
        for xx in x..x + w {
            img.put_pixel(xx, yy, Rgb([255, 255, 255]));
        }
    }
}

/// Splits one rendered voter-grid page into its 30 (row-major) cells, each
/// with the photo erased, the EPIC-ID relocated, and the sentinel pasted.
pub fn crop_voter_boxes_dynamic(page: &RgbImage) -> Vec<RgbImage> {
    let content = geometry::content_rect(page.width() as f32, page.height() as f32);
    geometry::grid_cells(content)
        .into_iter()
        .map(|cell| process_cell(page, cell))
        .collect()
}

/// Extracts the header strip (assembly/part/street) from the top of a
/// voter-grid page.
pub fn street_crop(page: &RgbImage) -> RgbImage {
    let rect = geometry::street_strip_rect(page.width() as f32, page.height() as f32);
    let (x, y, w, h) = rect.to_pixels();
    let w = w.min(page.width().saturating_sub(x));
    let h = h.min(page.height().saturating_sub(y));
    imageops::crop_imm(page, x, y, w, h).to_image()
}
