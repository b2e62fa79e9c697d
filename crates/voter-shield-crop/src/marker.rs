//! The VOTEREND sentinel: a small fixed raster pasted into the bottom of
//! every crop cell, generated once and reused bit-identically for every
//! cell in every run. It bakes in the literal uppercase token
//! [`MARKER_TOKEN`] using the embedded bitmap font in [`crate::font5x7`],
//! so Tesseract has a legible, deterministic string to transcribe — the
//! extractor then splits stacked OCR text on any line containing it.

use crate::font5x7::{self, GLYPH_COLS, GLYPH_ROWS};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect as ImgRect;
use std::sync::OnceLock;

/// The literal token baked into every marker; the extractor matches lines
/// containing this (case-insensitively) as cell-record boundaries.
pub const MARKER_TOKEN: &str = "VOTEREND";

const PIXEL_SCALE: u32 = 3;
const CHAR_GAP_PX: u32 = GLYPH_COLS * PIXEL_SCALE / 2;
const MARGIN_PX: u32 = 6;
const BORDER_THICKNESS: u32 = 2;

static MARKER: OnceLock<RgbImage> = OnceLock::new();

/// The shared VOTEREND sentinel raster, generated on first use.
pub fn voter_end_marker() -> &'static RgbImage {
    MARKER.get_or_init(build_marker)
}

fn build_marker() -> RgbImage {
    let glyph_w = GLYPH_COLS * PIXEL_SCALE;
    let glyph_h = GLYPH_ROWS * PIXEL_SCALE;
    let char_count = MARKER_TOKEN.chars().count() as u32;

    let width = 2 * MARGIN_PX + char_count * glyph_w + (char_count.saturating_sub(1)) * CHAR_GAP_PX;
    let height = 2 * MARGIN_PX + glyph_h;

    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    for t in 0..BORDER_THICKNESS {
        draw_hollow_rect_mut(
            &mut img,
            ImgRect::at(t as i32, t as i32).of_size(width - 2 * t, height - 2 * t),
            Rgb([0, 0, 0]),
        );
    }

    let mut x_origin = MARGIN_PX;
    for c in MARKER_TOKEN.chars() {
        if let Some(glyph) = font5x7::glyph_for(c) {
            draw_glyph(&mut img, &glyph, x_origin, MARGIN_PX);
        }
        x_origin += glyph_w + CHAR_GAP_PX;
    }

    img
}

fn draw_glyph(img: &mut RgbImage, glyph: &font5x7::Glyph, x_origin: u32, y_origin: u32) {
    for (row, bits) in glyph.iter().enumerate() {
        for col in 0..GLYPH_COLS {
            let set = (bits >> (GLYPH_COLS - 1 - col)) & 1 == 1;
            if !set {
                continue;
            }
            let px = x_origin + col * PIXEL_SCALE;
            let py = y_origin + row as u32 * PIXEL_SCALE;
            for dy in 0..PIXEL_SCALE {
                for dx in 0..PIXEL_SCALE {
                    img.put_pixel(px + dx, py + dy, Rgb([0, 0, 0]));
                }
            }
        }
    }
}
