//! Stacks the 30 processed cells of a page into one tall image for a
//! single OCR pass.

use image::{imageops, Rgb, RgbImage};

const PADDING_PX: u32 = 10;

/// Stacks `cells` top to bottom with [`PADDING_PX`] of white padding
/// between (and around) each, normalizing every cell to the width of the
/// widest one.
#[must_use]
pub fn stack_voter_crops_vertically(cells: &[RgbImage]) -> RgbImage {
    if cells.is_empty() {
        return RgbImage::from_pixel(1, 1, Rgb([255, 255, 255]));
    }

    let max_width = cells.iter().map(RgbImage::width).max().unwrap_or(1);
    let total_height: u32 = cells.iter().map(RgbImage::height).sum::<u32>()
        + PADDING_PX * (cells.len() as u32 + 1);

    let mut canvas = RgbImage::from_pixel(
        max_width + 2 * PADDING_PX,
        total_height,
        Rgb([255, 255, 255]),
    );

    let mut y = PADDING_PX as i64;
    for cell in cells {
        imageops::overlay(&mut canvas, cell, PADDING_PX as i64, y);
        y += cell.height() as i64 + PADDING_PX as i64;
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_cells_with_padding_and_normalizes_width() {
        let a = RgbImage::from_pixel(50, 20, Rgb([0, 0, 0]));
        let b = RgbImage::from_pixel(80, 30, Rgb([0, 0, 0]));
        let stacked = stack_voter_crops_vertically(&[a.clone(), b.clone()]);

        assert_eq!(stacked.width(), 80 + 2 * PADDING_PX);
        assert_eq!(
            stacked.height(),
            20 + 30 + PADDING_PX * 3
        );
    }

    #[test]
    fn empty_input_yields_a_minimal_placeholder() {
        let stacked = stack_voter_crops_vertically(&[]);
        assert_eq!(stacked.width(), 1);
        assert_eq!(stacked.height(), 1);
    }

    #[test]
    fn padding_border_stays_white() {
        let a = RgbImage::from_pixel(30, 10, Rgb([5, 5, 5]));
        let stacked = stack_voter_crops_vertically(&[a]);
        assert_eq!(*stacked.get_pixel(0, 0), Rgb([255, 255, 255]));
    }
}
