//! Cropper: partitions each voter-grid page into 30 voter cells,
//! erases photos, relocates EPIC-ID text, pastes the VOTEREND sentinel,
//! stacks the cells into one tall image per page, and saves the header
//! strip separately.

pub mod crop;
pub mod font5x7;
pub mod geometry;
pub mod marker;
pub mod stack;

pub use crop::{crop_voter_boxes_dynamic, street_crop};
pub use marker::MARKER_TOKEN;
pub use stack::stack_voter_crops_vertically;

use image::RgbImage;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CropError {
    #[error("failed to read page image {0}: {1}")]
    ReadImage(PathBuf, String),

    #[error("failed to write crop image {0}: {1}")]
    WriteImage(PathBuf, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CropError>;

/// Output paths for one processed voter-grid page.
#[derive(Debug, Clone)]
pub struct PageCropOutput {
    pub stacked_path: PathBuf,
    pub street_path: PathBuf,
}

/// Crops, relocates, stacks, and saves one rendered voter-grid page. `stem`
/// and `page_idx` (1-based, renumbered within the document's voter pages)
/// name the outputs `<stem>_page_<page_idx>_stacked_crops.jpg` and
/// `<stem>_page_<page_idx>_street.jpg`.
pub fn crop_and_stack_page(
    page_jpg_path: &Path,
    out_dir: &Path,
    stem: &str,
    page_idx: u32,
) -> Result<PageCropOutput> {
    std::fs::create_dir_all(out_dir)?;

    let page = image::open(page_jpg_path)
        .map_err(|e| CropError::ReadImage(page_jpg_path.to_path_buf(), e.to_string()))?
        .into_rgb8();

    let cells = crop_voter_boxes_dynamic(&page);
    let stacked = stack_voter_crops_vertically(&cells);
    let street = street_crop(&page);

    debug!(
        page = page_idx,
        cells = cells.len(),
        stacked_w = stacked.width(),
        stacked_h = stacked.height(),
        "cropped voter-grid page"
    );

    let stacked_path = out_dir.join(format!("{stem}_page_{page_idx:02}_stacked_crops.jpg"));
    let street_path = out_dir.join(format!("{stem}_page_{page_idx:02}_street.jpg"));

    save_jpg(&stacked, &stacked_path)?;
    save_jpg(&street, &street_path)?;

    Ok(PageCropOutput {
        stacked_path,
        street_path,
    })
}

fn save_jpg(img: &RgbImage, path: &Path) -> Result<()> {
    img.save(path)
        .map_err(|e| CropError::WriteImage(path.to_path_buf(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn crop_and_stack_page_writes_both_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let page = RgbImage::from_pixel(1600, 2400, Rgb([20, 20, 20]));
        let page_path = dir.path().join("input_page.jpg");
        page.save(&page_path).unwrap();

        let out_dir = dir.path().join("crops");
        let result = crop_and_stack_page(&page_path, &out_dir, "doc", 1).unwrap();

        assert!(result.stacked_path.exists());
        assert!(result.street_path.exists());
        assert_eq!(
            result.stacked_path.file_name().unwrap().to_str().unwrap(),
            "doc_page_01_stacked_crops.jpg"
        );
    }
}
