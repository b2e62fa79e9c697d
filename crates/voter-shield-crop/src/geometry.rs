//! Pure pixel-rectangle math for the cropper. Kept free of any image
//! I/O so the grid/erase/relocate/marker placement arithmetic is directly
//! unit-testable.

pub const GRID_ROWS: u32 = 10;
pub const GRID_COLS: u32 = 3;

const HEADER_FOOTER_MARGIN_RATIO: f32 = 0.032;
const SIDE_MARGIN_RATIO: f32 = 0.024;

/// Reference template proportions the photo box ratios were measured
/// against (a 1555x620 cell render).
const PHOTO_W_RATIO: f32 = 380.0 / 1555.0;
const PHOTO_TOP_RATIO: f32 = 140.0 / 620.0;
const PHOTO_BOTTOM_RATIO: f32 = 480.0 / 620.0;
const PHOTO_ERASE_PADDING_RATIO: f32 = 0.02;

const EPIC_SOURCE_X1_RATIO: f32 = 0.60;
const EPIC_SOURCE_Y1_PX: f32 = 10.0;
const EPIC_SOURCE_Y2_RATIO: f32 = 0.25;

const EPIC_TARGET_Y_RATIO: f32 = 0.70;
const EPIC_TARGET_PADDING_PX: f32 = 6.0;

const MARKER_SCALE: f32 = 2.0;
const MARKER_BOTTOM_PADDING_PX: f32 = 8.0;
/// Large left padding keeps the marker away from any EPIC text relocated
/// into the same bottom strip.
const MARKER_LEFT_PADDING_PX: f32 = 500.0;

const STREET_STRIP_HEIGHT_RATIO: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[must_use]
    pub fn to_pixels(self) -> (u32, u32, u32, u32) {
        (
            self.x.max(0.0).round() as u32,
            self.y.max(0.0).round() as u32,
            self.w.max(0.0).round() as u32,
            self.h.max(0.0).round() as u32,
        )
    }
}

/// The content area inside the header/footer/side margins of a full page.
#[must_use]
pub fn content_rect(page_w: f32, page_h: f32) -> Rect {
    let top = page_h * HEADER_FOOTER_MARGIN_RATIO;
    let side = page_w * SIDE_MARGIN_RATIO;
    Rect {
        x: side,
        y: top,
        w: (page_w - 2.0 * side).max(0.0),
        h: (page_h - 2.0 * top).max(0.0),
    }
}

/// The 30 (10x3) grid cells inside `content`, row-major, left to right then
/// top to bottom (matching [`voter_shield_common::CellId::intra_page_index`]).
#[must_use]
pub fn grid_cells(content: Rect) -> Vec<Rect> {
    let cell_w = content.w / GRID_COLS as f32;
    let cell_h = content.h / GRID_ROWS as f32;
    let mut cells = Vec::with_capacity((GRID_ROWS * GRID_COLS) as usize);
    for row in 0..GRID_ROWS {
        for col in 0..GRID_COLS {
            cells.push(Rect {
                x: content.x + col as f32 * cell_w,
                y: content.y + row as f32 * cell_h,
                w: cell_w,
                h: cell_h,
            });
        }
    }
    cells
}

/// The photo box to erase inside one cell, in cell-local coordinates,
/// right-aligned and padded by 2% of the cell's own dimensions on every
/// side so the erase fully covers anti-aliased photo edges.
#[must_use]
pub fn photo_erase_rect(cell_w: f32, cell_h: f32) -> Rect {
    let photo_w = cell_w * PHOTO_W_RATIO;
    let photo_top = cell_h * PHOTO_TOP_RATIO;
    let photo_bottom = cell_h * PHOTO_BOTTOM_RATIO;

    let pad_x = cell_w * PHOTO_ERASE_PADDING_RATIO;
    let pad_y = cell_h * PHOTO_ERASE_PADDING_RATIO;

    let x1 = (cell_w - photo_w - pad_x).max(0.0);
    let y1 = (photo_top - pad_y).max(0.0);
    let x2 = cell_w;
    let y2 = (photo_bottom + pad_y).min(cell_h);

    Rect {
        x: x1,
        y: y1,
        w: x2 - x1,
        h: (y2 - y1).max(0.0),
    }
}

/// Where the EPIC-ID text lives in the unmodified cell, in cell-local
/// coordinates (top-right, above the photo).
#[must_use]
pub fn epic_source_rect(cell_w: f32, cell_h: f32) -> Rect {
    let x1 = cell_w * EPIC_SOURCE_X1_RATIO;
    let y1 = EPIC_SOURCE_Y1_PX.min(cell_h);
    let y2 = cell_h * EPIC_SOURCE_Y2_RATIO;
    Rect {
        x: x1,
        y: y1,
        w: (cell_w - x1).max(0.0),
        h: (y2 - y1).max(0.0),
    }
}

/// Top-left placement for the EPIC-ID crop once relocated to the bottom
/// strip freed by the photo erase, in cell-local coordinates.
#[must_use]
pub fn epic_target_origin(cell_h: f32, epic_h: f32) -> (f32, f32) {
    let y = cell_h * EPIC_TARGET_Y_RATIO + EPIC_TARGET_PADDING_PX;
    let y = y.min((cell_h - epic_h).max(0.0));
    (EPIC_TARGET_PADDING_PX, y)
}

/// Top-left placement for the VOTER_END sentinel, scaled by
/// [`MARKER_SCALE`], in cell-local coordinates.
#[must_use]
pub fn marker_origin(cell_w: f32, cell_h: f32, marker_w: f32, marker_h: f32) -> (f32, f32) {
    let scaled_w = marker_w * MARKER_SCALE;
    let scaled_h = marker_h * MARKER_SCALE;
    let x = MARKER_LEFT_PADDING_PX.min((cell_w - scaled_w).max(0.0));
    let y = (cell_h - scaled_h - MARKER_BOTTOM_PADDING_PX).max(0.0);
    (x, y)
}

#[must_use]
pub fn marker_scale() -> f32 {
    MARKER_SCALE
}

/// The header strip at the top of a voter-grid page (assembly/part/street
/// text lives here), full page width.
#[must_use]
pub fn street_strip_rect(page_w: f32, page_h: f32) -> Rect {
    Rect {
        x: 0.0,
        y: 0.0,
        w: page_w,
        h: page_h * STREET_STRIP_HEIGHT_RATIO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_rect_applies_header_footer_and_side_margins() {
        let r = content_rect(1000.0, 1000.0);
        assert!((r.x - 24.0).abs() < 0.01);
        assert!((r.y - 32.0).abs() < 0.01);
        assert!((r.w - 952.0).abs() < 0.01);
        assert!((r.h - 936.0).abs() < 0.01);
    }

    #[test]
    fn grid_cells_produces_thirty_cells_row_major() {
        let content = Rect { x: 0.0, y: 0.0, w: 300.0, h: 200.0 };
        let cells = grid_cells(content);
        assert_eq!(cells.len(), 30);
        assert_eq!(cells[0], Rect { x: 0.0, y: 0.0, w: 100.0, h: 20.0 });
        assert_eq!(cells[1].x, 100.0);
        assert_eq!(cells[3].y, 20.0);
        assert_eq!(cells[29].y, 180.0);
    }

    #[test]
    fn photo_erase_rect_is_right_aligned_and_padded() {
        let r = photo_erase_rect(1555.0, 620.0);
        // unpadded box would start at 1555 - 380 = 1175, padding shifts it left.
        assert!(r.x < 1175.0);
        assert!((r.x + r.w - 1555.0).abs() < 1.0);
        assert!(r.y < 140.0);
        assert!(r.y + r.h > 480.0);
    }

    #[test]
    fn epic_source_rect_is_top_right() {
        let r = epic_source_rect(1000.0, 500.0);
        assert!((r.x - 600.0).abs() < 0.01);
        assert!((r.y - 10.0).abs() < 0.01);
        assert!((r.y + r.h - 125.0).abs() < 0.01);
    }

    #[test]
    fn epic_target_origin_sits_below_photo_band() {
        let (x, y) = epic_target_origin(620.0, 100.0);
        assert_eq!(x, 6.0);
        assert!((y - (620.0 * 0.70 + 6.0)).abs() < 0.01);
    }

    #[test]
    fn epic_target_origin_clips_to_cell_height() {
        let (_, y) = epic_target_origin(100.0, 90.0);
        assert!(y <= 10.0);
    }

    #[test]
    fn marker_origin_uses_large_left_padding_not_flush_left() {
        let (x, y) = marker_origin(2000.0, 200.0, 50.0, 20.0);
        assert_eq!(x, 500.0);
        assert!((y - (200.0 - 40.0 - 8.0)).abs() < 0.01);
    }

    #[test]
    fn marker_origin_clips_left_padding_in_narrow_cells() {
        let (x, _) = marker_origin(300.0, 200.0, 50.0, 20.0);
        assert_eq!(x, 200.0); // 300 - 100 (scaled marker width)
    }

    #[test]
    fn street_strip_is_top_five_percent_of_page() {
        let r = street_strip_rect(1000.0, 2000.0);
        assert_eq!(r.h, 100.0);
        assert_eq!(r.w, 1000.0);
    }
}
