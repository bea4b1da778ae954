//! Pure tile-position computation for the watermark pattern.
//!
//! Positions are offsets from the pattern origin (image center plus the
//! configured offset); renderers apply the origin translation and rotation
//! once for the whole field, never per tile.

use kurbo::Point;

use crate::config::LayoutMode;
use crate::measure::ItemSize;

/// Compute the draw positions for one watermark item.
///
/// `Single` always yields exactly one position at the origin. `Tile` covers a
/// square span of the canvas diagonal plus one item: the grid must survive
/// rotation by any angle in `[-180, 180]` without exposing an untiled corner,
/// and the circumscribed-circle diameter is the smallest span that guarantees
/// that for every rotation. Items with a non-positive dimension yield no
/// positions (the step would be undefined), which renders as "draw nothing".
pub fn tile_positions(
    canvas_width: f64,
    canvas_height: f64,
    gap_x: f64,
    gap_y: f64,
    layout_mode: LayoutMode,
    item: ItemSize,
) -> Vec<Point> {
    if layout_mode == LayoutMode::Single {
        return vec![Point::ZERO];
    }

    if item.width <= 0.0 || item.height <= 0.0 {
        return Vec::new();
    }

    let diagonal = canvas_width.hypot(canvas_height);
    let span_x = diagonal + item.width;
    let span_y = diagonal + item.height;

    let step_x = item.width + gap_x.max(0.0);
    let step_y = item.height + gap_y.max(0.0);

    // Integer-indexed rows/columns: the position count is exactly
    // ceil(span/step) per axis regardless of float accumulation.
    let nx = (span_x / step_x).ceil() as usize;
    let ny = (span_y / step_y).ceil() as usize;

    let start_x = -span_x / 2.0;
    let start_y = -span_y / 2.0;

    let mut positions = Vec::with_capacity(nx * ny);
    for ix in 0..nx {
        let x = start_x + (ix as f64) * step_x;
        for iy in 0..ny {
            let y = start_y + (iy as f64) * step_y;
            positions.push(Point::new(x, y));
        }
    }
    positions
}
