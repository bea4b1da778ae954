//! Tiling coverage properties: the diagonal-span grid must survive any
//! rotation in [-180, 180] without exposing an untiled corner.

use aquamark::measure::ItemSize;
use aquamark::{Affine, LayoutMode, Point};

fn positions(w: f64, h: f64, gx: f64, gy: f64, item: ItemSize) -> Vec<Point> {
    aquamark::geometry::tile_positions(w, h, gx, gy, LayoutMode::Tile, item)
}

#[test]
fn single_mode_ignores_everything_else() {
    for &(w, h, g) in &[(10.0, 10.0, 0.0), (4000.0, 100.0, 500.0)] {
        let p = aquamark::geometry::tile_positions(
            w,
            h,
            g,
            g,
            LayoutMode::Single,
            ItemSize { width: 123.0, height: 45.0 },
        );
        assert_eq!(p, vec![Point::ZERO]);
    }
}

#[test]
fn scenario_b_count_matches_formula_exactly() {
    // 500x500 canvas, gaps 100, item 50x20.
    let diagonal = (500.0_f64 * 500.0 + 500.0 * 500.0).sqrt();
    let span_x = diagonal + 50.0;
    let span_y = diagonal + 20.0;
    let expected = (span_x / 150.0).ceil() as usize * (span_y / 120.0).ceil() as usize;

    let p = positions(500.0, 500.0, 100.0, 100.0, ItemSize { width: 50.0, height: 20.0 });
    assert_eq!(p.len(), expected);
}

/// Sample the image rectangle's corners, edge midpoints, and center; map
/// them into pattern space for a given rotation/offset; assert each sample
/// lies inside the tiled span with a tile center within one step per axis.
fn assert_covered(w: f64, h: f64, rotate_deg: f64, offset: (f64, f64), gap: f64, item: ItemSize) {
    let pts = [
        (0.0, 0.0),
        (w, 0.0),
        (0.0, h),
        (w, h),
        (w / 2.0, 0.0),
        (w / 2.0, h),
        (0.0, h / 2.0),
        (w, h / 2.0),
        (w / 2.0, h / 2.0),
    ];

    let tiles = positions(w, h, gap, gap, item);
    assert!(!tiles.is_empty());

    let diagonal = w.hypot(h);
    let span_x = diagonal + item.width;
    let span_y = diagonal + item.height;
    let step_x = item.width + gap;
    let step_y = item.height + gap;

    // Renderers draw the field under translate(center + offset) * rotate;
    // invert that to land image points in the grid's coordinate space.
    let frame = Affine::translate((w / 2.0 + offset.0, h / 2.0 + offset.1))
        * Affine::rotate(rotate_deg.to_radians());
    let inv = frame.inverse();

    for &(px, py) in &pts {
        let p = inv * Point::new(px, py);

        // Offsets shift the pattern origin, so allow them in the span bound.
        let slack_x = offset.0.abs();
        let slack_y = offset.1.abs();
        assert!(
            p.x.abs() <= span_x / 2.0 + slack_x + 1e-6,
            "point ({px},{py}) left the tiled span at rotation {rotate_deg}"
        );
        assert!(
            p.y.abs() <= span_y / 2.0 + slack_y + 1e-6,
            "point ({px},{py}) left the tiled span at rotation {rotate_deg}"
        );

        let nearest_dx = tiles.iter().map(|t| (t.x - p.x).abs()).fold(f64::INFINITY, f64::min);
        let nearest_dy = tiles.iter().map(|t| (t.y - p.y).abs()).fold(f64::INFINITY, f64::min);
        assert!(
            nearest_dx <= step_x + slack_x && nearest_dy <= step_y + slack_y,
            "no tile near ({px},{py}) at rotation {rotate_deg}: dx={nearest_dx}, dy={nearest_dy}"
        );
    }
}

#[test]
fn rotated_corners_stay_covered_across_full_angle_range() {
    let item = ItemSize { width: 120.0, height: 40.0 };
    let mut deg = -180.0;
    while deg <= 180.0 {
        assert_covered(640.0, 480.0, deg, (0.0, 0.0), 30.0, item);
        deg += 15.0;
    }
}

#[test]
fn coverage_holds_for_offset_patterns_and_odd_aspects() {
    let item = ItemSize { width: 80.0, height: 80.0 };
    for &deg in &[-180.0, -45.0, 0.0, 33.0, 90.0, 180.0] {
        assert_covered(1200.0, 200.0, deg, (50.0, -35.0), 60.0, item);
        assert_covered(200.0, 1200.0, deg, (-20.0, 10.0), 0.0, item);
    }
}
