//! Pixel-pass logo processing: background removal and tinting.
//!
//! This is the buffer implementation of the logo transform, used by the
//! raster backend. The SVG overlay backend expresses the same rules
//! declaratively with a luminance mask (see `render::svg`); the two must
//! agree on silhouette and tint, not on exact bytes.

use image::RgbaImage;

use crate::assets::color::Rgb;

/// Per-channel near-white threshold: a pixel with all of R, G, B strictly
/// above this becomes fully transparent when background removal is on.
pub const NEAR_WHITE_THRESHOLD: u8 = 230;

/// Apply background removal and optional tinting to a logo raster.
///
/// With `remove_background` off the input is returned unchanged and
/// `enable_colorize` is ignored: colorize finds its mask from the same
/// threshold, so it only has effect while removal is active.
///
/// The threshold is a hard per-channel cut with no smoothing at the
/// boundary; re-running the pass on already-processed output is a no-op as
/// long as colorize is off.
pub fn process_logo(
    logo: &RgbaImage,
    remove_background: bool,
    enable_colorize: bool,
    logo_color: &str,
) -> RgbaImage {
    if !remove_background {
        return logo.clone();
    }

    let tint = Rgb::parse_or_black(logo_color);

    let mut out = logo.clone();
    for px in out.pixels_mut() {
        let [r, g, b, a] = px.0;
        if r > NEAR_WHITE_THRESHOLD && g > NEAR_WHITE_THRESHOLD && b > NEAR_WHITE_THRESHOLD {
            px.0[3] = 0;
        } else if enable_colorize && a > 0 {
            px.0[0] = tint.r;
            px.0[1] = tint.g;
            px.0[2] = tint.b;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// 10x10 pure-white logo with a black 5x5 center square.
    fn white_logo_black_center() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        for y in 3..8 {
            for x in 3..8 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        img
    }

    #[test]
    fn no_removal_returns_input_unchanged() {
        let logo = white_logo_black_center();
        assert_eq!(process_logo(&logo, false, false, "#123456"), logo);
    }

    #[test]
    fn colorize_without_removal_is_a_noop() {
        let logo = white_logo_black_center();
        assert_eq!(process_logo(&logo, false, true, "#FF0000"), logo);
    }

    #[test]
    fn removal_clears_near_white_only() {
        let mut logo = white_logo_black_center();
        // A gray pixel right at the threshold must survive.
        logo.put_pixel(0, 0, Rgba([230, 230, 230, 255]));

        let out = process_logo(&logo, true, false, "#000000");
        assert_eq!(out.get_pixel(0, 0).0, [230, 230, 230, 255]);
        assert_eq!(out.get_pixel(1, 0).0[3], 0);
        assert_eq!(out.get_pixel(5, 5).0, [0, 0, 0, 255]);
    }

    #[test]
    fn removal_plus_colorize_tints_surviving_pixels() {
        let out = process_logo(&white_logo_black_center(), true, true, "#FF0000");

        // Former white background: transparent.
        assert_eq!(out.get_pixel(0, 0).0[3], 0);
        // Former black content: solid red, alpha untouched.
        assert_eq!(out.get_pixel(5, 5).0, [255, 0, 0, 255]);
    }

    #[test]
    fn malformed_tint_falls_back_to_black() {
        let out = process_logo(&white_logo_black_center(), true, true, "oops");
        assert_eq!(out.get_pixel(5, 5).0, [0, 0, 0, 255]);
    }

    #[test]
    fn removal_is_idempotent_when_colorize_off() {
        let once = process_logo(&white_logo_black_center(), true, false, "#000000");
        let twice = process_logo(&once, true, false, "#000000");
        assert_eq!(once, twice);
    }

    #[test]
    fn already_transparent_pixels_are_not_tinted_back() {
        let mut logo = white_logo_black_center();
        logo.put_pixel(9, 9, Rgba([50, 50, 50, 0]));

        let out = process_logo(&logo, true, true, "#00FF00");
        assert_eq!(out.get_pixel(9, 9).0[3], 0);
        assert_eq!(out.get_pixel(9, 9).0[..3], [50, 50, 50]);
    }
}
