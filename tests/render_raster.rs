//! Raster backend behavior: output geometry, determinism, and the
//! pixel-decision rules shared with the SVG backend.

use aquamark::{
    LayoutMode, PreparedImage, RasterBackend, RenderBackend, WatermarkConfig, WatermarkKind,
};
use image::{Rgba, RgbaImage};

fn white_base(w: u32, h: u32) -> PreparedImage {
    PreparedImage {
        rgba: RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255])),
    }
}

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

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

fn pixel(frame: &aquamark::RenderedImage, x: u32, y: u32) -> [u8; 4] {
    let idx = ((y * frame.width + x) * 4) as usize;
    frame.data[idx..idx + 4].try_into().unwrap()
}

#[test]
fn scenario_a_text_single_centered() {
    let base = white_base(1000, 800);
    let config = WatermarkConfig {
        kind: WatermarkKind::Text,
        text: "Test".to_owned(),
        font_size: 40.0,
        layout_mode: LayoutMode::Single,
        opacity: 1.0,
        rotate: 0.0,
        offset_x: 0.0,
        offset_y: 0.0,
        ..WatermarkConfig::default()
    };

    let mut backend = RasterBackend::new();
    let frame = backend.render(&base, &config, None).unwrap();

    assert_eq!(frame.width, 1000);
    assert_eq!(frame.height, 800);

    // Text is centered on (500, 400): some pixel in the central box must
    // differ from the white base, while the far corners stay untouched.
    let mut touched = false;
    for y in 350..450 {
        for x in 400..600 {
            if pixel(&frame, x, y) != [255, 255, 255, 255] {
                touched = true;
            }
        }
    }
    assert!(touched, "no visible text near the image center");

    assert_eq!(pixel(&frame, 5, 5), [255, 255, 255, 255]);
    assert_eq!(pixel(&frame, 994, 794), [255, 255, 255, 255]);
}

#[test]
fn render_is_deterministic_and_size_preserving() {
    let base = white_base(320, 200);
    let config = WatermarkConfig {
        kind: WatermarkKind::Text,
        layout_mode: LayoutMode::Tile,
        ..WatermarkConfig::default()
    };

    let mut backend = RasterBackend::new();
    let a = backend.render(&base, &config, None).unwrap();
    let b = backend.render(&base, &config, None).unwrap();

    assert_eq!(a.width, 320);
    assert_eq!(a.height, 200);
    assert_eq!(a.data.len(), 320 * 200 * 4);
    assert_eq!(digest_u64(&a.data), digest_u64(&b.data));
}

#[test]
fn logo_single_draws_processed_logo_centered() {
    // 100px base at 10% scale: the logo lands at its native 10x10 size.
    let base = white_base(100, 100);
    let config = WatermarkConfig {
        kind: WatermarkKind::Logo,
        layout_mode: LayoutMode::Single,
        opacity: 1.0,
        rotate: 0.0,
        logo: aquamark::LogoConfig {
            scale: 10.0,
            remove_background: true,
            enable_colorize: true,
            logo_color: "#FF0000".to_owned(),
        },
        ..WatermarkConfig::default()
    };

    let mut backend = RasterBackend::new();
    let frame = backend
        .render(&base, &config, Some(&white_logo_black_center()))
        .unwrap();

    // Center of the logo's black square, tinted red at full opacity.
    let center = pixel(&frame, 50, 50);
    assert!(center[0] > 200 && center[1] < 60 && center[2] < 60, "center {center:?} not red");

    // The logo's removed background leaves the base untouched right next to
    // the silhouette, and far corners are never reached in Single mode.
    assert_eq!(pixel(&frame, 2, 2), [255, 255, 255, 255]);
    assert_eq!(pixel(&frame, 97, 50), [255, 255, 255, 255]);
}

#[test]
fn layer_opacity_blends_uniformly() {
    let base = white_base(60, 60);
    // Solid black logo, no background removal, half opacity: the covered
    // region must blend to mid-gray rather than full black.
    let logo = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
    let config = WatermarkConfig {
        kind: WatermarkKind::Logo,
        layout_mode: LayoutMode::Single,
        opacity: 0.5,
        rotate: 0.0,
        logo: aquamark::LogoConfig {
            scale: 20.0,
            ..Default::default()
        },
        ..WatermarkConfig::default()
    };

    let mut backend = RasterBackend::new();
    let frame = backend.render(&base, &config, Some(&logo)).unwrap();

    let center = pixel(&frame, 30, 30);
    assert!(
        (center[0] as i32 - 128).abs() <= 8,
        "expected ~50% gray at center, got {center:?}"
    );
}

#[test]
fn missing_logo_degrades_to_base_image() {
    let base = white_base(50, 40);
    let config = WatermarkConfig {
        kind: WatermarkKind::Logo,
        layout_mode: LayoutMode::Tile,
        ..WatermarkConfig::default()
    };

    let mut backend = RasterBackend::new();
    let frame = backend.render(&base, &config, None).unwrap();

    assert_eq!(frame.width, 50);
    assert_eq!(frame.height, 40);
    assert!(frame.data.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn invalid_config_fails_before_rendering() {
    let base = white_base(10, 10);
    let config = WatermarkConfig {
        opacity: 2.0,
        ..WatermarkConfig::default()
    };

    let mut backend = RasterBackend::new();
    assert!(backend.render(&base, &config, None).is_err());
}
