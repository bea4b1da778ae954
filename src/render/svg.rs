//! Declarative overlay backend on `usvg`/`resvg`.
//!
//! Used by the server/batch export path: the watermark layer is described as
//! an SVG document (one group per tile position inside a single rotated,
//! opacity-carrying pattern group), rasterized at the base image's exact
//! dimensions, and composited over the base raster.
//!
//! Logo background removal is expressed with a luminance mask instead of a
//! pixel pass: an SVG mask keeps pixels where mask luminance is high, so the
//! logo is inverted (`R' = 1 - R`, same for G/B) before use. White
//! background inverts to luminance 0 and is hidden; dark content inverts
//! toward 1 and is kept. Colorize paints a flat-color rect through the same
//! mask.

use std::fmt::Write as _;
use std::io::Cursor;
use std::sync::Arc;

use base64::Engine as _;
use image::RgbaImage;
use kurbo::Point;

use crate::assets::color::Rgb;
use crate::assets::decode::PreparedImage;
use crate::assets::fonts::{FontResolver, NoTheme, resolve_font_family};
use crate::config::{WatermarkConfig, WatermarkKind};
use crate::foundation::core::check_dimensions;
use crate::foundation::error::{AquamarkError, AquamarkResult};
use crate::geometry::tile_positions;
use crate::measure::{COMBO_GAP_PX, ItemSize, logo_item_size, measure_item};
use crate::render::composite::{over_in_place, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::render::{RenderBackend, RenderedImage};

/// Declarative overlay render backend (`usvg`/`resvg` substrate).
pub struct SvgOverlayBackend {
    fontdb: Arc<usvg::fontdb::Database>,
    font_resolver: Box<dyn FontResolver>,
}

impl Default for SvgOverlayBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgOverlayBackend {
    /// Backend with system fonts and no theme lookup.
    pub fn new() -> Self {
        Self::with_font_resolver(Box::new(NoTheme))
    }

    /// Backend with an injected theme lookup for symbolic font references.
    pub fn with_font_resolver(font_resolver: Box<dyn FontResolver>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self {
            fontdb: Arc::new(db),
            font_resolver,
        }
    }

    fn rasterize_overlay(&self, svg: &str, width: u32, height: u32) -> AquamarkResult<Vec<u8>> {
        let mut opts = usvg::Options::default();
        opts.fontdb = self.fontdb.clone();

        let tree = usvg::Tree::from_data(svg.as_bytes(), &opts)
            .map_err(|e| AquamarkError::render(format!("overlay svg parse failed: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| AquamarkError::render("failed to allocate overlay pixmap"))?;
        resvg::render(&tree, resvg::tiny_skia::Transform::identity(), &mut pixmap.as_mut());
        Ok(pixmap.data().to_vec())
    }
}

impl RenderBackend for SvgOverlayBackend {
    fn render(
        &mut self,
        base: &PreparedImage,
        config: &WatermarkConfig,
        logo: Option<&RgbaImage>,
    ) -> AquamarkResult<RenderedImage> {
        config.validate()?;
        let (width, height) = (base.width(), base.height());
        check_dimensions(width, height)?;

        let logo = if config.uses_logo() { logo } else { None };
        let logo_px = logo.map(|l| (l.width(), l.height()));

        let item = measure_item(config, width as f64, logo_px, None);
        let positions = tile_positions(
            width as f64,
            height as f64,
            config.gap_x,
            config.gap_y,
            config.layout_mode,
            item,
        );

        // Base pixels in premultiplied form; the overlay blends over them.
        let mut out = base.rgba.as_raw().clone();
        premultiply_rgba8_in_place(&mut out);

        if item.is_drawable() && !positions.is_empty() && config.opacity > 0.0 {
            let embedded_logo = logo.map(encode_logo_data_uri).transpose()?;
            let logo_box =
                logo_px.map(|px| logo_item_size(width as f64, config.logo.scale, px));
            let svg = generate_overlay_svg(
                width,
                height,
                config,
                item,
                logo_box,
                &positions,
                embedded_logo.as_deref(),
                self.font_resolver.as_ref(),
            );
            tracing::debug!(bytes = svg.len(), tiles = positions.len(), "overlay svg generated");

            let overlay = self.rasterize_overlay(&svg, width, height)?;
            over_in_place(&mut out, &overlay, 1.0)?;
        } else {
            tracing::debug!(
                kind = ?config.kind,
                "watermark item not drawable; passing base image through"
            );
        }

        unpremultiply_rgba8_in_place(&mut out);
        RenderedImage::checked(width, height, out)
    }
}

/// Re-encode the raw logo as a PNG data URI for `<image href>` embedding.
fn encode_logo_data_uri(logo: &RgbaImage) -> AquamarkResult<String> {
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(logo.clone())
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| AquamarkError::render(format!("logo png re-encode failed: {e}")))?;
    Ok(format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    ))
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Luminance-inversion color matrix: `C' = 1 - C` per RGB channel, alpha
/// unchanged. Turns a black-on-white logo into the white-on-black raster an
/// SVG luminance mask needs.
const INVERT_LUMINANCE_MATRIX: &str =
    "-1 0 0 0 1  -1 0 0 0 1  -1 0 0 0 1  0 0 0 1 0";

#[allow(clippy::too_many_arguments)]
fn generate_overlay_svg(
    width: u32,
    height: u32,
    config: &WatermarkConfig,
    item: ItemSize,
    logo_box: Option<ItemSize>,
    positions: &[Point],
    logo_data_uri: Option<&str>,
    font_resolver: &dyn FontResolver,
) -> String {
    let cx = width as f64 / 2.0 + config.offset_x;
    let cy = height as f64 / 2.0 + config.offset_y;

    let family = xml_escape(&resolve_font_family(&config.font, font_resolver));
    let text = xml_escape(&config.text);
    let fill = config.color.to_css();
    let weight = xml_escape(&config.font_weight);

    // Only meaningful when a logo is actually embedded.
    let logo_box = logo_data_uri.and(logo_box);

    let mut defs = String::new();
    let needs_mask = config.logo.remove_background && logo_data_uri.is_some();
    if needs_mask {
        let (uri, lb) = (logo_data_uri.unwrap(), logo_box.unwrap());
        let _ = write!(
            defs,
            r#"<filter id="invert-luminance"><feColorMatrix type="matrix" values="{INVERT_LUMINANCE_MATRIX}"/></filter><mask id="logo-mask"><image href="{uri}" width="{w}" height="{h}" filter="url(#invert-luminance)"/></mask>"#,
            w = lb.width,
            h = lb.height,
        );
    }

    // The logo element at its local origin (top-left of the logo box).
    let logo_element = logo_data_uri.map(|uri| {
        let lb = logo_box.unwrap();
        if needs_mask {
            if config.logo.enable_colorize {
                let tint = Rgb::parse_or_black(&config.logo.logo_color).to_css();
                format!(
                    r#"<rect width="{w}" height="{h}" fill="{tint}" mask="url(#logo-mask)"/>"#,
                    w = lb.width,
                    h = lb.height,
                )
            } else {
                format!(
                    r#"<image href="{uri}" width="{w}" height="{h}" mask="url(#logo-mask)"/>"#,
                    w = lb.width,
                    h = lb.height,
                )
            }
        } else {
            format!(
                r#"<image href="{uri}" width="{w}" height="{h}"/>"#,
                w = lb.width,
                h = lb.height,
            )
        }
    });

    let mut elements = String::new();
    for p in positions {
        match config.kind {
            WatermarkKind::Text => {
                let _ = write!(
                    elements,
                    r#"<text x="{x}" y="{y}" fill="{fill}" font-family="{family}" font-size="{size}" font-weight="{weight}" text-anchor="middle" dominant-baseline="middle">{text}</text>"#,
                    x = p.x,
                    y = p.y,
                    size = config.font_size,
                );
            }
            WatermarkKind::Logo => {
                if let (Some(el), Some(lb)) = (&logo_element, logo_box) {
                    let _ = write!(
                        elements,
                        r#"<g transform="translate({x}, {y})">{el}</g>"#,
                        x = p.x - lb.width / 2.0,
                        y = p.y - lb.height / 2.0,
                    );
                }
            }
            WatermarkKind::Combo => {
                if let (Some(el), Some(lb)) = (&logo_element, logo_box) {
                    let start_x = p.x - item.width / 2.0;
                    let text_x = start_x + lb.width + COMBO_GAP_PX;
                    let _ = write!(
                        elements,
                        r#"<g transform="translate({lx}, {ly})">{el}</g><text x="{tx}" y="{ty}" fill="{fill}" font-family="{family}" font-size="{size}" font-weight="{weight}" dominant-baseline="middle">{text}</text>"#,
                        lx = start_x,
                        ly = p.y - lb.height / 2.0,
                        tx = text_x,
                        ty = p.y,
                        size = config.font_size,
                    );
                }
            }
        }
    }

    format!(
        r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg"><defs>{defs}</defs><g opacity="{opacity}"><g transform="translate({cx}, {cy}) rotate({rotate})">{elements}</g></g></svg>"#,
        opacity = config.opacity,
        rotate = config.rotate,
    )
}
