//! Interactive pixel backend on `vello_cpu`.
//!
//! Drives live preview and the plain-buffer export path. The watermark field
//! is drawn into a single opacity layer so overlapping tiles flatten before
//! the alpha blend against the base image.

use std::sync::Arc;

use image::RgbaImage;
use kurbo::{Affine, Point};

use crate::assets::decode::PreparedImage;
use crate::assets::fonts::{FontResolver, NoTheme, parse_font_weight, resolve_font_family};
use crate::config::{WatermarkConfig, WatermarkKind};
use crate::foundation::core::check_dimensions;
use crate::foundation::error::{AquamarkError, AquamarkResult};
use crate::geometry::tile_positions;
use crate::logo::process_logo;
use crate::measure::{COMBO_GAP_PX, ItemSize, logo_item_size, measure_item};
use crate::render::composite::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::render::{RenderBackend, RenderedImage};

/// RGBA8 brush color carried through Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct TextBrushRgba8 {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

/// Stateful helper for building Parley layouts against the system font
/// collection.
struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl TextLayoutEngine {
    fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape and lay out a single run of plain text.
    fn layout_plain(
        &mut self,
        text: &str,
        family_stack: &str,
        weight: f32,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> AquamarkResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(AquamarkError::validation("text size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_stack.to_owned())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(weight),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// Pixel-buffer render backend (`vello_cpu` substrate).
pub struct RasterBackend {
    text_engine: TextLayoutEngine,
    font_resolver: Box<dyn FontResolver>,
}

impl Default for RasterBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterBackend {
    /// Backend with no theme: `var(--x)` font references fall back to
    /// sans-serif.
    pub fn new() -> Self {
        Self::with_font_resolver(Box::new(NoTheme))
    }

    /// Backend with an injected theme lookup for symbolic font references.
    pub fn with_font_resolver(font_resolver: Box<dyn FontResolver>) -> Self {
        Self {
            text_engine: TextLayoutEngine::new(),
            font_resolver,
        }
    }

    fn draw_text_layout(
        ctx: &mut vello_cpu::RenderContext,
        layout: &parley::Layout<TextBrushRgba8>,
        transform: Affine,
    ) {
        ctx.set_transform(affine_to_cpu(transform));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let brush = glyph_run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let glyphs: Vec<vello_cpu::Glyph> = glyph_run
                    .glyphs()
                    .map(|g| {
                        let gx = x + g.x;
                        let gy = y - g.y;
                        x += g.advance;
                        vello_cpu::Glyph {
                            id: g.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();
                ctx.glyph_run(font)
                    .font_size(run.font_size())
                    .fill_glyphs(glyphs.into_iter());
            }
        }
    }

    fn draw_logo_paint(
        ctx: &mut vello_cpu::RenderContext,
        paint: &LogoPaint,
        transform: Affine,
        box_size: ItemSize,
    ) {
        // Scale the natural raster into its measured box; the image paint is
        // anchored at the rect origin in user space.
        let scaled = transform
            * Affine::scale_non_uniform(
                box_size.width / paint.width as f64,
                box_size.height / paint.height as f64,
            );
        ctx.set_transform(affine_to_cpu(scaled));
        ctx.set_paint(paint.paint.clone());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            paint.width as f64,
            paint.height as f64,
        ));
    }
}

impl RenderBackend for RasterBackend {
    fn render(
        &mut self,
        base: &PreparedImage,
        config: &WatermarkConfig,
        logo: Option<&RgbaImage>,
    ) -> AquamarkResult<RenderedImage> {
        config.validate()?;
        let (width, height) = (base.width(), base.height());
        check_dimensions(width, height)?;
        let w16 = dim_u16(width)?;
        let h16 = dim_u16(height)?;

        // Independent pixel-pass implementation of the logo transform; the
        // SVG backend expresses the same rules declaratively.
        let processed_logo = match (config.uses_logo(), logo) {
            (true, Some(raw)) => Some(process_logo(
                raw,
                config.logo.remove_background,
                config.logo.enable_colorize,
                &config.logo.logo_color,
            )),
            _ => None,
        };
        let logo_px = processed_logo.as_ref().map(|l| (l.width(), l.height()));

        let layout = if config.uses_text() && !config.text.is_empty() {
            let family = resolve_font_family(&config.font, self.font_resolver.as_ref());
            let weight = parse_font_weight(&config.font_weight);
            let brush = TextBrushRgba8 {
                r: config.color.r,
                g: config.color.g,
                b: config.color.b,
                a: 255,
            };
            Some(self.text_engine.layout_plain(
                &config.text,
                &family,
                weight,
                config.font_size as f32,
                brush,
            )?)
        } else {
            None
        };
        let text_size = layout.as_ref().map(|l| ItemSize {
            width: l.width() as f64,
            height: l.height() as f64,
        });

        let item = measure_item(config, width as f64, logo_px, text_size);
        let positions = tile_positions(
            width as f64,
            height as f64,
            config.gap_x,
            config.gap_y,
            config.layout_mode,
            item,
        );

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);

        let base_paint = rgba_straight_to_image_premul(base.rgba.as_raw(), width, height)?;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(base_paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            width as f64,
            height as f64,
        ));

        if item.is_drawable() && !positions.is_empty() && config.opacity > 0.0 {
            let logo_paint = match &processed_logo {
                Some(l) => Some(LogoPaint {
                    paint: rgba_straight_to_image_premul(l.as_raw(), l.width(), l.height())?,
                    width: l.width(),
                    height: l.height(),
                }),
                None => None,
            };

            // One layer for the whole field: tiles flatten first, then the
            // uniform opacity blend happens once against the base.
            ctx.push_opacity_layer(config.opacity as f32);

            let frame = Affine::translate((
                width as f64 / 2.0 + config.offset_x,
                height as f64 / 2.0 + config.offset_y,
            )) * Affine::rotate(config.rotate.to_radians());

            for pos in &positions {
                self.draw_item(&mut ctx, config, frame, *pos, item, &layout, &logo_paint, width);
            }

            ctx.pop_layer();
        } else {
            tracing::debug!(
                kind = ?config.kind,
                "watermark item not drawable; rendering base image only"
            );
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        RenderedImage::checked(width, height, data)
    }
}

impl RasterBackend {
    #[allow(clippy::too_many_arguments)]
    fn draw_item(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        config: &WatermarkConfig,
        frame: Affine,
        pos: Point,
        item: ItemSize,
        layout: &Option<parley::Layout<TextBrushRgba8>>,
        logo_paint: &Option<LogoPaint>,
        base_width: u32,
    ) {
        match config.kind {
            WatermarkKind::Text => {
                if let Some(layout) = layout {
                    let tw = layout.width() as f64;
                    let th = layout.height() as f64;
                    let tr = frame * Affine::translate((pos.x - tw / 2.0, pos.y - th / 2.0));
                    Self::draw_text_layout(ctx, layout, tr);
                }
            }
            WatermarkKind::Logo => {
                if let Some(paint) = logo_paint {
                    let tr = frame
                        * Affine::translate((
                            pos.x - item.width / 2.0,
                            pos.y - item.height / 2.0,
                        ));
                    Self::draw_logo_paint(ctx, paint, tr, item);
                }
            }
            WatermarkKind::Combo => {
                let Some(paint) = logo_paint else {
                    return;
                };
                let logo_box = logo_item_size(
                    base_width as f64,
                    config.logo.scale,
                    (paint.width, paint.height),
                );
                let start_x = pos.x - item.width / 2.0;

                let logo_tr =
                    frame * Affine::translate((start_x, pos.y - logo_box.height / 2.0));
                Self::draw_logo_paint(ctx, paint, logo_tr, logo_box);

                if let Some(layout) = layout {
                    let th = layout.height() as f64;
                    let text_tr = frame
                        * Affine::translate((
                            start_x + logo_box.width + COMBO_GAP_PX,
                            pos.y - th / 2.0,
                        ));
                    Self::draw_text_layout(ctx, layout, text_tr);
                }
            }
        }
    }
}

struct LogoPaint {
    paint: vello_cpu::Image,
    width: u32,
    height: u32,
}

fn dim_u16(v: u32) -> AquamarkResult<u16> {
    v.try_into()
        .map_err(|_| AquamarkError::validation(format!("dimension {v} exceeds u16 pixel space")))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> AquamarkResult<vello_cpu::Pixmap> {
    let w = dim_u16(width)?;
    let h = dim_u16(height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(AquamarkError::render("pixmap byte len mismatch"));
    }

    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn rgba_straight_to_image_premul(
    bytes_rgba: &[u8],
    width: u32,
    height: u32,
) -> AquamarkResult<vello_cpu::Image> {
    let mut tmp = bytes_rgba.to_vec();
    premultiply_rgba8_in_place(&mut tmp);
    let pixmap = pixmap_from_premul_bytes(&tmp, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}
