//! Bounding-box measurement for one watermark instance, prior to placement.

use crate::config::{WatermarkConfig, WatermarkKind};

/// Fixed gap between logo and text inside a combo item, in pixels.
pub const COMBO_GAP_PX: f64 = 10.0;

/// Average glyph advance as a fraction of font size for the estimate metric.
const ESTIMATE_ADVANCE_RATIO: f64 = 0.6;

/// Measured bounding box of one watermark instance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ItemSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl ItemSize {
    /// A zero-area box; the geometry engine turns it into "draw nothing".
    pub const ZERO: ItemSize = ItemSize { width: 0.0, height: 0.0 };

    /// Whether this box has drawable area.
    pub fn is_drawable(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Estimate text bounds without glyph metrics.
///
/// Backends with a shaping engine use their own accurate advance widths; a
/// backend that generates declarative output before fonts are resolved falls
/// back to this character-count heuristic.
pub fn estimate_text_size(text: &str, font_size: f64) -> ItemSize {
    ItemSize {
        width: text.chars().count() as f64 * font_size * ESTIMATE_ADVANCE_RATIO,
        height: font_size,
    }
}

/// Compute the logo box from the configured scale and the logo's own aspect.
///
/// Scale is a percentage of the *base image* width; height always derives
/// from the processed logo's aspect ratio.
pub fn logo_item_size(base_width: f64, scale_percent: f64, logo_px: (u32, u32)) -> ItemSize {
    let (lw, lh) = logo_px;
    if lw == 0 || lh == 0 {
        return ItemSize::ZERO;
    }
    let width = base_width * (scale_percent / 100.0);
    ItemSize {
        width,
        height: width / (lw as f64 / lh as f64),
    }
}

/// Measure one instance of the configured watermark content.
///
/// `logo_px` is the pixel size of the processed logo raster, when one is
/// loaded. `text_size` is the backend's own glyph metric for the configured
/// text, when it has one; `None` selects the estimate.
///
/// Logo kinds without a loaded logo measure `{0, 0}`: the geometry engine
/// then yields no positions and nothing is drawn. Missing assets degrade,
/// they do not error.
pub fn measure_item(
    config: &WatermarkConfig,
    base_width: f64,
    logo_px: Option<(u32, u32)>,
    text_size: Option<ItemSize>,
) -> ItemSize {
    let text = || text_size.unwrap_or_else(|| estimate_text_size(&config.text, config.font_size));

    match config.kind {
        WatermarkKind::Text => text(),
        WatermarkKind::Logo => match logo_px {
            Some(px) => logo_item_size(base_width, config.logo.scale, px),
            None => ItemSize::ZERO,
        },
        WatermarkKind::Combo => match logo_px {
            Some(px) => {
                let logo = logo_item_size(base_width, config.logo.scale, px);
                let text = text();
                ItemSize {
                    width: logo.width + COMBO_GAP_PX + text.width,
                    height: logo.height.max(text.height),
                }
            }
            None => ItemSize::ZERO,
        },
    }
}
