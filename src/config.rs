use serde::{Deserialize, Serialize};

use crate::assets::color::Rgb;
use crate::foundation::error::{AquamarkError, AquamarkResult};

/// What the watermark item is made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    /// A single line of text.
    Text,
    /// A logo raster.
    Logo,
    /// Logo and text side by side with a fixed gap.
    Combo,
}

/// One instance at the pattern origin, or a rotated repeating grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Exactly one instance at the pattern origin.
    Single,
    /// A grid of instances covering the image under any rotation.
    Tile,
}

/// Logo-specific watermark settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoConfig {
    /// Logo width as a percentage of the *base image* width, in `[1, 100]`.
    /// Aspect ratio is always preserved; height derives from width.
    pub scale: f64,
    /// Make near-white pixels fully transparent.
    pub remove_background: bool,
    /// Tint the remaining (non-transparent) pixels with `logo_color`.
    /// Only takes effect while `remove_background` is active.
    pub enable_colorize: bool,
    /// Tint as `#RRGGBB`; malformed values degrade to black at use site.
    pub logo_color: String,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            scale: 20.0,
            remove_background: false,
            enable_colorize: false,
            logo_color: "#000000".to_owned(),
        }
    }
}

/// Immutable-per-render watermark configuration.
///
/// The serde wire format uses the camelCase JSON schema of the hosting
/// application (`type`, `gapX`, `layoutMode`, ...), so configs interchange
/// directly with upload forms and stored presets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatermarkConfig {
    /// Watermark content kind.
    #[serde(rename = "type")]
    pub kind: WatermarkKind,
    /// Uniform alpha for the whole watermark layer, in `[0, 1]`.
    pub opacity: f64,
    /// Rotation of the tiled field as a unit, degrees in `[-180, 180]`.
    pub rotate: f64,
    /// Horizontal spacing between tiled instances, pre-rotation, `>= 0`.
    pub gap_x: f64,
    /// Vertical spacing between tiled instances, pre-rotation, `>= 0`.
    pub gap_y: f64,
    /// Horizontal translation of the pattern origin, in image pixels.
    pub offset_x: f64,
    /// Vertical translation of the pattern origin, in image pixels.
    pub offset_y: f64,
    /// Single instance or repeating grid.
    pub layout_mode: LayoutMode,
    /// Watermark text (Text and Combo kinds).
    pub text: String,
    /// Font size in pixels, `> 0`.
    pub font_size: f64,
    /// Text fill color.
    pub color: Rgb,
    /// Font family, possibly a theme reference like `var(--font-display)`.
    pub font: String,
    /// CSS-ish font weight ("normal", "bold", or a number).
    pub font_weight: String,
    /// Logo settings (Logo and Combo kinds).
    pub logo: LogoConfig,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            kind: WatermarkKind::Text,
            opacity: 0.5,
            rotate: -45.0,
            gap_x: 100.0,
            gap_y: 100.0,
            offset_x: 0.0,
            offset_y: 0.0,
            layout_mode: LayoutMode::Tile,
            text: "Watermark".to_owned(),
            font_size: 40.0,
            color: Rgb::BLACK,
            font: "sans-serif".to_owned(),
            font_weight: "bold".to_owned(),
            logo: LogoConfig::default(),
        }
    }
}

impl WatermarkConfig {
    /// Parse a config from its JSON wire format and validate it.
    pub fn from_json(json: &str) -> AquamarkResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| AquamarkError::serde(format!("watermark config parse failed: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check field ranges. Called before any rendering is attempted; a
    /// malformed config fails the whole request (missing assets do not).
    pub fn validate(&self) -> AquamarkResult<()> {
        fn finite(name: &str, v: f64) -> AquamarkResult<()> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(AquamarkError::validation(format!("{name} must be finite")))
            }
        }

        finite("opacity", self.opacity)?;
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(AquamarkError::validation("opacity must be in [0, 1]"));
        }
        finite("rotate", self.rotate)?;
        if !(-180.0..=180.0).contains(&self.rotate) {
            return Err(AquamarkError::validation("rotate must be in [-180, 180] degrees"));
        }
        finite("gapX", self.gap_x)?;
        finite("gapY", self.gap_y)?;
        if self.gap_x < 0.0 || self.gap_y < 0.0 {
            return Err(AquamarkError::validation("gapX/gapY must be >= 0"));
        }
        finite("offsetX", self.offset_x)?;
        finite("offsetY", self.offset_y)?;
        finite("fontSize", self.font_size)?;
        if self.font_size <= 0.0 {
            return Err(AquamarkError::validation("fontSize must be > 0"));
        }
        finite("logo.scale", self.logo.scale)?;
        if !(1.0..=100.0).contains(&self.logo.scale) {
            return Err(AquamarkError::validation("logo.scale must be in [1, 100] percent"));
        }
        Ok(())
    }

    /// Whether this config draws text.
    pub fn uses_text(&self) -> bool {
        matches!(self.kind, WatermarkKind::Text | WatermarkKind::Combo)
    }

    /// Whether this config draws a logo.
    pub fn uses_logo(&self) -> bool {
        matches!(self.kind, WatermarkKind::Logo | WatermarkKind::Combo)
    }
}
