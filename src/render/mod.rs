//! Render backends and output encoding.
//!
//! Two substrates implement the same compositing contract: the interactive
//! pixel backend ([`raster::RasterBackend`]) and the declarative overlay
//! backend ([`svg::SvgOverlayBackend`]). Both consume the shared geometry
//! and measurement modules; only the final draw/composite step differs, and
//! the two must agree on positions, sizes, and pixel-decision rules.

pub mod composite;
pub mod raster;
pub mod svg;

use std::io::Cursor;

use image::RgbaImage;

use crate::assets::decode::PreparedImage;
use crate::config::WatermarkConfig;
use crate::foundation::error::{AquamarkError, AquamarkResult};

/// JPEG encode quality for the interactive export path.
pub const JPEG_EXPORT_QUALITY: u8 = 95;

/// A composited output frame as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct RenderedImage {
    /// Width in pixels; always equals the base image width.
    pub width: u32,
    /// Height in pixels; always equals the base image height.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, straight alpha.
    pub data: Vec<u8>,
}

impl RenderedImage {
    /// Reject empty or inconsistent pixel buffers.
    ///
    /// Backends call this before returning: a silent blank result is treated
    /// the same as a decode failure by callers, so it must never escape.
    pub fn checked(width: u32, height: u32, data: Vec<u8>) -> AquamarkResult<Self> {
        if width == 0 || height == 0 || data.is_empty() {
            return Err(AquamarkError::empty_output(format!(
                "render produced an empty {width}x{height} frame"
            )));
        }
        let expected = (width as usize) * (height as usize) * 4;
        if data.len() != expected {
            return Err(AquamarkError::render(format!(
                "rendered buffer has {} bytes, expected {expected}",
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }
}

/// A backend that composites one watermark layer over a base image.
///
/// The contract both implementations uphold:
///
/// 1. output dimensions equal the base image's exactly;
/// 2. the base is drawn first, unmodified, at full opacity;
/// 3. all watermark instances are flattened into one layer which is then
///    composited over the base at `config.opacity` (overlapping tiles never
///    double-darken each other);
/// 4. the layer frame translates to image-center plus offset, then rotates;
/// 5. items draw centered on each geometry position.
///
/// `logo` is the *raw* decoded logo; each backend applies its own
/// background-removal/colorize implementation so the two stay independently
/// verifiable.
pub trait RenderBackend {
    /// Composite `config`'s watermark over `base`.
    fn render(
        &mut self,
        base: &PreparedImage,
        config: &WatermarkConfig,
        logo: Option<&RgbaImage>,
    ) -> AquamarkResult<RenderedImage>;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// Interactive pixel backend (`vello_cpu`).
    Raster,
    /// Declarative overlay backend (`usvg`/`resvg`), used by batch/export.
    SvgOverlay,
}

/// Create a rendering backend implementation.
pub fn create_backend(kind: BackendKind) -> Box<dyn RenderBackend> {
    match kind {
        BackendKind::Raster => Box::new(raster::RasterBackend::new()),
        BackendKind::SvgOverlay => Box::new(svg::SvgOverlayBackend::new()),
    }
}

/// Encode a rendered frame as PNG (the default output encoding).
pub fn encode_png(frame: &RenderedImage) -> AquamarkResult<Vec<u8>> {
    let img = RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| AquamarkError::render("rendered buffer does not match its dimensions"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| AquamarkError::render(format!("png encode failed: {e}")))?;

    if out.is_empty() {
        return Err(AquamarkError::empty_output("png encode produced 0 bytes"));
    }
    Ok(out)
}

/// Encode a rendered frame as JPEG at the interactive export quality.
///
/// Alpha is dropped (JPEG has none); use PNG wherever transparency matters.
pub fn encode_jpeg(frame: &RenderedImage) -> AquamarkResult<Vec<u8>> {
    let img = RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| AquamarkError::render("rendered buffer does not match its dimensions"))?;
    let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();

    let mut out = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_EXPORT_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| AquamarkError::render(format!("jpeg encode failed: {e}")))?;

    if out.is_empty() {
        return Err(AquamarkError::empty_output("jpeg encode produced 0 bytes"));
    }
    Ok(out)
}
