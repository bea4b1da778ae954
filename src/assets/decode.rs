use image::RgbaImage;

use crate::foundation::error::{AquamarkError, AquamarkResult};

/// Decoded raster in straight-alpha RGBA8 form.
///
/// Straight alpha (not premultiplied) because the logo background threshold
/// is defined on raw channel values; backends premultiply at upload time.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Pixel data, row-major straight-alpha RGBA8.
    pub rgba: RgbaImage,
}

impl PreparedImage {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}

/// Decode an encoded image (PNG, JPEG, WebP, ...) from memory.
///
/// Failures surface as [`AquamarkError::Decode`]; they are fatal for the item
/// being processed but must not abort sibling items in a batch.
pub fn decode_image(bytes: &[u8]) -> AquamarkResult<PreparedImage> {
    if bytes.is_empty() {
        return Err(AquamarkError::decode("image buffer is empty"));
    }

    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| AquamarkError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    crate::foundation::core::check_dimensions(rgba.width(), rgba.height())?;

    Ok(PreparedImage { rgba })
}
