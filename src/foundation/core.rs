pub use kurbo::{Affine, Point, Rect, Vec2};

/// Hard cap on raster dimensions accepted by either backend.
///
/// `vello_cpu` pixmaps address with `u16` coordinates, and anything beyond
/// this is a pathological allocation for a watermarking workload anyway.
pub const MAX_DIM: u32 = 16_384;

/// Validate raster dimensions against [`MAX_DIM`] and zero.
pub fn check_dimensions(width: u32, height: u32) -> crate::AquamarkResult<()> {
    use crate::foundation::error::AquamarkError;

    if width == 0 || height == 0 {
        return Err(AquamarkError::validation(format!(
            "image dimensions must be non-zero (got {width}x{height})"
        )));
    }
    if width > MAX_DIM || height > MAX_DIM {
        return Err(AquamarkError::validation(format!(
            "image too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_oversized() {
        assert!(check_dimensions(0, 10).is_err());
        assert!(check_dimensions(10, 0).is_err());
        assert!(check_dimensions(MAX_DIM + 1, 10).is_err());
        assert!(check_dimensions(1920, 1080).is_ok());
    }
}
