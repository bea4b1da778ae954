//! Sequential batch export with per-item fault isolation.
//!
//! One decoded raster and one watermark layer are resident at a time, which
//! bounds peak memory for large batches. A failing item is recorded and the
//! batch moves on; partial success is an expected outcome that the caller
//! grades, not an error.

use image::RgbaImage;

use crate::assets::decode::decode_image;
use crate::config::WatermarkConfig;
use crate::foundation::error::{AquamarkError, AquamarkResult};
use crate::render::{RenderBackend, encode_png};

/// One input image for batch processing.
pub struct BatchItem {
    /// Source file name; used for reporting and output naming.
    pub name: String,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

/// A successfully watermarked batch item.
pub struct BatchOutput {
    /// Source file name.
    pub name: String,
    /// Suggested output file name (`watermarked_<stem>.png`).
    pub file_name: String,
    /// PNG-encoded composited image.
    pub png: Vec<u8>,
}

/// A failed batch item, kept alongside the successes.
pub struct BatchFailure {
    /// Source file name.
    pub name: String,
    /// What went wrong for this item.
    pub error: AquamarkError,
}

/// Aggregate result of a batch run.
#[derive(Default)]
pub struct BatchReport {
    /// Items that produced output, in input order.
    pub outputs: Vec<BatchOutput>,
    /// Items that failed, in input order.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Total number of items attempted.
    pub fn attempted(&self) -> usize {
        self.outputs.len() + self.failures.len()
    }

    /// Whether the run produced no output at all despite having input.
    pub fn nothing_succeeded(&self) -> bool {
        self.outputs.is_empty() && !self.failures.is_empty()
    }
}

/// Suggested output name for a processed input: `watermarked_<stem>.png`.
pub fn output_file_name(input: &str) -> String {
    let stem = match input.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => input,
    };
    format!("watermarked_{stem}.png")
}

/// Watermark every item sequentially, collecting successes and failures.
///
/// The config is validated once up front; a malformed config fails the whole
/// request before any item is touched. After that no per-item error aborts
/// the run. `progress` is invoked before each item with
/// `(index, total, name)`.
pub fn watermark_batch(
    items: Vec<BatchItem>,
    config: &WatermarkConfig,
    logo: Option<&RgbaImage>,
    backend: &mut dyn RenderBackend,
    mut progress: impl FnMut(usize, usize, &str),
) -> AquamarkResult<BatchReport> {
    config.validate()?;

    let total = items.len();
    let mut report = BatchReport::default();

    for (index, item) in items.into_iter().enumerate() {
        progress(index, total, &item.name);

        match process_one(&item, config, logo, backend) {
            Ok(png) => {
                tracing::info!(name = %item.name, index, total, "batch item watermarked");
                report.outputs.push(BatchOutput {
                    file_name: output_file_name(&item.name),
                    name: item.name,
                    png,
                });
            }
            Err(error) => {
                tracing::warn!(name = %item.name, index, total, %error, "batch item failed");
                report.failures.push(BatchFailure { name: item.name, error });
            }
        }
    }

    Ok(report)
}

fn process_one(
    item: &BatchItem,
    config: &WatermarkConfig,
    logo: Option<&RgbaImage>,
    backend: &mut dyn RenderBackend,
) -> AquamarkResult<Vec<u8>> {
    let base = decode_image(&item.bytes)?;
    let frame = backend.render(&base, config, logo)?;
    encode_png(&frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_naming_replaces_extension() {
        assert_eq!(output_file_name("photo.jpeg"), "watermarked_photo.png");
        assert_eq!(output_file_name("archive.tar.gz"), "watermarked_archive.tar.png");
        assert_eq!(output_file_name("noext"), "watermarked_noext.png");
        assert_eq!(output_file_name(".hidden"), "watermarked_.hidden.png");
    }

    #[test]
    fn empty_batch_reports_nothing() {
        let report = BatchReport::default();
        assert_eq!(report.attempted(), 0);
        assert!(!report.nothing_succeeded());
    }
}
