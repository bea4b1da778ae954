//! Explicit session state for interactive use.
//!
//! Replaces ambient global stores: the image set, selection, config, and
//! logo live in one value that callers own, and every mutation goes through
//! a named operation. Rendering reads the session and owns no state of its
//! own, so re-rendering after any mutation is idempotent.

use image::RgbaImage;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::config::WatermarkConfig;
use crate::foundation::error::AquamarkResult;
use crate::render::{RenderBackend, RenderedImage};

/// One uploaded image, identified by its (unique) file name.
pub struct SessionImage {
    /// File name; doubles as the image's identifier.
    pub name: String,
    /// Decoded raster.
    pub image: PreparedImage,
}

/// Interactive editing session: image set, selection, config, logo.
#[derive(Default)]
pub struct WatermarkSession {
    images: Vec<SessionImage>,
    selected: Option<usize>,
    config: WatermarkConfig,
    logo: Option<RgbaImage>,
}

impl WatermarkSession {
    /// Empty session with the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current configuration.
    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    /// Currently selected image, if any.
    pub fn selected(&self) -> Option<&SessionImage> {
        self.selected.and_then(|i| self.images.get(i))
    }

    /// Names of all images in upload order.
    pub fn image_names(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(|i| i.name.as_str())
    }

    /// Add images, skipping duplicates by name. If nothing was selected yet,
    /// the first new image becomes the selection.
    pub fn add_images(&mut self, new_images: impl IntoIterator<Item = SessionImage>) {
        for img in new_images {
            if self.images.iter().any(|existing| existing.name == img.name) {
                continue;
            }
            self.images.push(img);
            if self.selected.is_none() {
                self.selected = Some(self.images.len() - 1);
            }
        }
    }

    /// Decode `bytes` and add the result under `name`.
    pub fn add_image_bytes(&mut self, name: impl Into<String>, bytes: &[u8]) -> AquamarkResult<()> {
        let image = decode_image(bytes)?;
        self.add_images([SessionImage { name: name.into(), image }]);
        Ok(())
    }

    /// Remove an image by name. If it was selected, selection moves to the
    /// first remaining image (or clears).
    pub fn remove_image(&mut self, name: &str) {
        let Some(idx) = self.images.iter().position(|i| i.name == name) else {
            return;
        };
        self.images.remove(idx);
        self.selected = match self.selected {
            Some(sel) if sel == idx => (!self.images.is_empty()).then_some(0),
            Some(sel) if sel > idx => Some(sel - 1),
            other => other,
        };
    }

    /// Select an image by name; returns whether it exists.
    pub fn select_image(&mut self, name: &str) -> bool {
        match self.images.iter().position(|i| i.name == name) {
            Some(idx) => {
                self.selected = Some(idx);
                true
            }
            None => false,
        }
    }

    /// Replace (or clear) the logo raster.
    pub fn set_logo(&mut self, logo: Option<RgbaImage>) {
        self.logo = logo;
    }

    /// Current logo raster, if any.
    pub fn logo(&self) -> Option<&RgbaImage> {
        self.logo.as_ref()
    }

    /// Apply a config mutation, validating the result. An invalid mutation
    /// is rolled back and the error returned; the session keeps its previous
    /// config.
    pub fn update_config(
        &mut self,
        mutate: impl FnOnce(&mut WatermarkConfig),
    ) -> AquamarkResult<()> {
        let mut next = self.config.clone();
        mutate(&mut next);
        next.validate()?;
        self.config = next;
        Ok(())
    }

    /// Restore the default configuration.
    pub fn reset_config(&mut self) {
        self.config = WatermarkConfig::default();
    }

    /// Render the selected image with the current config and logo.
    ///
    /// Returns `None` when no image is selected. Everything (logo
    /// processing, measurement, geometry) is recomputed from current state;
    /// nothing is cached across calls.
    pub fn render_selected(
        &self,
        backend: &mut dyn RenderBackend,
    ) -> AquamarkResult<Option<RenderedImage>> {
        let Some(img) = self.selected() else {
            return Ok(None);
        };
        backend
            .render(&img.image, &self.config, self.logo.as_ref())
            .map(Some)
    }
}
