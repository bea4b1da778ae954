//! Aquamark is a watermark placement and compositing engine.
//!
//! Given a base image and a [`WatermarkConfig`] (text, logo, or combo
//! content; rotation, opacity, offset, tiling density), it computes where
//! every watermark instance lands and composites the result — identically
//! whether the target is an interactive preview or a batch export:
//!
//! - [`RasterBackend`] draws pixels directly (interactive preview and the
//!   plain-buffer export path)
//! - [`SvgOverlayBackend`] describes the layer declaratively and rasterizes
//!   it (server/bulk export path)
//!
//! Both backends share the pure geometry and measurement modules; they must
//! agree on positions, sizes, and pixel-decision rules, though their glyph
//! metrics may differ slightly.
#![forbid(unsafe_code)]

mod foundation;

pub mod assets;
pub mod batch;
pub mod config;
pub mod geometry;
pub mod logo;
pub mod measure;
pub mod render;
pub mod session;

pub use crate::foundation::core::{Affine, MAX_DIM, Point, Rect, Vec2};
pub use crate::foundation::error::{AquamarkError, AquamarkResult};

pub use crate::assets::color::Rgb;
pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::fonts::{FontResolver, NoTheme};
pub use crate::batch::{BatchItem, BatchReport, watermark_batch};
pub use crate::config::{LayoutMode, LogoConfig, WatermarkConfig, WatermarkKind};
pub use crate::render::raster::RasterBackend;
pub use crate::render::svg::SvgOverlayBackend;
pub use crate::render::{
    BackendKind, RenderBackend, RenderedImage, create_backend, encode_jpeg, encode_png,
};
pub use crate::session::{SessionImage, WatermarkSession};
