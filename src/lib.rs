//! panelforge turns source images and procedural patterns into packed 16-bit (RGB565) frames
//! for fixed-resolution embedded displays.
//!
//! The pipeline is:
//!
//! - build a full-precision [`Canvas`] with the [`Compositor`] or a [`PatternGenerator`]
//! - pack each pixel with the [`color::codec`] and the asset's [`ColorFormatPolicy`]
//! - write exactly `width * height * 2` bytes with [`serialize::frame`]
//!
//! A JSON [`Manifest`] lists the assets; [`build`] runs them as a batch and returns a
//! [`BatchReport`] without ever aborting on a single asset.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod color;
pub mod compose;
pub mod pattern;
pub mod pipeline;
/// Full-precision canvas.
pub mod raster;
pub mod serialize;

pub use crate::foundation::core::{Dimensions, Point, Rgb8, Size};
pub use crate::foundation::error::{ForgeError, ForgeResult};
pub use crate::foundation::math::Rng64;

pub use crate::color::policy::{ByteOrder, ColorFormatPolicy, PolicyPreset, PolicySpec};
pub use crate::compose::compositor::Compositor;
pub use crate::compose::model::{
    Background, CompositionSpec, ElementSpec, FontSpec, Placement, Resample, ResizeSpec,
    TextPlacement, TextSpec,
};
pub use crate::pattern::{PatternGenerator, PatternSpec};
pub use crate::pipeline::driver::{
    AssetReport, AssetStatus, BatchReport, BatchSummary, BuildOptions, build,
};
pub use crate::pipeline::manifest::{AssetSource, AssetSpec, Manifest};
pub use crate::pipeline::series::{FrameSource, SeriesSpec};
pub use crate::raster::canvas::Canvas;
