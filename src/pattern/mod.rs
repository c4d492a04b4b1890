//! Procedural image sources that need no input file.

use crate::{
    foundation::{core::Size, error::ForgeResult},
    raster::canvas::Canvas,
};

/// Striped band ("rainbow") textures.
pub mod bands;
/// Seeded starfield backgrounds.
pub mod starfield;

/// A deterministic pixel source: the same parameters always give the same canvas.
pub trait PatternGenerator {
    /// Synthesize a full canvas of `size`.
    fn generate(&self, size: Size) -> ForgeResult<Canvas>;
}

/// Manifest representation of a generated asset.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSpec {
    /// See [`starfield::StarfieldSpec`].
    Starfield(starfield::StarfieldSpec),
    /// See [`bands::BandSpec`].
    Bands(bands::BandSpec),
}

impl PatternSpec {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Starfield(_) => "starfield",
            Self::Bands(_) => "bands",
        }
    }
}

impl PatternGenerator for PatternSpec {
    fn generate(&self, size: Size) -> ForgeResult<Canvas> {
        match self {
            Self::Starfield(s) => s.generate(size),
            Self::Bands(b) => b.generate(size),
        }
    }
}
