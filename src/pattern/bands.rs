use crate::{
    foundation::{
        core::{Rgb8, Size},
        error::{ForgeError, ForgeResult},
    },
    pattern::PatternGenerator,
    raster::canvas::Canvas,
};

/// Horizontal colour bands, each broken into repeating block/gap segments.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BandSpec {
    /// Band colours, top to bottom. One band per entry.
    pub colors: Vec<Rgb8>,
    /// Height of every band in pixels.
    pub band_height: u32,
    /// Colour of gap pixels and of rows below the last band.
    #[serde(default)]
    pub background: Rgb8,
    /// Segment layout within a band.
    pub mode: BandMode,
}

/// How block and gap segments repeat along a scanline.
///
/// The two modes are distinct textures and are not parameterisations of one another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandMode {
    /// One block then one gap per unit; the unit is shifted by half its width every
    /// `rows_per_shift` band-local rows, wrapping around the canvas width.
    Staggered {
        /// Block width in pixels.
        block: u32,
        /// Gap width in pixels.
        gap: u32,
        /// Rows between phase shifts; defaults to `block`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rows_per_shift: Option<u32>,
    },
    /// Three block/gap pairs per unit, no row offset.
    TripleBlock {
        /// Block width in pixels.
        block: u32,
        /// Gap width in pixels.
        gap: u32,
    },
}

impl BandMode {
    /// Whether band-local pixel `(x, row)` lies in a block segment.
    pub fn is_block(self, x: u32, row: u32, width: u32) -> bool {
        match self {
            Self::Staggered {
                block,
                gap,
                rows_per_shift,
            } => {
                let unit = block + gap;
                let rows_per_shift = rows_per_shift.unwrap_or(block).max(1);
                let row_offset = u64::from(row / rows_per_shift) * u64::from(unit / 2);
                let wrapped = (u64::from(x) + row_offset) % u64::from(width);
                wrapped % u64::from(unit) < u64::from(block)
            }
            Self::TripleBlock { block, gap } => {
                let pair = block + gap;
                let pos = x % (pair * 3);
                pos % pair < block
            }
        }
    }

    fn validate(self) -> ForgeResult<()> {
        let (block, gap) = match self {
            Self::Staggered { block, gap, .. } | Self::TripleBlock { block, gap } => (block, gap),
        };
        if block == 0 {
            return Err(ForgeError::validation("band block width must be > 0"));
        }
        if block.checked_add(gap).and_then(|u| u.checked_mul(3)).is_none() {
            return Err(ForgeError::validation("band block/gap widths overflow"));
        }
        Ok(())
    }
}

impl BandSpec {
    /// Check parameters before any allocation.
    pub fn validate(&self) -> ForgeResult<()> {
        if self.colors.is_empty() {
            return Err(ForgeError::validation("band pattern needs at least one colour"));
        }
        if self.band_height == 0 {
            return Err(ForgeError::validation("band_height must be > 0"));
        }
        self.mode.validate()
    }

    /// Total height covered by bands.
    pub fn pattern_height(&self) -> u64 {
        self.colors.len() as u64 * u64::from(self.band_height)
    }
}

impl PatternGenerator for BandSpec {
    fn generate(&self, size: Size) -> ForgeResult<Canvas> {
        self.validate()?;
        if self.pattern_height() != u64::from(size.height()) {
            tracing::debug!(
                bands = self.colors.len(),
                pattern_height = self.pattern_height(),
                canvas_height = size.height(),
                "band pattern height differs from canvas height"
            );
        }

        let mut canvas = Canvas::new(size, self.background);
        let width = size.width();
        for (band_idx, &color) in self.colors.iter().enumerate() {
            let y_start = band_idx as u64 * u64::from(self.band_height);
            for row in 0..self.band_height {
                let y = y_start + u64::from(row);
                if y >= u64::from(size.height()) {
                    break;
                }
                for x in 0..width {
                    if self.mode.is_block(x, row, width) {
                        canvas.set(i64::from(x), y as i64, color);
                    }
                }
            }
        }
        Ok(canvas)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pattern/bands.rs"]
mod tests;
