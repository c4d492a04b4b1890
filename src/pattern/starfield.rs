use crate::{
    foundation::{
        core::{Rgb8, Size},
        error::{ForgeError, ForgeResult},
        math::Rng64,
    },
    pattern::PatternGenerator,
    raster::canvas::Canvas,
};

/// Solid field sprinkled with single-pixel monochrome stars.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StarfieldSpec {
    /// Field colour.
    pub base: Rgb8,
    /// Number of stars drawn. Stars may land on the same pixel; the last one wins.
    pub count: u32,
    /// Generator seed. Fixed per asset; identical seeds give identical frames.
    pub seed: u64,
    /// Inclusive `[min, max]` star brightness.
    #[serde(default = "default_brightness")]
    pub brightness: (u8, u8),
}

fn default_brightness() -> (u8, u8) {
    (150, 255)
}

impl StarfieldSpec {
    /// Check parameters before any allocation.
    pub fn validate(&self) -> ForgeResult<()> {
        if self.brightness.0 > self.brightness.1 {
            return Err(ForgeError::validation(format!(
                "starfield brightness range [{}, {}] is inverted",
                self.brightness.0, self.brightness.1
            )));
        }
        Ok(())
    }
}

impl PatternGenerator for StarfieldSpec {
    fn generate(&self, size: Size) -> ForgeResult<Canvas> {
        self.validate()?;
        let mut canvas = Canvas::new(size, self.base);
        let mut rng = Rng64::new(self.seed);
        let (lo, hi) = self.brightness;
        let max_x = u64::from(size.width() - 1);
        let max_y = u64::from(size.height() - 1);
        for _ in 0..self.count {
            let x = rng.range_inclusive(0, max_x) as i64;
            let y = rng.range_inclusive(0, max_y) as i64;
            let v = rng.range_inclusive(u64::from(lo), u64::from(hi)) as u8;
            canvas.set(x, y, Rgb8::gray(v));
        }
        tracing::debug!(stars = self.count, seed = self.seed, "starfield generated");
        Ok(canvas)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pattern/starfield.rs"]
mod tests;
