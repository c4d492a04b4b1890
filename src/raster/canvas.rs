use crate::foundation::{
    core::{Point, Rgb8, Size},
    error::{ForgeError, ForgeResult},
    math::blend_over_opaque,
};

/// Opaque, full-precision frame: row-major, top-to-bottom, left-to-right.
///
/// A canvas lives for exactly one artifact: it is built, filled, serialized and dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    size: Size,
    pixels: Vec<Rgb8>,
}

impl Canvas {
    /// Allocate a canvas filled with `fill`.
    pub fn new(size: Size, fill: Rgb8) -> Self {
        Self {
            size,
            pixels: vec![fill; size.pixel_count()],
        }
    }

    /// Wrap existing row-major pixels.
    pub fn from_pixels(size: Size, pixels: Vec<Rgb8>) -> ForgeResult<Self> {
        if pixels.len() != size.pixel_count() {
            return Err(ForgeError::validation(format!(
                "canvas {size} needs {} pixels, got {}",
                size.pixel_count(),
                pixels.len()
            )));
        }
        Ok(Self { size, pixels })
    }

    /// Copy an RGB8 image buffer into a canvas.
    pub fn from_rgb_image(img: &image::RgbImage) -> ForgeResult<Self> {
        let (w, h) = img.dimensions();
        let size = Size::new(i64::from(w), i64::from(h))?;
        let pixels = img.pixels().map(|p| Rgb8::new(p[0], p[1], p[2])).collect();
        Self::from_pixels(size, pixels)
    }

    /// Copy into an RGB8 image buffer (used for previews).
    pub fn to_rgb_image(&self) -> image::RgbImage {
        let mut raw = Vec::with_capacity(self.pixels.len() * 3);
        for c in &self.pixels {
            raw.extend_from_slice(&[c.r, c.g, c.b]);
        }
        image::RgbImage::from_raw(self.width(), self.height(), raw)
            .unwrap_or_else(|| image::RgbImage::new(self.width(), self.height()))
    }

    /// Canvas size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height()
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }

    /// Rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb8]> {
        self.pixels.chunks_exact(self.width() as usize)
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return None;
        }
        Some(y as usize * self.width() as usize + x as usize)
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    pub fn get(&self, x: i64, y: i64) -> Option<Rgb8> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at `(x, y)`. Writes outside the canvas are dropped.
    pub fn set(&mut self, x: i64, y: i64, c: Rgb8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = c;
        }
    }

    /// Blend `c` with straight alpha `alpha` over the pixel at `(x, y)`.
    pub fn blend(&mut self, x: i64, y: i64, c: Rgb8, alpha: u8) {
        if alpha == 0 {
            return;
        }
        if let Some(i) = self.index(x, y) {
            let d = self.pixels[i];
            self.pixels[i] = Rgb8 {
                r: blend_over_opaque(d.r, c.r, alpha),
                g: blend_over_opaque(d.g, c.g, alpha),
                b: blend_over_opaque(d.b, c.b, alpha),
            };
        }
    }

    /// Overwrite every pixel with `c`.
    pub fn fill(&mut self, c: Rgb8) {
        self.pixels.fill(c);
    }

    /// Copy `src` with its top-left corner at `at`, clipping to this canvas.
    pub fn blit(&mut self, src: &Canvas, at: Point) {
        let dst_w = i64::from(self.width());
        let dst_h = i64::from(self.height());
        let src_w = i64::from(src.width());
        let src_h = i64::from(src.height());

        let x0 = at.x.max(0);
        let y0 = at.y.max(0);
        let x1 = (at.x + src_w).min(dst_w);
        let y1 = (at.y + src_h).min(dst_h);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let span = (x1 - x0) as usize;
        for y in y0..y1 {
            let sy = (y - at.y) as usize;
            let sx = (x0 - at.x) as usize;
            let s = sy * src_w as usize + sx;
            let d = y as usize * dst_w as usize + x0 as usize;
            self.pixels[d..d + span].copy_from_slice(&src.pixels[s..s + span]);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/canvas.rs"]
mod tests;
