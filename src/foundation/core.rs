use crate::foundation::error::{ForgeError, ForgeResult};

/// Straight 8-bit-per-channel colour. The alpha-free pixel type consumed by the codec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Build a colour from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Monochrome colour with `r == g == b == v`.
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Requested canvas dimensions as written in a manifest.
///
/// Signed: zero and negative sizes must survive parsing so they can be rejected with
/// [`ForgeError::InvalidDimensions`] instead of an opaque parse error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    /// Requested width in pixels.
    pub width: i64,
    /// Requested height in pixels.
    pub height: i64,
}

impl Dimensions {
    /// Build unvalidated dimensions.
    pub fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    /// Validate into a [`Size`] usable for allocation.
    pub fn validate(self) -> ForgeResult<Size> {
        Size::new(self.width, self.height)
    }
}

/// Validated, non-empty canvas size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    width: u32,
    height: u32,
}

impl Size {
    /// Validate `width` x `height`; both must be in `1..=u32::MAX`.
    pub fn new(width: i64, height: i64) -> ForgeResult<Self> {
        let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
            return Err(ForgeError::invalid_dimensions(width, height));
        };
        if w == 0 || h == 0 {
            return Err(ForgeError::invalid_dimensions(width, height));
        }
        Ok(Self {
            width: w,
            height: h,
        })
    }

    /// Width in pixels.
    pub fn width(self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(self) -> u32 {
        self.height
    }

    /// Number of pixels.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Exact size in bytes of a packed 16-bit frame of this size.
    pub fn frame_bytes(self) -> u64 {
        u64::from(self.width) * u64::from(self.height) * 2
    }
}

impl From<Size> for Dimensions {
    fn from(s: Size) -> Self {
        Self::new(i64::from(s.width), i64::from(s.height))
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Signed pixel offset of an element's top-left corner on a canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal offset.
    pub x: i64,
    /// Vertical offset.
    pub y: i64,
}

impl Point {
    /// Build a point.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
