use crate::foundation::core::{Dimensions, Point, Rgb8};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// How to build one canvas from a background, foreground elements and an optional caption.
///
/// Layers are applied in declaration order: background, each element, then text.
pub struct CompositionSpec {
    /// Canvas background.
    pub background: Background,
    /// Foreground images, drawn in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<ElementSpec>,
    /// Optional caption drawn last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextSpec>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Canvas background.
pub enum Background {
    /// Solid colour.
    Solid(Rgb8),
    /// Source image resized to the canvas.
    Image {
        /// Path relative to the asset root.
        source: String,
        /// Resampling filter used to reach the canvas size.
        #[serde(default)]
        resample: Resample,
        /// Colour transparent source pixels are flattened onto.
        #[serde(default)]
        matte: Rgb8,
    },
}

impl Background {
    /// Colour used to flatten transparency, for the background and for every element.
    pub fn fill_color(&self) -> Rgb8 {
        match self {
            Self::Solid(c) => *c,
            Self::Image { matte, .. } => *matte,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Resampling filter. Pixel art wants `Nearest`; photographs want `Lanczos3`.
pub enum Resample {
    /// Nearest neighbour.
    Nearest,
    /// Linear.
    Triangle,
    /// Cubic.
    CatmullRom,
    /// Gaussian.
    Gaussian,
    /// Lanczos with window 3.
    #[default]
    Lanczos3,
}

impl Resample {
    pub(crate) fn filter(self) -> image::imageops::FilterType {
        use image::imageops::FilterType;
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A foreground image.
pub struct ElementSpec {
    /// Path relative to the asset root.
    pub source: String,
    /// Where the element's top-left corner goes.
    #[serde(default)]
    pub placement: Placement,
    /// Optional resize applied before placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize: Option<ResizeSpec>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Exact target size for an element.
pub struct ResizeSpec {
    /// Target size.
    pub size: Dimensions,
    /// Filter used.
    #[serde(default)]
    pub resample: Resample,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Element placement rule.
pub enum Placement {
    /// `(canvas - element) div 2` on both axes (floor division).
    #[default]
    Center,
    /// Explicit top-left corner; may be negative or off-canvas (clipped).
    At(Point),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A single-line caption.
pub struct TextSpec {
    /// Text content.
    pub text: String,
    /// Requested font.
    #[serde(default)]
    pub font: FontSpec,
    /// Fill colour.
    #[serde(default = "default_text_color")]
    pub color: Rgb8,
    /// Placement rule.
    #[serde(default)]
    pub placement: TextPlacement,
}

fn default_text_color() -> Rgb8 {
    Rgb8::WHITE
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Requested font face. Resolution never fails: an unavailable face degrades to the built-in
/// bitmap font.
pub struct FontSpec {
    /// Font file, looked up relative to the asset root and then its `fonts/` directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Pixel size.
    #[serde(default = "default_font_size")]
    pub size_px: f32,
}

fn default_font_size() -> f32 {
    20.0
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            source: None,
            size_px: default_font_size(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Caption placement rule.
pub enum TextPlacement {
    /// Horizontally centered on the measured text width; the text top is pinned `offset_px`
    /// above the bottom edge whatever the text length.
    CenterAboveBottom {
        /// Distance from the bottom edge to the text origin.
        offset_px: u32,
    },
    /// Explicit text origin.
    At(Point),
}

impl Default for TextPlacement {
    fn default() -> Self {
        Self::CenterAboveBottom { offset_px: 40 }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/model.rs"]
mod tests;
