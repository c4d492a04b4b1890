use std::path::PathBuf;

/// Convenience result type used across panelforge.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Every variant is scoped to a single asset: the batch driver reports it and moves on.
#[derive(thiserror::Error, Debug)]
pub enum ForgeError {
    /// Invalid user-provided manifest or composition data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A source image (or every candidate of a frame-series entry) does not exist.
    #[error("missing source: '{}'", path.display())]
    MissingSource {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Target dimensions that cannot back a canvas.
    #[error("invalid dimensions {width}x{height}: width and height must be > 0")]
    InvalidDimensions {
        /// Requested width.
        width: i64,
        /// Requested height.
        height: i64,
    },

    /// Serialized artifact size differs from `width * height * 2`.
    #[error("size mismatch for '{}': expected {expected} bytes, found {actual}", path.display())]
    SizeMismatch {
        /// Artifact path.
        path: PathBuf,
        /// Byte count implied by the canvas dimensions.
        expected: u64,
        /// Byte count observed after writing.
        actual: u64,
    },

    /// The requested font could not be loaded. Callers degrade to the built-in font.
    #[error("font unavailable: {0}")]
    FontUnavailable(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ForgeError {
    /// Build a [`ForgeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ForgeError::MissingSource`] value.
    pub fn missing_source(path: impl Into<PathBuf>) -> Self {
        Self::MissingSource { path: path.into() }
    }

    /// Build a [`ForgeError::InvalidDimensions`] value.
    pub fn invalid_dimensions(width: i64, height: i64) -> Self {
        Self::InvalidDimensions { width, height }
    }

    /// Build a [`ForgeError::FontUnavailable`] value.
    pub fn font_unavailable(msg: impl Into<String>) -> Self {
        Self::FontUnavailable(msg.into())
    }

    /// Build a [`ForgeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Short stable label used in status lines and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::MissingSource { .. } => "missing-source",
            Self::InvalidDimensions { .. } => "invalid-dimensions",
            Self::SizeMismatch { .. } => "size-mismatch",
            Self::FontUnavailable(_) => "font-unavailable",
            Self::Serde(_) => "serde",
            Self::Other(_) => "io",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
