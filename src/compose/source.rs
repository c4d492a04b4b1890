use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    compose::model::Resample,
    foundation::{
        core::{Dimensions, Rgb8, Size},
        error::{ForgeError, ForgeResult},
        math::blend_over_opaque,
    },
    raster::canvas::Canvas,
};

/// Normalize a root-relative source path.
///
/// The result uses `/` separators and drops `.` segments. Absolute paths and parent traversals
/// (`..`) are rejected; point the manifest `root` at a common ancestor instead.
pub(crate) fn normalize_rel_path(source: &str) -> ForgeResult<String> {
    let s = source.replace('\\', "/");
    if s.is_empty() {
        return Err(ForgeError::validation("source path must be non-empty"));
    }
    if s.starts_with('/') {
        return Err(ForgeError::validation(format!(
            "source path '{source}' must be relative to the asset root"
        )));
    }

    let mut parts = Vec::<&str>::new();
    for part in s.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                return Err(ForgeError::validation(format!(
                    "source path '{source}' must not contain '..'"
                )));
            }
            p => parts.push(p),
        }
    }
    if parts.is_empty() {
        return Err(ForgeError::validation(format!(
            "source path '{source}' has no file name"
        )));
    }
    Ok(parts.join("/"))
}

/// Resolve `source` against `root` and require that the file exists.
pub(crate) fn resolve_source(root: &Path, source: &str) -> ForgeResult<PathBuf> {
    let path = root.join(normalize_rel_path(source)?);
    if !path.is_file() {
        return Err(ForgeError::missing_source(path));
    }
    Ok(path)
}

/// Decode any format the `image` crate understands.
#[tracing::instrument(level = "debug")]
pub fn load_image(path: &Path) -> ForgeResult<image::DynamicImage> {
    if !path.is_file() {
        return Err(ForgeError::missing_source(path));
    }
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    let img = image::load_from_memory(&bytes)
        .with_context(|| format!("decode image '{}'", path.display()))?;
    Ok(img)
}

/// Drop alpha by compositing every pixel over an opaque `matte`.
///
/// Fully opaque pixels keep their colour, fully transparent pixels become `matte`.
pub fn flatten_alpha(img: &image::DynamicImage, matte: Rgb8) -> image::RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    let mut out = image::RgbImage::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let [r, g, b, a] = src.0;
        dst.0 = [
            blend_over_opaque(matte.r, r, a),
            blend_over_opaque(matte.g, g, a),
            blend_over_opaque(matte.b, b, a),
        ];
    }
    out
}

/// Resize to exactly `size`, ignoring aspect ratio.
pub fn resize_exact(img: &image::RgbImage, size: Size, resample: Resample) -> image::RgbImage {
    if img.width() == size.width() && img.height() == size.height() {
        return img.clone();
    }
    image::imageops::resize(img, size.width(), size.height(), resample.filter())
}

/// Load `source`, flatten it onto `matte`, and optionally resize it, producing an opaque canvas.
pub(crate) fn load_canvas(
    root: &Path,
    source: &str,
    matte: Rgb8,
    resize: Option<(Dimensions, Resample)>,
) -> ForgeResult<Canvas> {
    let path = resolve_source(root, source)?;
    let img = load_image(&path)?;
    let mut rgb = flatten_alpha(&img, matte);
    if let Some((dims, resample)) = resize {
        let size = dims.validate()?;
        rgb = resize_exact(&rgb, size, resample);
    }
    Canvas::from_rgb_image(&rgb)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/source.rs"]
mod tests;
