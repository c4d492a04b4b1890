//! Operations on already-built raw artifacts: preview, embed and inspect.
//!
//! Raw artifacts carry no header, so size and policy always come from the caller.

use std::{fmt, path::Path};

use anyhow::Context;

use crate::{
    color::{codec, policy::ColorFormatPolicy},
    foundation::{
        core::{Rgb8, Size},
        error::{ForgeError, ForgeResult},
    },
    pipeline::driver::sha256_hex,
    serialize::{
        c_array::render_c_array,
        frame::{decode_frame, ensure_parent_dir},
    },
};

fn read_artifact(path: &Path) -> ForgeResult<Vec<u8>> {
    if !path.is_file() {
        return Err(ForgeError::missing_source(path));
    }
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    Ok(bytes)
}

/// Decode `raw` with a known size and policy and save it as an image (format from the
/// extension of `out`, normally PNG).
#[tracing::instrument]
pub fn preview(raw: &Path, size: Size, policy: ColorFormatPolicy, out: &Path) -> ForgeResult<()> {
    let bytes = read_artifact(raw)?;
    let canvas = decode_frame(&bytes, size, policy)?;
    ensure_parent_dir(out)?;
    canvas
        .to_rgb_image()
        .save(out)
        .with_context(|| format!("write preview '{}'", out.display()))?;
    Ok(())
}

/// C identifier derived from a file stem: non-alphanumerics become `_`, and a leading digit
/// gets a `_` prefix.
pub fn c_identifier_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut ident: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Write `raw` as a C source file with `<name>_size` and a `<name>[]` byte array.
#[tracing::instrument]
pub fn embed(raw: &Path, name: Option<&str>, out: &Path) -> ForgeResult<()> {
    let bytes = read_artifact(raw)?;
    let ident = match name {
        Some(n) => n.to_owned(),
        None => c_identifier_for(raw),
    };
    let origin = raw
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| raw.display().to_string());
    let source = render_c_array(&bytes, &ident, &origin)?;
    ensure_parent_dir(out)?;
    std::fs::write(out, source).with_context(|| format!("write '{}'", out.display()))?;
    Ok(())
}

/// Facts about a raw artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inspection {
    /// File size.
    pub bytes: u64,
    /// SHA-256, lowercase hex.
    pub sha256: String,
    /// Claimed size, if any.
    pub size: Option<Size>,
    /// `width * height * 2` for the claimed size.
    pub expected_bytes: Option<u64>,
    /// First pixel decoded under the given policy.
    pub first_pixel: Option<Rgb8>,
}

impl Inspection {
    /// Whether the file size matches the claimed size. `None` without a claim.
    pub fn size_matches(&self) -> Option<bool> {
        self.expected_bytes.map(|e| e == self.bytes)
    }
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "bytes:        {}", self.bytes)?;
        writeln!(f, "sha256:       {}", self.sha256)?;
        if let (Some(size), Some(expected)) = (self.size, self.expected_bytes) {
            let verdict = if expected == self.bytes { "ok" } else { "MISMATCH" };
            writeln!(f, "size:         {size} (expected {expected} bytes: {verdict})")?;
        }
        match self.first_pixel {
            Some(p) => write!(f, "first pixel:  rgb({}, {}, {})", p.r, p.g, p.b),
            None => write!(f, "first pixel:  -"),
        }
    }
}

/// Gather size, digest and the first decoded pixel of `raw`.
pub fn inspect(
    raw: &Path,
    size: Option<Size>,
    policy: ColorFormatPolicy,
) -> ForgeResult<Inspection> {
    let bytes = read_artifact(raw)?;
    let first_pixel = match bytes.as_slice() {
        [a, b, ..] => Some(codec::decode(
            policy.unapply(policy.byte_order.from_bytes([*a, *b])),
        )),
        _ => None,
    };
    Ok(Inspection {
        bytes: bytes.len() as u64,
        sha256: sha256_hex(&bytes),
        size,
        expected_bytes: size.map(Size::frame_bytes),
        first_pixel,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/artifact.rs"]
mod tests;
