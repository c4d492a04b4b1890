use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    color::{
        codec,
        policy::{ByteOrder, ColorFormatPolicy},
    },
    foundation::{
        core::{Rgb8, Size},
        error::{ForgeError, ForgeResult},
    },
    raster::canvas::Canvas,
};

/// Outcome of writing one artifact to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrittenFrame {
    /// Artifact path.
    pub path: PathBuf,
    /// `width * height * 2`.
    pub expected_bytes: u64,
    /// Size of the file on disk after the handle was closed.
    pub actual_bytes: u64,
}

impl WrittenFrame {
    /// Fail with [`ForgeError::SizeMismatch`] when the file is not exactly the expected size.
    ///
    /// The artifact itself is left in place for inspection.
    pub fn verify(&self) -> ForgeResult<()> {
        if self.expected_bytes != self.actual_bytes {
            return Err(ForgeError::SizeMismatch {
                path: self.path.clone(),
                expected: self.expected_bytes,
                actual: self.actual_bytes,
            });
        }
        Ok(())
    }
}

/// Stored 16-bit value for one pixel under `policy`.
pub fn pack_pixel(c: Rgb8, policy: ColorFormatPolicy) -> u16 {
    policy.apply(codec::encode(c))
}

/// Encode a run of pixels into stored bytes, two per pixel.
pub fn encode_pixels(pixels: &[Rgb8], policy: ColorFormatPolicy) -> Vec<u8> {
    pixels
        .iter()
        .flat_map(|&px| policy.byte_order.to_bytes(pack_pixel(px, policy)))
        .collect()
}

/// Encode a canvas row-major into a byte vector of exactly `width * height * 2` bytes.
pub fn encode_frame(canvas: &Canvas, policy: ColorFormatPolicy) -> Vec<u8> {
    encode_pixels(canvas.pixels(), policy)
}

/// Stream a canvas to `w` one row at a time. Returns the number of bytes written.
pub fn write_frame<W: Write>(
    canvas: &Canvas,
    policy: ColorFormatPolicy,
    w: &mut W,
) -> ForgeResult<u64> {
    let mut written = 0u64;
    for row in canvas.rows() {
        let line = encode_pixels(row, policy);
        w.write_all(&line).context("write frame row")?;
        written += line.len() as u64;
    }
    Ok(written)
}

/// Write a canvas to `path`, creating parent directories.
///
/// The file handle is closed before the on-disk size is measured; callers should pass the
/// result through [`WrittenFrame::verify`].
pub fn write_frame_file(
    canvas: &Canvas,
    policy: ColorFormatPolicy,
    path: &Path,
) -> ForgeResult<WrittenFrame> {
    ensure_parent_dir(path)?;
    {
        let f = File::create(path)
            .with_context(|| format!("create artifact '{}'", path.display()))?;
        let mut w = BufWriter::new(f);
        write_frame(canvas, policy, &mut w)?;
        w.flush()
            .with_context(|| format!("flush artifact '{}'", path.display()))?;
    }

    let actual_bytes = std::fs::metadata(path)
        .with_context(|| format!("stat artifact '{}'", path.display()))?
        .len();
    Ok(WrittenFrame {
        path: path.to_path_buf(),
        expected_bytes: canvas.size().frame_bytes(),
        actual_bytes,
    })
}

/// Packed values in file order, honouring `order` only (no policy transforms undone).
pub fn read_packed(bytes: &[u8], order: ByteOrder) -> ForgeResult<Vec<u16>> {
    if bytes.len() % 2 != 0 {
        return Err(ForgeError::validation(format!(
            "packed frame has odd length {}",
            bytes.len()
        )));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|b| order.from_bytes([b[0], b[1]]))
        .collect())
}

/// Decode raw bytes into a canvas assuming no inversion or byte swap was applied.
///
/// Artifacts do not record their policy. When the writer's policy is known, use
/// [`decode_frame`] instead.
pub fn read_frame(bytes: &[u8], width: i64, height: i64, order: ByteOrder) -> ForgeResult<Canvas> {
    decode_frame(
        bytes,
        Size::new(width, height)?,
        ColorFormatPolicy {
            byte_order: order,
            invert: false,
            byte_swap: false,
        },
    )
}

/// Decode raw bytes written under `policy`, undoing its value transforms.
pub fn decode_frame(bytes: &[u8], size: Size, policy: ColorFormatPolicy) -> ForgeResult<Canvas> {
    let expected = size.frame_bytes();
    if bytes.len() as u64 != expected {
        return Err(ForgeError::validation(format!(
            "frame {size} needs {expected} bytes, got {}",
            bytes.len()
        )));
    }
    let pixels = read_packed(bytes, policy.byte_order)?
        .into_iter()
        .map(|v| codec::decode(policy.unapply(v)))
        .collect();
    Canvas::from_pixels(size, pixels)
}

/// Create `path`'s parent directory if needed.
pub fn ensure_parent_dir(path: &Path) -> ForgeResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/serialize/frame.rs"]
mod tests;
