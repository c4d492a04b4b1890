//! RGB888 <-> RGB565 transcoding.
//!
//! Quantization truncates (red/blue keep their top 5 bits, green its top 6). Decoding shifts the
//! fields back into the high bits and zero-fills the low bits, so `decode(encode(c))` is lossy:
//! it reproduces `c` with the low 3 (red/blue) or 2 (green) bits cleared. That loss is inherent
//! to the format and is never compensated for.

use crate::foundation::core::Rgb8;

/// Pack a colour as `(r5 << 11) | (g6 << 5) | b5`.
pub fn encode(c: Rgb8) -> u16 {
    let r5 = u16::from(c.r >> 3);
    let g6 = u16::from(c.g >> 2);
    let b5 = u16::from(c.b >> 3);
    (r5 << 11) | (g6 << 5) | b5
}

/// Unpack a packed value by left-shifting each field; low bits are zero.
pub fn decode(packed: u16) -> Rgb8 {
    Rgb8 {
        r: (((packed >> 11) & 0x1F) << 3) as u8,
        g: (((packed >> 5) & 0x3F) << 2) as u8,
        b: ((packed & 0x1F) << 3) as u8,
    }
}

/// Complement all 16 bits. Applied after [`encode`], for panels with reversed signal polarity.
pub fn invert(packed: u16) -> u16 {
    !packed
}

/// Exchange the high and low bytes of a packed value.
///
/// This is a value transform, independent of the byte order the serializer writes with. Swapping
/// and then writing little-endian yields big-endian bytes on disk; combined with [`invert`] this
/// is the legacy boot-splash encoding.
pub fn byte_swap(packed: u16) -> u16 {
    packed.rotate_left(8)
}

#[cfg(test)]
#[path = "../../tests/unit/color/codec.rs"]
mod tests;
