//! Packed 16-bit colour handling: the codec and per-artifact storage policies.

/// RGB888 <-> RGB565 conversion and value transforms.
pub mod codec;
/// Byte order and inversion rules applied when packed values are stored.
pub mod policy;
