//! Artifact serialization.
//!
//! Artifacts are headerless: `width * height` packed values, row-major, nothing else.

/// Firmware-embeddable C array rendering of an artifact.
pub mod c_array;
/// Canvas <-> packed byte stream.
pub mod frame;
