//! Layered composition of background, foreground elements and an optional caption.
//!
//! All compositing happens at full 8-bit precision on an opaque [`crate::Canvas`]. Source
//! transparency is flattened onto the background fill before placement.

/// Layer order and placement arithmetic.
pub mod compositor;
/// Serde model of a composition.
pub mod model;
/// Loading, flattening and resizing source images.
pub mod source;
pub(crate) mod text;
