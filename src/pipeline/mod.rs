//! Batch driver: manifest in, raw artifacts and a report out.
//!
//! This is the only layer that knows about file paths and iterates over assets.

/// Preview, embed and inspect for built artifacts.
pub mod artifact;
/// Batch execution and reporting.
pub mod driver;
/// JSON build manifest.
pub mod manifest;
/// Frame series expansion.
pub mod series;
