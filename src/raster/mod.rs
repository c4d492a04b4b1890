/// In-memory pixel grid.
pub mod canvas;
