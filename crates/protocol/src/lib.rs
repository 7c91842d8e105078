pub mod commands;
pub mod geometry;
pub mod types;

pub use commands::{RenderCommand, TextAlign};
pub use geometry::{CircularGeometry, TileView, TrackGeometry};
pub use types::{Color, Point, Rect};
