use serde::{Deserialize, Serialize};

use crate::types::{Color, Point, Rect};

/// A single, stateless drawing instruction.
///
/// The core emits a `Vec<RenderCommand>` for each track and tile. Hosts
/// consume this list sequentially: every command carries its own resolved
/// color and opacity, already positioned in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Fill (and optionally outline) an axis-aligned rectangle.
    DrawRect {
        rect: Rect,
        fill: Color,
        stroke: Option<Color>,
        stroke_width: f64,
        opacity: f64,
    },

    /// Fill (and optionally outline) a closed polygon. Used for circular
    /// sectors, areas, triangles and link bands.
    DrawPolygon {
        points: Vec<Point>,
        fill: Color,
        stroke: Option<Color>,
        stroke_width: f64,
        opacity: f64,
    },

    /// Stroke an open path through the given points.
    DrawPolyline {
        points: Vec<Point>,
        color: Color,
        width: f64,
        opacity: f64,
    },

    /// Stroke a single line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: Color,
        width: f64,
        opacity: f64,
    },

    /// Fill (and optionally outline) a circle.
    DrawCircle {
        center: Point,
        radius: f64,
        fill: Color,
        stroke: Option<Color>,
        stroke_width: f64,
        opacity: f64,
    },

    /// Draw a text string anchored at `position`, rotated by `rotation`
    /// radians around the anchor.
    DrawText {
        position: Point,
        text: String,
        color: Color,
        font_size: f64,
        align: TextAlign,
        rotation: f64,
        opacity: f64,
    },

    /// Restrict subsequent drawing to a rectangular region.
    SetClip { rect: Rect },

    /// Remove the active clip region.
    ClearClip,

    /// Begin a logical group (a track, or a row inside a track).
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

impl RenderCommand {
    /// Whether the command paints pixels, as opposed to grouping or
    /// clipping state changes.
    pub fn is_drawing(&self) -> bool {
        !matches!(
            self,
            Self::SetClip { .. } | Self::ClearClip | Self::BeginGroup { .. } | Self::EndGroup
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}
