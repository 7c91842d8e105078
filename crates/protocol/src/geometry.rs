use serde::{Deserialize, Serialize};

use crate::types::{Point, Rect};

/// Where a resolved track lives on the host canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackGeometry {
    /// Pixel bounding box of the track. For circular tracks this is the
    /// square enclosing the whole circle.
    pub bounds: Rect,
    /// Ring parameters, present only for circular layouts.
    pub circular: Option<CircularGeometry>,
}

impl TrackGeometry {
    pub fn linear(bounds: Rect) -> Self {
        Self {
            bounds,
            circular: None,
        }
    }

    pub fn is_circular(&self) -> bool {
        self.circular.is_some()
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }
}

/// A ring of a circular layout. Angles are in degrees, clockwise from
/// twelve o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularGeometry {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl CircularGeometry {
    pub fn ring_size(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }
}

/// The host's current view of a track: which genomic interval is mapped
/// onto the track width, and the zoom level of the tile being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileView {
    pub x_domain: [f64; 2],
    pub zoom_level: f64,
}

impl TileView {
    pub fn new(start: f64, end: f64, zoom_level: f64) -> Self {
        Self {
            x_domain: [start, end],
            zoom_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_uses_camel_case_keys() {
        let g = TrackGeometry {
            bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
            circular: Some(CircularGeometry {
                inner_radius: 20.0,
                outer_radius: 50.0,
                start_angle: 0.0,
                end_angle: 360.0,
            }),
        };
        let json = serde_json::to_string(&g).unwrap_or_default();
        assert!(json.contains("innerRadius"));
        assert!(g.is_circular());
        assert_eq!(g.circular.map(|c| c.ring_size()), Some(30.0));
    }
}
