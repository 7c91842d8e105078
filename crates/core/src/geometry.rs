//! Linear to polar coordinate conversion for circular layouts.
//!
//! Track-local x runs clockwise from `start_angle` (degrees, twelve
//! o'clock is 0) to `end_angle`. Track-local y runs from the outer radius
//! (y = 0, the top of the track) to the inner radius (y = height).

use std::f64::consts::{FRAC_PI_2, PI};

use kurbo::{Arc, BezPath, PathEl, Vec2};
use strand_protocol::{Point, TrackGeometry};

/// Maximum distance, in pixels, between a curve and the polyline that
/// replaces it.
pub const FLATTEN_TOLERANCE: f64 = 0.25;

/// Vertices of the polyline approximating `path`.
pub fn flatten(path: &BezPath) -> Vec<Point> {
    let mut points = Vec::new();
    kurbo::flatten(path.elements().iter().copied(), FLATTEN_TOLERANCE, |el| {
        if let PathEl::MoveTo(p) | PathEl::LineTo(p) = el {
            points.push(Point::new(p.x, p.y));
        }
    });
    points
}

pub(crate) fn kurbo_point(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x, p.y)
}

/// Angle in radians, in screen space, of `value` along `[0, max]`.
/// Values outside the interval are clamped to it.
pub fn value_to_radian(value: f64, max: f64, start_angle: f64, end_angle: f64) -> f64 {
    let rad_start = start_angle / 360.0 * 2.0 * PI;
    let rad_extent = (end_angle - start_angle) / 360.0 * 2.0 * PI;
    let t = if max > 0.0 {
        value.clamp(0.0, max) / max
    } else {
        0.0
    };
    rad_start + t * rad_extent - FRAC_PI_2
}

pub fn polar_point(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// A circular track's mapping from local coordinates to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarFrame {
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Local x extent mapped onto the angular span.
    pub width: f64,
    /// Local y extent mapped onto the ring thickness.
    pub height: f64,
}

impl PolarFrame {
    pub fn from_geometry(geometry: &TrackGeometry, width: f64, height: f64) -> Option<Self> {
        let ring = geometry.circular?;
        Some(Self {
            center: geometry.center(),
            inner_radius: ring.inner_radius,
            outer_radius: ring.outer_radius,
            start_angle: ring.start_angle,
            end_angle: ring.end_angle,
            width,
            height,
        })
    }

    pub fn angle(&self, x: f64) -> f64 {
        value_to_radian(x, self.width, self.start_angle, self.end_angle)
    }

    /// Radius of local `y`; the track top sits on the outer radius.
    pub fn radius(&self, y: f64) -> f64 {
        if self.height <= 0.0 {
            return self.outer_radius;
        }
        self.outer_radius - (y / self.height) * (self.outer_radius - self.inner_radius)
    }

    pub fn point(&self, x: f64, y: f64) -> Point {
        polar_point(self.center, self.radius(y), self.angle(x))
    }

    /// Local x distance covered by an arc of `length` pixels at `radius`.
    pub fn arc_to_x(&self, length: f64, radius: f64) -> f64 {
        let rad_extent = (self.end_angle - self.start_angle).abs() / 360.0 * 2.0 * PI;
        if radius <= 0.0 || rad_extent == 0.0 {
            return 0.0;
        }
        length / (radius * rad_extent) * self.width
    }

    /// Closed polygon approximating the annular sector between local
    /// `x0..x1` and `y0..y1`. The span is clamped to the track first, so
    /// marks running far outside the visible interval stay cheap.
    pub fn sector(&self, x0: f64, x1: f64, y0: f64, y1: f64) -> Vec<Point> {
        let (a0, a1) = self.angles(x0, x1);
        let (outer, inner) = (self.radius(y0), self.radius(y1));
        let mut path = BezPath::new();
        path.move_to(kurbo_point(polar_point(self.center, outer, a0)));
        path.extend(self.circle_arc(outer, a0, a1).append_iter(FLATTEN_TOLERANCE));
        path.line_to(kurbo_point(polar_point(self.center, inner, a1)));
        path.extend(self.circle_arc(inner, a1, a0).append_iter(FLATTEN_TOLERANCE));
        path.close_path();
        flatten(&path)
    }

    /// Open polyline along a constant local `y`, clamped like [`Self::sector`].
    pub fn arc(&self, x0: f64, x1: f64, y: f64) -> Vec<Point> {
        let (a0, a1) = self.angles(x0, x1);
        let radius = self.radius(y);
        let mut path = BezPath::new();
        path.move_to(kurbo_point(polar_point(self.center, radius, a0)));
        path.extend(self.circle_arc(radius, a0, a1).append_iter(FLATTEN_TOLERANCE));
        flatten(&path)
    }

    fn angles(&self, x0: f64, x1: f64) -> (f64, f64) {
        let max = self.width.max(0.0);
        (self.angle(x0.clamp(0.0, max)), self.angle(x1.clamp(0.0, max)))
    }

    fn circle_arc(&self, radius: f64, from: f64, to: f64) -> Arc {
        Arc {
            center: kurbo_point(self.center),
            radii: Vec2::new(radius, radius),
            start_angle: from,
            sweep_angle: to - from,
            x_rotation: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_protocol::{CircularGeometry, Rect};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn frame() -> PolarFrame {
        let geometry = TrackGeometry {
            bounds: Rect::new(0.0, 0.0, 200.0, 200.0),
            circular: Some(CircularGeometry {
                inner_radius: 60.0,
                outer_radius: 100.0,
                start_angle: 0.0,
                end_angle: 360.0,
            }),
        };
        PolarFrame::from_geometry(&geometry, 400.0, 40.0).unwrap()
    }

    #[test]
    fn origin_is_twelve_o_clock_and_runs_clockwise() {
        let f = frame();
        let top = f.point(0.0, 0.0);
        assert!(approx(top.x, 100.0) && approx(top.y, 0.0));
        let quarter = f.point(100.0, 0.0);
        assert!(approx(quarter.x, 200.0) && approx(quarter.y, 100.0));
        let inner = f.point(0.0, 40.0);
        assert!(approx(inner.y, 40.0));
    }

    #[test]
    fn values_clamp_to_the_track() {
        let f = frame();
        assert!(approx(f.angle(-10.0), f.angle(0.0)));
        assert!(approx(f.angle(1000.0), f.angle(400.0)));
    }

    #[test]
    fn arc_length_converts_to_local_x() {
        let f = frame();
        let circumference = 2.0 * PI * 100.0;
        assert!(approx(f.arc_to_x(circumference / 4.0, 100.0), 100.0));
    }

    #[test]
    fn sector_is_closed_over_both_radii() {
        let f = frame();
        let s = f.sector(0.0, 100.0, 0.0, 40.0);
        assert!(approx(s[0].x, 100.0) && approx(s[0].y, 0.0));
        let last = s[s.len() - 1];
        assert!(approx(last.x, 100.0) && approx(last.y, 40.0));
        for p in &s {
            let r = (p.x - 100.0).hypot(p.y - 100.0);
            assert!((60.0 - 2.0 * FLATTEN_TOLERANCE..=100.0 + 2.0 * FLATTEN_TOLERANCE).contains(&r));
        }
    }

    #[test]
    fn spans_beyond_the_track_are_clamped() {
        let f = frame();
        let huge = f.sector(-1e9, 3e9, 0.0, 40.0);
        let full = f.sector(0.0, 400.0, 0.0, 40.0);
        assert_eq!(huge.len(), full.len());
        assert!(huge.len() < 500);
        assert_eq!(f.arc(500.0, 1e12, 0.0).len(), 1);
    }

    #[test]
    fn flattening_stays_within_tolerance() {
        let f = frame();
        for p in f.arc(0.0, 200.0, 0.0) {
            let r = (p.x - 100.0).hypot(p.y - 100.0);
            assert!((r - 100.0).abs() <= 2.0 * FLATTEN_TOLERANCE);
        }
    }
}
