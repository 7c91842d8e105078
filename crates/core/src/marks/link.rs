use std::f64::consts::PI;

use kurbo::{Arc, BezPath, Vec2};
use strand_protocol::{Point, RenderCommand};

use super::DrawContext;
use crate::geometry::{FLATTEN_TOLERANCE, PolarFrame, flatten, kurbo_point};
use crate::spec::ChannelKey;
use crate::tabular::Datum;

/// Connections between genomic positions. With `x1` and `x1e` a link is a
/// filled band joining `x..xe` to `x1..x1e`; otherwise it is an arc from
/// `x` to `xe`. Linear links rise from the row baseline as half ellipses
/// capped at the row height; circular links bend through the center.
pub(super) fn draw(ctx: &DrawContext<'_>, out: &mut Vec<RenderCommand>) {
    for datum in ctx.model.rows() {
        let Some(x) = ctx.x(ChannelKey::X, datum) else {
            continue;
        };
        let xe = ctx.x(ChannelKey::Xe, datum);
        let target = ctx
            .x(ChannelKey::X1, datum)
            .zip(ctx.x(ChannelKey::X1e, datum));

        match target {
            Some((x1, x1e)) => band(ctx, datum, [x, xe.unwrap_or(x)], [x1, x1e], out),
            None => {
                if let Some(xe) = xe {
                    arc(ctx, datum, x, xe, out);
                }
            }
        }
    }
}

fn arc(ctx: &DrawContext<'_>, datum: &Datum, x: f64, xe: f64, out: &mut Vec<RenderCommand>) {
    let span = (xe - x).abs();
    let opacity = ctx.opacity(datum, span, span / 2.0);
    if opacity <= 0.0 {
        return;
    }
    let points = match &ctx.polar {
        Some(frame) => bezier(frame, ctx.track_y(datum, 0.0), x, xe),
        None => half_ellipse(ctx, datum, x, xe),
    };
    let color = if ctx.has(ChannelKey::Stroke) {
        ctx.model.color(ChannelKey::Stroke, datum)
    } else {
        None
    };
    let width = ctx
        .model
        .number(ChannelKey::StrokeWidth, datum)
        .filter(|w| *w > 0.0)
        .unwrap_or(1.0);
    out.push(RenderCommand::DrawPolyline {
        points,
        color: color.unwrap_or_else(|| ctx.fill(datum)),
        width,
        opacity,
    });
}

fn band(
    ctx: &DrawContext<'_>,
    datum: &Datum,
    source: [f64; 2],
    target: [f64; 2],
    out: &mut Vec<RenderCommand>,
) {
    let (mut a, mut b) = (sorted(source), sorted(target));
    if b[0] < a[0] {
        std::mem::swap(&mut a, &mut b);
    }
    let span = (b[1] - a[0]).abs();
    let opacity = ctx.opacity(datum, span, span / 2.0);
    if opacity <= 0.0 {
        return;
    }
    let points = match &ctx.polar {
        Some(frame) => {
            let anchor = ctx.track_y(datum, 0.0);
            let mut points = bezier(frame, anchor, a[1], b[0]);
            points.extend(bezier(frame, anchor, b[1], a[0]));
            points
        }
        None => {
            let mut points = half_ellipse(ctx, datum, a[0], b[1]);
            let mut inner = half_ellipse(ctx, datum, a[1], b[0]);
            inner.reverse();
            points.extend(inner);
            points
        }
    };
    let (stroke, stroke_width) = ctx.stroke(datum, span);
    out.push(RenderCommand::DrawPolygon {
        points,
        fill: ctx.fill(datum),
        stroke,
        stroke_width,
        opacity,
    });
}

fn sorted([a, b]: [f64; 2]) -> [f64; 2] {
    [a.min(b), a.max(b)]
}

/// Half ellipse from `x0` to `x1` on the row baseline, as tall as half
/// its span but never taller than the row.
fn half_ellipse(ctx: &DrawContext<'_>, datum: &Datum, x0: f64, x1: f64) -> Vec<Point> {
    let [lo, hi] = sorted([x0, x1]);
    let rx = (hi - lo) / 2.0;
    // Built in (x, height above baseline) space, then placed on the track.
    let ellipse = Arc {
        center: kurbo::Point::new(lo + rx, 0.0),
        radii: Vec2::new(rx, rx.min(ctx.row_height())),
        start_angle: PI,
        sweep_angle: -PI,
        x_rotation: 0.0,
    };
    let mut path = BezPath::new();
    path.move_to(kurbo::Point::new(lo, 0.0));
    path.extend(ellipse.append_iter(FLATTEN_TOLERANCE));
    let mut points: Vec<Point> = flatten(&path)
        .into_iter()
        .map(|p| ctx.canvas(p.x, ctx.track_y(datum, p.y)))
        .collect();
    if x0 > x1 {
        points.reverse();
    }
    points
}

/// Quadratic curve between two positions on local `y`, pulled toward
/// the circle's center.
fn bezier(frame: &PolarFrame, y: f64, x0: f64, x1: f64) -> Vec<Point> {
    let mut path = BezPath::new();
    path.move_to(kurbo_point(frame.point(x0, y)));
    path.quad_to(kurbo_point(frame.center), kurbo_point(frame.point(x1, y)));
    flatten(&path)
}

#[cfg(test)]
mod tests {
    use strand_protocol::{CircularGeometry, Point, Rect, RenderCommand, TrackGeometry};

    use crate::geometry::FLATTEN_TOLERANCE;
    use crate::marks::draw;
    use crate::marks::test_support::*;
    use crate::tabular::DatumValue::Number;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    fn polyline(commands: Vec<RenderCommand>) -> Vec<Point> {
        commands
            .into_iter()
            .find_map(|c| match c {
                RenderCommand::DrawPolyline { points, .. } => Some(points),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn arcs_rise_from_the_baseline() {
        let m = model(
            r#"{"mark": "link", "width": 100, "height": 100,
                "x": {"field": "s", "type": "genomic"}, "xe": {"field": "e", "type": "genomic"}}"#,
            vec![row(&[("s", Number(10.0)), ("e", Number(50.0))])],
        );
        let commands = draw(&m, &geometry(&m), &view());
        assert!(commands.iter().any(|c| matches!(
            c,
            RenderCommand::DrawPolyline { width, .. } if *width == 1.0
        )));
        let points = polyline(commands);
        assert!(approx(points[0], Point::new(10.0, 100.0)));
        assert!(approx(points[points.len() - 1], Point::new(50.0, 100.0)));
        let apex = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        assert!((apex - 80.0).abs() <= 2.0 * FLATTEN_TOLERANCE);
        assert!(points.iter().all(|p| p.y <= 100.0 + FLATTEN_TOLERANCE));
    }

    #[test]
    fn flipped_arcs_hang_from_the_top() {
        let m = model(
            r#"{"mark": "link", "width": 100, "height": 100, "flipY": true,
                "x": {"field": "s", "type": "genomic"}, "xe": {"field": "e", "type": "genomic"}}"#,
            vec![row(&[("s", Number(10.0)), ("e", Number(50.0))])],
        );
        let points = polyline(draw(&m, &geometry(&m), &view()));
        assert!(approx(points[0], Point::new(10.0, 0.0)));
        let lowest = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        assert!((lowest - 20.0).abs() <= 2.0 * FLATTEN_TOLERANCE);
    }

    #[test]
    fn bands_join_two_intervals() {
        let m = model(
            r#"{"mark": "link", "width": 100, "height": 100,
                "x": {"field": "a", "type": "genomic"}, "xe": {"field": "b", "type": "genomic"},
                "x1": {"field": "c", "type": "genomic"}, "x1e": {"field": "d", "type": "genomic"}}"#,
            vec![row(&[("a", Number(60.0)), ("b", Number(70.0)), ("c", Number(10.0)), ("d", Number(20.0))])],
        );
        let points = draw(&m, &geometry(&m), &view())
            .into_iter()
            .find_map(|c| match c {
                RenderCommand::DrawPolygon { points, .. } => Some(points),
                _ => None,
            })
            .unwrap();
        assert!(approx(points[0], Point::new(10.0, 100.0)));
        assert!(approx(points[points.len() - 1], Point::new(20.0, 100.0)));
        // The outer curve ends on the far edge and the inner one starts on
        // the near edge of the right interval.
        assert!(points.windows(2).any(|w| {
            approx(w[0], Point::new(70.0, 100.0)) && approx(w[1], Point::new(60.0, 100.0))
        }));
    }

    #[test]
    fn circular_links_bend_through_the_center() {
        let m = model(
            r#"{"mark": "link", "width": 100, "height": 20,
                "x": {"field": "s", "type": "genomic"}, "xe": {"field": "e", "type": "genomic"}}"#,
            vec![row(&[("s", Number(0.0)), ("e", Number(25.0))])],
        );
        let geometry = TrackGeometry {
            bounds: Rect::new(0.0, 0.0, 200.0, 200.0),
            circular: Some(CircularGeometry {
                inner_radius: 80.0,
                outer_radius: 100.0,
                start_angle: 0.0,
                end_angle: 360.0,
            }),
        };
        let points = polyline(draw(&m, &geometry, &view()));
        assert!(points.len() > 2);
        assert!(approx(points[0], Point::new(100.0, 20.0)));
        assert!(approx(points[points.len() - 1], Point::new(180.0, 100.0)));
        for p in &points[1..points.len() - 1] {
            assert!((p.x - 100.0).hypot(p.y - 100.0) < 80.0);
        }
    }
}
