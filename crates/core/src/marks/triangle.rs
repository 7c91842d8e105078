use strand_protocol::{Point, RenderCommand};

use super::DrawContext;
use crate::spec::{ChannelKey, Mark};

/// Direction markers, typically for strand. A triangle spans `x..xe`
/// (or `size` pixels centered on `x`) and the full row height unless `y`
/// places it, in which case it is `size` pixels tall.
pub(super) fn draw(ctx: &DrawContext<'_>, mark: Mark, out: &mut Vec<RenderCommand>) {
    let row_height = ctx.row_height();
    for datum in ctx.model.rows() {
        let Some(x) = ctx.x(ChannelKey::X, datum) else {
            continue;
        };
        let size = ctx.size(datum);
        let (x0, x1) = match ctx.x(ChannelKey::Xe, datum) {
            Some(xe) => (x.min(xe), x.max(xe)),
            None => (x - size / 2.0, x + size / 2.0),
        };
        let (lo, hi) = match ctx.y_up(ChannelKey::Y, datum) {
            Some(y) => (y - size / 2.0, y + size / 2.0),
            None if ctx.has(ChannelKey::Y) => continue,
            None => (0.0, row_height),
        };

        let width = x1 - x0;
        let opacity = ctx.opacity(datum, width, hi - lo);
        if opacity <= 0.0 {
            continue;
        }
        let top = ctx.track_y(datum, hi);
        let bottom = ctx.track_y(datum, lo);
        let middle = (top + bottom) / 2.0;
        let corners: [(f64, f64); 3] = match mark {
            Mark::TriangleLeft => [(x1, top), (x0, middle), (x1, bottom)],
            Mark::TriangleRight => [(x0, top), (x1, middle), (x0, bottom)],
            _ => [(x0, top), (x1, top), ((x0 + x1) / 2.0, bottom)],
        };
        let points: Vec<Point> = corners.iter().map(|&(x, y)| ctx.canvas(x, y)).collect();
        let (stroke, stroke_width) = ctx.stroke(datum, width);
        out.push(RenderCommand::DrawPolygon {
            points,
            fill: ctx.fill(datum),
            stroke,
            stroke_width,
            opacity,
        });
    }
}

#[cfg(test)]
mod tests {
    use strand_protocol::{Point, RenderCommand};

    use crate::marks::draw;
    use crate::marks::test_support::*;
    use crate::tabular::DatumValue::Number;

    fn triangle(mark: &str) -> Vec<Point> {
        let m = model(
            &format!(
                r#"{{"mark": "{mark}", "width": 100, "height": 10,
                    "x": {{"field": "s", "type": "genomic"}}, "xe": {{"field": "e", "type": "genomic"}}}}"#
            ),
            vec![row(&[("s", Number(10.0)), ("e", Number(20.0))])],
        );
        draw(&m, &geometry(&m), &view())
            .into_iter()
            .find_map(|c| match c {
                RenderCommand::DrawPolygon { points, .. } => Some(points),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn triangles_point_in_their_direction() {
        assert_eq!(
            triangle("triangleLeft"),
            vec![Point::new(20.0, 0.0), Point::new(10.0, 5.0), Point::new(20.0, 10.0)]
        );
        assert_eq!(
            triangle("triangleRight"),
            vec![Point::new(10.0, 0.0), Point::new(20.0, 5.0), Point::new(10.0, 10.0)]
        );
        assert_eq!(triangle("triangleBottom")[2], Point::new(15.0, 10.0));
    }
}
