use strand_protocol::RenderCommand;

use super::DrawContext;
use crate::spec::ChannelKey;

/// Straight rules. With `y` a rule is horizontal, spanning `x..xe` or the
/// whole track when `x` is unset; without `y` it is a vertical rule at
/// `x` across the row. Circular horizontal rules follow the ring.
pub(super) fn draw(ctx: &DrawContext<'_>, out: &mut Vec<RenderCommand>) {
    let row_height = ctx.row_height();
    let track_width = ctx.model.width();
    for datum in ctx.model.rows() {
        let x = ctx.x(ChannelKey::X, datum);
        let xe = ctx.x(ChannelKey::Xe, datum);
        let y = ctx.y_up(ChannelKey::Y, datum);
        if y.is_none() && ctx.has(ChannelKey::Y) {
            continue;
        }

        let width = ctx
            .model
            .number(ChannelKey::StrokeWidth, datum)
            .filter(|w| *w > 0.0)
            .unwrap_or(1.0);
        let color = ctx.fill(datum);

        let points = match (y, x) {
            (Some(up), _) => {
                let (x0, x1) = match (x, xe) {
                    (Some(x), Some(xe)) => (x.min(xe), x.max(xe)),
                    (Some(x), None) => (x, track_width),
                    (None, _) => (0.0, track_width),
                };
                let local_y = ctx.track_y(datum, up);
                match &ctx.polar {
                    Some(frame) => frame.arc(x0, x1, local_y),
                    None => vec![ctx.canvas(x0, local_y), ctx.canvas(x1, local_y)],
                }
            }
            (None, Some(x)) => vec![
                ctx.canvas(x, ctx.track_y(datum, row_height)),
                ctx.canvas(x, ctx.track_y(datum, 0.0)),
            ],
            (None, None) => continue,
        };
        if points.len() < 2 {
            continue;
        }

        let span = match (points.first(), points.last()) {
            (Some(a), Some(b)) => (b.x - a.x).abs().max((b.y - a.y).abs()),
            _ => 0.0,
        };
        let opacity = ctx.opacity(datum, span, width);
        if opacity <= 0.0 {
            continue;
        }
        if let &[from, to] = points.as_slice() {
            out.push(RenderCommand::DrawLine {
                from,
                to,
                color,
                width,
                opacity,
            });
        } else {
            out.push(RenderCommand::DrawPolyline {
                points,
                color,
                width,
                opacity,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use strand_protocol::{Point, RenderCommand};

    use crate::marks::draw;
    use crate::marks::test_support::*;
    use crate::tabular::DatumValue::Number;

    fn lines(json: &str, rows: Vec<crate::tabular::Datum>) -> Vec<(Point, Point)> {
        let m = model(json, rows);
        draw(&m, &geometry(&m), &view())
            .into_iter()
            .filter_map(|c| match c {
                RenderCommand::DrawLine { from, to, .. } => Some((from, to)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn horizontal_rules_span_their_interval() {
        let out = lines(
            r#"{"mark": "rule", "width": 100, "height": 10,
                "x": {"field": "s", "type": "genomic"}, "xe": {"field": "e", "type": "genomic"},
                "y": {"field": "v", "type": "quantitative", "domain": [0, 10]}}"#,
            vec![row(&[("s", Number(10.0)), ("e", Number(40.0)), ("v", Number(5.0))])],
        );
        assert_eq!(out, vec![(Point::new(10.0, 5.0), Point::new(40.0, 5.0))]);
    }

    #[test]
    fn rules_without_y_are_vertical() {
        let out = lines(
            r#"{"mark": "rule", "width": 100, "height": 10,
                "x": {"field": "s", "type": "genomic"}}"#,
            vec![row(&[("s", Number(25.0))])],
        );
        assert_eq!(out, vec![(Point::new(25.0, 0.0), Point::new(25.0, 10.0))]);
    }
}
