use std::collections::HashMap;

use strand_protocol::{Point, RenderCommand};

use super::{DrawContext, series, stack_key};
use crate::spec::ChannelKey;
use crate::tabular::Datum;

/// One filled polygon per row and color series, closed along the zero
/// baseline. Stacked areas sit on the running top of the series before
/// them at each x position.
pub(super) fn draw(ctx: &DrawContext<'_>, out: &mut Vec<RenderCommand>) {
    let baseline = ctx.y_up_of(0.0).max(0.0);
    let mut stacks: HashMap<String, f64> = HashMap::new();

    for group in series(ctx, ctx.model.rows()) {
        let mut top: Vec<(f64, f64, &Datum)> = Vec::with_capacity(group.len());
        let mut bottom: Vec<(f64, f64)> = Vec::with_capacity(group.len());
        for &datum in &group {
            let Some((x, up)) = ctx.x(ChannelKey::X, datum).zip(ctx.y_up(ChannelKey::Y, datum)) else {
                continue;
            };
            let (lo, hi) = if ctx.model.is_stacked() {
                let offset = stacks.entry(stack_key(ctx, datum)).or_insert(baseline);
                let lo = *offset;
                *offset += (up - baseline).max(0.0);
                (lo, *offset)
            } else {
                (baseline, up)
            };
            top.push((x, hi, datum));
            bottom.push((x, lo));
        }
        let Some(&(_, _, first)) = top.first() else {
            continue;
        };
        if top.len() < 2 {
            continue;
        }

        let opacity = ctx.opacity(first, 0.0, 0.0);
        if opacity <= 0.0 {
            continue;
        }
        let mut points: Vec<Point> = top
            .iter()
            .map(|&(x, up, datum)| ctx.canvas(x, ctx.track_y(datum, up)))
            .collect();
        points.extend(
            bottom
                .iter()
                .rev()
                .map(|&(x, up)| ctx.canvas(x, ctx.track_y(first, up))),
        );
        let (stroke, stroke_width) = ctx.stroke(first, f64::INFINITY);
        out.push(RenderCommand::DrawPolygon {
            points,
            fill: ctx.fill(first),
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
    use crate::tabular::DatumValue::{Number, Text};

    fn polygons(commands: Vec<RenderCommand>) -> Vec<Vec<Point>> {
        commands
            .into_iter()
            .filter_map(|c| match c {
                RenderCommand::DrawPolygon { points, .. } => Some(points),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn areas_close_along_the_baseline() {
        let m = model(
            r#"{"mark": "area", "width": 100, "height": 10,
                "x": {"field": "p", "type": "genomic"},
                "y": {"field": "v", "type": "quantitative"}}"#,
            vec![
                row(&[("p", Number(0.0)), ("v", Number(5.0))]),
                row(&[("p", Number(50.0)), ("v", Number(10.0))]),
            ],
        );
        let out = polygons(draw(&m, &geometry(&m), &view()));
        assert_eq!(
            out[0],
            vec![
                Point::new(0.0, 5.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 10.0),
                Point::new(0.0, 10.0),
            ]
        );
    }

    #[test]
    fn stacked_areas_rest_on_previous_series() {
        let m = model(
            r#"{"mark": "area", "width": 100, "height": 20,
                "x": {"field": "p", "type": "genomic"},
                "y": {"field": "v", "type": "quantitative"},
                "color": {"field": "c", "type": "nominal"}}"#,
            vec![
                row(&[("p", Number(0.0)), ("v", Number(5.0)), ("c", Text("a".into()))]),
                row(&[("p", Number(10.0)), ("v", Number(5.0)), ("c", Text("a".into()))]),
                row(&[("p", Number(0.0)), ("v", Number(5.0)), ("c", Text("b".into()))]),
                row(&[("p", Number(10.0)), ("v", Number(5.0)), ("c", Text("b".into()))]),
            ],
        );
        let out = polygons(draw(&m, &geometry(&m), &view()));
        assert_eq!(out[1][0], Point::new(0.0, 0.0));
        assert_eq!(out[1][3], Point::new(0.0, 10.0));
    }
}
