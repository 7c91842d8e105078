use std::collections::HashMap;

use strand_protocol::RenderCommand;

use super::{DrawContext, stack_key};
use crate::spec::ChannelKey;

/// Bars grow from the zero baseline of their row. Without `xe` a bar is
/// `size` pixels wide (one pixel when size is unset) centered on `x`.
/// Stacked bars pile up per x position in row order.
pub(super) fn draw(ctx: &DrawContext<'_>, out: &mut Vec<RenderCommand>) {
    let baseline = ctx.y_up_of(0.0).max(0.0);
    let explicit_size = ctx.has(ChannelKey::Size);
    let mut stacks: HashMap<String, f64> = HashMap::new();

    for datum in ctx.model.rows() {
        let Some(x) = ctx.x(ChannelKey::X, datum) else {
            continue;
        };
        let (x0, x1) = match ctx.x(ChannelKey::Xe, datum) {
            Some(xe) => (x.min(xe), x.max(xe)),
            None => {
                let w = if explicit_size { ctx.size(datum) } else { 1.0 };
                (x - w / 2.0, x + w / 2.0)
            }
        };
        let Some(top) = ctx.y_up(ChannelKey::Y, datum) else {
            continue;
        };

        let (lo, hi) = if ctx.model.is_stacked() {
            let offset = stacks.entry(stack_key(ctx, datum)).or_insert(baseline);
            let height = (top - baseline).max(0.0);
            let lo = *offset;
            *offset += height;
            (lo, lo + height)
        } else {
            (baseline.min(top), baseline.max(top))
        };

        let width = x1 - x0;
        let opacity = ctx.opacity(datum, width, hi - lo);
        if opacity <= 0.0 {
            continue;
        }
        out.push(ctx.box_command(
            x0,
            x1,
            ctx.track_y(datum, hi),
            ctx.track_y(datum, lo),
            ctx.fill(datum),
            ctx.stroke(datum, width),
            opacity,
        ));
    }
}

#[cfg(test)]
mod tests {
    use strand_protocol::{Rect, RenderCommand};

    use crate::marks::draw;
    use crate::marks::test_support::*;
    use crate::tabular::DatumValue::{Number, Text};

    fn rects(commands: &[RenderCommand]) -> Vec<Rect> {
        commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn bars_rise_from_the_row_bottom() {
        let m = model(
            r#"{"mark": "bar", "width": 100, "height": 100,
                "x": {"field": "s", "type": "genomic"}, "xe": {"field": "e", "type": "genomic"},
                "y": {"field": "v", "type": "quantitative"}}"#,
            vec![
                row(&[("s", Number(0.0)), ("e", Number(10.0)), ("v", Number(5.0))]),
                row(&[("s", Number(10.0)), ("e", Number(20.0)), ("v", Number(10.0))]),
            ],
        );
        let bars = rects(&draw(&m, &geometry(&m), &view()));
        assert_eq!(bars[0], Rect::new(0.0, 50.0, 10.0, 50.0));
        assert_eq!(bars[1], Rect::new(10.0, 0.0, 10.0, 100.0));
    }

    #[test]
    fn flipped_bars_hang_from_the_top() {
        let m = model(
            r#"{"mark": "bar", "width": 100, "height": 100, "flipY": true,
                "x": {"field": "s", "type": "genomic"}, "xe": {"field": "e", "type": "genomic"},
                "y": {"field": "v", "type": "quantitative", "domain": [0, 10]}}"#,
            vec![row(&[("s", Number(0.0)), ("e", Number(10.0)), ("v", Number(5.0))])],
        );
        let bars = rects(&draw(&m, &geometry(&m), &view()));
        assert_eq!(bars[0], Rect::new(0.0, 0.0, 10.0, 50.0));
    }

    #[test]
    fn stacked_bars_accumulate_per_position() {
        let m = model(
            r#"{"mark": "bar", "width": 100, "height": 100,
                "x": {"field": "s", "type": "genomic"}, "xe": {"field": "e", "type": "genomic"},
                "y": {"field": "v", "type": "quantitative"},
                "color": {"field": "c", "type": "nominal"}}"#,
            vec![
                row(&[("s", Number(0.0)), ("e", Number(10.0)), ("v", Number(5.0)), ("c", Text("a".into()))]),
                row(&[("s", Number(0.0)), ("e", Number(10.0)), ("v", Number(15.0)), ("c", Text("b".into()))]),
            ],
        );
        let bars = rects(&draw(&m, &geometry(&m), &view()));
        assert_eq!(bars[0].bottom(), 100.0);
        assert_eq!(bars[0].h, 25.0);
        assert_eq!(bars[1].bottom(), 75.0);
        assert_eq!(bars[1].y, 0.0);
    }

    #[test]
    fn faceted_bars_sit_in_their_row() {
        let m = model(
            r#"{"mark": "bar", "width": 100, "height": 130,
                "x": {"field": "s", "type": "genomic"}, "xe": {"field": "e", "type": "genomic"},
                "y": {"field": "v", "type": "quantitative"},
                "row": {"field": "r", "type": "nominal"}}"#,
            vec![
                row(&[("s", Number(0.0)), ("e", Number(1.0)), ("v", Number(10.0)), ("r", Text("a".into()))]),
                row(&[("s", Number(0.0)), ("e", Number(1.0)), ("v", Number(10.0)), ("r", Text("b".into()))]),
            ],
        );
        let bars = rects(&draw(&m, &geometry(&m), &view()));
        assert_eq!(bars[0], Rect::new(0.0, 0.0, 1.0, 65.0));
        assert_eq!(bars[1], Rect::new(0.0, 65.0, 1.0, 65.0));
    }

    #[test]
    fn thin_bars_drop_their_stroke() {
        let m = model(
            r#"{"mark": "bar", "width": 100, "height": 100,
                "x": {"field": "s", "type": "genomic"},
                "y": {"field": "v", "type": "quantitative"},
                "size": {"value": 0.5}, "strokeWidth": {"value": 2}}"#,
            vec![row(&[("s", Number(5.0)), ("v", Number(5.0))])],
        );
        let commands = draw(&m, &geometry(&m), &view());
        let stroke = commands.iter().find_map(|c| match c {
            RenderCommand::DrawRect { stroke, .. } => Some(*stroke),
            _ => None,
        });
        assert_eq!(stroke, Some(None));
    }
}
