use strand_protocol::{Point, RenderCommand};

use super::{DrawContext, series};
use crate::spec::ChannelKey;
use crate::tabular::Datum;

/// One polyline per row and color series, through the data points in x
/// order. Points whose visibility drops to zero break the line.
pub(super) fn draw(ctx: &DrawContext<'_>, out: &mut Vec<RenderCommand>) {
    let explicit_size = ctx.has(ChannelKey::Size);
    for group in series(ctx, ctx.model.rows()) {
        let mut run: Vec<Point> = Vec::new();
        let mut style: Option<&Datum> = None;
        for datum in group {
            let placed = ctx.x(ChannelKey::X, datum).zip(ctx.y_up(ChannelKey::Y, datum));
            let visible = placed.is_some() && ctx.opacity(datum, 0.0, 0.0) > 0.0;
            match placed {
                Some((x, up)) if visible => {
                    style.get_or_insert(datum);
                    run.push(ctx.canvas(x, ctx.track_y(datum, up)));
                }
                _ => flush(ctx, &mut run, style.take(), explicit_size, out),
            }
        }
        flush(ctx, &mut run, style, explicit_size, out);
    }
}

fn flush(
    ctx: &DrawContext<'_>,
    run: &mut Vec<Point>,
    style: Option<&Datum>,
    explicit_size: bool,
    out: &mut Vec<RenderCommand>,
) {
    let points = std::mem::take(run);
    let Some(datum) = style else {
        return;
    };
    if points.len() < 2 {
        return;
    }
    let width = if explicit_size { ctx.size(datum) } else { 1.0 };
    out.push(RenderCommand::DrawPolyline {
        points,
        color: ctx.fill(datum),
        width,
        opacity: ctx.opacity(datum, 0.0, 0.0),
    });
}
