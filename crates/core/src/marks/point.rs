use strand_protocol::RenderCommand;

use super::DrawContext;
use crate::spec::ChannelKey;

/// Circles of diameter `size`, centered on `x` (or the middle of
/// `x..xe`) and on `y`, or the middle of the row when `y` is unset.
pub(super) fn draw(ctx: &DrawContext<'_>, out: &mut Vec<RenderCommand>) {
    let row_height = ctx.row_height();
    for datum in ctx.model.rows() {
        let Some(x) = ctx.x(ChannelKey::X, datum) else {
            continue;
        };
        let cx = ctx.x(ChannelKey::Xe, datum).map_or(x, |xe| (x + xe) / 2.0);
        let up = match ctx.y_up(ChannelKey::Y, datum) {
            Some(y) => y,
            None if ctx.has(ChannelKey::Y) => continue,
            None => row_height / 2.0,
        };

        let radius = ctx.size(datum) / 2.0;
        let opacity = ctx.opacity(datum, radius * 2.0, radius * 2.0);
        if opacity <= 0.0 {
            continue;
        }
        let (stroke, stroke_width) = ctx.stroke(datum, radius * 2.0);
        out.push(RenderCommand::DrawCircle {
            center: ctx.canvas(cx, ctx.track_y(datum, up)),
            radius,
            fill: ctx.fill(datum),
            stroke,
            stroke_width,
            opacity,
        });
    }
}
