use strand_protocol::RenderCommand;

use super::DrawContext;
use crate::encoding::Scale;
use crate::spec::ChannelKey;

/// Rectangles span `x..xe`. Vertically they fill the row unless `y` is
/// bound: `y..ye` when both are, one band when `y` is nominal, otherwise
/// `size` pixels centered on `y`.
pub(super) fn draw(ctx: &DrawContext<'_>, out: &mut Vec<RenderCommand>) {
    let row_height = ctx.row_height();
    let band = match ctx.model.scale(ChannelKey::Y) {
        Some(Scale::Band(band)) => Some(band.bandwidth()),
        _ => None,
    };

    for datum in ctx.model.rows() {
        let Some(x) = ctx.x(ChannelKey::X, datum) else {
            continue;
        };
        let xe = ctx.x(ChannelKey::Xe, datum).unwrap_or(x + 1.0);
        let (x0, x1) = (x.min(xe), x.max(xe));

        let (lo, hi) = match (ctx.y_up(ChannelKey::Y, datum), ctx.y_up(ChannelKey::Ye, datum)) {
            (Some(y), Some(ye)) => (y.min(ye), y.max(ye)),
            (Some(y), None) => {
                let half = band.unwrap_or_else(|| ctx.size(datum)) / 2.0;
                (y - half, y + half)
            }
            (None, _) if ctx.has(ChannelKey::Y) => continue,
            (None, _) => (0.0, row_height),
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
