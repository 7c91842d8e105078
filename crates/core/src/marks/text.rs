use std::collections::HashMap;

use strand_protocol::{RenderCommand, TextAlign};

use super::{DrawContext, stack_key};
use crate::spec::ChannelKey;

/// Rough advance of one glyph as a fraction of the font size.
const GLYPH_WIDTH: f64 = 0.6;

pub fn estimate_text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * font_size * GLYPH_WIDTH
}

/// Labels centered on `x` (or the middle of `x..xe`) with the `size`
/// channel as font size. Stacked labels sit in the middle of their share
/// of the stack. On circular tracks labels follow the ring tangent and
/// are kept clear of the 0° seam.
pub(super) fn draw(ctx: &DrawContext<'_>, out: &mut Vec<RenderCommand>) {
    let row_height = ctx.row_height();
    let baseline = ctx.y_up_of(0.0).max(0.0);
    let mut stacks: HashMap<String, f64> = HashMap::new();

    for datum in ctx.model.rows() {
        let Some(text) = ctx.model.text(datum).filter(|t| !t.is_empty()) else {
            continue;
        };
        let Some(x) = ctx.x(ChannelKey::X, datum) else {
            continue;
        };
        let mut cx = ctx.x(ChannelKey::Xe, datum).map_or(x, |xe| (x + xe) / 2.0);
        let up = match ctx.y_up(ChannelKey::Y, datum) {
            Some(top) if ctx.model.is_stacked() => {
                let offset = stacks.entry(stack_key(ctx, datum)).or_insert(baseline);
                let lo = *offset;
                *offset += (top - baseline).max(0.0);
                (lo + *offset) / 2.0
            }
            Some(y) => y,
            None if ctx.has(ChannelKey::Y) => continue,
            None => row_height / 2.0,
        };

        let font_size = ctx.size(datum);
        let text_width = estimate_text_width(&text, font_size);
        let opacity = ctx.opacity(datum, text_width, font_size);
        if opacity <= 0.0 {
            continue;
        }
        let y = ctx.track_y(datum, up);

        let rotation = match &ctx.polar {
            Some(frame) => {
                let half = frame.arc_to_x(text_width, frame.radius(y)) / 2.0;
                if half * 2.0 >= frame.width {
                    continue;
                }
                cx = cx.clamp(half, frame.width - half);
                frame.angle(cx) + std::f64::consts::FRAC_PI_2
            }
            None => 0.0,
        };

        out.push(RenderCommand::DrawText {
            position: ctx.canvas(cx, y),
            text,
            color: ctx.fill(datum),
            font_size,
            align: TextAlign::Center,
            rotation,
            opacity,
        });
    }
}
