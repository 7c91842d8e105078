//! Mark renderers: one algorithm per mark family, all emitting
//! [`RenderCommand`]s in canvas pixels.
//!
//! Renderers work in track-local coordinates. Local x runs over the model
//! width; local y is measured downward from the top of the datum's row.
//! [`DrawContext`] maps local coordinates to the canvas, either by offset
//! (linear tracks) or through a [`PolarFrame`] (circular tracks).

mod area;
mod bar;
mod line;
mod link;
mod point;
mod rect;
mod rule;
mod text;
mod triangle;

use strand_protocol::{Color, Point, Rect, RenderCommand, TileView, TrackGeometry};

use crate::encoding::color::parse_color;
use crate::encoding::{Measured, Scale, TrackModel};
use crate::geometry::PolarFrame;
use crate::spec::{Channel, ChannelKey, Mark};
use crate::tabular::{Datum, DatumValue};

/// Draw every visible datum of a model into the track's geometry.
///
/// The caller is expected to have synced the model's bounds and x domain
/// with `geometry` and `view`. Invalid tracks draw nothing.
pub fn draw(model: &TrackModel, geometry: &TrackGeometry, view: &TileView) -> Vec<RenderCommand> {
    if !model.is_valid() {
        return Vec::new();
    }
    let Some(mark) = model.mark() else {
        return Vec::new();
    };
    let bounds = geometry.bounds;
    let track_opacity = model.track_visibility(&Measured {
        width: Some(bounds.w),
        height: Some(bounds.h),
        zoom_level: Some(view.zoom_level),
    });
    if track_opacity <= 0.0 {
        return Vec::new();
    }

    let ctx = DrawContext {
        model,
        bounds,
        polar: PolarFrame::from_geometry(geometry, model.width(), model.height()),
        track_opacity,
        zoom_level: view.zoom_level,
    };

    let mut commands = Vec::with_capacity(model.rows().len() + 5);
    let track = model.track();
    commands.push(RenderCommand::BeginGroup {
        id: track.label(),
        label: track.title.clone(),
    });
    if !ctx.is_circular() {
        commands.push(RenderCommand::SetClip { rect: bounds });
    }
    ctx.push_background(&mut commands);

    let before = commands.len();
    match mark {
        Mark::Bar => bar::draw(&ctx, &mut commands),
        Mark::Rect => rect::draw(&ctx, &mut commands),
        Mark::Point => point::draw(&ctx, &mut commands),
        Mark::Line => line::draw(&ctx, &mut commands),
        Mark::Area => area::draw(&ctx, &mut commands),
        Mark::Text => text::draw(&ctx, &mut commands),
        Mark::Rule => rule::draw(&ctx, &mut commands),
        Mark::TriangleLeft | Mark::TriangleRight | Mark::TriangleBottom => {
            triangle::draw(&ctx, mark, &mut commands);
        }
        Mark::Link => link::draw(&ctx, &mut commands),
    }
    tracing::trace!(
        track = %track.label(),
        rows = model.rows().len(),
        commands = commands.len() - before,
        "drew track"
    );

    if !ctx.is_circular() {
        commands.push(RenderCommand::ClearClip);
    }
    commands.push(RenderCommand::EndGroup);
    commands
}

/// Everything a mark renderer needs to place one datum.
pub(crate) struct DrawContext<'a> {
    pub model: &'a TrackModel,
    pub bounds: Rect,
    pub polar: Option<PolarFrame>,
    pub track_opacity: f64,
    pub zoom_level: f64,
}

impl DrawContext<'_> {
    pub fn is_circular(&self) -> bool {
        self.polar.is_some()
    }

    pub fn row_height(&self) -> f64 {
        self.model.row_height()
    }

    fn flipped(&self) -> bool {
        self.model.track().is_flipped()
    }

    /// Top of the datum's row facet, in local y.
    pub fn row_offset(&self, datum: &Datum) -> f64 {
        self.model.number(ChannelKey::Row, datum).unwrap_or(0.0)
    }

    /// Left of the datum's column facet, in local x.
    pub fn column_offset(&self, datum: &Datum) -> f64 {
        self.model.number(ChannelKey::Column, datum).unwrap_or(0.0)
    }

    /// Local x of a positional channel.
    pub fn x(&self, key: ChannelKey, datum: &Datum) -> Option<f64> {
        self.model
            .number(key, datum)
            .map(|x| x + self.column_offset(datum))
    }

    /// Distance of a y-like channel above the bottom of its row.
    /// Quantitative y measures up from the bottom, nominal y sits at its
    /// slot center and constant y is measured down from the top.
    pub fn y_up(&self, key: ChannelKey, datum: &Datum) -> Option<f64> {
        let channel = self.model.track().channel(key)?;
        let row_height = self.row_height();
        match channel {
            Channel::Value(_) => self.model.number(key, datum).map(|y| row_height - y),
            Channel::Deep(_) => {
                let encoded = self.model.number(key, datum)?;
                match self.model.scale(key.primary()) {
                    Some(Scale::Band(_)) => Some(row_height - encoded),
                    _ => Some(encoded),
                }
            }
        }
    }

    /// Encoded height above the row bottom of a raw y value.
    pub fn y_up_of(&self, value: f64) -> f64 {
        self.model
            .encoded_value(ChannelKey::Y, Some(&DatumValue::Number(value)))
            .and_then(|e| e.as_number())
            .unwrap_or(0.0)
    }

    /// Row-local y of a height above the row bottom, honoring `flipY`.
    pub fn local_y(&self, up: f64) -> f64 {
        if self.flipped() {
            up
        } else {
            self.row_height() - up
        }
    }

    /// Absolute local y of a height above the bottom of the datum's row.
    pub fn track_y(&self, datum: &Datum, up: f64) -> f64 {
        self.row_offset(datum) + self.local_y(up)
    }

    /// Canvas position of a local point.
    pub fn canvas(&self, x: f64, y: f64) -> Point {
        match &self.polar {
            Some(frame) => frame.point(x, y),
            None => Point::new(self.bounds.x + x, self.bounds.y + y),
        }
    }

    pub fn fill(&self, datum: &Datum) -> Color {
        self.model
            .color(ChannelKey::Color, datum)
            .unwrap_or(Color::BLACK)
    }

    /// Stroke color and width. Marks narrower than one pixel, and
    /// zero-width strokes, draw without stroke.
    pub fn stroke(&self, datum: &Datum, mark_width: f64) -> (Option<Color>, f64) {
        let width = self
            .model
            .number(ChannelKey::StrokeWidth, datum)
            .unwrap_or(0.0);
        if width <= 0.0 || mark_width < 1.0 {
            return (None, 0.0);
        }
        (self.model.color(ChannelKey::Stroke, datum), width)
    }

    pub fn size(&self, datum: &Datum) -> f64 {
        self.model.number(ChannelKey::Size, datum).unwrap_or(0.0)
    }

    /// Whether a channel is set explicitly, as a constant or a live field.
    pub fn has(&self, key: ChannelKey) -> bool {
        match self.model.track().channel(key) {
            Some(Channel::Value(_)) => true,
            Some(Channel::Deep(_)) => self.model.is_field_bound(key),
            None => false,
        }
    }

    /// Final opacity of one datum: channel opacity, mark visibility and
    /// track visibility multiplied.
    pub fn opacity(&self, datum: &Datum, mark_width: f64, mark_height: f64) -> f64 {
        let channel = self
            .model
            .number(ChannelKey::Opacity, datum)
            .unwrap_or(1.0);
        let measured = Measured {
            width: Some(mark_width),
            height: Some(mark_height),
            zoom_level: Some(self.zoom_level),
        };
        channel * self.model.mark_visibility(datum, &measured) * self.track_opacity
    }

    /// A filled box between local `x0..x1` and `y0..y1`: a rectangle on
    /// linear tracks, an annular sector on circular ones.
    #[allow(clippy::too_many_arguments)]
    pub fn box_command(
        &self,
        x0: f64,
        x1: f64,
        y0: f64,
        y1: f64,
        fill: Color,
        stroke: (Option<Color>, f64),
        opacity: f64,
    ) -> RenderCommand {
        let (stroke, stroke_width) = stroke;
        match &self.polar {
            Some(frame) => RenderCommand::DrawPolygon {
                points: frame.sector(x0.min(x1), x0.max(x1), y0, y1),
                fill,
                stroke,
                stroke_width,
                opacity,
            },
            None => {
                let top_left = self.canvas(x0.min(x1), y0.min(y1));
                RenderCommand::DrawRect {
                    rect: Rect::new(top_left.x, top_left.y, (x1 - x0).abs(), (y1 - y0).abs()),
                    fill,
                    stroke,
                    stroke_width,
                    opacity,
                }
            }
        }
    }

    fn push_background(&self, commands: &mut Vec<RenderCommand>) {
        let style = self.model.track().style.as_ref();
        let fill = style
            .and_then(|s| s.background.as_deref())
            .or(self.model.theme().track_background.as_deref())
            .and_then(parse_color);
        let outline = style
            .and_then(|s| s.outline.as_deref())
            .and_then(parse_color);
        if fill.is_none() && outline.is_none() {
            return;
        }
        let outline_width = style.and_then(|s| s.outline_width).unwrap_or(1.0);
        let (w, h) = (self.model.width(), self.model.height());
        commands.push(self.box_command(
            0.0,
            w,
            0.0,
            h,
            fill.unwrap_or(Color::TRANSPARENT),
            (outline, outline_width),
            1.0,
        ));
    }
}

/// Group rows by row category, then by color category, keeping
/// first-seen order at both levels.
pub(crate) fn series<'a>(ctx: &DrawContext<'_>, rows: &'a [Datum]) -> Vec<Vec<&'a Datum>> {
    let mut groups: indexmap::IndexMap<(String, String), Vec<&'a Datum>> = indexmap::IndexMap::new();
    for row in rows {
        let key = (
            ctx.model
                .field_value(ChannelKey::Row, row)
                .map(DatumValue::to_key)
                .unwrap_or_default(),
            ctx.model
                .field_value(ChannelKey::Color, row)
                .map(DatumValue::to_key)
                .unwrap_or_default(),
        );
        groups.entry(key).or_default().push(row);
    }
    let x_field = ctx.model.track().field_of(ChannelKey::X);
    groups
        .into_values()
        .map(|mut group| {
            if let Some(field) = x_field {
                group.sort_by(|a, b| {
                    let a = a.get(field).and_then(DatumValue::as_f64).unwrap_or(f64::NAN);
                    let b = b.get(field).and_then(DatumValue::as_f64).unwrap_or(f64::NAN);
                    a.total_cmp(&b)
                });
            }
            group
        })
        .collect()
}

/// Key of the genomic position a stacked mark accumulates on.
pub(crate) fn stack_key(ctx: &DrawContext<'_>, datum: &Datum) -> String {
    ctx.model
        .field_value(ChannelKey::X, datum)
        .map(DatumValue::to_key)
        .unwrap_or_default()
}
