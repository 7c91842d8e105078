//! The per-track encoding model.
//!
//! A [`TrackModel`] binds one resolved track to the rows of one tile. It
//! computes a domain per bound channel once, at construction, and keeps
//! ranges and scales in sync with the track's pixel box and the host's
//! visible x interval. Domains shared by the other tiles of the same track
//! ([`TrackModel::share_domains`]) take precedence over the tile's own.

pub mod color;
pub mod domain;
pub mod scale;
pub mod validate;
pub mod visibility;

use indexmap::IndexMap;
use strand_protocol::Color;

use crate::assembly::Assembly;
use crate::normalize::{DEFAULT_TRACK_HEIGHT, DEFAULT_TRACK_WIDTH};
use crate::spec::{Channel, ChannelKey, FieldType, Mark, RangeSpec, Track, VisibilityTarget};
use crate::tabular::{Datum, DatumValue};
use crate::theme::Theme;

pub use scale::{BandScale, LinearScale, Scale, ScaleDomain, ScaleRange};
pub use validate::{Validation, validate_spec};
pub use visibility::Measured;

const SIZE_RANGE: [f64; 2] = [2.0, 10.0];
const OPACITY_RANGE: [f64; 2] = [0.0, 1.0];
const STROKE_WIDTH_RANGE: [f64; 2] = [1.0, 3.0];

/// A channel's value after encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Encoded {
    Number(f64),
    Color(Color),
    Text(String),
}

impl Encoded {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackModel {
    track: Track,
    rows: Vec<Datum>,
    theme: Theme,
    assembly: Assembly,
    width: f64,
    height: f64,
    validation: Validation,
    stacked: bool,
    /// Deep channels whose field appears in no row; they encode as if
    /// unspecified.
    degraded: Vec<ChannelKey>,
    domains: IndexMap<ChannelKey, ScaleDomain>,
    shared: IndexMap<ChannelKey, ScaleDomain>,
    x_override: Option<[f64; 2]>,
    ranges: IndexMap<ChannelKey, ScaleRange>,
    scales: IndexMap<ChannelKey, Scale>,
}

impl TrackModel {
    pub fn new(track: Track, rows: Vec<Datum>, theme: &Theme) -> Self {
        let assembly = track.assembly.unwrap_or_default();
        let width = track.width.unwrap_or(DEFAULT_TRACK_WIDTH);
        let height = track.height.unwrap_or(DEFAULT_TRACK_HEIGHT);
        let validation = validate_spec(&track);
        let stacked = is_stacked(&track);

        let degraded = if rows.is_empty() {
            Vec::new()
        } else {
            ChannelKey::ALL
                .into_iter()
                .filter(|key| {
                    track
                        .field_of(*key)
                        .is_some_and(|field| rows.iter().all(|row| !row.contains_key(field)))
                })
                .collect()
        };

        let mut model = Self {
            track,
            rows,
            theme: theme.clone(),
            assembly,
            width,
            height,
            validation,
            stacked,
            degraded,
            domains: IndexMap::new(),
            shared: IndexMap::new(),
            x_override: None,
            ranges: IndexMap::new(),
            scales: IndexMap::new(),
        };
        model.domains = model.compute_domains();
        model.rebuild_scales();
        model
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn rows(&self) -> &[Datum] {
        &self.rows
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn mark(&self) -> Option<Mark> {
        self.track.mark
    }

    pub fn validate_spec(&self) -> &Validation {
        &self.validation
    }

    pub fn is_valid(&self) -> bool {
        self.validation.valid
    }

    pub fn is_stacked(&self) -> bool {
        self.stacked
    }

    /// The domain `key` is scaled over: the shared one when set, else the
    /// one computed from this tile's rows.
    pub fn domain(&self, key: ChannelKey) -> Option<&ScaleDomain> {
        let own = self.domains.get(&key)?;
        Some(self.shared.get(&key).unwrap_or(own))
    }

    /// Domains computed from this tile's rows alone.
    pub fn own_domains(&self) -> &IndexMap<ChannelKey, ScaleDomain> {
        &self.domains
    }

    /// Scale over domains merged across tiles instead of this tile's own.
    /// Channels the model has no domain for are ignored.
    pub fn share_domains(&mut self, shared: &IndexMap<ChannelKey, ScaleDomain>) {
        if &self.shared == shared {
            return;
        }
        self.shared = shared.clone();
        self.rebuild_scales();
    }

    pub fn range(&self, key: ChannelKey) -> Option<&ScaleRange> {
        self.ranges.get(&key)
    }

    pub fn scale(&self, key: ChannelKey) -> Option<&Scale> {
        self.scales.get(&key)
    }

    /// Resize the pixel box. Scales are rebuilt only when it changed.
    pub fn set_bounds(&mut self, width: f64, height: f64) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.rebuild_scales();
    }

    /// Map the host's visible interval onto the x range.
    pub fn set_x_domain(&mut self, domain: [f64; 2]) {
        if self.x_override == Some(domain) {
            return;
        }
        self.x_override = Some(domain);
        self.rebuild_scales();
    }

    /// Whether `key` is bound to a live data field.
    pub fn is_field_bound(&self, key: ChannelKey) -> bool {
        self.track.field_of(key).is_some() && !self.degraded.contains(&key)
    }

    /// The raw value of the field bound to `key`, if any.
    pub fn field_value<'a>(&self, key: ChannelKey, datum: &'a Datum) -> Option<&'a DatumValue> {
        self.track.field_of(key).and_then(|f| datum.get(f))
    }

    /// Encode a raw value through the channel `key`. Value channels return
    /// their constant and unspecified channels the theme default; unknown
    /// categories and unscalable values give `None`.
    pub fn encoded_value(&self, key: ChannelKey, value: Option<&DatumValue>) -> Option<Encoded> {
        let channel = match self.track.channel(key) {
            Some(channel) if !self.degraded.contains(&key) => channel,
            _ => return self.default_value(key),
        };
        let deep = match channel {
            Channel::Value(constant) => return self.constant(key, &constant.value),
            Channel::Deep(deep) => deep,
        };
        if deep.field.is_none() {
            return self.default_value(key);
        }
        let value = value?;
        if key == ChannelKey::Text {
            return Some(Encoded::Text(value.to_string()));
        }

        let scale = self.scales.get(&key.primary())?;
        match scale {
            Scale::Linear(linear) => value.as_f64().map(|v| Encoded::Number(linear.apply(v))),
            Scale::Band(band) => {
                let key_str = value.to_key();
                let slot = if matches!(key, ChannelKey::Row | ChannelKey::Column) {
                    band.slot_start(&key_str)
                } else {
                    band.slot_center(&key_str)
                };
                slot.map(Encoded::Number)
            }
            Scale::Sequential { .. } => value
                .as_f64()
                .and_then(|v| scale.color_of_number(v))
                .map(Encoded::Color),
            Scale::Palette { .. } => scale.color_of_category(&value.to_key()).map(Encoded::Color),
            Scale::Ordinal { .. } => scale.number_of_category(&value.to_key()).map(Encoded::Number),
        }
    }

    /// Encode the field of `datum` bound to `key`.
    pub fn encode(&self, key: ChannelKey, datum: &Datum) -> Option<Encoded> {
        self.encoded_value(key, self.field_value(key, datum))
    }

    pub fn number(&self, key: ChannelKey, datum: &Datum) -> Option<f64> {
        self.encode(key, datum).and_then(|e| e.as_number())
    }

    pub fn color(&self, key: ChannelKey, datum: &Datum) -> Option<Color> {
        self.encode(key, datum).and_then(|e| e.as_color())
    }

    pub fn text(&self, datum: &Datum) -> Option<String> {
        self.encode(ChannelKey::Text, datum)
            .and_then(Encoded::into_text)
    }

    /// Row facets in slot order; a single unnamed facet when rows are
    /// not faceted.
    pub fn row_categories(&self) -> Vec<String> {
        match self.scales.get(&ChannelKey::Row) {
            Some(Scale::Band(band)) if !band.is_empty() => band.categories().iter().cloned().collect(),
            _ => vec![String::new()],
        }
    }

    pub fn row_count(&self) -> usize {
        self.band_len(ChannelKey::Row)
    }

    pub fn column_count(&self) -> usize {
        self.band_len(ChannelKey::Column)
    }

    pub fn row_height(&self) -> f64 {
        self.height / self.row_count() as f64
    }

    pub fn column_width(&self) -> f64 {
        self.width / self.column_count() as f64
    }

    fn band_len(&self, key: ChannelKey) -> usize {
        match self.scales.get(&key) {
            Some(Scale::Band(band)) if !band.is_empty() => band.len(),
            _ => 1,
        }
    }

    /// Mark-level semantic zoom opacity for one datum.
    pub fn mark_visibility(&self, datum: &Datum, measured: &Measured) -> f64 {
        let extent = match (
            self.number(ChannelKey::X, datum),
            self.number(ChannelKey::Xe, datum),
        ) {
            (Some(x), Some(xe)) => Some((xe - x).abs()),
            _ => None,
        };
        visibility::combined_opacity(
            &self.track.visibility,
            VisibilityTarget::Mark,
            measured,
            extent,
        )
    }

    /// Track-level semantic zoom opacity.
    pub fn track_visibility(&self, measured: &Measured) -> f64 {
        visibility::combined_opacity(
            &self.track.visibility,
            VisibilityTarget::Track,
            measured,
            None,
        )
    }

    fn default_value(&self, key: ChannelKey) -> Option<Encoded> {
        let marks = &self.theme.marks;
        Some(match key {
            ChannelKey::Opacity => Encoded::Number(marks.opacity),
            ChannelKey::Size => Encoded::Number(marks.size),
            ChannelKey::StrokeWidth => Encoded::Number(marks.stroke_width),
            ChannelKey::Color => Encoded::Color(Theme::color(&marks.color)),
            ChannelKey::Stroke => Encoded::Color(Theme::color(&marks.stroke)),
            ChannelKey::Text => Encoded::Text(marks.text.clone()),
            ChannelKey::Row | ChannelKey::Column => Encoded::Number(0.0),
            _ => return None,
        })
    }

    fn constant(&self, key: ChannelKey, value: &DatumValue) -> Option<Encoded> {
        if key.is_color() {
            let text = value.to_key();
            return match color::parse_color(&text) {
                Some(c) => Some(Encoded::Color(c)),
                None => {
                    tracing::warn!(channel = ?key, value = %text, "unparseable color, using default");
                    self.default_value(key)
                }
            };
        }
        if key == ChannelKey::Text {
            return Some(Encoded::Text(value.to_string()));
        }
        value.as_f64().map(Encoded::Number)
    }

    fn compute_domains(&self) -> IndexMap<ChannelKey, ScaleDomain> {
        ChannelKey::ALL
            .into_iter()
            .filter(|key| !key.is_extent() && *key != ChannelKey::Text)
            .filter(|key| !self.degraded.contains(key))
            .filter_map(|key| {
                let stacked = self.stacked && key == ChannelKey::Y;
                domain::infer_domain(&self.track, key, &self.rows, self.assembly, stacked)
                    .map(|d| (key, d))
            })
            .collect()
    }

    fn rebuild_scales(&mut self) {
        let mut domains = self.domains.clone();
        for (key, domain) in domains.iter_mut() {
            if let Some(shared) = self.shared.get(key) {
                domain.clone_from(shared);
            }
        }
        if let Some(x) = self.x_override {
            domains.insert(ChannelKey::X, ScaleDomain::Continuous(x));
        }
        let rows = domains
            .get(&ChannelKey::Row)
            .and_then(ScaleDomain::categories)
            .map_or(1, |c| c.len().max(1));
        let columns = domains
            .get(&ChannelKey::Column)
            .and_then(ScaleDomain::categories)
            .map_or(1, |c| c.len().max(1));

        self.ranges.clear();
        self.scales.clear();
        for (key, domain) in domains {
            let range = self.range_for(key, rows, columns);
            let scale = build_scale(&domain, &range);
            self.ranges.insert(key, range);
            if let Some(scale) = scale {
                self.scales.insert(key, scale);
            }
        }
        tracing::trace!(
            track = %self.track.label(),
            width = self.width,
            height = self.height,
            scales = self.scales.len(),
            "rebuilt scales"
        );
    }

    fn range_for(&self, key: ChannelKey, rows: usize, columns: usize) -> ScaleRange {
        let explicit = self
            .track
            .channel(key)
            .and_then(Channel::as_deep)
            .and_then(|d| d.range.as_ref());
        let flipped = self
            .track
            .channel(key)
            .and_then(Channel::as_deep)
            .is_some_and(|d| d.flip == Some(true));

        match key {
            ChannelKey::X => ScaleRange::Extent([0.0, self.width / columns as f64]),
            ChannelKey::Y => {
                let extent = self.height / rows as f64;
                ScaleRange::Extent(if flipped { [extent, 0.0] } else { [0.0, extent] })
            }
            ChannelKey::Row => ScaleRange::Extent([0.0, self.height]),
            ChannelKey::Column => ScaleRange::Extent([0.0, self.width]),
            ChannelKey::Color | ChannelKey::Stroke => {
                let nominal = self
                    .track
                    .channel(key)
                    .is_some_and(|c| c.is_deep_of(FieldType::Nominal));
                ScaleRange::Colors(self.color_range(explicit, nominal))
            }
            ChannelKey::Size => numeric_range(explicit, SIZE_RANGE),
            ChannelKey::Opacity => numeric_range(explicit, OPACITY_RANGE),
            ChannelKey::StrokeWidth => numeric_range(explicit, STROKE_WIDTH_RANGE),
            _ => ScaleRange::Extent([0.0, 1.0]),
        }
    }

    fn color_range(&self, explicit: Option<&RangeSpec>, nominal: bool) -> Vec<Color> {
        match explicit {
            Some(RangeSpec::Values(values)) => {
                let colors: Vec<Color> = values.iter().filter_map(|v| color::parse_color(v)).collect();
                if !colors.is_empty() {
                    return colors;
                }
            }
            Some(RangeSpec::Scheme(scheme)) => {
                return scheme_colors(*scheme);
            }
            Some(RangeSpec::Numbers(_)) | None => {}
        }
        if nominal {
            self.theme.categorical_colors()
        } else {
            scheme_colors(self.theme.sequential)
        }
    }
}

fn scheme_colors(scheme: crate::spec::ColorScheme) -> Vec<Color> {
    color::scheme_stops(scheme)
        .iter()
        .filter_map(|c| color::parse_color(c))
        .collect()
}

fn numeric_range(explicit: Option<&RangeSpec>, default: [f64; 2]) -> ScaleRange {
    match explicit {
        Some(RangeSpec::Numbers(values)) if values.len() == 2 => {
            ScaleRange::Extent([values[0], values[1]])
        }
        Some(RangeSpec::Numbers(values)) if !values.is_empty() => ScaleRange::Values(values.clone()),
        _ => ScaleRange::Extent(default),
    }
}

fn build_scale(domain: &ScaleDomain, range: &ScaleRange) -> Option<Scale> {
    Some(match (domain, range) {
        (ScaleDomain::Continuous(d), ScaleRange::Extent(r)) => Scale::Linear(LinearScale {
            domain: *d,
            range: *r,
        }),
        (ScaleDomain::Continuous(d), ScaleRange::Values(values)) => Scale::Linear(LinearScale {
            domain: *d,
            range: [
                values.first().copied().unwrap_or(0.0),
                values.last().copied().unwrap_or(0.0),
            ],
        }),
        (ScaleDomain::Continuous(d), ScaleRange::Colors(colors)) => Scale::Sequential {
            domain: *d,
            colors: colors.clone(),
        },
        (ScaleDomain::Categorical(c), ScaleRange::Colors(colors)) => Scale::Palette {
            categories: c.clone(),
            colors: colors.clone(),
        },
        (ScaleDomain::Categorical(c), ScaleRange::Values(values)) => Scale::Ordinal {
            categories: c.clone(),
            values: values.clone(),
        },
        (ScaleDomain::Categorical(c), ScaleRange::Extent(r)) => Scale::Band(BandScale::new(c.clone(), *r)),
    })
}

/// Bars, areas and text stack when a nominal color splits each position
/// into parts and rows are not faceted by field.
pub fn is_stacked(track: &Track) -> bool {
    let mark_stacks = matches!(track.mark, Some(Mark::Bar | Mark::Area | Mark::Text));
    let color_nominal = track
        .color
        .as_ref()
        .is_some_and(|c| c.is_deep_of(FieldType::Nominal) && c.field().is_some());
    let row_unfaceted = match &track.row {
        None | Some(Channel::Value(_)) => true,
        Some(Channel::Deep(deep)) => deep.field.is_none(),
    };
    let y_quantitative = track
        .y
        .as_ref()
        .is_some_and(|y| y.is_deep_of(FieldType::Quantitative));
    mark_stacks && color_nominal && row_unfaceted && y_quantitative
}
