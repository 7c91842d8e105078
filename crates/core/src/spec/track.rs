use serde::{Deserialize, Serialize};

use crate::assembly::Assembly;
use crate::spec::channel::{Channel, ChannelKey, FieldType};
use crate::spec::data::{DataSource, DataTransform};
use crate::spec::view::Layout;
use crate::spec::visibility::VisibilityCondition;

/// The atomic renderable unit: one data source drawn with one mark.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DataSource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_transform: Vec<DataTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<Mark>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xe: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ye: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x1: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y1: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x1e: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y1e: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<Channel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Channel>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visibility: Vec<VisibilityCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<TrackStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_on_previous_track: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip_y: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly: Option<Assembly>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(default, rename = "static", skip_serializing_if = "Option::is_none")]
    pub is_static: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_angle: Option<f64>,
}

impl Track {
    pub fn channel(&self, key: ChannelKey) -> Option<&Channel> {
        match key {
            ChannelKey::X => self.x.as_ref(),
            ChannelKey::Y => self.y.as_ref(),
            ChannelKey::Xe => self.xe.as_ref(),
            ChannelKey::Ye => self.ye.as_ref(),
            ChannelKey::X1 => self.x1.as_ref(),
            ChannelKey::Y1 => self.y1.as_ref(),
            ChannelKey::X1e => self.x1e.as_ref(),
            ChannelKey::Y1e => self.y1e.as_ref(),
            ChannelKey::Row => self.row.as_ref(),
            ChannelKey::Column => self.column.as_ref(),
            ChannelKey::Color => self.color.as_ref(),
            ChannelKey::Size => self.size.as_ref(),
            ChannelKey::Stroke => self.stroke.as_ref(),
            ChannelKey::StrokeWidth => self.stroke_width.as_ref(),
            ChannelKey::Opacity => self.opacity.as_ref(),
            ChannelKey::Text => self.text.as_ref(),
        }
    }

    pub fn channel_mut(&mut self, key: ChannelKey) -> Option<&mut Channel> {
        match key {
            ChannelKey::X => self.x.as_mut(),
            ChannelKey::Y => self.y.as_mut(),
            ChannelKey::Xe => self.xe.as_mut(),
            ChannelKey::Ye => self.ye.as_mut(),
            ChannelKey::X1 => self.x1.as_mut(),
            ChannelKey::Y1 => self.y1.as_mut(),
            ChannelKey::X1e => self.x1e.as_mut(),
            ChannelKey::Y1e => self.y1e.as_mut(),
            ChannelKey::Row => self.row.as_mut(),
            ChannelKey::Column => self.column.as_mut(),
            ChannelKey::Color => self.color.as_mut(),
            ChannelKey::Size => self.size.as_mut(),
            ChannelKey::Stroke => self.stroke.as_mut(),
            ChannelKey::StrokeWidth => self.stroke_width.as_mut(),
            ChannelKey::Opacity => self.opacity.as_mut(),
            ChannelKey::Text => self.text.as_mut(),
        }
    }

    /// Field bound by a deep channel, if any.
    pub fn field_of(&self, key: ChannelKey) -> Option<&str> {
        self.channel(key).and_then(Channel::field)
    }

    pub fn is_circular(&self) -> bool {
        self.layout == Some(Layout::Circular)
    }

    pub fn is_flipped(&self) -> bool {
        self.flip_y == Some(true)
    }

    /// Tracks with a genomic y axis are drawn as 2D (matrix-like) tracks.
    pub fn is_2d(&self) -> bool {
        self.y
            .as_ref()
            .is_some_and(|y| y.is_deep_of(FieldType::Genomic))
    }

    /// Display name used for groups and diagnostics.
    pub fn label(&self) -> String {
        self.id
            .clone()
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| "track".to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mark {
    Point,
    Line,
    Area,
    Bar,
    Rect,
    Text,
    Rule,
    TriangleLeft,
    TriangleRight,
    TriangleBottom,
    #[serde(alias = "withinLink")]
    Link,
}

impl Mark {
    /// Connection marks hang from the previous track when last in a list.
    pub fn is_link(self) -> bool {
        matches!(self, Self::Link)
    }

    pub fn is_triangle(self) -> bool {
        matches!(
            self,
            Self::TriangleLeft | Self::TriangleRight | Self::TriangleBottom
        )
    }

    /// Marks whose quantitative y implies a zero baseline.
    pub fn implies_zero_baseline(self) -> bool {
        matches!(self, Self::Bar | Self::Area)
    }
}

/// Per-track drawing overrides that are not data-driven.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_width: Option<f64>,
}
