//! The grammar: a recursive view tree whose leaves are tracks.
//!
//! Every type here is the serde image of the JSON a user writes, with
//! camelCase keys. Optional properties stay `Option` so the normalizer can
//! tell "unset" apart from "set to the default".

pub mod channel;
pub mod data;
pub mod track;
pub mod view;
pub mod visibility;

pub use channel::{
    AxisPosition, Channel, ChannelDeep, ChannelKey, ChannelValue, ColorScheme, Domain, FieldType,
    GenomicDomain, RangeSpec,
};
pub use data::{DataSource, DataTransform};
pub use track::{Mark, Track, TrackStyle};
pub use view::{
    Alignment, Arrangement, CommonViewDef, Layout, Orientation, OverlaidTrack, TrackEntry, View,
};
pub use visibility::{LogicalOperation, Measure, Threshold, VisibilityCondition, VisibilityTarget};

/// Parse a spec document into its root view.
pub fn parse_spec(json: &str) -> Result<View, serde_json::Error> {
    serde_json::from_str(json)
}
