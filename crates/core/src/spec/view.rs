use serde::{Deserialize, Serialize};

use crate::assembly::Assembly;
use crate::spec::channel::Domain;
use crate::spec::track::Track;

/// A node of the view tree. Exactly one of `views` (a multiple-views
/// node) and `tracks` (a single view) must be present; the normalizer
/// rejects anything else.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub common: CommonViewDef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrangement: Option<Arrangement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<Vec<View>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<TrackEntry>>,

    /// Default size for tracks of this view that do not set their own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl View {
    pub fn is_multiple(&self) -> bool {
        self.views.is_some()
    }

    /// Resolved single tracks, skipping shorthand entries that have not
    /// been expanded yet.
    pub fn single_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks
            .iter()
            .flatten()
            .filter_map(TrackEntry::as_single)
    }
}

/// Properties shared by every view node and inherited down the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonViewDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly: Option<Assembly>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_domain: Option<Domain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f64>,
    #[serde(default, rename = "static", skip_serializing_if = "Option::is_none")]
    pub is_static: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Layout {
    #[default]
    Linear,
    Circular,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Arrangement {
    Parallel,
    Serial,
    Horizontal,
    Vertical,
}

impl Arrangement {
    /// Whether children are placed side by side rather than stacked.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Serial | Self::Horizontal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Stack,
    Overlay,
}

/// An entry of a `tracks` list: either a single track or the overlaid
/// shorthand, which shares one definition across several partial tracks
/// drawn into the same surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackEntry {
    Overlaid(OverlaidTrack),
    Single(Box<Track>),
}

impl TrackEntry {
    pub fn as_single(&self) -> Option<&Track> {
        match self {
            Self::Single(track) => Some(track),
            Self::Overlaid(_) => None,
        }
    }
}

impl From<Track> for TrackEntry {
    fn from(track: Track) -> Self {
        Self::Single(Box::new(track))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaidTrack {
    #[serde(alias = "tracks")]
    pub overlay: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_track_definition: Option<serde_json::Map<String, serde_json::Value>>,
    /// Every other key of the entry; part of the shared base.
    #[serde(flatten)]
    pub base: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_entries_are_detected() {
        let entries: Vec<TrackEntry> = serde_json::from_str(
            r#"[
                {"mark": "bar"},
                {"width": 300, "overlay": [{"mark": "line"}, {"mark": "point"}]},
                {"sharedTrackDefinition": {"mark": "rect"}, "tracks": [{}, {}]}
            ]"#,
        )
        .unwrap();
        assert!(matches!(entries[0], TrackEntry::Single(_)));
        let TrackEntry::Overlaid(ref overlaid) = entries[1] else {
            panic!("expected overlay shorthand");
        };
        assert_eq!(overlaid.overlay.len(), 2);
        assert_eq!(overlaid.base.get("width"), Some(&serde_json::json!(300)));
        let TrackEntry::Overlaid(ref shared) = entries[2] else {
            panic!("expected shared definition shorthand");
        };
        assert!(shared.shared_track_definition.is_some());
        assert_eq!(shared.overlay.len(), 2);
    }

    #[test]
    fn common_properties_are_flattened() {
        let view: View = serde_json::from_str(
            r#"{"assembly": "hg19", "layout": "circular", "centerRadius": 0.5, "views": []}"#,
        )
        .unwrap();
        assert_eq!(view.common.assembly, Some(Assembly::Hg19));
        assert_eq!(view.common.layout, Some(Layout::Circular));
        assert_eq!(view.common.center_radius, Some(0.5));
        assert!(view.is_multiple());
    }
}
