//! Spec normalization: one top-down pass that turns a partially specified
//! view tree into one where every track is fully resolved.
//!
//! The pass never mutates its input. Inheritable view properties flow
//! from each node to its children, shorthand track entries are expanded,
//! and a positional post-pass fixes up the first and last track of every
//! list. Normalizing an already normalized tree returns it unchanged.

pub mod merge;
pub mod template;

use serde_json::Value;
use thiserror::Error;

use crate::assembly::Assembly;
use crate::spec::{
    Alignment, Arrangement, AxisPosition, Channel, CommonViewDef, Layout, Orientation,
    OverlaidTrack, Track, TrackEntry, View,
};

pub const DEFAULT_ASSEMBLY: Assembly = Assembly::Hg38;
pub const DEFAULT_LAYOUT: Layout = Layout::Linear;
pub const DEFAULT_ORIENTATION: Orientation = Orientation::Horizontal;
pub const DEFAULT_CENTER_RADIUS: f64 = 0.3;
pub const DEFAULT_SPACING: f64 = 10.0;
pub const DEFAULT_ARRANGEMENT: Arrangement = Arrangement::Vertical;
pub const DEFAULT_TRACK_WIDTH: f64 = 400.0;
pub const DEFAULT_TRACK_HEIGHT: f64 = 130.0;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("view at {path} must have exactly one of `views` or `tracks`")]
    MalformedView { path: String },
    #[error("track {index} of view at {path} is not a valid track: {source}")]
    InvalidTrack {
        path: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Normalize a whole view tree.
pub fn normalize(root: &View) -> Result<View, NormalizeError> {
    let mut root = root.clone();
    apply_root_defaults(&mut root);
    let mut normalizer = Normalizer::default();
    let parent = Inherited {
        common: root.common.clone(),
        arrangement: root.arrangement,
    };
    normalizer.view(&root, &parent, "root".to_string())
}

fn apply_root_defaults(root: &mut View) {
    let common = &mut root.common;
    common.assembly.get_or_insert(DEFAULT_ASSEMBLY);
    common.layout.get_or_insert(DEFAULT_LAYOUT);
    common.orientation.get_or_insert(DEFAULT_ORIENTATION);
    common.is_static.get_or_insert(false);
    common.center_radius.get_or_insert(DEFAULT_CENTER_RADIUS);
    common.spacing.get_or_insert(DEFAULT_SPACING);
    if root.views.is_some() {
        root.arrangement.get_or_insert(DEFAULT_ARRANGEMENT);
    }
}

/// Resolved properties handed from a view node to its children.
#[derive(Debug, Clone)]
struct Inherited {
    common: CommonViewDef,
    arrangement: Option<Arrangement>,
}

#[derive(Debug, Default)]
struct Normalizer {
    next_linking_id: usize,
}

impl Normalizer {
    fn view(&mut self, view: &View, parent: &Inherited, path: String) -> Result<View, NormalizeError> {
        let mut out = view.clone();
        inherit_common(&mut out.common, &parent.common);

        match (&view.views, &view.tracks) {
            (Some(children), None) => {
                if out.arrangement.is_none() {
                    out.arrangement = parent.arrangement;
                }
                let inherited = Inherited {
                    common: out.common.clone(),
                    arrangement: out.arrangement,
                };
                let mut resolved = Vec::with_capacity(children.len());
                for (i, child) in children.iter().enumerate() {
                    resolved.push(self.view(child, &inherited, format!("{path}.views[{i}]"))?);
                }
                out.views = Some(resolved);
            }
            (None, Some(entries)) => {
                if out.common.linking_id.is_none() {
                    let id = format!("view-{}", self.next_linking_id);
                    self.next_linking_id += 1;
                    tracing::debug!(%path, %id, "generated linking id");
                    out.common.linking_id = Some(id);
                }
                let tracks = resolve_tracks(&out, entries, &path)?;
                out.tracks = Some(tracks.into_iter().map(TrackEntry::from).collect());
            }
            _ => return Err(NormalizeError::MalformedView { path }),
        }
        Ok(out)
    }
}

/// Copy every unset inheritable property from the parent.
fn inherit_common(common: &mut CommonViewDef, parent: &CommonViewDef) {
    fn fill<T: Clone>(slot: &mut Option<T>, parent: &Option<T>) {
        if slot.is_none() {
            slot.clone_from(parent);
        }
    }
    fill(&mut common.assembly, &parent.assembly);
    fill(&mut common.layout, &parent.layout);
    fill(&mut common.orientation, &parent.orientation);
    fill(&mut common.x_domain, &parent.x_domain);
    fill(&mut common.linking_id, &parent.linking_id);
    fill(&mut common.center_radius, &parent.center_radius);
    fill(&mut common.spacing, &parent.spacing);
    fill(&mut common.is_static, &parent.is_static);
}

/// Expand, size and link the tracks of a single view, then run the
/// positional post-pass over the resulting list.
fn resolve_tracks(view: &View, entries: &[TrackEntry], path: &str) -> Result<Vec<Track>, NormalizeError> {
    let mut groups: Vec<Vec<Track>> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let invalid = |source| NormalizeError::InvalidTrack {
            path: path.to_string(),
            index,
            source,
        };
        match entry {
            TrackEntry::Single(track) => {
                groups.push(vec![apply_template(track).map_err(invalid)?]);
            }
            TrackEntry::Overlaid(overlaid) => {
                groups.push(expand_overlay(overlaid).map_err(invalid)?);
            }
        }
    }
    if view.alignment == Some(Alignment::Overlay) {
        groups = vec![groups.into_iter().flatten().collect()];
    }

    let mut tracks = Vec::new();
    for group in groups {
        let mut group = group.into_iter();
        let Some(mut first) = group.next() else {
            continue;
        };
        apply_track_defaults(&mut first, view);
        let (width, height) = (first.width, first.height);
        tracks.push(first);
        for mut child in group {
            child.title = None;
            child.overlay_on_previous_track = Some(true);
            child.width = width;
            child.height = height;
            apply_track_defaults(&mut child, view);
            tracks.push(child);
        }
    }

    let count = tracks.len();
    for (i, track) in tracks.iter_mut().enumerate() {
        if is_first(i) {
            place_first_axis(track);
        }
        if is_last_link_mark(i, count, track) && track.flip_y.is_none() {
            track.flip_y = Some(true);
        }
    }
    Ok(tracks)
}

/// Deep-merge each partial child over the shared base of an overlay
/// entry. The entry's own keys win over `sharedTrackDefinition`.
fn expand_overlay(overlaid: &OverlaidTrack) -> Result<Vec<Track>, serde_json::Error> {
    let base = match &overlaid.shared_track_definition {
        Some(shared) => merge::merge_maps(shared, &overlaid.base),
        None => overlaid.base.clone(),
    };
    let base = Value::Object(base);
    overlaid
        .overlay
        .iter()
        .map(|child| {
            let merged = merge::deep_merge(&base, child);
            let track: Track = serde_json::from_value(merged)?;
            apply_template(&track)
        })
        .collect()
}

/// Merge a track over its data format's template when it names no mark.
fn apply_template(track: &Track) -> Result<Track, serde_json::Error> {
    if track.mark.is_some() {
        return Ok(track.clone());
    }
    let Some(template) = track.data.as_ref().and_then(template::template_for) else {
        return Ok(track.clone());
    };
    let user = serde_json::to_value(track)?;
    serde_json::from_value(merge::deep_merge(&template, &user))
}

fn apply_track_defaults(track: &mut Track, view: &View) {
    let width = *track
        .width
        .get_or_insert(view.width.unwrap_or(DEFAULT_TRACK_WIDTH));
    if track.height.is_none() {
        track.height = Some(if track.is_2d() {
            width
        } else {
            view.height.unwrap_or(DEFAULT_TRACK_HEIGHT)
        });
    }
    track.layout = view.common.layout;
    if track.assembly.is_none() {
        track.assembly = view.common.assembly;
    }
    if track.is_static.is_none() {
        track.is_static = view.common.is_static;
    }
    if let Some(x) = track.x.as_mut().and_then(Channel::as_deep_mut) {
        if x.linking_id.is_none() {
            x.linking_id.clone_from(&view.common.linking_id);
        }
        if x.domain.is_none() {
            x.domain.clone_from(&view.common.x_domain);
        }
    }
}

fn is_first(index: usize) -> bool {
    index == 0
}

fn is_last_link_mark(index: usize, count: usize, track: &Track) -> bool {
    count > 1 && index + 1 == count && track.mark.is_some_and(|m| m.is_link())
}

fn place_first_axis(track: &mut Track) {
    if let Some(x) = track.x.as_mut().and_then(Channel::as_deep_mut)
        && x.axis.is_none()
    {
        x.axis = Some(AxisPosition::Top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ChannelKey, Domain, Mark, parse_spec};

    fn spec(json: &str) -> View {
        parse_spec(json).unwrap()
    }

    fn tracks(view: &View) -> Vec<&Track> {
        view.single_tracks().collect()
    }

    #[test]
    fn root_defaults_reach_every_track() {
        let out = normalize(&spec(
            r#"{"tracks": [{"mark": "point", "data": {"type": "json", "values": []},
                "x": {"field": "p", "type": "genomic"}}]}"#,
        ))
        .unwrap();
        assert_eq!(out.common.assembly, Some(Assembly::Hg38));
        assert_eq!(out.common.center_radius, Some(0.3));
        assert_eq!(out.common.spacing, Some(10.0));
        assert_eq!(out.common.is_static, Some(false));
        let track = tracks(&out)[0];
        assert_eq!(track.width, Some(400.0));
        assert_eq!(track.height, Some(130.0));
        assert_eq!(track.layout, Some(Layout::Linear));
        assert_eq!(track.assembly, Some(Assembly::Hg38));
        let x = track.x.as_ref().and_then(Channel::as_deep).unwrap();
        assert_eq!(x.axis, Some(AxisPosition::Top));
        assert_eq!(x.linking_id.as_deref(), Some("view-0"));
    }

    #[test]
    fn properties_inherit_down_the_tree() {
        let out = normalize(&spec(
            r#"{"assembly": "mm10", "layout": "circular", "views": [
                {"views": [{"tracks": [{"mark": "bar", "layout": "linear"}]}]},
                {"assembly": "hg19", "tracks": [{"mark": "bar"}]}
            ]}"#,
        ))
        .unwrap();
        assert_eq!(out.arrangement, Some(Arrangement::Vertical));
        let views = out.views.as_ref().unwrap();
        let nested = views[0].views.as_ref().unwrap();
        assert_eq!(views[0].arrangement, Some(Arrangement::Vertical));
        let deep = tracks(&nested[0])[0];
        assert_eq!(deep.assembly, Some(Assembly::Mm10));
        assert_eq!(deep.layout, Some(Layout::Circular));
        assert_eq!(tracks(&views[1])[0].assembly, Some(Assembly::Hg19));
        assert_ne!(nested[0].common.linking_id, views[1].common.linking_id);
    }

    #[test]
    fn overlay_children_share_everything_but_their_overrides() {
        let out = normalize(&spec(
            r#"{"tracks": [{
                "title": "peaks",
                "mark": "bar",
                "width": 250,
                "data": {"type": "json", "values": []},
                "x": {"field": "start", "type": "genomic", "domain": [0, 100]},
                "y": {"field": "peak", "type": "quantitative"},
                "overlay": [{"x": {"axis": "top"}}, {"x": {"axis": "bottom"}, "mark": "line"}]
            }]}"#,
        ))
        .unwrap();
        let list = tracks(&out);
        assert_eq!(list.len(), 2);
        let (first, second) = (list[0], list[1]);
        let first_x = first.x.as_ref().and_then(Channel::as_deep).unwrap();
        let second_x = second.x.as_ref().and_then(Channel::as_deep).unwrap();
        assert_eq!(first_x.axis, Some(AxisPosition::Top));
        assert_eq!(second_x.axis, Some(AxisPosition::Bottom));
        assert_eq!(first_x.field, second_x.field);
        assert_eq!(first_x.domain, second_x.domain);
        assert_eq!(first_x.linking_id, second_x.linking_id);
        assert_eq!(first.y, second.y);
        assert_eq!(first.title.as_deref(), Some("peaks"));
        assert_eq!(second.title, None);
        assert_eq!(second.overlay_on_previous_track, Some(true));
        assert_eq!(second.width, Some(250.0));
        assert_eq!(second.mark, Some(Mark::Line));
    }

    #[test]
    fn shared_definition_and_overlay_alignment() {
        let out = normalize(&spec(
            r#"{"alignment": "overlay", "width": 300, "tracks": [
                {"sharedTrackDefinition": {"mark": "point", "x": {"field": "p", "type": "genomic"}},
                 "tracks": [{"title": "a"}, {"title": "b", "mark": "rule"}]},
                {"title": "c", "mark": "text"}
            ]}"#,
        ))
        .unwrap();
        let list = tracks(&out);
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].title.as_deref(), Some("a"));
        assert!(list[1..].iter().all(|t| t.title.is_none()));
        assert!(list[1..].iter().all(|t| t.overlay_on_previous_track == Some(true)));
        assert_eq!(list[1].mark, Some(Mark::Rule));
        assert_eq!(list[1].field_of(ChannelKey::X), Some("p"));
        assert!(list.iter().all(|t| t.width == Some(300.0)));
    }

    #[test]
    fn templates_fill_tracks_without_marks() {
        let out = normalize(&spec(
            r#"{"tracks": [{"data": {"type": "matrix", "url": "u"}, "color": {"field": "value", "type": "quantitative", "range": "warm"}}]}"#,
        ))
        .unwrap();
        let track = tracks(&out)[0];
        assert_eq!(track.mark, Some(Mark::Rect));
        assert!(track.is_2d());
        assert_eq!(track.height, track.width);
        let color = track.color.as_ref().and_then(Channel::as_deep).unwrap();
        assert!(color.range.is_some());
    }

    #[test]
    fn last_link_mark_hangs_from_the_top() {
        let out = normalize(&spec(
            r#"{"xDomain": [0, 10], "tracks": [{"mark": "bar"}, {"mark": "withinLink", "x": {"field": "s", "type": "genomic"}}]}"#,
        ))
        .unwrap();
        let list = tracks(&out);
        assert_eq!(list[1].flip_y, Some(true));
        assert_eq!(list[0].flip_y, None);
        let x = list[1].x.as_ref().and_then(Channel::as_deep).unwrap();
        assert_eq!(x.domain, Some(Domain::Numbers(vec![0.0, 10.0])));
        assert_eq!(x.axis, None);

        let single = normalize(&spec(r#"{"tracks": [{"mark": "link"}]}"#)).unwrap();
        assert_eq!(tracks(&single)[0].flip_y, None);
    }

    #[test]
    fn normalization_is_idempotent() {
        let input = spec(
            r#"{"views": [{"tracks": [
                {"data": {"type": "vector", "url": "u", "column": "position", "value": "peak"}},
                {"mark": "link", "overlay": [{"title": "a"}, {"title": "b"}]}
            ]}, {"layout": "circular", "tracks": [{"mark": "area"}]}]}"#,
        );
        let once = normalize(&input).unwrap();
        let twice = normalize(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn malformed_views_report_their_path() {
        let err = normalize(&spec(r#"{"views": [{"title": "empty"}]}"#)).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedView { ref path } if path == "root.views[0]"));

        let both = spec(r#"{"views": [], "tracks": []}"#);
        assert!(matches!(
            normalize(&both),
            Err(NormalizeError::MalformedView { .. })
        ));
    }

    #[test]
    fn unparseable_overlay_child_is_an_invalid_track() {
        let err = normalize(&spec(
            r#"{"tracks": [{"mark": "bar"}, {"overlay": [{"mark": "sparkle"}]}]}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidTrack { index: 1, .. }));
    }
}
