//! Places every track of a normalized view tree on the canvas.

use serde::{Deserialize, Serialize};
use strand_protocol::{CircularGeometry, Rect, TrackGeometry};

use crate::encoding::validate_spec;
use crate::normalize::{DEFAULT_CENTER_RADIUS, DEFAULT_SPACING, DEFAULT_TRACK_HEIGHT, DEFAULT_TRACK_WIDTH};
use crate::spec::{Layout, Track, View};

const FULL_CIRCLE: [f64; 2] = [0.0, 360.0];

/// A fully resolved track with its place on the canvas and its
/// validation outcome. Invalid tracks keep their geometry so hosts can
/// still reserve their space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTrack {
    pub track: Track,
    pub geometry: TrackGeometry,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ResolvedTrack {
    fn new(track: Track, geometry: TrackGeometry) -> Self {
        let validation = validate_spec(&track);
        if let Some(reason) = &validation.reason {
            tracing::warn!(track = %track.label(), %reason, "invalid track");
        }
        Self {
            track,
            geometry,
            valid: validation.valid,
            reason: validation.reason,
        }
    }
}

/// Lay out a normalized view tree starting at the canvas origin.
pub fn layout_tracks(view: &View) -> Vec<ResolvedTrack> {
    let mut out = Vec::new();
    let (width, height) = place_view(view, 0.0, 0.0, &mut out);
    tracing::debug!(tracks = out.len(), width, height, "laid out view tree");
    out
}

/// Total canvas size needed by a layout.
pub fn canvas_size(tracks: &[ResolvedTrack]) -> (f64, f64) {
    tracks.iter().fold((0.0, 0.0), |(w, h), t| {
        (w.max(t.geometry.bounds.right()), h.max(t.geometry.bounds.bottom()))
    })
}

/// Place `view` with its top-left corner at `(x, y)`; returns its size.
fn place_view(view: &View, x: f64, y: f64, out: &mut Vec<ResolvedTrack>) -> (f64, f64) {
    if let Some(children) = &view.views {
        let spacing = view.common.spacing.unwrap_or(DEFAULT_SPACING);
        let horizontal = view.arrangement.is_some_and(|a| a.is_horizontal());
        let (mut cx, mut cy) = (x, y);
        let (mut width, mut height) = (0.0_f64, 0.0_f64);
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                if horizontal {
                    cx += spacing;
                } else {
                    cy += spacing;
                }
            }
            let (w, h) = place_view(child, cx, cy, out);
            if horizontal {
                cx += w;
                width = cx - x;
                height = height.max(h);
            } else {
                cy += h;
                height = cy - y;
                width = width.max(w);
            }
        }
        return (width, height);
    }

    let tracks: Vec<&Track> = view.single_tracks().collect();
    match view.common.layout.unwrap_or_default() {
        Layout::Linear => place_linear(&tracks, x, y, out),
        Layout::Circular => place_circular(
            &tracks,
            x,
            y,
            view.common.center_radius.unwrap_or(DEFAULT_CENTER_RADIUS),
            out,
        ),
    }
}

fn place_linear(tracks: &[&Track], x: f64, y: f64, out: &mut Vec<ResolvedTrack>) -> (f64, f64) {
    let mut cursor = y;
    let mut width = 0.0_f64;
    let mut previous: Option<Rect> = None;
    for track in tracks {
        let bounds = match previous {
            Some(prev) if track.overlay_on_previous_track == Some(true) => prev,
            _ => {
                let w = track.width.unwrap_or(DEFAULT_TRACK_WIDTH);
                let h = track.height.unwrap_or(DEFAULT_TRACK_HEIGHT);
                let rect = Rect::new(x, cursor, w, h);
                cursor += h;
                rect
            }
        };
        width = width.max(bounds.w);
        previous = Some(bounds);
        out.push(ResolvedTrack::new((*track).clone(), TrackGeometry::linear(bounds)));
    }
    (width, cursor - y)
}

/// Every track becomes a ring of one shared circle. Rings are stacked
/// from the outside in, each as thick as its share of the total track
/// height; overlaid tracks reuse the previous ring.
fn place_circular(
    tracks: &[&Track],
    x: f64,
    y: f64,
    center_radius: f64,
    out: &mut Vec<ResolvedTrack>,
) -> (f64, f64) {
    let side = tracks
        .first()
        .and_then(|t| t.width)
        .unwrap_or(DEFAULT_TRACK_WIDTH);
    let outer = side / 2.0;
    let inner = outer * center_radius.clamp(0.0, 1.0);
    let total_height: f64 = tracks
        .iter()
        .filter(|t| t.overlay_on_previous_track != Some(true))
        .map(|t| t.height.unwrap_or(DEFAULT_TRACK_HEIGHT))
        .sum();
    let available = outer - inner;
    let bounds = Rect::new(x, y, side, side);

    let mut ring_top = outer;
    let mut previous: Option<CircularGeometry> = None;
    for track in tracks {
        let start_angle = track.start_angle.unwrap_or(FULL_CIRCLE[0]);
        let end_angle = track.end_angle.unwrap_or(FULL_CIRCLE[1]);
        let mut ring = match previous {
            Some(prev) if track.overlay_on_previous_track == Some(true) => prev,
            _ => {
                let share = if total_height > 0.0 {
                    track.height.unwrap_or(DEFAULT_TRACK_HEIGHT) / total_height
                } else {
                    0.0
                };
                let thickness = available * share;
                let ring = CircularGeometry {
                    inner_radius: ring_top - thickness,
                    outer_radius: ring_top,
                    start_angle,
                    end_angle,
                };
                ring_top -= thickness;
                ring
            }
        };
        if let Some(r) = track.outer_radius {
            ring.outer_radius = r;
        }
        if let Some(r) = track.inner_radius {
            ring.inner_radius = r;
        }
        ring.start_angle = start_angle;
        ring.end_angle = end_angle;
        previous = Some(ring);
        out.push(ResolvedTrack::new(
            (*track).clone(),
            TrackGeometry {
                bounds,
                circular: Some(ring),
            },
        ));
    }
    (side, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::spec::parse_spec;

    fn laid_out(json: &str) -> Vec<ResolvedTrack> {
        layout_tracks(&normalize(&parse_spec(json).unwrap()).unwrap())
    }

    #[test]
    fn linear_tracks_stack_and_overlays_share_a_box() {
        let tracks = laid_out(
            r#"{"tracks": [
                {"mark": "bar", "height": 50},
                {"mark": "point", "overlay": [{}, {}]},
                {"mark": "line", "height": 20}
            ]}"#,
        );
        let bounds: Vec<Rect> = tracks.iter().map(|t| t.geometry.bounds).collect();
        assert_eq!(bounds[0], Rect::new(0.0, 0.0, 400.0, 50.0));
        assert_eq!(bounds[1], Rect::new(0.0, 50.0, 400.0, 130.0));
        assert_eq!(bounds[2], bounds[1]);
        assert_eq!(bounds[3], Rect::new(0.0, 180.0, 400.0, 20.0));
        assert_eq!(canvas_size(&tracks), (400.0, 200.0));
    }

    #[test]
    fn views_arrange_with_spacing() {
        let tracks = laid_out(
            r#"{"arrangement": "horizontal", "spacing": 20, "views": [
                {"tracks": [{"mark": "bar", "width": 100, "height": 10}]},
                {"tracks": [{"mark": "bar", "width": 100, "height": 10}]}
            ]}"#,
        );
        assert_eq!(tracks[1].geometry.bounds.x, 120.0);
        assert_eq!(tracks[1].geometry.bounds.y, 0.0);

        let vertical = laid_out(
            r#"{"views": [
                {"tracks": [{"mark": "bar", "height": 10}]},
                {"tracks": [{"mark": "bar", "height": 10}]}
            ]}"#,
        );
        assert_eq!(vertical[1].geometry.bounds.y, 20.0);
    }

    #[test]
    fn circular_rings_split_the_radius_by_height() {
        let tracks = laid_out(
            r#"{"layout": "circular", "centerRadius": 0.2, "tracks": [
                {"mark": "bar", "width": 500, "height": 60},
                {"mark": "bar", "height": 40}
            ]}"#,
        );
        let rings: Vec<CircularGeometry> =
            tracks.iter().filter_map(|t| t.geometry.circular).collect();
        assert_eq!(rings[0].outer_radius, 250.0);
        assert_eq!(rings[0].inner_radius, 130.0);
        assert_eq!(rings[1].outer_radius, 130.0);
        assert_eq!(rings[1].inner_radius, 50.0);
        assert_eq!(tracks[0].geometry.bounds.w, 500.0);
    }

    #[test]
    fn invalid_tracks_carry_a_reason() {
        let tracks = laid_out(r#"{"tracks": [{"mark": "bar"}]}"#);
        assert!(!tracks[0].valid);
        assert!(tracks[0].reason.is_some());
    }
}
