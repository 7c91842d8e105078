//! Per-track tile pipeline: tabularize, transform, model, draw.
//!
//! Every tile gets its own [`TrackModel`], but all models of a track scale
//! over domains merged across the loaded tiles, so neighbouring tiles line
//! up without seams. The merge is redone after tiles are loaded or removed.

use indexmap::IndexMap;
use strand_protocol::{RenderCommand, TileView, TrackGeometry};

use crate::encoding::{ScaleDomain, TrackModel};
use crate::layout::ResolvedTrack;
use crate::marks;
use crate::tabular::{Datum, RawTile, Tabularizer, TileObserver, apply_transforms};
use crate::theme::Theme;

struct TileState {
    rows: Vec<Datum>,
    model: Option<TrackModel>,
}

/// Drawing state of one resolved track. Rows are cached per tile key and
/// tile models are built at the first draw after their tile loads.
pub struct TrackRenderer {
    resolved: ResolvedTrack,
    theme: Theme,
    tabularizer: Option<Tabularizer>,
    tiles: IndexMap<String, TileState>,
    /// Tiles changed since domains were last merged.
    stale: bool,
}

impl TrackRenderer {
    pub fn new(resolved: ResolvedTrack, theme: Theme) -> Self {
        let assembly = resolved.track.assembly.unwrap_or_default();
        let tabularizer = resolved
            .track
            .data
            .clone()
            .map(|source| Tabularizer::new(source, assembly));
        Self {
            resolved,
            theme,
            tabularizer,
            tiles: IndexMap::new(),
            stale: false,
        }
    }

    pub fn resolved(&self) -> &ResolvedTrack {
        &self.resolved
    }

    pub fn geometry(&self) -> &TrackGeometry {
        &self.resolved.geometry
    }

    /// Move the track; cached models pick the new box up on next draw.
    pub fn set_geometry(&mut self, geometry: TrackGeometry) {
        self.resolved.geometry = geometry;
    }

    /// Register the tile-observed callback. Without a data source there is
    /// nothing to observe and the callback is dropped.
    pub fn observe(&mut self, observer: TileObserver) {
        if let Some(tabularizer) = self.tabularizer.as_mut() {
            tabularizer.observe(observer);
        }
    }

    pub fn unobserve(&mut self) {
        if let Some(tabularizer) = self.tabularizer.as_mut() {
            tabularizer.unobserve();
        }
    }

    /// Tabularize a tile and cache its transformed rows, replacing any
    /// previous payload under the same key.
    pub fn load_tile(&mut self, tile: &RawTile) {
        let rows = match self.tabularizer.as_mut() {
            Some(tabularizer) => tabularizer.tabularize(tile),
            None => Vec::new(),
        };
        let rows = apply_transforms(rows, &self.resolved.track.data_transform);
        self.tiles
            .insert(tile.key.clone(), TileState { rows, model: None });
        self.stale = true;
    }

    pub fn rows(&self, key: &str) -> Option<&[Datum]> {
        self.tiles.get(key).map(|t| t.rows.as_slice())
    }

    pub fn is_loaded(&self, key: &str) -> bool {
        self.tiles.contains_key(key)
    }

    pub fn remove_tile(&mut self, key: &str) {
        if self.tiles.shift_remove(key).is_some() {
            self.stale = true;
        }
    }

    /// Draw a tile, loading it first when its key is new.
    pub fn draw_tile(&mut self, tile: &RawTile, view: &TileView) -> Vec<RenderCommand> {
        if !self.is_loaded(&tile.key) {
            self.load_tile(tile);
        }
        self.draw_loaded(&tile.key, view)
    }

    /// Draw a previously loaded tile; unknown keys draw nothing.
    pub fn draw_loaded(&mut self, key: &str, view: &TileView) -> Vec<RenderCommand> {
        if !self.tiles.contains_key(key) {
            tracing::debug!(key, "draw requested for an unloaded tile");
            return Vec::new();
        }
        self.sync_models();
        let geometry = self.resolved.geometry;
        let (width, height) = model_bounds(&geometry);
        let Some(model) = self.tiles.get_mut(key).and_then(|t| t.model.as_mut()) else {
            return Vec::new();
        };
        model.set_bounds(width, height);
        model.set_x_domain(view.x_domain);
        marks::draw(model, &geometry, view)
    }

    /// Build missing tile models and hand every model the domains merged
    /// over all non-empty tiles.
    fn sync_models(&mut self) {
        if !self.stale {
            return;
        }
        for state in self.tiles.values_mut() {
            if state.model.is_none() {
                state.model = Some(TrackModel::new(
                    self.resolved.track.clone(),
                    state.rows.clone(),
                    &self.theme,
                ));
            }
        }

        let mut shared: IndexMap<_, ScaleDomain> = IndexMap::new();
        let populated = self.tiles.values().filter(|t| !t.rows.is_empty());
        for model in populated.filter_map(|t| t.model.as_ref()) {
            for (key, domain) in model.own_domains() {
                let merged = match shared.get(key) {
                    Some(seen) => seen.union(domain),
                    None => domain.clone(),
                };
                shared.insert(*key, merged);
            }
        }
        for model in self.tiles.values_mut().filter_map(|t| t.model.as_mut()) {
            model.share_domains(&shared);
        }
        tracing::trace!(
            tiles = self.tiles.len(),
            channels = shared.len(),
            "merged tile domains"
        );
        self.stale = false;
    }
}

impl std::fmt::Debug for TrackRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackRenderer")
            .field("track", &self.resolved.track.label())
            .field("tabularizer", &self.tabularizer)
            .field("tiles", &self.tiles.len())
            .field("stale", &self.stale)
            .finish()
    }
}

/// Local pixel box of a track: its rectangle on linear layouts, the
/// track width by the ring thickness on circular ones.
fn model_bounds(geometry: &TrackGeometry) -> (f64, f64) {
    match &geometry.circular {
        Some(ring) => (geometry.bounds.w, ring.ring_size()),
        None => (geometry.bounds.w, geometry.bounds.h),
    }
}
