use strand_core::layout::ResolvedTrack;
use strand_core::tabular::RawTile;
use strand_core::{StructuralValidator, Theme};
use strand_protocol::TileView;
use wasm_bindgen::prelude::*;

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// Compile a spec document, returning the compile result as JSON. Failures
/// are reported in the result's `state` and `message`, never thrown.
#[wasm_bindgen]
pub fn compile(spec_json: &str) -> String {
    let result = strand_core::compile(spec_json, &StructuralValidator);
    serde_json::to_string(&result).unwrap_or_else(|e| {
        format!(r#"{{"state":"error","message":{:?}}}"#, e.to_string())
    })
}

/// Resolve a theme by built-in name or from a theme JSON document.
fn theme(theme: Option<String>) -> Result<Theme, JsError> {
    match theme.as_deref() {
        None => Ok(Theme::light()),
        Some(t) if t.trim_start().starts_with('{') => Theme::from_json(t).map_err(js_error),
        Some(name) => Theme::builtin(name).map_err(js_error),
    }
}

/// Per-track tile renderer handed to the host. One instance is created
/// per resolved track of a compile result.
#[wasm_bindgen]
pub struct TrackRenderer {
    inner: strand_core::TrackRenderer,
}

#[wasm_bindgen]
impl TrackRenderer {
    /// `track_json` is one entry of the compiled `tracks` array.
    #[wasm_bindgen(constructor)]
    pub fn new(track_json: &str, theme_name: Option<String>) -> Result<TrackRenderer, JsError> {
        let resolved: ResolvedTrack = serde_json::from_str(track_json).map_err(js_error)?;
        Ok(Self {
            inner: strand_core::TrackRenderer::new(resolved, theme(theme_name)?),
        })
    }

    /// Tabularize (once per key) and draw a tile for the visible interval,
    /// returning render commands as JSON.
    #[wasm_bindgen(js_name = drawTile)]
    pub fn draw_tile(
        &mut self,
        tile_json: &str,
        start: f64,
        end: f64,
        zoom_level: f64,
    ) -> Result<String, JsError> {
        let tile: RawTile = serde_json::from_str(tile_json).map_err(js_error)?;
        let commands = self
            .inner
            .draw_tile(&tile, &TileView::new(start, end, zoom_level));
        serde_json::to_string(&commands).map_err(js_error)
    }

    /// Redraw an already loaded tile, e.g. after a zoom.
    #[wasm_bindgen(js_name = redrawTile)]
    pub fn redraw_tile(
        &mut self,
        key: &str,
        start: f64,
        end: f64,
        zoom_level: f64,
    ) -> Result<String, JsError> {
        if !self.inner.is_loaded(key) {
            return Err(JsError::new(&format!("tile '{key}' is not loaded")));
        }
        let commands = self
            .inner
            .draw_loaded(key, &TileView::new(start, end, zoom_level));
        serde_json::to_string(&commands).map_err(js_error)
    }

    #[wasm_bindgen(js_name = removeTile)]
    pub fn remove_tile(&mut self, key: &str) {
        self.inner.remove_tile(key);
    }

    /// Tabularized rows of a loaded tile as JSON.
    #[wasm_bindgen(js_name = tileRows)]
    pub fn tile_rows(&self, key: &str) -> Result<Option<String>, JsError> {
        self.inner
            .rows(key)
            .map(|rows| serde_json::to_string(rows).map_err(js_error))
            .transpose()
    }

    /// Call `callback(key, rowsJson)` after every tile is tabularized.
    #[wasm_bindgen(js_name = observeTiles)]
    pub fn observe_tiles(&mut self, callback: js_sys::Function) {
        self.inner.observe(Box::new(move |key, rows| {
            let Ok(rows) = serde_json::to_string(rows) else {
                return;
            };
            let _ = callback.call2(
                &JsValue::NULL,
                &JsValue::from_str(key),
                &JsValue::from_str(&rows),
            );
        }));
    }

    #[wasm_bindgen(js_name = unobserveTiles)]
    pub fn unobserve_tiles(&mut self) {
        self.inner.unobserve();
    }
}
