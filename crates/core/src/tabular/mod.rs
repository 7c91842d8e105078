//! Tile tabularization: per-format raw tile payloads become flat rows.
//!
//! Each data format has its own module. [`tabularize`] dispatches on the
//! [`DataSource`] variant; a payload that lacks what its format needs
//! yields no rows and a warning, never an error.

pub mod beddb;
pub mod datum;
pub mod dense;
pub mod matrix;
pub mod rows;
pub mod transform;

pub use datum::{Datum, DatumValue, datum_from_json, format_number};
pub use transform::apply_transforms;

use serde::{Deserialize, Serialize};

use crate::assembly::Assembly;
use crate::spec::DataSource;

/// One tile as delivered by the host's fetcher. Which of the optional
/// payload fields are present depends on the data format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTile {
    pub key: String,
    /// Absolute genomic position of the tile's left edge.
    pub tile_x: f64,
    pub tile_y: f64,
    /// Genomic span covered by the tile along x.
    pub tile_width: f64,
    pub tile_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dense: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<[usize; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<BedRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl RawTile {
    /// Absolute `[start, end)` interval covered by the tile, if it has one.
    pub fn interval(&self) -> Option<[f64; 2]> {
        (self.tile_width > 0.0).then(|| [self.tile_x, self.tile_x + self.tile_width])
    }
}

/// An indexed interval record: raw string columns plus the absolute
/// offset of the record's chromosome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedRecord {
    #[serde(default)]
    pub chr_offset: f64,
    pub fields: Vec<DatumValue>,
}

/// Convert one raw tile into rows according to its data source.
pub fn tabularize(source: &DataSource, tile: &RawTile, assembly: Assembly) -> Vec<Datum> {
    match source {
        DataSource::Vector(data) | DataSource::Bigwig(data) => dense::vector_rows(data, tile),
        DataSource::Multivec(data) => dense::multivec_rows(data, tile),
        DataSource::Matrix(_) => matrix::matrix_rows(tile),
        DataSource::Beddb(data) => beddb::beddb_rows(data, tile),
        DataSource::Json(data) => rows::json_rows(data, tile, assembly),
        DataSource::Csv(data) => rows::csv_rows(data, tile, assembly),
        DataSource::Bam(_) => rows::bam_rows(tile),
    }
}

/// Callback invoked with the tile key and its rows after every
/// tabularization.
pub type TileObserver = Box<dyn FnMut(&str, &[Datum])>;

/// A data source bound to an assembly, with an optional tile observer.
pub struct Tabularizer {
    source: DataSource,
    assembly: Assembly,
    observer: Option<TileObserver>,
}

impl Tabularizer {
    pub fn new(source: DataSource, assembly: Assembly) -> Self {
        Self {
            source,
            assembly,
            observer: None,
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Register the tile-observed callback, replacing any previous one.
    pub fn observe(&mut self, observer: TileObserver) {
        self.observer = Some(observer);
    }

    pub fn unobserve(&mut self) {
        self.observer = None;
    }

    pub fn is_observed(&self) -> bool {
        self.observer.is_some()
    }

    pub fn tabularize(&mut self, tile: &RawTile) -> Vec<Datum> {
        let rows = tabularize(&self.source, tile, self.assembly);
        tracing::trace!(
            key = %tile.key,
            kind = self.source.kind(),
            rows = rows.len(),
            "tabularized tile"
        );
        if let Some(observer) = self.observer.as_mut() {
            observer(&tile.key, &rows);
        }
        rows
    }
}

impl std::fmt::Debug for Tabularizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tabularizer")
            .field("source", &self.source.kind())
            .field("assembly", &self.assembly)
            .field("observed", &self.is_observed())
            .finish()
    }
}
