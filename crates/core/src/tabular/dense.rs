//! Dense vector formats: single-row vectors (`vector`, `bigwig`) and
//! multi-row vectors (`multivec`).

use crate::spec::data::{MultivecData, VectorData};
use crate::tabular::{Datum, DatumValue, RawTile};

/// Output field names shared by the dense formats.
struct BinFields<'a> {
    column: &'a str,
    value: &'a str,
    start: &'a str,
    end: &'a str,
}

pub fn vector_rows(data: &VectorData, tile: &RawTile) -> Vec<Datum> {
    let Some(dense) = tile.dense.as_deref() else {
        tracing::warn!(key = %tile.key, "vector tile without dense payload");
        return Vec::new();
    };
    let fields = BinFields {
        column: &data.column,
        value: &data.value,
        start: data.start.as_deref().unwrap_or("start"),
        end: data.end.as_deref().unwrap_or("end"),
    };
    let mut rows = Vec::new();
    push_bins(&mut rows, dense, tile, data.bin_size, &fields, None);
    rows
}

pub fn multivec_rows(data: &MultivecData, tile: &RawTile) -> Vec<Datum> {
    let (Some(dense), Some([row_count, samples])) = (tile.dense.as_deref(), tile.shape) else {
        tracing::warn!(key = %tile.key, "multivec tile without dense payload or shape");
        return Vec::new();
    };
    if row_count.checked_mul(samples) != Some(dense.len()) {
        tracing::warn!(
            key = %tile.key,
            rows = row_count,
            samples,
            len = dense.len(),
            "multivec shape does not match payload"
        );
        return Vec::new();
    }
    let fields = BinFields {
        column: &data.column,
        value: &data.value,
        start: data.start.as_deref().unwrap_or("start"),
        end: data.end.as_deref().unwrap_or("end"),
    };

    let mut rows = Vec::new();
    for (index, samples) in dense.chunks(samples.max(1)).enumerate() {
        let category = data
            .categories
            .get(index)
            .cloned()
            .unwrap_or_else(|| index.to_string());
        push_bins(
            &mut rows,
            samples,
            tile,
            data.bin_size,
            &fields,
            Some((&data.row, category)),
        );
    }
    rows
}

/// Average `samples` into bins of `bin_size` and append one row per bin.
/// The last bin may be short; its mean and extent use its true length.
fn push_bins(
    rows: &mut Vec<Datum>,
    samples: &[f64],
    tile: &RawTile,
    bin_size: Option<usize>,
    fields: &BinFields<'_>,
    row: Option<(&str, String)>,
) {
    if samples.is_empty() {
        return;
    }
    let bin = bin_size.unwrap_or(1).max(1);
    let sample_width = tile.tile_width / samples.len() as f64;

    for (i, chunk) in samples.chunks(bin).enumerate() {
        let mean = chunk.iter().sum::<f64>() / chunk.len() as f64;
        let start = tile.tile_x + (i * bin) as f64 * sample_width;
        let end = start + chunk.len() as f64 * sample_width;

        let mut datum = Datum::with_capacity(5);
        if let Some((name, category)) = &row {
            datum.insert((*name).to_string(), DatumValue::from(category.as_str()));
        }
        datum.insert(fields.column.to_string(), DatumValue::Number((start + end) / 2.0));
        datum.insert(fields.value.to_string(), DatumValue::Number(mean));
        datum.insert(fields.start.to_string(), DatumValue::Number(start));
        datum.insert(fields.end.to_string(), DatumValue::Number(end));
        rows.push(datum);
    }
}
