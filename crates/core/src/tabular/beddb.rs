//! Indexed interval records (`beddb`), including gene models whose exon
//! boundaries are packed into comma-separated columns.

use crate::spec::data::{BeddbData, ValueFieldType};
use crate::tabular::{BedRecord, Datum, DatumValue, RawTile};

pub fn beddb_rows(data: &BeddbData, tile: &RawTile) -> Vec<Datum> {
    let Some(records) = tile.records.as_deref() else {
        tracing::warn!(key = %tile.key, "beddb tile without records");
        return Vec::new();
    };
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let parent = record_row(data, record);
        let exons = data
            .exon_interval_fields
            .as_ref()
            .map(|[starts, ends]| {
                let starts = positions(record, starts.index);
                let ends = positions(record, ends.index);
                starts.into_iter().zip(ends).collect::<Vec<_>>()
            })
            .unwrap_or_default();

        if let Some([start_field, end_field]) = data.exon_interval_fields.as_ref()
            && !exons.is_empty()
        {
            rows.extend(gene_model_rows(
                &parent,
                record.chr_offset,
                exons,
                &start_field.name,
                &end_field.name,
            ));
        }
        rows.push(parent);
    }
    rows
}

fn record_row(data: &BeddbData, record: &BedRecord) -> Datum {
    let mut datum = Datum::new();
    for field in &data.genomic_fields {
        if let Some(pos) = record.fields.get(field.index).and_then(DatumValue::as_f64) {
            datum.insert(field.name.clone(), DatumValue::Number(pos + record.chr_offset));
        }
    }
    for field in &data.value_fields {
        let Some(cell) = record.fields.get(field.index) else {
            continue;
        };
        let value = match field.field_type {
            ValueFieldType::Quantitative => match cell.as_f64() {
                Some(n) => DatumValue::Number(n),
                None => continue,
            },
            ValueFieldType::Nominal => DatumValue::Text(cell.to_string()),
        };
        datum.insert(field.name.clone(), value);
    }
    datum.insert("type".into(), DatumValue::from("gene"));
    datum
}

/// Parse a comma-separated position list. Trailing commas leave empty
/// entries, which are ignored.
fn positions(record: &BedRecord, index: usize) -> Vec<f64> {
    let Some(cell) = record.fields.get(index) else {
        return Vec::new();
    };
    cell.to_string()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<f64>().ok())
        .collect()
}

/// One row per exon and one per gap between consecutive exons, each a
/// copy of the parent with its interval and `type` replaced.
fn gene_model_rows(
    parent: &Datum,
    chr_offset: f64,
    mut exons: Vec<(f64, f64)>,
    start_field: &str,
    end_field: &str,
) -> Vec<Datum> {
    exons.sort_by(|a, b| a.0.total_cmp(&b.0));
    let with_interval = |start: f64, end: f64, kind: &str| {
        let mut row = parent.clone();
        row.insert(start_field.to_string(), DatumValue::Number(start + chr_offset));
        row.insert(end_field.to_string(), DatumValue::Number(end + chr_offset));
        row.insert("type".into(), DatumValue::from(kind));
        row
    };

    let mut rows = Vec::with_capacity(exons.len() * 2);
    for (i, &(start, end)) in exons.iter().enumerate() {
        rows.push(with_interval(start, end, "exon"));
        if let Some(&(next_start, _)) = exons.get(i + 1)
            && next_start > end
        {
            rows.push(with_interval(end, next_start, "intron"));
        }
    }
    rows
}
