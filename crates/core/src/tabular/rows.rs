//! Row-shaped formats: inline json values, csv text and decoded bam reads.

use crate::assembly::Assembly;
use crate::spec::data::{CsvData, JsonData};
use crate::tabular::{Datum, DatumValue, RawTile, datum_from_json};

pub fn json_rows(data: &JsonData, tile: &RawTile, assembly: Assembly) -> Vec<Datum> {
    let rows: Vec<Datum> = match tile.rows.as_deref() {
        Some(rows) => rows.iter().map(datum_from_json).collect(),
        None => data.values.iter().map(datum_from_json).collect(),
    };
    place_rows(
        rows,
        data.chromosome_field.as_deref(),
        &data.genomic_fields,
        tile,
        assembly,
    )
}

pub fn csv_rows(data: &CsvData, tile: &RawTile, assembly: Assembly) -> Vec<Datum> {
    let Some(text) = tile.text.as_deref() else {
        tracing::warn!(key = %tile.key, url = %data.url, "csv tile without text payload");
        return Vec::new();
    };
    let separator = data.separator.as_deref().unwrap_or(",");
    let rows = parse_delimited(text, separator);
    place_rows(
        rows,
        data.chromosome_field.as_deref(),
        &data.genomic_fields,
        tile,
        assembly,
    )
}

/// Reads arrive already decoded by the host; they pass through unchanged.
pub fn bam_rows(tile: &RawTile) -> Vec<Datum> {
    let Some(rows) = tile.rows.as_deref() else {
        tracing::warn!(key = %tile.key, "bam tile without decoded reads");
        return Vec::new();
    };
    rows.iter().map(datum_from_json).collect()
}

/// Parse delimited text with a header line. Cells that read as numbers
/// become numbers. Malformed records are skipped with a warning.
pub fn parse_delimited(text: &str, separator: &str) -> Vec<Datum> {
    let delimiter = match separator.as_bytes() {
        [byte] => *byte,
        _ => {
            tracing::warn!(separator, "separator must be a single byte, using ','");
            b','
        }
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let columns: Vec<String> = match reader.headers() {
        Ok(header) => header.iter().map(str::to_string).collect(),
        Err(err) => {
            tracing::warn!(error = %err, "unreadable csv header");
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed csv record");
                continue;
            }
        };
        rows.push(
            columns
                .iter()
                .zip(record.iter())
                .map(|(column, cell)| (column.clone(), cell_value(cell)))
                .collect(),
        );
    }
    rows
}

fn cell_value(cell: &str) -> DatumValue {
    match cell.parse::<f64>() {
        Ok(n) => DatumValue::Number(n),
        Err(_) => DatumValue::Text(cell.to_string()),
    }
}

/// Convert chromosome-relative genomic fields to absolute positions and
/// drop rows that fall outside the tile.
fn place_rows(
    rows: Vec<Datum>,
    chromosome_field: Option<&str>,
    genomic_fields: &[String],
    tile: &RawTile,
    assembly: Assembly,
) -> Vec<Datum> {
    rows.into_iter()
        .filter_map(|mut row| {
            if let Some(field) = chromosome_field {
                let offset = row
                    .get(field)
                    .map(DatumValue::to_key)
                    .and_then(|chrom| assembly.chromosome_offset(&chrom))
                    .unwrap_or(0.0);
                for name in genomic_fields {
                    if let Some(pos) = row.get(name).and_then(DatumValue::as_f64) {
                        row.insert(name.clone(), DatumValue::Number(pos + offset));
                    }
                }
            }
            overlaps_tile(&row, genomic_fields, tile).then_some(row)
        })
        .collect()
}

fn overlaps_tile(row: &Datum, genomic_fields: &[String], tile: &RawTile) -> bool {
    let Some([start, end]) = tile.interval() else {
        return true;
    };
    let positions: Vec<f64> = genomic_fields
        .iter()
        .filter_map(|name| row.get(name).and_then(DatumValue::as_f64))
        .collect();
    if positions.is_empty() {
        return true;
    }
    let lo = positions.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = positions.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    lo <= end && hi >= start
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_positions_become_absolute() {
        let data: JsonData = serde_json::from_str(
            r#"{"values": [{"chr": "chr2", "pos": 10, "v": 1}, {"chr": "1", "pos": 5, "v": 2}],
                "chromosomeField": "chr", "genomicFields": ["pos"]}"#,
        )
        .unwrap();
        let rows = json_rows(&data, &RawTile::default(), Assembly::Hg38);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("pos"), Some(&DatumValue::Number(248_956_432.0)));
        assert_eq!(rows[1].get("pos"), Some(&DatumValue::Number(5.0)));
    }

    #[test]
    fn json_rows_outside_the_tile_are_dropped() {
        let data: JsonData = serde_json::from_str(
            r#"{"values": [{"s": 10, "e": 20}, {"s": 50, "e": 60}, {"s": 95, "e": 120}],
                "genomicFields": ["s", "e"]}"#,
        )
        .unwrap();
        let tile = RawTile {
            tile_x: 40.0,
            tile_width: 60.0,
            ..RawTile::default()
        };
        let rows = json_rows(&data, &tile, Assembly::Unknown);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn csv_cells_are_typed() {
        let data = CsvData {
            url: "a.csv".into(),
            separator: Some("\t".into()),
            ..CsvData::default()
        };
        let tile = RawTile {
            text: Some("name\tscore\n\"a\"\t1.5\nb\tn/a\n".into()),
            ..RawTile::default()
        };
        let rows = csv_rows(&data, &tile, Assembly::Hg38);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some(&DatumValue::from("a")));
        assert_eq!(rows[0].get("score"), Some(&DatumValue::Number(1.5)));
        assert_eq!(rows[1].get("score"), Some(&DatumValue::from("n/a")));
    }

    #[test]
    fn quoted_cells_keep_their_separators() {
        let rows = parse_delimited("name,start\n\"BRCA1, isoform 2\",42\n", ",");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some(&DatumValue::from("BRCA1, isoform 2")));
        assert_eq!(rows[0].get("start"), Some(&DatumValue::Number(42.0)));
    }

    #[test]
    fn multi_byte_separators_fall_back_to_commas() {
        let rows = parse_delimited("a,b\n1,2\n", "::");
        assert_eq!(rows[0].get("b"), Some(&DatumValue::Number(2.0)));
    }

    #[test]
    fn bam_without_reads_is_empty() {
        assert!(bam_rows(&RawTile::default()).is_empty());
    }
}
