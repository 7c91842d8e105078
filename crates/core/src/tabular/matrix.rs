use crate::tabular::{Datum, DatumValue, RawTile};

/// Expand a flattened square contact matrix into one row per cell.
///
/// Cell `(i, j)` of an `N x N` tile covers `[xs, xe)` along x (column `j`)
/// and `[ys, ye)` along y (row `i`), in the tile's genomic coordinates.
/// Non-finite cells are skipped.
pub fn matrix_rows(tile: &RawTile) -> Vec<Datum> {
    let Some(dense) = tile.dense.as_deref() else {
        tracing::warn!(key = %tile.key, "matrix tile without dense payload");
        return Vec::new();
    };
    let Some(n) = square_side(dense.len()) else {
        tracing::warn!(key = %tile.key, len = dense.len(), "matrix tile is not square");
        return Vec::new();
    };
    if n == 0 {
        return Vec::new();
    }

    let cell_w = tile.tile_width / n as f64;
    let cell_h = if tile.tile_height > 0.0 {
        tile.tile_height / n as f64
    } else {
        cell_w
    };

    let mut rows = Vec::with_capacity(dense.len());
    for (index, value) in dense.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        let (i, j) = (index / n, index % n);
        let xs = tile.tile_x + j as f64 * cell_w;
        let ys = tile.tile_y + i as f64 * cell_h;
        let mut datum = Datum::with_capacity(7);
        datum.insert("x".into(), DatumValue::Number(xs + cell_w / 2.0));
        datum.insert("xs".into(), DatumValue::Number(xs));
        datum.insert("xe".into(), DatumValue::Number(xs + cell_w));
        datum.insert("y".into(), DatumValue::Number(ys + cell_h / 2.0));
        datum.insert("ys".into(), DatumValue::Number(ys));
        datum.insert("ye".into(), DatumValue::Number(ys + cell_h));
        datum.insert("value".into(), DatumValue::Number(*value));
        rows.push(datum);
    }
    rows
}

fn square_side(len: usize) -> Option<usize> {
    let side = (len as f64).sqrt().round() as usize;
    (side.checked_mul(side) == Some(len)).then_some(side)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_placed_in_genomic_space() {
        let tile = RawTile {
            tile_x: 100.0,
            tile_y: 200.0,
            tile_width: 20.0,
            tile_height: 20.0,
            dense: Some(vec![1.0, 2.0, 3.0, f64::NAN]),
            ..RawTile::default()
        };
        let rows = matrix_rows(&tile);
        assert_eq!(rows.len(), 3);
        let cell = &rows[1];
        assert_eq!(cell.get("xs"), Some(&DatumValue::Number(110.0)));
        assert_eq!(cell.get("xe"), Some(&DatumValue::Number(120.0)));
        assert_eq!(cell.get("ys"), Some(&DatumValue::Number(200.0)));
        assert_eq!(cell.get("value"), Some(&DatumValue::Number(2.0)));
        assert_eq!(rows[2].get("y"), Some(&DatumValue::Number(215.0)));
    }

    #[test]
    fn non_square_payload_is_empty() {
        let tile = RawTile {
            dense: Some(vec![1.0, 2.0, 3.0]),
            ..RawTile::default()
        };
        assert!(matrix_rows(&tile).is_empty());
    }
}
