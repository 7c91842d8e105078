use crate::spec::data::{DataTransform, FilterPredicate, FilterTransform, Replacement};
use crate::tabular::{Datum, DatumValue};

/// Apply row transforms in declaration order.
pub fn apply_transforms(mut rows: Vec<Datum>, transforms: &[DataTransform]) -> Vec<Datum> {
    for transform in transforms {
        rows = match transform {
            DataTransform::Filter(filter) => rows.into_iter().filter(|r| keep(filter, r)).collect(),
            DataTransform::Str2num { field } => map_rows(rows, |row| {
                if let Some(n) = row.get(field).and_then(DatumValue::as_f64) {
                    row.insert(field.clone(), DatumValue::Number(n));
                }
            }),
            DataTransform::Log {
                field,
                base,
                new_field,
            } => {
                let base = base.unwrap_or(10.0);
                let target = new_field.as_ref().unwrap_or(field);
                map_rows(rows, |row| {
                    if let Some(n) = row.get(field).and_then(DatumValue::as_f64)
                        && n > 0.0
                    {
                        let logged = if base == 10.0 {
                            n.log10()
                        } else if base == 2.0 {
                            n.log2()
                        } else {
                            n.log(base)
                        };
                        row.insert(target.clone(), DatumValue::Number(logged));
                    }
                })
            }
            DataTransform::Concat {
                fields,
                new_field,
                separator,
            } => map_rows(rows, |row| {
                let joined = fields
                    .iter()
                    .filter_map(|f| row.get(f).map(DatumValue::to_key))
                    .collect::<Vec<_>>()
                    .join(separator);
                row.insert(new_field.clone(), DatumValue::Text(joined));
            }),
            DataTransform::Replace {
                field,
                new_field,
                replace,
            } => map_rows(rows, |row| {
                if let Some(value) = row.get(field).cloned() {
                    row.insert(new_field.clone(), replaced(value, replace));
                }
            }),
            DataTransform::GenomicLength {
                start_field,
                end_field,
                new_field,
            } => map_rows(rows, |row| {
                let start = row.get(start_field).and_then(DatumValue::as_f64);
                let end = row.get(end_field).and_then(DatumValue::as_f64);
                if let (Some(start), Some(end)) = (start, end) {
                    row.insert(new_field.clone(), DatumValue::Number(end - start));
                }
            }),
        };
    }
    rows
}

fn map_rows(mut rows: Vec<Datum>, mut f: impl FnMut(&mut Datum)) -> Vec<Datum> {
    rows.iter_mut().for_each(|row| f(row));
    rows
}

fn keep(filter: &FilterTransform, row: &Datum) -> bool {
    let matched = row.get(&filter.field).is_some_and(|value| match &filter.predicate {
        FilterPredicate::OneOf(values) => {
            let key = value.to_key();
            values.iter().any(|v| v.to_key() == key)
        }
        FilterPredicate::InRange([lo, hi]) => value
            .as_f64()
            .is_some_and(|n| n >= lo.min(*hi) && n <= lo.max(*hi)),
        FilterPredicate::Include(needle) => value.to_key().contains(needle.as_str()),
    });
    matched != filter.not.unwrap_or(false)
}

fn replaced(value: DatumValue, replace: &[Replacement]) -> DatumValue {
    let key = value.to_key();
    replace
        .iter()
        .find(|r| r.from == key)
        .map_or(value, |r| DatumValue::Text(r.to.clone()))
}
