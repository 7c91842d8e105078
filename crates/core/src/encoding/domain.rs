//! Domain inference: literal domains verbatim, otherwise a scan of the
//! rows bound to a channel and its extent channels.

use indexmap::{IndexMap, IndexSet};

use crate::assembly::Assembly;
use crate::encoding::scale::ScaleDomain;
use crate::spec::{Channel, ChannelKey, Domain, FieldType, Track};
use crate::tabular::{Datum, DatumValue};

/// Extent channels that widen the domain of a primary positional channel.
pub fn extent_keys(primary: ChannelKey) -> &'static [ChannelKey] {
    match primary {
        ChannelKey::X => &[ChannelKey::Xe, ChannelKey::X1, ChannelKey::X1e],
        ChannelKey::Y => &[ChannelKey::Ye, ChannelKey::Y1, ChannelKey::Y1e],
        _ => &[],
    }
}

pub fn literal_domain(domain: &Domain, assembly: Assembly) -> Option<ScaleDomain> {
    match domain {
        Domain::Numbers(values) => {
            let (lo, hi) = min_max(values.iter().copied())?;
            Some(ScaleDomain::Continuous([lo, hi]))
        }
        Domain::Categories(values) => Some(ScaleDomain::Categorical(
            values.iter().cloned().collect(),
        )),
        Domain::Genomic(genomic) => assembly.resolve_domain(genomic).map(ScaleDomain::Continuous),
    }
}

/// Whether the domain of `key` must start at zero.
pub fn has_zero_baseline(track: &Track, key: ChannelKey) -> bool {
    let Some(deep) = track.channel(key).and_then(Channel::as_deep) else {
        return false;
    };
    match deep.zero_baseline {
        Some(explicit) => explicit,
        None => {
            matches!(key, ChannelKey::Y | ChannelKey::Ye)
                && deep.field_type == Some(FieldType::Quantitative)
                && track.mark.is_some_and(|m| m.implies_zero_baseline())
        }
    }
}

/// Infer the domain of a primary channel. `stacked` switches quantitative
/// y to the maximum per-position sum.
pub fn infer_domain(
    track: &Track,
    key: ChannelKey,
    rows: &[Datum],
    assembly: Assembly,
    stacked: bool,
) -> Option<ScaleDomain> {
    let deep = track.channel(key)?.as_deep()?;
    if let Some(literal) = deep.domain.as_ref().and_then(|d| literal_domain(d, assembly)) {
        return Some(literal);
    }
    let field = deep.field.as_deref()?;

    match deep.field_type {
        Some(FieldType::Nominal) => Some(ScaleDomain::Categorical(categories(rows, field))),
        Some(FieldType::Genomic) if key == ChannelKey::X && assembly.is_known() => {
            Some(ScaleDomain::Continuous([0.0, assembly.total_size()]))
        }
        Some(FieldType::Quantitative | FieldType::Genomic) | None => {
            let [lo, hi] = if stacked && key == ChannelKey::Y {
                [0.0, max_stacked_sum(track, rows, field)]
            } else {
                numeric_extent(track, key, rows, field)
            };
            let lo = if has_zero_baseline(track, key) { 0.0 } else { lo };
            Some(ScaleDomain::Continuous([lo, hi]))
        }
    }
}

/// Distinct values of `field`, in first-seen order.
pub fn categories(rows: &[Datum], field: &str) -> IndexSet<String> {
    rows.iter()
        .filter_map(|row| row.get(field))
        .map(DatumValue::to_key)
        .collect()
}

fn numeric_extent(track: &Track, key: ChannelKey, rows: &[Datum], field: &str) -> [f64; 2] {
    let mut fields = vec![field];
    fields.extend(
        extent_keys(key)
            .iter()
            .filter_map(|k| track.field_of(*k)),
    );
    let values = rows.iter().flat_map(|row| {
        fields
            .iter()
            .filter_map(move |f| row.get(*f).and_then(DatumValue::as_f64))
    });
    min_max(values).map_or([0.0, 0.0], |(lo, hi)| [lo, hi])
}

fn max_stacked_sum(track: &Track, rows: &[Datum], field: &str) -> f64 {
    let Some(x_field) = track.field_of(ChannelKey::X) else {
        return 0.0;
    };
    let mut sums: IndexMap<String, f64> = IndexMap::new();
    for row in rows {
        let (Some(x), Some(y)) = (row.get(x_field), row.get(field).and_then(DatumValue::as_f64))
        else {
            continue;
        };
        *sums.entry(x.to_key()).or_default() += y;
    }
    sums.values().copied().fold(0.0, f64::max)
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
