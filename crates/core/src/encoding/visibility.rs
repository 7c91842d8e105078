//! Semantic zoom: opacity in `[0, 1]` from visibility conditions.

use crate::spec::visibility::ThresholdKeyword;
use crate::spec::{Measure, Threshold, VisibilityCondition, VisibilityTarget};

/// Measurements available when evaluating conditions. Conditions whose
/// measure is absent are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measured {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub zoom_level: Option<f64>,
}

impl Measured {
    pub fn get(&self, measure: Measure) -> Option<f64> {
        match measure {
            Measure::Width => self.width,
            Measure::Height => self.height,
            Measure::ZoomLevel => self.zoom_level,
        }
    }
}

/// Opacity contributed by one condition.
///
/// Without `transitionPadding` the condition is a hard cut. With it, the
/// opacity ramps linearly from 0 at the threshold to 1 at
/// `threshold + padding` (or the mirror image for less-than operators).
/// `conditionPadding` moves the threshold away from the visible side.
pub fn condition_opacity(condition: &VisibilityCondition, measured: f64, threshold: f64) -> f64 {
    let shift = condition.condition_padding.unwrap_or(0.0);
    let greater = condition.operation.is_greater();
    let threshold = if greater { threshold + shift } else { threshold - shift };
    let padding = condition.transition_padding.unwrap_or(0.0);

    if padding <= 0.0 {
        return if condition.operation.compare(measured, threshold) {
            1.0
        } else {
            0.0
        };
    }
    let ramp = if greater {
        (measured - threshold) / padding
    } else {
        (threshold - measured) / padding
    };
    ramp.clamp(0.0, 1.0)
}

/// Combine every condition of `target` as the minimum of their
/// opacities. `mark_extent` is the pixel distance `|xe - x|` used by the
/// keyword threshold; conditions needing it are ignored without it.
pub fn combined_opacity(
    conditions: &[VisibilityCondition],
    target: VisibilityTarget,
    measured: &Measured,
    mark_extent: Option<f64>,
) -> f64 {
    conditions
        .iter()
        .filter(|c| c.target == target)
        .filter_map(|c| {
            let value = measured.get(c.measure)?;
            let threshold = match c.threshold {
                Threshold::Value(t) => t,
                Threshold::Keyword(ThresholdKeyword::XeMinusX) => mark_extent?,
            };
            Some(condition_opacity(c, value, threshold))
        })
        .fold(1.0, f64::min)
}
