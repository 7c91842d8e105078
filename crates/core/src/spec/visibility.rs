use serde::{Deserialize, Serialize};

/// A semantic-zoom rule: show the target only while `measure` compares
/// favorably against `threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityCondition {
    pub target: VisibilityTarget,
    pub operation: LogicalOperation,
    pub measure: Measure,
    pub threshold: Threshold,
    /// Extra room required beyond the threshold before the condition holds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_padding: Option<f64>,
    /// Width of the linear opacity ramp that starts at the threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_padding: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisibilityTarget {
    Track,
    Mark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Measure {
    Width,
    Height,
    ZoomLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    Value(f64),
    Keyword(ThresholdKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdKeyword {
    /// The pixel distance between a mark's `x` and `xe`.
    #[serde(rename = "|xe-x|")]
    XeMinusX,
}

/// Comparison operators, each accepting every spelling the grammar allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperation {
    #[serde(rename = "less-than", alias = "lt", alias = "LT", alias = "<")]
    LessThan,
    #[serde(rename = "greater-than", alias = "gt", alias = "GT", alias = ">")]
    GreaterThan,
    #[serde(
        rename = "less-than-or-equal-to",
        alias = "ltet",
        alias = "LTET",
        alias = "<="
    )]
    LessThanOrEqualTo,
    #[serde(
        rename = "greater-than-or-equal-to",
        alias = "gtet",
        alias = "GTET",
        alias = ">="
    )]
    GreaterThanOrEqualTo,
}

impl LogicalOperation {
    pub fn is_greater(self) -> bool {
        matches!(self, Self::GreaterThan | Self::GreaterThanOrEqualTo)
    }

    pub fn compare(self, measured: f64, threshold: f64) -> bool {
        match self {
            Self::LessThan => measured < threshold,
            Self::GreaterThan => measured > threshold,
            Self::LessThanOrEqualTo => measured <= threshold,
            Self::GreaterThanOrEqualTo => measured >= threshold,
        }
    }
}
