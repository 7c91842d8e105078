use serde::{Deserialize, Serialize};

use crate::tabular::DatumValue;

/// Every visual channel a track can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelKey {
    X,
    Y,
    Xe,
    Ye,
    X1,
    Y1,
    X1e,
    Y1e,
    Row,
    Column,
    Color,
    Size,
    Stroke,
    StrokeWidth,
    Opacity,
    Text,
}

impl ChannelKey {
    pub const ALL: [ChannelKey; 16] = [
        ChannelKey::X,
        ChannelKey::Y,
        ChannelKey::Xe,
        ChannelKey::Ye,
        ChannelKey::X1,
        ChannelKey::Y1,
        ChannelKey::X1e,
        ChannelKey::Y1e,
        ChannelKey::Row,
        ChannelKey::Column,
        ChannelKey::Color,
        ChannelKey::Size,
        ChannelKey::Stroke,
        ChannelKey::StrokeWidth,
        ChannelKey::Opacity,
        ChannelKey::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Xe => "xe",
            Self::Ye => "ye",
            Self::X1 => "x1",
            Self::Y1 => "y1",
            Self::X1e => "x1e",
            Self::Y1e => "y1e",
            Self::Row => "row",
            Self::Column => "column",
            Self::Color => "color",
            Self::Size => "size",
            Self::Stroke => "stroke",
            Self::StrokeWidth => "strokeWidth",
            Self::Opacity => "opacity",
            Self::Text => "text",
        }
    }

    /// The channel whose scale (and domain) this one shares. Extent
    /// channels widen their primary's domain instead of owning one.
    pub fn primary(self) -> ChannelKey {
        match self {
            Self::Xe | Self::X1 | Self::X1e => Self::X,
            Self::Ye | Self::Y1 | Self::Y1e => Self::Y,
            other => other,
        }
    }

    pub fn is_extent(self) -> bool {
        self.primary() != self
    }

    pub fn is_color(self) -> bool {
        matches!(self, Self::Color | Self::Stroke)
    }
}

impl std::fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A channel is either a constant or a binding to a data field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Channel {
    Value(ChannelValue),
    Deep(ChannelDeep),
}

impl Channel {
    pub fn as_deep(&self) -> Option<&ChannelDeep> {
        match self {
            Self::Deep(deep) => Some(deep),
            Self::Value(_) => None,
        }
    }

    pub fn as_deep_mut(&mut self) -> Option<&mut ChannelDeep> {
        match self {
            Self::Deep(deep) => Some(deep),
            Self::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&DatumValue> {
        match self {
            Self::Value(v) => Some(&v.value),
            Self::Deep(_) => None,
        }
    }

    /// The bound field, for deep channels that name one.
    pub fn field(&self) -> Option<&str> {
        self.as_deep().and_then(|d| d.field.as_deref())
    }

    pub fn field_type(&self) -> Option<FieldType> {
        self.as_deep().and_then(|d| d.field_type)
    }

    pub fn is_deep_of(&self, field_type: FieldType) -> bool {
        self.field_type() == Some(field_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelValue {
    pub value: DatumValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDeep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<AxisPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_baseline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<DatumValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Genomic,
    Nominal,
    Quantitative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisPosition {
    None,
    Top,
    Bottom,
    Left,
    Right,
}

/// A literal domain written in the grammar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Domain {
    Numbers(Vec<f64>),
    Categories(Vec<String>),
    Genomic(GenomicDomain),
}

/// A domain named by chromosome, optionally narrowed to an interval
/// relative to the chromosome start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomicDomain {
    pub chromosome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<[f64; 2]>,
}

/// A literal range written in the grammar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeSpec {
    Numbers(Vec<f64>),
    Values(Vec<String>),
    Scheme(ColorScheme),
}

/// Named sequential color schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorScheme {
    Viridis,
    Grey,
    Warm,
    Spectral,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_and_deep_channels_are_discriminated_by_value_key() {
        let value: Channel = serde_json::from_str(r#"{"value": 0.5}"#).unwrap();
        assert_eq!(value.as_value(), Some(&DatumValue::Number(0.5)));

        let deep: Channel =
            serde_json::from_str(r#"{"field": "peak", "type": "quantitative", "axis": "left"}"#)
                .unwrap();
        assert_eq!(deep.field(), Some("peak"));
        assert!(deep.is_deep_of(FieldType::Quantitative));
    }

    #[test]
    fn domains_parse_all_literal_forms() {
        let genomic: Domain =
            serde_json::from_str(r#"{"chromosome": "chr2", "interval": [10, 20]}"#).unwrap();
        assert!(matches!(genomic, Domain::Genomic(_)));

        let numbers: Domain = serde_json::from_str("[0, 10]").unwrap();
        assert_eq!(numbers, Domain::Numbers(vec![0.0, 10.0]));

        let categories: Domain = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(categories, Domain::Categories(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn scheme_ranges_parse() {
        let range: RangeSpec = serde_json::from_str(r#""warm""#).unwrap();
        assert_eq!(range, RangeSpec::Scheme(ColorScheme::Warm));
    }

    #[test]
    fn extent_channels_share_primary() {
        assert_eq!(ChannelKey::X1e.primary(), ChannelKey::X);
        assert_eq!(ChannelKey::Ye.primary(), ChannelKey::Y);
        assert!(!ChannelKey::Color.is_extent());
    }
}
