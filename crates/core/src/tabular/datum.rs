use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One tabular row: field name to value, in insertion order.
pub type Datum = IndexMap<String, DatumValue>;

/// A cell of a tabular row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatumValue {
    Number(f64),
    Text(String),
}

impl DatumValue {
    /// Numeric view of the value. Text that parses as a number is accepted,
    /// matching how loosely-typed csv cells are read.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Category key used by nominal domains and ordinal scales.
    pub fn to_key(&self) -> String {
        self.to_string()
    }

    /// Lenient conversion from an arbitrary JSON value. `null`, arrays and
    /// objects have no tabular meaning and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(Self::Number),
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Bool(b) => Some(Self::Text(b.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for DatumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&format_number(*n)),
        }
    }
}

impl From<f64> for DatumValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for DatumValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for DatumValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Integral values print without a fractional part so `3.0` and `"3"`
/// land in the same category.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Build a row from a JSON object, dropping cells without tabular meaning.
pub fn datum_from_json(object: &serde_json::Map<String, serde_json::Value>) -> Datum {
    object
        .iter()
        .filter_map(|(k, v)| DatumValue::from_json(v).map(|v| (k.clone(), v)))
        .collect()
}
