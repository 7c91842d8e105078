use serde::{Deserialize, Serialize};

/// Where a track's rows come from. Each variant carries the addressing
/// fields its tabularizer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DataSource {
    Json(JsonData),
    Csv(CsvData),
    Multivec(MultivecData),
    Vector(VectorData),
    Bigwig(VectorData),
    Beddb(BeddbData),
    Matrix(MatrixData),
    Bam(BamData),
}

impl DataSource {
    /// Short name of the source kind, as written in the grammar.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Json(_) => "json",
            Self::Csv(_) => "csv",
            Self::Multivec(_) => "multivec",
            Self::Vector(_) => "vector",
            Self::Bigwig(_) => "bigwig",
            Self::Beddb(_) => "beddb",
            Self::Matrix(_) => "matrix",
            Self::Bam(_) => "bam",
        }
    }

    /// Server-tiled formats, for which a visual template exists.
    pub fn is_tiled(&self) -> bool {
        matches!(
            self,
            Self::Multivec(_) | Self::Vector(_) | Self::Bigwig(_) | Self::Beddb(_) | Self::Matrix(_)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonData {
    #[serde(default)]
    pub values: Vec<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chromosome_field: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genomic_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvData {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chromosome_field: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genomic_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultivecData {
    pub url: String,
    pub row: String,
    pub column: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_size: Option<usize>,
}

/// Single-row dense vectors; shared by `vector` and `bigwig`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorData {
    pub url: String,
    pub column: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_size: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeddbData {
    pub url: String,
    pub genomic_fields: Vec<IndexedField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_fields: Vec<TypedIndexedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exon_interval_fields: Option<[IndexedField; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedField {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedIndexedField {
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: ValueFieldType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueFieldType {
    Nominal,
    Quantitative,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixData {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BamData {
    pub url: String,
}

/// A row-level transform applied after tabularization, in declaration
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DataTransform {
    Filter(FilterTransform),
    Str2num {
        field: String,
    },
    Log {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base: Option<f64>,
        #[serde(default, rename = "newField", skip_serializing_if = "Option::is_none")]
        new_field: Option<String>,
    },
    Concat {
        fields: Vec<String>,
        #[serde(rename = "newField")]
        new_field: String,
        separator: String,
    },
    Replace {
        field: String,
        #[serde(rename = "newField")]
        new_field: String,
        replace: Vec<Replacement>,
    },
    GenomicLength {
        #[serde(rename = "startField")]
        start_field: String,
        #[serde(rename = "endField")]
        end_field: String,
        #[serde(rename = "newField")]
        new_field: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterTransform {
    pub field: String,
    #[serde(flatten)]
    pub predicate: FilterPredicate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterPredicate {
    OneOf(Vec<crate::tabular::DatumValue>),
    InRange([f64; 2]),
    Include(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}
