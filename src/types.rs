//! Core types for dashlens

use std::fmt;

use serde::{Deserialize, Serialize};

/// Boolean combinator for compound filters, also used as the grouping
/// "root" under which sibling filters on one data source are combined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompoundType {
    And,
    Or,
}

impl CompoundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompoundType::And => "and",
            CompoundType::Or => "or",
        }
    }

    /// Parse a wire literal. Anything other than "and"/"or" is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "and" => Some(CompoundType::And),
            "or" => Some(CompoundType::Or),
            _ => None,
        }
    }
}

impl fmt::Display for CompoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar filter value. A design with no value at all ("pattern") is
/// represented as `Option<FilterValue>::None`; `FilterValue::Null` is a
/// defined value and passes the "value is present" construction checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl PartialEq for FilterValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FilterValue::String(a), FilterValue::String(b)) => a == b,
            (FilterValue::Integer(a), FilterValue::Integer(b)) => a == b,
            (FilterValue::Boolean(a), FilterValue::Boolean(b)) => a == b,
            (FilterValue::Null, FilterValue::Null) => true,
            // Numeric comparison crosses the integer/float split so a value
            // that round-tripped through JSON as 10.0 still matches 10
            (FilterValue::Float(a), FilterValue::Float(b)) => {
                (a - b).abs() < f64::EPSILON
            }
            (FilterValue::Integer(a), FilterValue::Float(b))
            | (FilterValue::Float(b), FilterValue::Integer(a)) => {
                (*a as f64 - b).abs() < f64::EPSILON
            }
            _ => false,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::String(s) => f.write_str(s),
            FilterValue::Integer(i) => write!(f, "{}", i),
            FilterValue::Float(x) => write!(f, "{}", x),
            FilterValue::Boolean(b) => write!(f, "{}", b),
            FilterValue::Null => f.write_str("null"),
        }
    }
}

/// Database metadata from the field catalog. The all-empty default value is
/// the sentinel returned for unknown names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseMeta {
    pub name: String,
    #[serde(default)]
    pub pretty_name: String,
}

impl DatabaseMeta {
    pub fn pretty(&self) -> &str {
        if self.pretty_name.is_empty() {
            &self.name
        } else {
            &self.pretty_name
        }
    }
}

/// Table metadata from the field catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableMeta {
    pub name: String,
    #[serde(default)]
    pub pretty_name: String,
}

impl TableMeta {
    pub fn pretty(&self) -> &str {
        if self.pretty_name.is_empty() {
            &self.name
        } else {
            &self.pretty_name
        }
    }
}

/// Field metadata from the field catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub column_name: String,
    #[serde(default)]
    pub pretty_name: String,
    #[serde(default)]
    pub field_type: String,
}

impl FieldMeta {
    pub fn pretty(&self) -> &str {
        if self.pretty_name.is_empty() {
            &self.column_name
        } else {
            &self.pretty_name
        }
    }
}

/// One member of a relation list: a fully-located field that is declared
/// semantically equivalent to the members at the same index of the parallel
/// substitute list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldLocation {
    pub datastore: String,
    pub database: DatabaseMeta,
    pub table: TableMeta,
    pub field: FieldMeta,
}

impl FieldLocation {
    /// All three catalog names are populated, so a filter can actually be
    /// built against this location.
    pub fn is_fully_populated(&self) -> bool {
        !self.database.name.is_empty()
            && !self.table.name.is_empty()
            && !self.field.column_name.is_empty()
    }
}
