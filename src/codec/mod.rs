//! Serialization codec for filter designs
//!
//! The wire format is a compact array-of-arrays JSON form: a simple design is
//! `[fieldKey, operator, value, root]` and a compound design is the flat
//! prefix form `[type, root, child...]`, dispatched on the first element
//! being the literal `"and"` or `"or"`. Array positions and those literals
//! are the persistence format inside saved dashboard states and the URL
//! fragment, so any change here is a breaking format change. The wire form is
//! metadata-free; field keys are re-resolved against the catalog on load.

mod query_string;

pub use query_string::{from_simple_filter_query_string, to_simple_filter_query_string};

use serde_json::{json, Value};

use crate::catalog::FieldCatalog;
use crate::design::{CompoundFilterDesign, FieldKey, FilterDesign, SimpleFilterDesign};
use crate::error::{Error, Result};
use crate::types::{CompoundType, FilterValue};

/// Operators whose float values are rounded on serialization.
const RELATIONAL_OPERATORS: [&str; 4] = ["<", ">", "<=", ">="];

/// Wire-side mirror of a filter design: plain name strings instead of
/// catalog metadata. Produced by [`from_plain_filter_json`] and rehydrated
/// into a [`FilterDesign`] through the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterConfig {
    Simple(SimpleFilterConfig),
    Compound(CompoundFilterConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleFilterConfig {
    pub datastore: String,
    pub database: String,
    pub table: String,
    pub field: String,
    pub operator: String,
    pub value: FilterValue,
    pub root: CompoundType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompoundFilterConfig {
    pub compound_type: CompoundType,
    pub root: CompoundType,
    pub filters: Vec<FilterConfig>,
}

impl FilterConfig {
    /// Rehydrate into a design by resolving name strings against the
    /// catalog. Unknown names resolve to sentinel metadata, and the
    /// resulting design fails the fully-populated construction checks later
    /// instead of erroring here, so malformed saved states degrade rather
    /// than crash.
    pub fn to_design(&self, catalog: &FieldCatalog) -> FilterDesign {
        match self {
            FilterConfig::Simple(config) => FilterDesign::Simple(SimpleFilterDesign {
                id: None,
                name: None,
                root: Some(config.root),
                datastore: config.datastore.clone(),
                database: catalog.database_with_name(&config.database),
                table: catalog.table_with_name(&config.database, &config.table),
                field: catalog.field_with_name(&config.database, &config.table, &config.field),
                operator: config.operator.clone(),
                value: Some(config.value.clone()),
            }),
            FilterConfig::Compound(config) => FilterDesign::Compound(CompoundFilterDesign {
                id: None,
                name: None,
                root: Some(config.root),
                compound_type: config.compound_type,
                filters: config
                    .filters
                    .iter()
                    .map(|child| child.to_design(catalog))
                    .collect(),
            }),
        }
    }
}

/// Serialize a design forest into the plain-JSON array form.
pub fn to_plain_filter_json(designs: &[FilterDesign]) -> Value {
    Value::Array(designs.iter().map(design_to_plain).collect())
}

fn design_to_plain(design: &FilterDesign) -> Value {
    match design {
        FilterDesign::Simple(simple) => {
            let value = simple
                .value
                .as_ref()
                .map(|v| round_relational_value(&simple.operator, v))
                .unwrap_or(FilterValue::Null);
            json!([
                simple.field_key().to_string(),
                simple.operator,
                value_to_json(&value),
                wire_root(simple.root),
            ])
        }
        FilterDesign::Compound(compound) => {
            let mut parts = vec![
                Value::String(compound.compound_type.to_string()),
                Value::String(wire_root(compound.root).to_string()),
            ];
            parts.extend(compound.filters.iter().map(design_to_plain));
            Value::Array(parts)
        }
    }
}

/// Parse one element of the plain-JSON array form.
///
/// Dispatches on the first element: the literal `"and"` or `"or"` marks a
/// compound array, anything else is read as a simple `[fieldKey, operator,
/// value, root]` array. A missing root defaults to `"or"` to mirror
/// serialization. Wrong shapes are hard errors; a corrupted share-link must
/// surface to the user rather than silently degrade.
pub fn from_plain_filter_json(value: &Value) -> Result<FilterConfig> {
    let array = value
        .as_array()
        .ok_or_else(|| Error::malformed_filter("expected a JSON array"))?;
    let first = array
        .first()
        .ok_or_else(|| Error::malformed_filter("empty filter array"))?;

    let compound_type = first.as_str().and_then(CompoundType::parse);
    if let Some(compound_type) = compound_type {
        let root = array
            .get(1)
            .and_then(Value::as_str)
            .and_then(CompoundType::parse)
            .unwrap_or(CompoundType::Or);
        let filters = array[2.min(array.len())..]
            .iter()
            .map(from_plain_filter_json)
            .collect::<Result<Vec<_>>>()?;
        return Ok(FilterConfig::Compound(CompoundFilterConfig {
            compound_type,
            root,
            filters,
        }));
    }

    let field_key = first
        .as_str()
        .ok_or_else(|| Error::malformed_filter("filter array must start with a field key"))?;
    let operator = array
        .get(1)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::malformed_filter("simple filter array is missing its operator"))?;
    let value = array
        .get(2)
        .ok_or_else(|| Error::malformed_filter("simple filter array is missing its value"))?;
    let root = array
        .get(3)
        .and_then(Value::as_str)
        .and_then(CompoundType::parse)
        .unwrap_or(CompoundType::Or);

    let key = FieldKey::deconstruct_safe(field_key);
    Ok(FilterConfig::Simple(SimpleFilterConfig {
        datastore: key.datastore,
        database: key.database,
        table: key.table,
        field: key.field,
        operator: operator.to_string(),
        value: json_to_value(value)?,
        root,
    }))
}

fn wire_root(root: Option<CompoundType>) -> &'static str {
    root.unwrap_or(CompoundType::Or).as_str()
}

fn value_to_json(value: &FilterValue) -> Value {
    match value {
        FilterValue::String(s) => Value::String(s.clone()),
        FilterValue::Integer(i) => json!(i),
        FilterValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        FilterValue::Boolean(b) => Value::Bool(*b),
        FilterValue::Null => Value::Null,
    }
}

fn json_to_value(value: &Value) -> Result<FilterValue> {
    match value {
        Value::Null => Ok(FilterValue::Null),
        Value::Bool(b) => Ok(FilterValue::Boolean(*b)),
        Value::String(s) => Ok(FilterValue::String(s.clone())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(FilterValue::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(FilterValue::Float(f))
            } else {
                Err(Error::UnsupportedValue(n.to_string()))
            }
        }
        other => Err(Error::UnsupportedValue(other.to_string())),
    }
}

/// Suppress float noise on relational comparisons: values with four or more
/// fractional digits are rounded to three decimal places before
/// serialization. A deliberate lossy step of the wire format.
fn round_relational_value(operator: &str, value: &FilterValue) -> FilterValue {
    if !RELATIONAL_OPERATORS.contains(&operator) {
        return value.clone();
    }
    match value {
        FilterValue::Float(f) => {
            let rendered = f.to_string();
            let fractional_digits = rendered
                .split_once('.')
                .map(|(_, frac)| frac.len())
                .unwrap_or(0);
            if fractional_digits >= 4 {
                FilterValue::Float((f * 1000.0).round() / 1000.0)
            } else {
                value.clone()
            }
        }
        _ => value.clone(),
    }
}
