//! Declarative filter designs and the dotted field-key format
//!
//! A design describes what a filter should match without being a live
//! instance: widgets rebuild their designs on every query, then use them to
//! look up the live filters they correspond to. A design with no value is a
//! pattern that matches any live filter on that field and operator; a design
//! with a value describes one concrete filter.

use serde::{Deserialize, Serialize};

use crate::types::{CompoundType, DatabaseMeta, FieldMeta, FilterValue, TableMeta};

/// Declarative description of a filter, either a single-field leaf or a
/// boolean combination of child designs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FilterDesign {
    Simple(SimpleFilterDesign),
    Compound(CompoundFilterDesign),
}

impl FilterDesign {
    pub fn id(&self) -> Option<&str> {
        match self {
            FilterDesign::Simple(d) => d.id.as_deref(),
            FilterDesign::Compound(d) => d.id.as_deref(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            FilterDesign::Simple(d) => d.name.as_deref(),
            FilterDesign::Compound(d) => d.name.as_deref(),
        }
    }

    /// Grouping root, defaulting to AND when the design leaves it unset.
    pub fn root(&self) -> CompoundType {
        match self {
            FilterDesign::Simple(d) => d.root,
            FilterDesign::Compound(d) => d.root,
        }
        .unwrap_or(CompoundType::And)
    }
}

/// Single-field design: one column, one operator, optional value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleFilterDesign {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<CompoundType>,
    pub datastore: String,
    pub database: DatabaseMeta,
    pub table: TableMeta,
    pub field: FieldMeta,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
}

impl SimpleFilterDesign {
    /// Database, table, field, and operator are all populated. A filter can
    /// only be built from a design that passes this check and also carries a
    /// value.
    pub fn is_fully_populated(&self) -> bool {
        !self.database.name.is_empty()
            && !self.table.name.is_empty()
            && !self.field.column_name.is_empty()
            && !self.operator.is_empty()
    }

    /// Dotted field key for this design's target column.
    pub fn field_key(&self) -> FieldKey {
        FieldKey {
            datastore: self.datastore.clone(),
            database: self.database.name.clone(),
            table: self.table.name.clone(),
            field: self.field.column_name.clone(),
        }
    }
}

/// Boolean combination of child designs, recursive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundFilterDesign {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<CompoundType>,
    #[serde(rename = "type")]
    pub compound_type: CompoundType,
    pub filters: Vec<FilterDesign>,
}

/// Dot-delimited `datastore.database.table.field` reference. Field names may
/// themselves contain dots, so deconstruction splits into at most four
/// segments and leaves the remainder in the field position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldKey {
    pub datastore: String,
    pub database: String,
    pub table: String,
    pub field: String,
}

impl FieldKey {
    /// Deconstruct a key string, padding missing trailing segments with
    /// empty strings. Partial one-to-three segment references are tolerated.
    pub fn deconstruct_safe(key: &str) -> FieldKey {
        let mut parts = key.splitn(4, '.');
        FieldKey {
            datastore: parts.next().unwrap_or("").to_string(),
            database: parts.next().unwrap_or("").to_string(),
            table: parts.next().unwrap_or("").to_string(),
            field: parts.next().unwrap_or("").to_string(),
        }
    }

    /// Strict deconstruction: `None` unless database and table are both
    /// present.
    pub fn deconstruct_strict(key: &str) -> Option<FieldKey> {
        let deconstructed = Self::deconstruct_safe(key);
        if deconstructed.database.is_empty() || deconstructed.table.is_empty() {
            return None;
        }
        Some(deconstructed)
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.datastore, self.database, self.table, self.field
        )
    }
}
