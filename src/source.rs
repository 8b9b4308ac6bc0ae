//! Filter data sources: the flat keys that bucket live filters
//!
//! A data source names one (datastore, database, table, field, operator)
//! tuple a filter constrains. The list of distinct data sources a design
//! touches is its footprint, and the footprint decides how many buckets the
//! filter occupies in a [`FilterCollection`](crate::collection::FilterCollection).

use serde::{Deserialize, Serialize};

use crate::design::FilterDesign;

/// Flat key for "the filters constraining this column with this operator".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDataSource {
    pub datastore_name: String,
    pub database_name: String,
    pub table_name: String,
    pub field_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
}

impl FilterDataSource {
    /// Structural equivalence; the operator comparison is skippable so that
    /// widgets can group "all filters on this column" across operators.
    pub fn is_equivalent_to(&self, other: &FilterDataSource, ignore_operator: bool) -> bool {
        self.datastore_name == other.datastore_name
            && self.database_name == other.database_name
            && self.table_name == other.table_name
            && self.field_name == other.field_name
            && (ignore_operator || self.operator == other.operator)
    }
}

/// Set-like equivalence of two data source lists: every element of each list
/// has an equivalent counterpart in the other. Duplicates are invisible to
/// this check, so it compares footprints, not multisets.
pub fn are_data_source_lists_equivalent(
    a: &[FilterDataSource],
    b: &[FilterDataSource],
    ignore_operator: bool,
) -> bool {
    a.iter()
        .all(|x| b.iter().any(|y| x.is_equivalent_to(y, ignore_operator)))
        && b.iter()
            .all(|y| a.iter().any(|x| y.is_equivalent_to(x, ignore_operator)))
}

/// Derive the data source footprint of a design.
///
/// A fully-populated simple design yields one entry; a compound design yields
/// the deduplicated union of its children's footprints, so `(X=10) AND
/// (X=20)` occupies a single bucket on X while `(X=10) AND (Y=20)` occupies
/// two. Malformed designs yield an empty list.
pub fn data_sources_from_design(
    design: &FilterDesign,
    ignore_operator: bool,
) -> Vec<FilterDataSource> {
    match design {
        FilterDesign::Simple(simple) => {
            if simple.database.name.is_empty()
                || simple.table.name.is_empty()
                || simple.field.column_name.is_empty()
            {
                return Vec::new();
            }
            vec![FilterDataSource {
                datastore_name: simple.datastore.clone(),
                database_name: simple.database.name.clone(),
                table_name: simple.table.name.clone(),
                field_name: simple.field.column_name.clone(),
                operator: if ignore_operator {
                    None
                } else {
                    Some(simple.operator.clone())
                },
            }]
        }
        FilterDesign::Compound(compound) => {
            let mut sources: Vec<FilterDataSource> = Vec::new();
            for child in &compound.filters {
                for candidate in data_sources_from_design(child, ignore_operator) {
                    let exists = sources
                        .iter()
                        .any(|s| s.is_equivalent_to(&candidate, ignore_operator));
                    if !exists {
                        sources.push(candidate);
                    }
                }
            }
            sources
        }
    }
}
