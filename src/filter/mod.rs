//! Live filters: the stateful counterparts of filter designs
//!
//! A live filter is created once when the user applies a filter action and
//! carries a generated identity for its lifetime. The invariant tying the two
//! halves of the model together: a filter built from a design is always
//! compatible with that design, which is how a widget later finds "the
//! filters matching my current configuration" without storing ids.

mod relation;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::design::{CompoundFilterDesign, FilterDesign, SimpleFilterDesign};
use crate::source::data_sources_from_design;
use crate::types::{CompoundType, DatabaseMeta, FieldMeta, FilterValue, TableMeta};

/// A live filter instance, either a single-field leaf or a boolean
/// combination of child filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Filter {
    Simple(SimpleFilter),
    Compound(CompoundFilter),
}

/// Live single-field filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleFilter {
    pub id: String,
    pub name: String,
    pub root: CompoundType,
    /// Relation rewrites that produced derived siblings of this filter.
    #[serde(default)]
    pub relations: Vec<String>,
    pub datastore: String,
    pub database: DatabaseMeta,
    pub table: TableMeta,
    pub field: FieldMeta,
    pub operator: String,
    pub value: FilterValue,
}

/// Live boolean combination of child filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundFilter {
    pub id: String,
    pub name: String,
    pub root: CompoundType,
    #[serde(default)]
    pub relations: Vec<String>,
    #[serde(rename = "type")]
    pub compound_type: CompoundType,
    pub filters: Vec<Filter>,
}

impl Filter {
    /// Build a live filter from a design.
    ///
    /// Returns `None` for any design that is not ready to filter: a simple
    /// design missing database/table/field/operator or carrying no value at
    /// all (null, zero, empty string, and false are all defined values), or a
    /// compound design with no children or with any child that fails to
    /// build. Mid-edit widget state routinely produces such designs, so this
    /// is not an error.
    pub fn from_design(design: &FilterDesign) -> Option<Filter> {
        match design {
            FilterDesign::Simple(simple) => {
                if !simple.is_fully_populated() || simple.value.is_none() {
                    debug!(
                        field = %simple.field.column_name,
                        operator = %simple.operator,
                        "skipping incomplete simple filter design"
                    );
                    return None;
                }
                let value = simple.value.clone().unwrap_or(FilterValue::Null);
                let mut filter = SimpleFilter {
                    id: generate_id(),
                    name: String::new(),
                    root: simple.root.unwrap_or(CompoundType::And),
                    relations: Vec::new(),
                    datastore: simple.datastore.clone(),
                    database: simple.database.clone(),
                    table: simple.table.clone(),
                    field: simple.field.clone(),
                    operator: simple.operator.clone(),
                    value,
                };
                filter.name = filter.label();
                if let Some(id) = &simple.id {
                    filter.id = id.clone();
                }
                if let Some(name) = &simple.name {
                    filter.name = name.clone();
                }
                Some(Filter::Simple(filter))
            }
            FilterDesign::Compound(compound) => {
                if compound.filters.is_empty() {
                    debug!("skipping compound filter design with no children");
                    return None;
                }
                let mut children = Vec::with_capacity(compound.filters.len());
                for child in &compound.filters {
                    // Failure of any child fails the whole compound filter
                    match Filter::from_design(child) {
                        Some(filter) => children.push(filter),
                        None => return None,
                    }
                }
                let mut filter = CompoundFilter {
                    id: generate_id(),
                    name: String::new(),
                    root: compound.root.unwrap_or(CompoundType::And),
                    relations: Vec::new(),
                    compound_type: compound.compound_type,
                    filters: children,
                };
                filter.name = filter.label();
                if let Some(id) = &compound.id {
                    filter.id = id.clone();
                }
                if let Some(name) = &compound.name {
                    filter.name = name.clone();
                }
                Some(Filter::Compound(filter))
            }
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Filter::Simple(f) => &f.id,
            Filter::Compound(f) => &f.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Filter::Simple(f) => &f.name,
            Filter::Compound(f) => &f.name,
        }
    }

    pub fn root(&self) -> CompoundType {
        match self {
            Filter::Simple(f) => f.root,
            Filter::Compound(f) => f.root,
        }
    }

    /// Convert back into a design. The design carries this filter's id and
    /// name, so rebuilding through [`Filter::from_design`] reproduces an
    /// equivalent filter with the same identity.
    pub fn to_design(&self) -> FilterDesign {
        match self {
            Filter::Simple(f) => FilterDesign::Simple(SimpleFilterDesign {
                id: Some(f.id.clone()),
                name: Some(f.name.clone()),
                root: Some(f.root),
                datastore: f.datastore.clone(),
                database: f.database.clone(),
                table: f.table.clone(),
                field: f.field.clone(),
                operator: f.operator.clone(),
                value: Some(f.value.clone()),
            }),
            Filter::Compound(f) => FilterDesign::Compound(CompoundFilterDesign {
                id: Some(f.id.clone()),
                name: Some(f.name.clone()),
                root: Some(f.root),
                compound_type: f.compound_type,
                filters: f.filters.iter().map(|child| child.to_design()).collect(),
            }),
        }
    }

    /// Does this live filter satisfy the given design's intent?
    ///
    /// Looser than equivalence: a design without a value matches any value,
    /// and a single-footprint compound design matches a live filter with more
    /// clauses on that one field. A multi-footprint compound design demands a
    /// full bijection with equal child counts.
    pub fn is_compatible_with_design(&self, design: &FilterDesign) -> bool {
        match (self, design) {
            (Filter::Simple(filter), FilterDesign::Simple(design)) => {
                if filter.root != design.root.unwrap_or(CompoundType::And) {
                    return false;
                }
                filter.datastore == design.datastore
                    && filter.database.name == design.database.name
                    && filter.table.name == design.table.name
                    && filter.field.column_name == design.field.column_name
                    && filter.operator == design.operator
                    && design
                        .value
                        .as_ref()
                        .map(|value| &filter.value == value)
                        .unwrap_or(true)
            }
            (Filter::Compound(filter), FilterDesign::Compound(design)) => {
                if filter.root != design.root.unwrap_or(CompoundType::And)
                    || filter.compound_type != design.compound_type
                {
                    return false;
                }
                let footprint = data_sources_from_design(
                    &FilterDesign::Compound(design.clone()),
                    false,
                );
                if footprint.len() > 1 {
                    // Multi-field compound: strict bijection, so a two-clause
                    // design cannot match a three-clause filter
                    design.filters.len() == filter.filters.len()
                        && design.filters.iter().all(|d| {
                            filter.filters.iter().any(|f| f.is_compatible_with_design(d))
                        })
                        && filter.filters.iter().all(|f| {
                            design.filters.iter().any(|d| f.is_compatible_with_design(d))
                        })
                } else {
                    // All clauses constrain one column: subset match, which
                    // supports N-clause single-field widgets
                    design
                        .filters
                        .iter()
                        .all(|d| filter.filters.iter().any(|f| f.is_compatible_with_design(d)))
                }
            }
            _ => false,
        }
    }

    /// Structural equality of two live filters. Unlike design compatibility,
    /// compound children must match pairwise in order. Ids and names are not
    /// compared.
    pub fn is_equivalent_to_filter(&self, other: &Filter) -> bool {
        match (self, other) {
            (Filter::Simple(a), Filter::Simple(b)) => {
                a.root == b.root
                    && a.datastore == b.datastore
                    && a.database.name == b.database.name
                    && a.table.name == b.table.name
                    && a.field.column_name == b.field.column_name
                    && a.operator == b.operator
                    && a.value == b.value
            }
            (Filter::Compound(a), Filter::Compound(b)) => {
                a.root == b.root
                    && a.compound_type == b.compound_type
                    && a.filters.len() == b.filters.len()
                    && a.filters
                        .iter()
                        .zip(b.filters.iter())
                        .all(|(x, y)| x.is_equivalent_to_filter(y))
            }
            _ => false,
        }
    }
}

impl SimpleFilter {
    /// Default display label from catalog pretty names.
    pub fn label(&self) -> String {
        format!(
            "{} / {} / {} {} {}",
            self.database.pretty(),
            self.table.pretty(),
            self.field.pretty(),
            self.operator,
            self.value
        )
    }
}

impl CompoundFilter {
    /// Default display label: child labels joined by the combinator.
    pub fn label(&self) -> String {
        let joiner = format!(" {} ", self.compound_type);
        self.filters
            .iter()
            .map(|child| child.name().to_string())
            .collect::<Vec<_>>()
            .join(&joiner)
    }
}

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
