//! Relation substitution: rewriting filters across declared field relations
//!
//! Dashboards declare that certain (table, field) pairs are semantically
//! equivalent across datasets. When a user filters one member of such a
//! relation, the engine derives the sibling filter on the related member so
//! the filter propagates to the joined table without query-layer join
//! support.

use super::{CompoundFilter, Filter, SimpleFilter};
use crate::types::FieldLocation;

impl Filter {
    /// Rewrite this filter onto the related field locations.
    ///
    /// `equivalent` and `substitute` are parallel lists: when a simple filter
    /// targets `equivalent[i]`, the rewritten filter targets
    /// `substitute[i]`, keeping this filter's operator, value, and root. A
    /// compound filter rewrites each child that the relation applies to and
    /// keeps the rest unchanged. Returns `None` when the relation is
    /// irrelevant to the whole filter, when the lists have mismatched
    /// lengths, or when the matched substitute is not fully populated.
    pub fn relation_filter(
        &self,
        equivalent: &[FieldLocation],
        substitute: &[FieldLocation],
    ) -> Option<Filter> {
        if equivalent.len() != substitute.len() {
            return None;
        }
        match self {
            Filter::Simple(filter) => filter
                .substituted(equivalent, substitute)
                .map(Filter::Simple),
            Filter::Compound(filter) => {
                let mut any_substituted = false;
                let mut children = Vec::with_capacity(filter.filters.len());
                for child in &filter.filters {
                    match child.relation_filter(equivalent, substitute) {
                        Some(rewritten) => {
                            any_substituted = true;
                            children.push(rewritten);
                        }
                        None => children.push(child.clone()),
                    }
                }
                if !any_substituted {
                    return None;
                }
                let mut rewritten = CompoundFilter {
                    id: super::generate_id(),
                    name: String::new(),
                    root: filter.root,
                    relations: filter.relations.clone(),
                    compound_type: filter.compound_type,
                    filters: children,
                };
                rewritten.name = rewritten.label();
                Some(Filter::Compound(rewritten))
            }
        }
    }
}

impl SimpleFilter {
    fn matches_location(&self, location: &FieldLocation) -> bool {
        self.datastore == location.datastore
            && self.database.name == location.database.name
            && self.table.name == location.table.name
            && self.field.column_name == location.field.column_name
    }

    fn substituted(
        &self,
        equivalent: &[FieldLocation],
        substitute: &[FieldLocation],
    ) -> Option<SimpleFilter> {
        let index = equivalent
            .iter()
            .position(|location| self.matches_location(location))?;
        let target = &substitute[index];
        if !target.is_fully_populated() {
            return None;
        }
        let mut rewritten = SimpleFilter {
            id: super::generate_id(),
            name: String::new(),
            root: self.root,
            relations: self.relations.clone(),
            datastore: target.datastore.clone(),
            database: target.database.clone(),
            table: target.table.clone(),
            field: target.field.clone(),
            operator: self.operator.clone(),
            value: self.value.clone(),
        };
        rewritten.name = rewritten.label();
        Some(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompoundType, DatabaseMeta, FieldMeta, FilterValue, TableMeta};

    fn location(table: &str, field: &str) -> FieldLocation {
        FieldLocation {
            datastore: "ds1".to_string(),
            database: DatabaseMeta {
                name: "db1".to_string(),
                pretty_name: String::new(),
            },
            table: TableMeta {
                name: table.to_string(),
                pretty_name: String::new(),
            },
            field: FieldMeta {
                column_name: field.to_string(),
                pretty_name: String::new(),
                field_type: String::new(),
            },
        }
    }

    fn simple_filter(table: &str, field: &str, operator: &str, value: i64) -> SimpleFilter {
        let loc = location(table, field);
        let mut filter = SimpleFilter {
            id: "test-id".to_string(),
            name: String::new(),
            root: CompoundType::And,
            relations: Vec::new(),
            datastore: loc.datastore,
            database: loc.database,
            table: loc.table,
            field: loc.field,
            operator: operator.to_string(),
            value: FilterValue::Integer(value),
        };
        filter.name = filter.label();
        filter
    }

    #[test]
    fn test_simple_substitution() {
        let filter = Filter::Simple(simple_filter("t1", "x", "=", 10));
        let rewritten = filter
            .relation_filter(&[location("t1", "x")], &[location("t2", "y")])
            .unwrap();
        match rewritten {
            Filter::Simple(simple) => {
                assert_eq!(simple.table.name, "t2");
                assert_eq!(simple.field.column_name, "y");
                assert_eq!(simple.operator, "=");
                assert_eq!(simple.value, FilterValue::Integer(10));
            }
            Filter::Compound(_) => panic!("expected a simple filter"),
        }
    }

    #[test]
    fn test_unrelated_filter_returns_none() {
        let filter = Filter::Simple(simple_filter("t1", "x", "=", 10));
        assert!(filter
            .relation_filter(&[location("t9", "other")], &[location("t2", "y")])
            .is_none());
    }

    #[test]
    fn test_mismatched_list_lengths_return_none() {
        let filter = Filter::Simple(simple_filter("t1", "x", "=", 10));
        assert!(filter
            .relation_filter(&[location("t1", "x")], &[])
            .is_none());
    }

    #[test]
    fn test_incomplete_substitute_returns_none() {
        let filter = Filter::Simple(simple_filter("t1", "x", "=", 10));
        let mut bad = location("t2", "y");
        bad.field = FieldMeta::default();
        assert!(filter
            .relation_filter(&[location("t1", "x")], &[bad])
            .is_none());
    }

    #[test]
    fn test_compound_partial_substitution_keeps_unrelated_children() {
        let compound = Filter::Compound(CompoundFilter {
            id: "c1".to_string(),
            name: String::new(),
            root: CompoundType::And,
            relations: Vec::new(),
            compound_type: CompoundType::And,
            filters: vec![
                Filter::Simple(simple_filter("t1", "x", ">", -100)),
                Filter::Simple(simple_filter("t1", "unrelated", "=", 5)),
            ],
        });
        let rewritten = compound
            .relation_filter(&[location("t1", "x")], &[location("t1", "y")])
            .unwrap();
        match rewritten {
            Filter::Compound(c) => {
                assert_eq!(c.filters.len(), 2);
                match (&c.filters[0], &c.filters[1]) {
                    (Filter::Simple(first), Filter::Simple(second)) => {
                        assert_eq!(first.field.column_name, "y");
                        assert_eq!(second.field.column_name, "unrelated");
                    }
                    _ => panic!("expected simple children"),
                }
            }
            Filter::Simple(_) => panic!("expected a compound filter"),
        }
    }

    #[test]
    fn test_compound_irrelevant_relation_returns_none() {
        let compound = Filter::Compound(CompoundFilter {
            id: "c1".to_string(),
            name: String::new(),
            root: CompoundType::And,
            relations: Vec::new(),
            compound_type: CompoundType::And,
            filters: vec![Filter::Simple(simple_filter("t1", "x", "=", 1))],
        });
        assert!(compound
            .relation_filter(&[location("t9", "z")], &[location("t2", "y")])
            .is_none());
    }
}
