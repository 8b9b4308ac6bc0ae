//! Relation substitution across declared field relations.

use dashlens::design::{CompoundFilterDesign, FilterDesign, SimpleFilterDesign};
use dashlens::filter::Filter;
use dashlens::types::{
    CompoundType, DatabaseMeta, FieldLocation, FieldMeta, FilterValue, TableMeta,
};

fn location(field: &str) -> FieldLocation {
    FieldLocation {
        datastore: "ds1".to_string(),
        database: DatabaseMeta {
            name: "db1".to_string(),
            pretty_name: String::new(),
        },
        table: TableMeta {
            name: "t1".to_string(),
            pretty_name: String::new(),
        },
        field: FieldMeta {
            column_name: field.to_string(),
            pretty_name: String::new(),
            field_type: String::new(),
        },
    }
}

fn simple_design(field: &str, operator: &str, value: i64) -> FilterDesign {
    let loc = location(field);
    FilterDesign::Simple(SimpleFilterDesign {
        id: None,
        name: None,
        root: None,
        datastore: loc.datastore,
        database: loc.database,
        table: loc.table,
        field: loc.field,
        operator: operator.to_string(),
        value: Some(FilterValue::Integer(value)),
    })
}

#[test]
fn test_compound_range_filter_propagates_to_related_field() {
    // AND(x > -100, x < 100), rewritten through the relation x → y
    let filter = Filter::from_design(&FilterDesign::Compound(CompoundFilterDesign {
        id: None,
        name: None,
        root: None,
        compound_type: CompoundType::And,
        filters: vec![simple_design("x", ">", -100), simple_design("x", "<", 100)],
    }))
    .unwrap();

    let rewritten = filter
        .relation_filter(&[location("x")], &[location("y")])
        .expect("relation should apply");

    match rewritten {
        Filter::Compound(compound) => {
            assert_eq!(compound.compound_type, CompoundType::And);
            assert_eq!(compound.root, filter.root());
            assert_eq!(compound.filters.len(), 2);
            match (&compound.filters[0], &compound.filters[1]) {
                (Filter::Simple(lower), Filter::Simple(upper)) => {
                    assert_eq!(lower.field.column_name, "y");
                    assert_eq!(lower.operator, ">");
                    assert_eq!(lower.value, FilterValue::Integer(-100));
                    assert_eq!(upper.field.column_name, "y");
                    assert_eq!(upper.operator, "<");
                    assert_eq!(upper.value, FilterValue::Integer(100));
                }
                _ => panic!("expected simple children"),
            }
        }
        Filter::Simple(_) => panic!("expected a compound filter"),
    }
}

#[test]
fn test_unrelated_filter_yields_no_relation_filter() {
    let filter = Filter::from_design(&simple_design("x", "=", 1)).unwrap();
    assert!(filter
        .relation_filter(&[location("other")], &[location("y")])
        .is_none());
}

#[test]
fn test_rewritten_filter_gets_a_fresh_identity() {
    let filter = Filter::from_design(&simple_design("x", "=", 1)).unwrap();
    let rewritten = filter
        .relation_filter(&[location("x")], &[location("y")])
        .unwrap();
    assert_ne!(rewritten.id(), filter.id());
}
