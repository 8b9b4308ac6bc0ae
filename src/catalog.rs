//! Field catalog: name → metadata lookup for datastores
//!
//! The engine only consults the catalog when rehydrating designs from wire
//! configs. Lookups never fail: unknown names resolve to the all-empty
//! sentinel metadata, and a filter built over sentinel metadata is dropped by
//! the fully-populated checks during construction instead of corrupting the
//! filter set.

use std::collections::HashMap;

use serde::Deserialize;

use crate::types::{DatabaseMeta, FieldMeta, TableMeta};

/// Catalog of database/table/field metadata, keyed by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldCatalog {
    #[serde(default)]
    databases: HashMap<String, DatabaseSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DatabaseSpec {
    #[serde(default)]
    pretty_name: String,
    #[serde(default)]
    tables: HashMap<String, TableSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TableSpec {
    #[serde(default)]
    pretty_name: String,
    #[serde(default)]
    fields: HashMap<String, FieldSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FieldSpec {
    #[serde(default)]
    pretty_name: String,
    #[serde(default, rename = "type")]
    field_type: String,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a database name, returning the sentinel for unknown names.
    pub fn database_with_name(&self, name: &str) -> DatabaseMeta {
        match self.databases.get(name) {
            Some(spec) => DatabaseMeta {
                name: name.to_string(),
                pretty_name: spec.pretty_name.clone(),
            },
            None => DatabaseMeta::default(),
        }
    }

    /// Resolve a table name within a database, sentinel for unknown names.
    pub fn table_with_name(&self, database: &str, table: &str) -> TableMeta {
        match self
            .databases
            .get(database)
            .and_then(|db| db.tables.get(table))
        {
            Some(spec) => TableMeta {
                name: table.to_string(),
                pretty_name: spec.pretty_name.clone(),
            },
            None => TableMeta::default(),
        }
    }

    /// Resolve a field name within a table, sentinel for unknown names.
    pub fn field_with_name(&self, database: &str, table: &str, field: &str) -> FieldMeta {
        match self
            .databases
            .get(database)
            .and_then(|db| db.tables.get(table))
            .and_then(|t| t.fields.get(field))
        {
            Some(spec) => FieldMeta {
                column_name: field.to_string(),
                pretty_name: spec.pretty_name.clone(),
                field_type: spec.field_type.clone(),
            },
            None => FieldMeta::default(),
        }
    }

    /// Register a database, keeping an existing entry's tables intact.
    pub fn register_database(&mut self, name: &str, pretty_name: &str) {
        let entry = self.databases.entry(name.to_string()).or_default();
        entry.pretty_name = pretty_name.to_string();
    }

    /// Register a table, creating the parent database if needed.
    pub fn register_table(&mut self, database: &str, table: &str, pretty_name: &str) {
        let db = self.databases.entry(database.to_string()).or_default();
        let entry = db.tables.entry(table.to_string()).or_default();
        entry.pretty_name = pretty_name.to_string();
    }

    /// Register a field, creating the parent database and table if needed.
    pub fn register_field(
        &mut self,
        database: &str,
        table: &str,
        field: &str,
        pretty_name: &str,
        field_type: &str,
    ) {
        let db = self.databases.entry(database.to_string()).or_default();
        let tbl = db.tables.entry(table.to_string()).or_default();
        let entry = tbl.fields.entry(field.to_string()).or_default();
        entry.pretty_name = pretty_name.to_string();
        entry.field_type = field_type.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> FieldCatalog {
        let mut catalog = FieldCatalog::new();
        catalog.register_database("db1", "Database One");
        catalog.register_table("db1", "t1", "Table One");
        catalog.register_field("db1", "t1", "id", "Identifier", "keyword");
        catalog
    }

    #[test]
    fn test_known_lookups() {
        let catalog = sample_catalog();
        assert_eq!(catalog.database_with_name("db1").pretty_name, "Database One");
        assert_eq!(catalog.table_with_name("db1", "t1").name, "t1");

        let field = catalog.field_with_name("db1", "t1", "id");
        assert_eq!(field.column_name, "id");
        assert_eq!(field.field_type, "keyword");
    }

    #[test]
    fn test_unknown_lookups_return_sentinel() {
        let catalog = sample_catalog();
        assert!(catalog.database_with_name("nope").name.is_empty());
        assert!(catalog.table_with_name("db1", "nope").name.is_empty());
        assert!(catalog
            .field_with_name("db1", "t1", "nope")
            .column_name
            .is_empty());
    }

    #[test]
    fn test_register_field_creates_parents() {
        let mut catalog = FieldCatalog::new();
        catalog.register_field("db2", "t2", "x", "X", "");
        assert_eq!(catalog.field_with_name("db2", "t2", "x").column_name, "x");
        assert_eq!(catalog.database_with_name("db2").name, "db2");
    }
}
