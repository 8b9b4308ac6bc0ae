//! FilterCollection: live filters bucketed by data source footprint
//!
//! The collection is logically keyed by the equivalence class of a data
//! source list, not by any particular list instance. Storage uses a canonical
//! string key (each source rendered as a JSON tuple, tuples sorted and
//! deduplicated) so equivalent lists always land on the same entry without
//! scanning every stored key. All accessors have lookup-or-create semantics;
//! callers never pre-register keys.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde_json::json;
use tracing::{debug, warn};

use crate::design::FilterDesign;
use crate::filter::Filter;
use crate::source::{
    are_data_source_lists_equivalent, data_sources_from_design, FilterDataSource,
};

#[derive(Debug, Default)]
pub struct FilterCollection {
    entries: BTreeMap<String, CollectionEntry>,
}

#[derive(Debug)]
struct CollectionEntry {
    data_sources: Vec<FilterDataSource>,
    filters: Vec<Filter>,
}

impl FilterCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the design's data source list and return the stored key list
    /// for its equivalence class, creating an empty entry when none exists.
    /// Repeated calls with equivalent designs return the same stored list.
    pub fn find_filter_data_sources(&mut self, design: &FilterDesign) -> &[FilterDataSource] {
        let list = data_sources_from_design(design, false);
        &self.entry_for(list).data_sources
    }

    /// Live filters for the given data source list, `[]` for a new key.
    pub fn get_filters(&mut self, data_sources: &[FilterDataSource]) -> &[Filter] {
        &self.entry_for(data_sources.to_vec()).filters
    }

    /// Replace the filters stored for the given list's equivalence class.
    /// Returns the key list actually used for storage, which is the
    /// pre-existing equivalent list when one was already present.
    pub fn set_filters(
        &mut self,
        data_sources: Vec<FilterDataSource>,
        filters: Vec<Filter>,
    ) -> &[FilterDataSource] {
        let entry = self.entry_for(data_sources);
        entry.filters = filters;
        &entry.data_sources
    }

    /// Snapshot of all stored key lists.
    pub fn data_sources(&self) -> Vec<&[FilterDataSource]> {
        self.entries
            .values()
            .map(|entry| entry.data_sources.as_slice())
            .collect()
    }

    fn entry_for(&mut self, list: Vec<FilterDataSource>) -> &mut CollectionEntry {
        let key = canonical_key(&list);
        match self.entries.entry(key) {
            Entry::Occupied(occupied) => {
                let entry = occupied.into_mut();
                if !are_data_source_lists_equivalent(&entry.data_sources, &list, false) {
                    // Canonical keys should only collide for equivalent
                    // lists; report and keep the stored entry
                    warn!(
                        stored = ?entry.data_sources,
                        incoming = ?list,
                        "non-equivalent data source lists share a canonical key"
                    );
                }
                entry
            }
            Entry::Vacant(vacant) => {
                debug!(sources = list.len(), "creating filter collection entry");
                vacant.insert(CollectionEntry {
                    data_sources: list,
                    filters: Vec::new(),
                })
            }
        }
    }
}

/// Canonical storage key for a data source list: one JSON tuple per source,
/// sorted and deduplicated so that set-equivalent lists produce identical
/// keys.
fn canonical_key(list: &[FilterDataSource]) -> String {
    let mut parts: Vec<String> = list
        .iter()
        .map(|source| {
            json!([
                source.datastore_name,
                source.database_name,
                source.table_name,
                source.field_name,
                source.operator,
            ])
            .to_string()
        })
        .collect();
    parts.sort();
    parts.dedup();
    parts.join(",")
}
