//! Facet accumulation.
//!
//! Facet lists keep values in order of first appearance and never hold the
//! same string twice. [`push_unique`] handles the single-valued facets
//! (`type`, `source`); [`extend_unique`] flattens the per-entry lists
//! (`products`, `languages`) into one cross-entry list.

use crate::models::{ApiEntry, FilterSet};

/// Append `value` unless an equal string is already present.
pub fn push_unique(target: &mut Vec<String>, value: &str) {
    if !target.iter().any(|v| v == value) {
        target.push(value.to_string());
    }
}

/// Append every value not yet present, keeping the first occurrence.
pub fn extend_unique<I, S>(target: &mut Vec<String>, values: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for value in values {
        push_unique(target, value.as_ref());
    }
}

impl FilterSet {
    /// Fold one entry's facet values into the set.
    pub fn absorb(&mut self, entry: &ApiEntry) {
        extend_unique(&mut self.products, &entry.products);
        extend_unique(&mut self.languages, &entry.languages);
        push_unique(&mut self.types, &entry.api_type);
        push_unique(&mut self.sources, entry.source.as_str());
    }

    /// Fold another set into this one, list by list.
    pub fn merge(&mut self, other: &FilterSet) {
        extend_unique(&mut self.products, &other.products);
        extend_unique(&mut self.languages, &other.languages);
        extend_unique(&mut self.types, &other.types);
        extend_unique(&mut self.sources, &other.sources);
    }

    /// Build the facet set for a list of entries.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a ApiEntry>) -> Self {
        let mut filters = FilterSet::default();
        for entry in entries {
            filters.absorb(entry);
        }
        filters
    }
}
