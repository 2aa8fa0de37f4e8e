//! Faceted search index over collection entries

use crate::CollectionEntry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Attribute a game is indexed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Facet {
    System,
    Genre,
    Developer,
    Publisher,
    Players,
    Favorite,
    Kidgame,
    Played,
}

/// Counts of facet values for a set of entries, keyed by full path.
///
/// Every key remembers what it contributed so removal is exact.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    keys: BTreeSet<String>,
    facets: BTreeMap<Facet, BTreeMap<String, usize>>,
    contributions: HashMap<String, Vec<(Facet, String)>>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index an entry. Re-adding a key replaces its previous values.
    pub fn add(&mut self, entry: &CollectionEntry) {
        self.remove(&entry.key);
        let values = facet_values(entry);
        for (facet, value) in &values {
            *self
                .facets
                .entry(*facet)
                .or_default()
                .entry(value.clone())
                .or_insert(0) += 1;
        }
        self.keys.insert(entry.key.clone());
        self.contributions.insert(entry.key.clone(), values);
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let Some(values) = self.contributions.remove(key) else {
            return false;
        };
        for (facet, value) in values {
            if let Some(counts) = self.facets.get_mut(&facet) {
                if let Some(count) = counts.get_mut(&value) {
                    *count -= 1;
                    if *count == 0 {
                        counts.remove(&value);
                    }
                }
                if counts.is_empty() {
                    self.facets.remove(&facet);
                }
            }
        }
        self.keys.remove(key);
        true
    }

    /// Merge another index into this one. Keys already present are kept.
    pub fn import(&mut self, other: &SearchIndex) {
        for (key, values) in &other.contributions {
            if self.keys.contains(key) {
                continue;
            }
            for (facet, value) in values {
                *self
                    .facets
                    .entry(*facet)
                    .or_default()
                    .entry(value.clone())
                    .or_insert(0) += 1;
            }
            self.keys.insert(key.clone());
            self.contributions.insert(key.clone(), values.clone());
        }
    }

    pub fn reset(&mut self) {
        self.keys.clear();
        self.facets.clear();
        self.contributions.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of indexed entries with `value` for `facet`
    pub fn count(&self, facet: Facet, value: &str) -> usize {
        self.facets
            .get(&facet)
            .and_then(|counts| counts.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// Distinct values of a facet with their counts, in value order
    pub fn values(&self, facet: Facet) -> Vec<(&str, usize)> {
        self.facets
            .get(&facet)
            .map(|counts| counts.iter().map(|(v, c)| (v.as_str(), *c)).collect())
            .unwrap_or_default()
    }
}

fn facet_values(entry: &CollectionEntry) -> Vec<(Facet, String)> {
    let md = &entry.metadata;
    let mut values = vec![(Facet::System, entry.system_name.clone())];

    let optional = [
        (Facet::Genre, &md.genre),
        (Facet::Developer, &md.developer),
        (Facet::Publisher, &md.publisher),
        (Facet::Players, &md.players),
    ];
    for (facet, value) in optional {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            values.push((facet, value.to_string()));
        }
    }

    values.push((Facet::Favorite, md.favorite.to_string()));
    values.push((Facet::Kidgame, md.kidgame.to_string()));
    values.push((Facet::Played, md.has_been_played().to_string()));
    values
}
