//! Per-collection bookkeeping

use crate::{CollectionDeclaration, CollectionFilter, CollectionKind, SynthesizedSystem};

/// Outcome of populating one collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulateStatus {
    Ok,
    /// Some stored paths did not resolve to a catalog game
    PartialMiss { missed: usize },
    /// No stored file; the collection is empty
    ConfigMissing,
    /// The stored filter could not be parsed; the collection is empty
    Malformed,
}

/// One collection owned by the manager
#[derive(Debug, Clone)]
pub struct CollectionRecord {
    pub decl: CollectionDeclaration,
    pub system: SynthesizedSystem,
    pub enabled: bool,
    /// Set once by the first population, cleared only by a reload
    pub populated: bool,
    /// Membership changed since the last save
    pub needs_save: bool,
    /// Present exactly for filter collections
    pub filter: Option<CollectionFilter>,
}

impl CollectionRecord {
    pub fn new(decl: CollectionDeclaration) -> Self {
        let filter = (decl.kind == CollectionKind::CustomFilter).then(CollectionFilter::new);
        Self {
            system: SynthesizedSystem::new(&decl),
            decl,
            enabled: false,
            populated: false,
            needs_save: false,
            filter,
        }
    }

    pub fn name(&self) -> &str {
        &self.decl.short_name
    }

    pub fn is_filter(&self) -> bool {
        self.filter.is_some()
    }
}
