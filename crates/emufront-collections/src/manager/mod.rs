//! The collection system manager

mod display;
mod edit;
mod naming;
mod persist;
mod populate;
mod refresh;

use crate::{
    BundleSystem, CUSTOM_COLLECTIONS_NAME, CollectionDeclaration, CollectionKind, CollectionPaths,
    CollectionRecord, DisplayedSystems, SynthesizedSystem, SystemRef, ThemeFolders, ViewBinding,
    declarations, discover_collections,
};
use emufront_catalog::{Catalog, EntryId, RecoveryStore};
use emufront_config::{CollectionSettings, FrontendConfig};
use std::collections::BTreeMap;

/// Owns every collection and the list of displayed systems.
///
/// One instance lives for the whole front-end session. Dropping it flushes
/// unsaved custom collections to disk.
pub struct CollectionSystemManager {
    settings: CollectionSettings,
    paths: CollectionPaths,
    hidden_extensions: BTreeMap<String, Vec<String>>,
    view: Box<dyn ViewBinding>,
    theme: Box<dyn ThemeFolders>,
    recovery: Option<RecoveryStore>,
    decls: BTreeMap<String, CollectionDeclaration>,
    auto: BTreeMap<String, CollectionRecord>,
    custom: BTreeMap<String, CollectionRecord>,
    bundle: BundleSystem,
    displayed: DisplayedSystems,
    editing: Option<String>,
}

impl CollectionSystemManager {
    pub fn new(
        settings: CollectionSettings,
        paths: CollectionPaths,
        view: Box<dyn ViewBinding>,
        theme: Box<dyn ThemeFolders>,
    ) -> Self {
        let decls: BTreeMap<String, CollectionDeclaration> = declarations()
            .iter()
            .map(|d| (d.short_name.clone(), d.clone()))
            .collect();

        let bundle_decl = decls
            .get(CUSTOM_COLLECTIONS_NAME)
            .cloned()
            .unwrap_or_else(|| CollectionDeclaration::custom(CUSTOM_COLLECTIONS_NAME, CollectionKind::CustomFlat));

        if let Err(e) = paths.ensure_dir() {
            tracing::warn!(
                "Cannot create collections directory {}: {}",
                paths.collections_dir.display(),
                e
            );
        }

        Self {
            settings,
            paths,
            hidden_extensions: BTreeMap::new(),
            view,
            theme,
            recovery: None,
            decls,
            auto: BTreeMap::new(),
            custom: BTreeMap::new(),
            bundle: BundleSystem::new(&bundle_decl),
            displayed: DisplayedSystems::new(),
            editing: None,
        }
    }

    /// Manager configured from the front-end config file
    pub fn from_config(
        config: &FrontendConfig,
        view: Box<dyn ViewBinding>,
        theme: Box<dyn ThemeFolders>,
    ) -> Self {
        Self::new(
            config.collections.clone(),
            CollectionPaths::from_config(&config.paths),
            view,
            theme,
        )
        .with_hidden_extensions(config.hidden_extensions_by_system())
    }

    /// Per-system extensions (".zip" form) kept out of automatic collections
    pub fn with_hidden_extensions(mut self, hidden: BTreeMap<String, Vec<String>>) -> Self {
        self.hidden_extensions = hidden;
        self
    }

    /// Store that receives single-game saves from the favorite toggle
    pub fn with_recovery(mut self, store: RecoveryStore) -> Self {
        self.recovery = Some(store);
        self
    }

    /// Build every collection record and, when collections are enabled,
    /// the displayed system list
    pub fn load_collection_systems(&mut self, catalog: &Catalog) {
        self.displayed.retain(|_| false);
        for (id, _) in catalog.systems() {
            self.displayed.push(SystemRef::Real(id));
        }

        self.auto = self
            .decls
            .values()
            .filter(|d| !d.is_custom)
            .map(|d| (d.short_name.clone(), CollectionRecord::new(d.clone())))
            .collect();

        if let Some(decl) = self.decls.get(CUSTOM_COLLECTIONS_NAME) {
            self.bundle = BundleSystem::new(decl);
        }

        self.save_all();
        self.custom.clear();
        for (name, kind) in discover_collections(&self.paths.collections_dir) {
            self.insert_custom_record(&name, kind);
        }
        let stale_edit = self
            .editing
            .as_ref()
            .is_some_and(|name| self.custom.get(name).is_none_or(|r| r.is_filter()));
        if stale_edit {
            self.exit_edit_mode();
        }
        tracing::info!(
            "Loaded {} automatic and {} custom collections",
            self.auto.len(),
            self.custom.len()
        );

        if !self.settings.auto.is_empty() || !self.settings.custom.is_empty() {
            self.load_enabled_list_from_settings();
            self.update_systems_list(catalog);
        }
    }

    /// Re-read which collections are enabled from the settings lists
    pub fn load_enabled_list_from_settings(&mut self) {
        let auto = self.settings.auto_enabled();
        for (name, record) in self.auto.iter_mut() {
            record.enabled = auto.contains(name);
        }

        let custom = self.settings.custom_enabled();
        for (name, record) in self.custom.iter_mut() {
            record.enabled = custom.contains(name);
        }
    }

    pub fn all_games_collection(&mut self, catalog: &Catalog) -> Option<&SynthesizedSystem> {
        self.collection_populated(catalog, "all")
    }

    pub fn arcade_collection(&mut self, catalog: &Catalog) -> Option<&SynthesizedSystem> {
        self.collection_populated(catalog, "arcade")
    }

    fn collection_populated(&mut self, catalog: &Catalog, name: &str) -> Option<&SynthesizedSystem> {
        let system = SystemRef::Auto(name.to_string());
        self.populate_collection(catalog, &system);
        self.auto.get(name).map(|r| &r.system)
    }

    pub fn auto_collections(&self) -> &BTreeMap<String, CollectionRecord> {
        &self.auto
    }

    pub fn custom_collections(&self) -> &BTreeMap<String, CollectionRecord> {
        &self.custom
    }

    pub fn bundle(&self) -> &BundleSystem {
        &self.bundle
    }

    pub fn displayed_systems(&self) -> &DisplayedSystems {
        &self.displayed
    }

    /// The synthesized system behind a displayed collection
    pub fn collection(&self, system: &SystemRef) -> Option<&SynthesizedSystem> {
        match system {
            SystemRef::Bundle => Some(&self.bundle.system),
            SystemRef::Real(_) => None,
            _ => self.record(system).map(|r| &r.system),
        }
    }

    pub fn is_custom_collection(&self, name: &str) -> bool {
        self.custom.contains_key(name)
    }

    pub fn settings(&self) -> &CollectionSettings {
        &self.settings
    }

    /// Settings changes take effect on the next
    /// [`load_enabled_list_from_settings`](Self::load_enabled_list_from_settings)
    pub fn settings_mut(&mut self) -> &mut CollectionSettings {
        &mut self.settings
    }

    pub fn paths(&self) -> &CollectionPaths {
        &self.paths
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_collection(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Save one game's metadata to the recovery store, if attached
    pub fn save_to_recovery(&self, catalog: &Catalog, game: EntryId) {
        if let Some(store) = &self.recovery
            && let Err(e) = store.save_game(catalog, game)
        {
            tracing::error!("Failed to save {} to gamelist recovery: {}", game, e);
        }
    }

    fn record(&self, system: &SystemRef) -> Option<&CollectionRecord> {
        match system {
            SystemRef::Auto(name) => self.auto.get(name),
            SystemRef::Custom(name) => self.custom.get(name),
            _ => None,
        }
    }

    fn record_mut(&mut self, system: &SystemRef) -> Option<&mut CollectionRecord> {
        record_in(&mut self.auto, &mut self.custom, system)
    }

    /// Displayed system whose game list shows `system`: the bundle for
    /// bundled custom collections
    fn view_system(&self, system: &SystemRef) -> SystemRef {
        match system {
            SystemRef::Custom(name) if self.bundle.contains(name) => SystemRef::Bundle,
            other => other.clone(),
        }
    }

    fn insert_custom_record(&mut self, name: &str, kind: CollectionKind) -> &mut CollectionRecord {
        let decl = CollectionDeclaration::custom(name, kind);
        self.custom
            .entry(name.to_string())
            .or_insert_with(|| CollectionRecord::new(decl))
    }
}

/// Record lookup that leaves the manager's other fields borrowable
fn record_in<'a>(
    auto: &'a mut BTreeMap<String, CollectionRecord>,
    custom: &'a mut BTreeMap<String, CollectionRecord>,
    system: &SystemRef,
) -> Option<&'a mut CollectionRecord> {
    match system {
        SystemRef::Auto(name) => auto.get_mut(name),
        SystemRef::Custom(name) => custom.get_mut(name),
        _ => None,
    }
}

impl Drop for CollectionSystemManager {
    fn drop(&mut self) {
        self.remove_collections_from_displayed_systems();
        self.save_all();
        tracing::debug!("Collection system manager shut down");
    }
}
