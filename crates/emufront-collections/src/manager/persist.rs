//! Saving, creating and deleting custom collections

use super::CollectionSystemManager;
use crate::{
    CollectionError, CollectionFilter, CollectionKind, FilterDefinition, SynthesizedSystem,
    SystemRef, write_flat,
};
use emufront_catalog::Catalog;
use std::fs;

impl CollectionSystemManager {
    /// Write a flat collection's member paths if it changed since the last
    /// save. Returns whether anything was written.
    pub fn save_custom_collection(&mut self, name: &str) -> Result<bool, CollectionError> {
        let record = self
            .custom
            .get_mut(name)
            .ok_or_else(|| CollectionError::UnknownCollection(name.to_string()))?;

        if record.is_filter() || !record.needs_save {
            return Ok(false);
        }

        let keys: Vec<String> = record.system.root.keys().map(str::to_string).collect();
        let path = self.paths.custom_config_path(name);
        write_flat(&path, &keys, &self.paths.home_dir)?;
        record.needs_save = false;

        tracing::info!("Saved collection {} ({} games)", name, keys.len());
        Ok(true)
    }

    /// Flush every modified flat collection, logging failures
    pub fn save_all(&mut self) {
        let pending: Vec<String> = self
            .custom
            .iter()
            .filter(|(_, r)| r.needs_save && !r.is_filter())
            .map(|(name, _)| name.clone())
            .collect();

        for name in pending {
            if let Err(e) = self.save_custom_collection(&name) {
                tracing::error!("Failed to save collection {}: {}", name, e);
            }
        }
    }

    /// Register a new, empty custom collection. An existing collection of
    /// that name is returned unchanged.
    pub fn add_new_custom_collection(&mut self, name: &str, kind: CollectionKind) -> &SynthesizedSystem {
        if !self.custom.contains_key(name) {
            tracing::info!("Adding custom collection {}", name);
        }
        &self.insert_custom_record(name, kind).system
    }

    /// Write a filter definition to `<name>.xcc` and register the collection
    pub fn create_filter_collection(
        &mut self,
        name: &str,
        definition: FilterDefinition,
    ) -> Result<(), CollectionError> {
        if self.custom.contains_key(name) {
            return Err(CollectionError::AlreadyExists(name.to_string()));
        }

        let filter = CollectionFilter::from_definition(definition);
        filter.save(&self.paths.filter_path(name))?;

        let record = self.insert_custom_record(name, CollectionKind::CustomFilter);
        record.filter = Some(filter);
        tracing::info!("Created filter collection {}", name);
        Ok(())
    }

    /// Remove a custom collection and its file.
    ///
    /// False when neither a record nor a file existed.
    pub fn delete_custom_collection(&mut self, name: &str) -> bool {
        let filter_path = self.paths.filter_path(name);
        let path = if filter_path.is_file() {
            filter_path
        } else {
            self.paths.custom_config_path(name)
        };

        let mut deleted = false;
        if path.is_file() {
            match fs::remove_file(&path) {
                Ok(()) => deleted = true,
                Err(e) => {
                    tracing::error!("Failed to remove {}: {}", path.display(), e);
                    return false;
                }
            }
        }

        if self.editing.as_deref() == Some(name) {
            self.exit_edit_mode();
        }

        let system = SystemRef::Custom(name.to_string());
        self.displayed.retain(|s| *s != system);
        if self.bundle.contains(name) {
            self.bundle.remove_member(name);
            self.rebuild_bundle_index();
        }
        if self.custom.remove(name).is_some() {
            deleted = true;
        }

        let remaining: Vec<String> = self
            .settings
            .custom_enabled()
            .into_iter()
            .filter(|n| n != name)
            .collect();
        self.settings.set_custom_enabled(&remaining);

        if deleted {
            tracing::info!("Deleted collection {}", name);
        } else {
            tracing::warn!("No collection named {} to delete", name);
        }
        deleted
    }

    /// Recompute a collection after its source changed.
    ///
    /// Automatic collections only refresh their view. Filter collections
    /// re-read their definition and repopulate; flat collections are left
    /// alone since their file is only written by this manager.
    pub fn reload_collection(&mut self, catalog: &Catalog, name: &str, repopulate_view: bool) {
        if self.auto.contains_key(name) {
            let system = SystemRef::Auto(name.to_string());
            if repopulate_view && self.displayed.contains(&system) {
                self.view.repopulate(&system);
            }
            return;
        }

        let system = SystemRef::Custom(name.to_string());
        let Some(record) = self.custom.get(name) else {
            tracing::warn!("Cannot reload unknown collection {}", name);
            return;
        };
        if !record.is_filter() {
            return;
        }
        self.repopulate_collection(catalog, &system);

        let view_system = self.view_system(&system);
        if view_system == SystemRef::Bundle {
            self.rebuild_bundle_index();
        }
        if repopulate_view && (view_system == SystemRef::Bundle || self.displayed.contains(&system)) {
            self.view.repopulate(&view_system);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{RecordingView, TestEnvironment};
    use crate::read_flat;
    use emufront_config::CollectionSettings;
    use tempfile::TempDir;

    #[test]
    fn test_save_only_when_modified() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let mut catalog = env.scenario_catalog();
        let (view, _log) = RecordingView::new();
        let mut manager = env.manager(CollectionSettings::default(), view);
        manager.load_collection_systems(&catalog);
        manager.add_new_custom_collection("mine", CollectionKind::CustomFlat);

        assert!(!manager.save_custom_collection("mine").unwrap());
        assert!(matches!(
            manager.save_custom_collection("nope"),
            Err(CollectionError::UnknownCollection(_))
        ));

        manager.set_edit_mode(&catalog, "mine");
        let game = env.game(&catalog, "systemB", "game1.rom");
        manager.toggle_game_in_collection(&mut catalog, game);
        assert!(manager.save_custom_collection("mine").unwrap());
        assert!(!manager.custom_collections()["mine"].needs_save);

        let path = env.paths().custom_config_path("mine");
        let stored = read_flat(&path, env.home()).unwrap();
        assert_eq!(stored, vec![env.rom_path("systemB", "game1.rom").to_string_lossy().to_string()]);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("~/"));
    }

    #[test]
    fn test_create_and_delete_filter_collection() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let catalog = env.scenario_catalog();
        let (view, _log) = RecordingView::new();
        let mut manager = env.manager(CollectionSettings::default(), view);
        manager.load_collection_systems(&catalog);

        let definition = FilterDefinition {
            favorite: Some(true),
            ..Default::default()
        };
        manager.create_filter_collection("favs", definition.clone()).unwrap();
        assert!(matches!(
            manager.create_filter_collection("favs", definition),
            Err(CollectionError::AlreadyExists(_))
        ));
        assert!(env.paths().filter_path("favs").is_file());

        let system = SystemRef::Custom("favs".to_string());
        manager.populate_collection(&catalog, &system);
        assert_eq!(manager.collection(&system).unwrap().game_count(), 1);

        manager.settings_mut().custom = "favs,other".to_string();
        assert!(manager.delete_custom_collection("favs"));
        assert!(!env.paths().filter_path("favs").exists());
        assert!(!manager.is_custom_collection("favs"));
        assert_eq!(manager.settings().custom, "other");
        assert!(!manager.delete_custom_collection("favs"));
    }

    #[test]
    fn test_delete_exits_edit_mode() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let catalog = env.scenario_catalog();
        env.write_flat_collection("mine", &[env.rom_path("systemA", "game1.rom")]);
        let (view, _log) = RecordingView::new();
        let mut manager = env.manager(CollectionSettings::default(), view);
        manager.load_collection_systems(&catalog);

        assert!(manager.set_edit_mode(&catalog, "mine"));
        assert!(manager.delete_custom_collection("mine"));
        assert!(!manager.is_editing());
        assert!(!env.paths().custom_config_path("mine").exists());
    }

    #[test]
    fn test_reload_filter_collection() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let catalog = env.scenario_catalog();
        let (view, log) = RecordingView::new();
        let settings = CollectionSettings {
            custom: "picks".to_string(),
            use_custom_collections_system: false,
            ..Default::default()
        };
        let mut manager = env.manager(settings, view);
        manager.load_collection_systems(&catalog);
        manager
            .create_filter_collection("picks", FilterDefinition::default())
            .unwrap();
        manager.load_enabled_list_from_settings();
        manager.update_systems_list(&catalog);

        let system = SystemRef::Custom("picks".to_string());
        assert_eq!(manager.collection(&system).unwrap().game_count(), 2);

        let narrowed = CollectionFilter::from_definition(FilterDefinition {
            systems: vec!["systemA".to_string()],
            ..Default::default()
        });
        narrowed.save(&env.paths().filter_path("picks")).unwrap();

        manager.reload_collection(&catalog, "picks", true);
        assert_eq!(manager.collection(&system).unwrap().game_count(), 1);
        assert_eq!(log.lock().unwrap().repopulated, vec![system]);
    }

    #[test]
    fn test_reload_automatic_only_repopulates_view() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let catalog = env.scenario_catalog();
        let (view, log) = RecordingView::new();
        let settings = CollectionSettings {
            auto: "all".to_string(),
            ..Default::default()
        };
        let mut manager = env.manager(settings, view);
        manager.load_collection_systems(&catalog);

        manager.reload_collection(&catalog, "all", false);
        manager.reload_collection(&catalog, "favorites", true);
        assert!(log.lock().unwrap().repopulated.is_empty());

        manager.reload_collection(&catalog, "all", true);
        assert_eq!(
            log.lock().unwrap().repopulated,
            vec![SystemRef::Auto("all".to_string())]
        );
    }
}
