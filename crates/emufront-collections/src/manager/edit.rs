//! Edit mode and manual toggling of games

use super::CollectionSystemManager;
use crate::{ChangeKind, CollectionEntry, SystemRef, ViewTarget, remove_parenthesis};
use emufront_catalog::{Catalog, EntryId};
use std::time::Duration;

const EDIT_MODE_NOTICE: Duration = Duration::from_millis(10_000);
const TOGGLE_NOTICE: Duration = Duration::from_millis(4_000);

/// Collection named in notifications when no custom collection is edited
const DEFAULT_EDIT_TARGET: &str = "Favorites";

impl CollectionSystemManager {
    /// Start editing a custom collection, populating it first if needed
    pub fn set_edit_mode(&mut self, catalog: &Catalog, name: &str) -> bool {
        let Some(record) = self.custom.get(name) else {
            tracing::error!("Tried to edit a non-existing collection: {}", name);
            return false;
        };
        if record.is_filter() {
            tracing::error!("Tried to edit filter collection: {}", name);
            return false;
        }

        let system = SystemRef::Custom(name.to_string());
        self.populate_collection(catalog, &system);
        self.editing = Some(name.to_string());

        let message = format!(
            "Editing the '{}' Collection. Add/remove games with Y.",
            name.to_uppercase()
        );
        self.view.notify(&message, EDIT_MODE_NOTICE);
        tracing::info!("Editing collection {}", name);
        true
    }

    pub fn exit_edit_mode(&mut self) {
        let Some(name) = self.editing.take() else {
            return;
        };
        let message = format!("Finished editing the '{}' Collection.", name);
        self.view.notify(&message, TOGGLE_NOTICE);
        tracing::info!("Finished editing collection {}", name);
    }

    /// Add or remove a game from the edited collection, or flip its
    /// favorite flag when no collection is being edited.
    ///
    /// False for anything that is not a game.
    pub fn toggle_game_in_collection(&mut self, catalog: &mut Catalog, game: EntryId) -> bool {
        let Some(source) = catalog.game(game) else {
            return false;
        };
        let key = source.full_path();
        let game_name = remove_parenthesis(&source.name());

        let (adding, target) = match self.editing.clone() {
            Some(name) => match self.toggle_in_custom(catalog, game, &name, &key) {
                Some(adding) => (adding, name),
                None => return false,
            },
            None => match self.toggle_favorite(catalog, game) {
                Some(adding) => (adding, DEFAULT_EDIT_TARGET.to_string()),
                None => return false,
            },
        };

        let message = if adding {
            format!("Added '{}' to '{}'", game_name, target.to_uppercase())
        } else {
            format!("Removed '{}' from '{}'", game_name, target.to_uppercase())
        };
        self.view.notify(&message, TOGGLE_NOTICE);
        true
    }

    fn toggle_in_custom(
        &mut self,
        catalog: &Catalog,
        game: EntryId,
        name: &str,
        key: &str,
    ) -> Option<bool> {
        let system = SystemRef::Custom(name.to_string());
        self.populate_collection(catalog, &system);
        let view_system = self.view_system(&system);
        let bundled = view_system == SystemRef::Bundle;

        let Some(record) = self.custom.get_mut(name) else {
            tracing::error!("Edited collection {} no longer exists", name);
            self.editing = None;
            return None;
        };

        let adding = if record.system.remove_entry(key).is_some() {
            if bundled {
                self.bundle.system.index.remove(key);
            }
            if self.view.has_game_list_view(&view_system) {
                self.view.remove_entry(&view_system, key);
            }
            false
        } else {
            let entry = CollectionEntry::from_catalog(catalog, game)?;
            if bundled {
                self.bundle.system.index.add(&entry);
            }
            record.system.add_entry(entry);
            self.view.on_file_changed(
                ViewTarget::Entry {
                    system: view_system,
                    key: key.to_string(),
                },
                ChangeKind::MetadataChanged,
            );
            true
        };

        record.needs_save = true;
        record.system.sort_children();
        record.system.update_displayed_game_count();
        record.system.root.update_metadata();
        Some(adding)
    }

    fn toggle_favorite(&mut self, catalog: &mut Catalog, game: EntryId) -> Option<bool> {
        let adding = match catalog.toggle_favorite(game) {
            Ok(favorite) => favorite,
            Err(e) => {
                tracing::error!("Cannot toggle favorite on {}: {}", game, e);
                return None;
            }
        };

        self.save_to_recovery(catalog, game);
        self.refresh_collection_systems(catalog, game);
        self.view
            .on_file_changed(ViewTarget::Game(game), ChangeKind::MetadataChanged);
        Some(adding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{RecordingView, TestEnvironment};
    use crate::{CollectionKind, FilterDefinition, read_flat};
    use emufront_config::CollectionSettings;
    use tempfile::TempDir;

    #[test]
    fn test_edit_mode_notifications() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let catalog = env.scenario_catalog();
        let (view, log) = RecordingView::new();
        let mut manager = env.manager(CollectionSettings::default(), view);
        manager.load_collection_systems(&catalog);
        manager.add_new_custom_collection("myfaves", CollectionKind::CustomFlat);

        assert!(!manager.set_edit_mode(&catalog, "missing"));
        assert!(!manager.is_editing());

        assert!(manager.set_edit_mode(&catalog, "myfaves"));
        assert_eq!(manager.editing_collection(), Some("myfaves"));
        assert!(manager.custom_collections()["myfaves"].populated);

        manager.exit_edit_mode();
        assert!(!manager.is_editing());

        let log = log.lock().unwrap();
        assert_eq!(
            log.notifications,
            vec![
                (
                    "Editing the 'MYFAVES' Collection. Add/remove games with Y.".to_string(),
                    EDIT_MODE_NOTICE
                ),
                ("Finished editing the 'myfaves' Collection.".to_string(), TOGGLE_NOTICE),
            ]
        );
    }

    #[test]
    fn test_filter_collections_are_not_editable() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let catalog = env.scenario_catalog();
        let (view, _log) = RecordingView::new();
        let mut manager = env.manager(CollectionSettings::default(), view);
        manager.load_collection_systems(&catalog);
        manager
            .create_filter_collection("shmups", FilterDefinition::default())
            .unwrap();

        assert!(!manager.set_edit_mode(&catalog, "shmups"));
    }

    #[test]
    fn test_toggle_rejects_folders() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let mut catalog = env.scenario_catalog();
        let (view, log) = RecordingView::new();
        let mut manager = env.manager(CollectionSettings::default(), view);
        manager.load_collection_systems(&catalog);

        let system = catalog.system_by_name("systemA").unwrap();
        let root = catalog.system(system).unwrap().root;
        assert!(!manager.toggle_game_in_collection(&mut catalog, root));
        assert!(log.lock().unwrap().notifications.is_empty());
    }

    #[test]
    fn test_toggle_in_edited_collection() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let mut catalog = env.scenario_catalog();
        let (view, log) = RecordingView::new();
        let mut manager = env.manager(CollectionSettings::default(), view);
        manager.load_collection_systems(&catalog);
        manager.add_new_custom_collection("mine", CollectionKind::CustomFlat);
        manager.set_edit_mode(&catalog, "mine");

        let game = env.game(&catalog, "systemA", "game1.rom");
        assert!(manager.toggle_game_in_collection(&mut catalog, game));
        let record = &manager.custom_collections()["mine"];
        assert_eq!(record.system.game_count(), 1);
        assert!(record.needs_save);
        assert!(record.system.root.metadata.description.contains("1 game,"));

        assert!(manager.toggle_game_in_collection(&mut catalog, game));
        assert_eq!(manager.custom_collections()["mine"].system.game_count(), 0);
        assert!(!catalog.game(game).unwrap().metadata.favorite);

        let log = log.lock().unwrap();
        let messages: Vec<&str> = log.notifications.iter().map(|(m, _)| m.as_str()).collect();
        assert!(messages.contains(&"Added 'game1' to 'MINE'"));
        assert!(messages.contains(&"Removed 'game1' from 'MINE'"));
    }

    #[test]
    fn test_toggle_after_reload_keeps_existing_members() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let mut catalog = env.scenario_catalog();
        env.write_flat_collection("mine", &[env.rom_path("systemA", "game1.rom")]);
        let (view, _log) = RecordingView::new();
        let mut manager = env.manager(CollectionSettings::default(), view);
        manager.load_collection_systems(&catalog);
        assert!(manager.set_edit_mode(&catalog, "mine"));

        manager.load_collection_systems(&catalog);
        assert_eq!(manager.editing_collection(), Some("mine"));
        assert!(!manager.custom_collections()["mine"].populated);

        let game = env.game(&catalog, "systemB", "game1.rom");
        assert!(manager.toggle_game_in_collection(&mut catalog, game));
        assert_eq!(manager.custom_collections()["mine"].system.game_count(), 2);

        assert!(manager.save_custom_collection("mine").unwrap());
        let stored = read_flat(&env.paths().custom_config_path("mine"), env.home()).unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn test_reload_exits_edit_mode_for_vanished_collection() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let catalog = env.scenario_catalog();
        env.write_flat_collection("mine", &[env.rom_path("systemA", "game1.rom")]);
        let (view, _log) = RecordingView::new();
        let mut manager = env.manager(CollectionSettings::default(), view);
        manager.load_collection_systems(&catalog);
        assert!(manager.set_edit_mode(&catalog, "mine"));

        std::fs::remove_file(env.paths().custom_config_path("mine")).unwrap();
        manager.load_collection_systems(&catalog);
        assert!(!manager.is_editing());
        assert!(!manager.is_custom_collection("mine"));
    }
}
