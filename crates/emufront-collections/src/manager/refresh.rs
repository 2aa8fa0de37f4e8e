//! Keeping populated collections in sync with catalog metadata

use super::populate::{evict_from_view, include_in_auto_collections};
use super::{CollectionSystemManager, record_in};
use crate::{ChangeKind, CollectionEntry, CollectionKind, LAST_PLAYED_MAX, SystemRef, ViewTarget};
use emufront_catalog::{Catalog, EntryId};

impl CollectionSystemManager {
    /// Re-evaluate every populated collection after `game`'s metadata changed.
    ///
    /// Unpopulated collections pick the change up when first populated.
    /// Only last played and favorites gain members here; the other
    /// automatic kinds only change on repopulation.
    pub fn refresh_collection_systems(&mut self, catalog: &Catalog, game: EntryId) {
        let Some(entry) = catalog.game(game) else {
            return;
        };
        if !catalog.system(entry.system).is_some_and(|s| s.is_game_system) {
            return;
        }

        let targets: Vec<SystemRef> = self
            .auto
            .iter()
            .filter(|(_, r)| r.populated)
            .map(|(name, _)| SystemRef::Auto(name.clone()))
            .chain(
                self.custom
                    .iter()
                    .filter(|(_, r)| r.populated)
                    .map(|(name, _)| SystemRef::Custom(name.clone())),
            )
            .collect();

        for system in targets {
            self.update_collection_system(catalog, game, &system);
        }
    }

    /// Bring one populated collection up to date with `game`
    pub fn update_collection_system(&mut self, catalog: &Catalog, game: EntryId, system: &SystemRef) {
        let Some(source) = catalog.game(game) else {
            return;
        };
        let key = source.full_path();
        let view_system = self.view_system(system);

        let Some(record) = record_in(&mut self.auto, &mut self.custom, system) else {
            return;
        };
        if !record.populated {
            return;
        }
        let kind = record.decl.kind;
        let view = &mut *self.view;
        let entry_target = ViewTarget::Entry {
            system: view_system.clone(),
            key: key.clone(),
        };

        if record.system.contains(&key) {
            record.system.index.remove(&key);
            if let Some(entry) = record.system.root.find_mut(&key) {
                entry.refresh_metadata(catalog);
            }

            if kind == CollectionKind::Favorites && !source.metadata.favorite {
                record.system.remove_entry(&key);
                if view.has_game_list_view(&view_system) {
                    view.remove_entry(&view_system, &key);
                }
                view.on_file_changed(ViewTarget::Game(game), ChangeKind::MetadataChanged);
                view.on_file_changed(entry_target, ChangeKind::MetadataChanged);
            } else {
                if let Some(entry) = record.system.root.find(&key) {
                    record.system.index.add(entry);
                }
                view.on_file_changed(entry_target, ChangeKind::MetadataChanged);
            }
        } else {
            let qualifies = match kind {
                CollectionKind::LastPlayed => {
                    source.metadata.play_count > 0 && include_in_auto_collections(catalog, game)
                }
                CollectionKind::Favorites => source.metadata.favorite,
                _ => false,
            };
            if qualifies && let Some(entry) = CollectionEntry::from_catalog(catalog, game) {
                record.system.add_entry(entry);
                view.on_file_changed(ViewTarget::Game(game), ChangeKind::MetadataChanged);
                view.on_file_changed(entry_target, ChangeKind::MetadataChanged);
            }
        }

        record.system.update_displayed_game_count();

        let root = ViewTarget::Root(view_system.clone());
        if kind == CollectionKind::LastPlayed {
            let evicted = record.system.sort_and_trim(LAST_PLAYED_MAX);
            evict_from_view(view, &view_system, &evicted);
            record.system.update_displayed_game_count();
            view.on_file_changed(root, ChangeKind::MetadataChanged);
        } else {
            record.system.sort_children();
            view.on_file_changed(root, ChangeKind::Sorted);
        }
    }

    /// Remove a game from every populated collection, e.g. before its file
    /// is deleted. Call while the game is still in the catalog.
    pub fn delete_collection_files(&mut self, catalog: &Catalog, game: EntryId) {
        let Some(source) = catalog.game(game) else {
            return;
        };
        let key = source.full_path();

        let targets: Vec<SystemRef> = self
            .auto
            .iter()
            .filter(|(_, r)| r.populated && r.system.contains(&key))
            .map(|(name, _)| SystemRef::Auto(name.clone()))
            .chain(
                self.custom
                    .iter()
                    .filter(|(_, r)| r.populated && r.system.contains(&key))
                    .map(|(name, _)| SystemRef::Custom(name.clone())),
            )
            .collect();

        let removed_any = !targets.is_empty();
        for system in targets {
            let view_system = self.view_system(&system);
            let in_bundle = view_system == SystemRef::Bundle;
            if let Some(record) = record_in(&mut self.auto, &mut self.custom, &system) {
                record.needs_save = true;
                record.system.remove_entry(&key);
                record.system.update_displayed_game_count();
                record.system.root.update_metadata();
            }
            if in_bundle {
                self.bundle.system.index.remove(&key);
            }
            if self.view.has_game_list_view(&view_system) {
                self.view.remove_entry(&view_system, &key);
            }
            tracing::debug!("Removed {} from {}", key, system);
        }

        if removed_any {
            self.view
                .on_file_changed(ViewTarget::Game(game), ChangeKind::Removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{RecordingView, TestEnvironment};
    use emufront_config::CollectionSettings;
    use tempfile::TempDir;

    #[test]
    fn test_refresh_skips_unpopulated() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let mut catalog = env.scenario_catalog();
        let (view, log) = RecordingView::new();
        let mut manager = env.manager(CollectionSettings::default(), view);
        manager.load_collection_systems(&catalog);

        let game = env.game(&catalog, "systemA", "game1.rom");
        catalog.set_favorite(game, true).unwrap();
        manager.refresh_collection_systems(&catalog, game);

        assert!(!manager.auto_collections()["favorites"].populated);
        assert!(log.lock().unwrap().changes.is_empty());
    }

    #[test]
    fn test_metadata_change_reindexes_existing_entry() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let mut catalog = env.scenario_catalog();
        let (view, log) = RecordingView::new();
        let mut manager = env.manager(CollectionSettings::default(), view);
        manager.load_collection_systems(&catalog);
        manager.all_games_collection(&catalog);

        let game = env.game(&catalog, "systemA", "game1.rom");
        catalog.game_mut(game).unwrap().metadata.genre = Some("Puzzle".to_string());
        manager.refresh_collection_systems(&catalog, game);

        let all = manager.all_games_collection(&catalog).unwrap();
        let key = catalog.game(game).unwrap().full_path();
        assert_eq!(all.root.find(&key).unwrap().metadata.genre.as_deref(), Some("Puzzle"));
        assert_eq!(all.index.count(crate::Facet::Genre, "Puzzle"), 1);

        let log = log.lock().unwrap();
        let all_ref = SystemRef::Auto("all".to_string());
        assert!(log.changes.contains(&(
            ViewTarget::Entry { system: all_ref.clone(), key },
            ChangeKind::MetadataChanged
        )));
        assert_eq!(
            log.changes.last(),
            Some(&(ViewTarget::Root(all_ref), ChangeKind::Sorted))
        );
    }

    #[test]
    fn test_delete_collection_files() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let catalog = env.scenario_catalog();
        let (view, log) = RecordingView::new();
        let all_ref = SystemRef::Auto("all".to_string());
        log.lock().unwrap().live_views.insert(all_ref.clone());
        let mut manager = env.manager(CollectionSettings::default(), view);
        manager.load_collection_systems(&catalog);
        manager.all_games_collection(&catalog);

        let game = env.game(&catalog, "systemB", "game1.rom");
        manager.delete_collection_files(&catalog, game);

        let record = &manager.auto_collections()["all"];
        assert_eq!(record.system.game_count(), 1);
        assert!(record.needs_save);
        let log = log.lock().unwrap();
        assert_eq!(log.removed_entries.len(), 1);
        assert_eq!(log.changes, vec![(ViewTarget::Game(game), ChangeKind::Removed)]);
    }
}
