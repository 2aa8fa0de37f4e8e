//! Computing collection membership from the catalog

use super::CollectionSystemManager;
use crate::{
    CollectionEntry, CollectionError, CollectionKind, LAST_PLAYED_MAX, PopulateStatus, SystemRef,
    ViewBinding, players_include, read_flat,
};
use emufront_catalog::{Catalog, EntryId, GameMetadata, PlatformId, SystemData};
use std::collections::HashMap;

/// Game names that never appear in automatic collections
const EXCLUDED_GAME_NAMES: &[&str] = &["kodi"];

/// Whether a catalog game may appear in automatic collections at all
pub(crate) fn include_in_auto_collections(catalog: &Catalog, game: EntryId) -> bool {
    let Some(entry) = catalog.game(game) else {
        return false;
    };
    let Some(system) = catalog.system(entry.system) else {
        return false;
    };

    !EXCLUDED_GAME_NAMES.contains(&entry.name().as_str())
        && system.is_game_system
        && !system.has_platform(PlatformId::Ignore)
}

/// Kind-specific membership test
pub(crate) fn matches_kind(
    kind: CollectionKind,
    system: &SystemData,
    metadata: &GameMetadata,
    theme_folder: &str,
) -> bool {
    match kind {
        CollectionKind::AllGames => true,
        CollectionKind::LastPlayed => metadata.play_count > 0,
        CollectionKind::NeverPlayed => metadata.play_count == 0,
        CollectionKind::Favorites => metadata.favorite,
        CollectionKind::Arcade => system.is_arcade(),
        CollectionKind::At2Players => players_include(metadata.players.as_deref(), 2),
        CollectionKind::At4Players => players_include(metadata.players.as_deref(), 4),
        CollectionKind::ArcadePlatform(_) => {
            system.is_arcade() && metadata.arcade_system_name.as_deref() == Some(theme_folder)
        }
        CollectionKind::CustomFlat | CollectionKind::CustomFilter => false,
    }
}

/// Drop evicted entries from a live game list view
pub(crate) fn evict_from_view(
    view: &mut dyn ViewBinding,
    system: &SystemRef,
    evicted: &[CollectionEntry],
) {
    if evicted.is_empty() || !view.has_game_list_view(system) {
        return;
    }
    for entry in evicted {
        view.remove_entry(system, &entry.key);
    }
}

impl CollectionSystemManager {
    /// Compute a collection's membership the first time it is needed.
    ///
    /// `None` when no such collection exists or it is already populated.
    pub fn populate_collection(
        &mut self,
        catalog: &Catalog,
        system: &SystemRef,
    ) -> Option<PopulateStatus> {
        if self.record(system)?.populated {
            return None;
        }
        self.compute_membership(catalog, system)
    }

    /// Recompute a collection from scratch. Unsaved edits of a flat
    /// collection are written first; the collection is left as is when
    /// that fails.
    pub fn repopulate_collection(
        &mut self,
        catalog: &Catalog,
        system: &SystemRef,
    ) -> Option<PopulateStatus> {
        self.record(system)?;
        if let SystemRef::Custom(name) = system
            && let Err(e) = self.save_custom_collection(name)
        {
            tracing::error!("Not repopulating {}, pending edits were not saved: {}", name, e);
            return None;
        }

        self.record_mut(system)?.populated = false;
        self.compute_membership(catalog, system)
    }

    fn compute_membership(
        &mut self,
        catalog: &Catalog,
        system: &SystemRef,
    ) -> Option<PopulateStatus> {
        let kind = self.record(system)?.decl.kind;
        let status = match (system, kind) {
            (SystemRef::Custom(name), CollectionKind::CustomFilter) => {
                self.populate_custom_filter(catalog, name)
            }
            (SystemRef::Custom(name), _) => self.populate_custom_flat(catalog, name),
            (SystemRef::Auto(name), _) => self.populate_automatic(catalog, name),
            _ => return None,
        };

        match status {
            PopulateStatus::Ok => tracing::debug!("Populated {}", system),
            other => tracing::info!("Populated {}: {:?}", system, other),
        }
        Some(status)
    }

    fn populate_automatic(&mut self, catalog: &Catalog, name: &str) -> PopulateStatus {
        let Some(record) = self.auto.get(name) else {
            return PopulateStatus::ConfigMissing;
        };
        let kind = record.decl.kind;
        let theme_folder = record.decl.theme_folder.clone();

        let mut entries = Vec::new();
        for (id, system) in catalog.systems() {
            if system.is_group {
                continue;
            }
            let hidden = self.hidden_extensions.get(system.name());

            for game_id in catalog.games_recursive(id) {
                let Some(game) = catalog.game(game_id) else {
                    continue;
                };
                if kind != CollectionKind::Favorites
                    && let Some(hidden) = hidden
                    && hidden.contains(&game.extension())
                {
                    continue;
                }
                if !include_in_auto_collections(catalog, game_id) {
                    continue;
                }
                if matches_kind(kind, system, &game.metadata, &theme_folder)
                    && let Some(entry) = CollectionEntry::from_catalog(catalog, game_id)
                {
                    entries.push(entry);
                }
            }
        }

        let system_ref = SystemRef::Auto(name.to_string());
        let Some(record) = self.auto.get_mut(name) else {
            return PopulateStatus::ConfigMissing;
        };
        record.system.clear();
        for entry in entries {
            record.system.add_entry(entry);
        }

        let evicted = if kind == CollectionKind::LastPlayed {
            record.system.sort_and_trim(LAST_PLAYED_MAX)
        } else {
            record.system.sort_children();
            Vec::new()
        };
        record.system.update_displayed_game_count();
        record.populated = true;

        evict_from_view(&mut *self.view, &system_ref, &evicted);
        PopulateStatus::Ok
    }

    /// Full path to game id of every All Games member
    fn all_games_by_path(&mut self, catalog: &Catalog) -> HashMap<String, EntryId> {
        self.populate_collection(catalog, &SystemRef::Auto("all".to_string()));
        self.auto
            .get("all")
            .map(|r| {
                r.system
                    .root
                    .children()
                    .iter()
                    .map(|e| (e.key.clone(), e.game))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn populate_custom_flat(&mut self, catalog: &Catalog, name: &str) -> PopulateStatus {
        let all_games = self.all_games_by_path(catalog);
        let path = self.paths.custom_config_path(name);

        let lines = match read_flat(&path, &self.paths.home_dir) {
            Ok(lines) => Some(lines),
            Err(CollectionError::NotFound(_)) => {
                tracing::info!("Couldn't find custom collection config file at {}", path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        };

        let Some(record) = self.custom.get_mut(name) else {
            return PopulateStatus::ConfigMissing;
        };
        record.system.clear();
        record.populated = true;

        let status = match lines {
            None => PopulateStatus::ConfigMissing,
            Some(lines) => {
                let mut missed = 0;
                for key in lines {
                    match all_games
                        .get(&key)
                        .and_then(|id| CollectionEntry::from_catalog(catalog, *id))
                    {
                        Some(entry) => {
                            record.system.add_entry(entry);
                        }
                        None => {
                            missed += 1;
                            tracing::info!(
                                "Couldn't find game referenced at '{}' for collection '{}'",
                                key,
                                name
                            );
                        }
                    }
                }
                if missed > 0 {
                    PopulateStatus::PartialMiss { missed }
                } else {
                    PopulateStatus::Ok
                }
            }
        };

        record.system.sort_children();
        record.system.update_displayed_game_count();
        record.system.root.update_metadata();
        status
    }

    fn populate_custom_filter(&mut self, catalog: &Catalog, name: &str) -> PopulateStatus {
        self.populate_collection(catalog, &SystemRef::Auto("all".to_string()));
        let all_games: Vec<CollectionEntry> = self
            .auto
            .get("all")
            .map(|r| r.system.root.children().to_vec())
            .unwrap_or_default();
        let path = self.paths.filter_path(name);

        let Some(record) = self.custom.get_mut(name) else {
            return PopulateStatus::ConfigMissing;
        };
        record.system.clear();
        record.populated = true;

        let Some(filter) = record.filter.as_mut() else {
            tracing::error!("Collection '{}' has no filter", name);
            return PopulateStatus::Malformed;
        };
        filter.reset_index();

        let status = match filter.load(&path) {
            Ok(()) => {
                for entry in &all_games {
                    if filter.is_system_selected(&entry.system_name) {
                        filter.add_to_index(entry);
                    }
                    if filter.show_file(entry) {
                        record.system.add_entry(entry.clone());
                    }
                }
                PopulateStatus::Ok
            }
            Err(CollectionError::NotFound(_)) => {
                tracing::info!("Couldn't find filter collection file at {}", path.display());
                PopulateStatus::ConfigMissing
            }
            Err(e) => {
                tracing::warn!("Malformed filter collection {}: {}", path.display(), e);
                PopulateStatus::Malformed
            }
        };

        record.system.sort_children();
        record.system.update_displayed_game_count();
        record.system.root.update_metadata();
        status
    }
}
