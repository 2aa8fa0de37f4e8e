//! In-memory game catalog

use crate::{
    CatalogError, EntryId, FileEntry, FolderEntry, GameEntry, GameMetadata, PlaceholderEntry,
    PlatformId, SystemData, SystemId, SystemMetadata,
};
use std::collections::HashMap;
use std::path::PathBuf;

/// Owns every real system and file entry.
///
/// Entries live in an arena addressed by [`EntryId`]. Removing an entry
/// leaves a hole so ids held elsewhere resolve to `None` instead of to a
/// different entry.
#[derive(Debug, Default)]
pub struct Catalog {
    systems: Vec<SystemData>,
    entries: Vec<Option<FileEntry>>,
    by_path: HashMap<String, EntryId>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a game system with an empty root folder at `root_path`
    pub fn add_system(
        &mut self,
        metadata: SystemMetadata,
        platforms: Vec<PlatformId>,
        root_path: impl Into<PathBuf>,
    ) -> SystemId {
        let id = SystemId(self.systems.len());
        let root = self.push_entry(FileEntry::Folder(FolderEntry {
            path: root_path.into(),
            system: id,
            children: Vec::new(),
        }));

        self.systems.push(SystemData {
            metadata,
            platforms,
            root,
            is_game_system: true,
            is_group: false,
        });
        id
    }

    /// Add a game under `parent` (the system root when `None`)
    pub fn add_game(
        &mut self,
        system: SystemId,
        parent: Option<EntryId>,
        path: impl Into<PathBuf>,
        metadata: GameMetadata,
    ) -> Result<EntryId, CatalogError> {
        let path = path.into();
        self.add_child(
            system,
            parent,
            FileEntry::Game(GameEntry {
                path,
                system,
                metadata,
            }),
        )
    }

    pub fn add_folder(
        &mut self,
        system: SystemId,
        parent: Option<EntryId>,
        path: impl Into<PathBuf>,
    ) -> Result<EntryId, CatalogError> {
        self.add_child(
            system,
            parent,
            FileEntry::Folder(FolderEntry {
                path: path.into(),
                system,
                children: Vec::new(),
            }),
        )
    }

    pub fn add_placeholder(
        &mut self,
        system: SystemId,
        parent: Option<EntryId>,
        path: impl Into<PathBuf>,
        label: impl Into<String>,
    ) -> Result<EntryId, CatalogError> {
        self.add_child(
            system,
            parent,
            FileEntry::Placeholder(PlaceholderEntry {
                path: path.into(),
                system,
                label: label.into(),
            }),
        )
    }

    fn add_child(
        &mut self,
        system: SystemId,
        parent: Option<EntryId>,
        entry: FileEntry,
    ) -> Result<EntryId, CatalogError> {
        let parent = match parent {
            Some(parent) => parent,
            None => {
                self.system(system)
                    .ok_or_else(|| CatalogError::SystemNotFound(system.to_string()))?
                    .root
            }
        };

        let key = entry.full_path();
        if self.by_path.contains_key(&key) {
            return Err(CatalogError::DuplicatePath(key));
        }

        match self.entries.get(parent.0).and_then(Option::as_ref) {
            Some(FileEntry::Folder(_)) => {}
            Some(_) => return Err(CatalogError::NotAFolder(parent)),
            None => return Err(CatalogError::EntryNotFound(parent)),
        }

        let id = self.push_entry(entry);
        if let Some(Some(FileEntry::Folder(folder))) = self.entries.get_mut(parent.0) {
            folder.children.push(id);
        }
        Ok(id)
    }

    fn push_entry(&mut self, entry: FileEntry) -> EntryId {
        let id = EntryId(self.entries.len());
        self.by_path.insert(entry.full_path(), id);
        self.entries.push(Some(entry));
        id
    }

    /// Remove an entry (and, for folders, everything below it)
    pub fn remove_entry(&mut self, id: EntryId) -> Result<FileEntry, CatalogError> {
        let entry = self
            .entries
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(CatalogError::EntryNotFound(id))?;

        self.by_path.remove(&entry.full_path());
        for slot in self.entries.iter_mut().flatten() {
            if let FileEntry::Folder(folder) = slot {
                folder.children.retain(|child| *child != id);
            }
        }

        if let FileEntry::Folder(folder) = &entry {
            for child in folder.children.clone() {
                if let Err(e) = self.remove_entry(child) {
                    tracing::warn!("Failed to remove child {} of {}: {}", child, id, e);
                }
            }
        }

        Ok(entry)
    }

    pub fn systems(&self) -> impl Iterator<Item = (SystemId, &SystemData)> {
        self.systems
            .iter()
            .enumerate()
            .map(|(i, system)| (SystemId(i), system))
    }

    pub fn system(&self, id: SystemId) -> Option<&SystemData> {
        self.systems.get(id.0)
    }

    pub fn system_mut(&mut self, id: SystemId) -> Option<&mut SystemData> {
        self.systems.get_mut(id.0)
    }

    pub fn system_by_name(&self, name: &str) -> Option<SystemId> {
        self.systems
            .iter()
            .position(|s| s.name() == name)
            .map(SystemId)
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn entry(&self, id: EntryId) -> Option<&FileEntry> {
        self.entries.get(id.0).and_then(Option::as_ref)
    }

    pub fn game(&self, id: EntryId) -> Option<&GameEntry> {
        self.entry(id).and_then(FileEntry::as_game)
    }

    pub fn game_mut(&mut self, id: EntryId) -> Option<&mut GameEntry> {
        self.entries
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .and_then(FileEntry::as_game_mut)
    }

    /// System owning the entry
    pub fn system_of(&self, id: EntryId) -> Option<&SystemData> {
        self.entry(id).and_then(|e| self.system(e.system()))
    }

    pub fn find_by_path(&self, path: &str) -> Option<EntryId> {
        self.by_path.get(path).copied()
    }

    /// Every game below the system root, depth first in child order
    pub fn games_recursive(&self, system: SystemId) -> Vec<EntryId> {
        let mut games = Vec::new();
        if let Some(root) = self.system(system).map(|s| s.root) {
            self.collect_games(root, &mut games);
        }
        games
    }

    fn collect_games(&self, folder: EntryId, games: &mut Vec<EntryId>) {
        let Some(FileEntry::Folder(folder)) = self.entry(folder) else {
            return;
        };
        for child in &folder.children {
            match self.entry(*child) {
                Some(FileEntry::Game(_)) => games.push(*child),
                Some(FileEntry::Folder(_)) => self.collect_games(*child, games),
                _ => {}
            }
        }
    }

    /// Total number of games across all systems
    pub fn game_count(&self) -> usize {
        self.entries
            .iter()
            .flatten()
            .filter(|e| matches!(e, FileEntry::Game(_)))
            .count()
    }

    pub fn set_favorite(&mut self, id: EntryId, favorite: bool) -> Result<(), CatalogError> {
        let game = self.game_mut(id).ok_or(CatalogError::NotAGame(id))?;
        game.metadata.favorite = favorite;
        Ok(())
    }

    /// Flip the favorite flag, returning the new value
    pub fn toggle_favorite(&mut self, id: EntryId) -> Result<bool, CatalogError> {
        let game = self.game_mut(id).ok_or(CatalogError::NotAGame(id))?;
        Ok(game.metadata.toggle_favorite())
    }

    /// Record the end of a play session at `timestamp`
    pub fn record_play(&mut self, id: EntryId, timestamp: i64) -> Result<(), CatalogError> {
        let game = self.game_mut(id).ok_or(CatalogError::NotAGame(id))?;
        game.metadata.record_play(timestamp);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with_snes() -> (Catalog, SystemId) {
        let mut catalog = Catalog::new();
        let snes = catalog.add_system(
            SystemMetadata::named("snes"),
            PlatformId::for_system("snes"),
            "/roms/snes",
        );
        (catalog, snes)
    }

    #[test]
    fn test_add_and_find_games() {
        let (mut catalog, snes) = catalog_with_snes();

        let game = catalog
            .add_game(snes, None, "/roms/snes/mario.sfc", GameMetadata::new())
            .unwrap();
        let folder = catalog.add_folder(snes, None, "/roms/snes/hacks").unwrap();
        let nested = catalog
            .add_game(snes, Some(folder), "/roms/snes/hacks/kaizo.sfc", GameMetadata::new())
            .unwrap();
        catalog
            .add_placeholder(snes, None, "/roms/snes/disc2", "Disc 2")
            .unwrap();

        assert_eq!(catalog.find_by_path("/roms/snes/mario.sfc"), Some(game));
        assert_eq!(catalog.games_recursive(snes), vec![game, nested]);
        assert_eq!(catalog.game_count(), 2);
        assert_eq!(catalog.system_of(nested).unwrap().name(), "snes");
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let (mut catalog, snes) = catalog_with_snes();
        catalog
            .add_game(snes, None, "/roms/snes/mario.sfc", GameMetadata::new())
            .unwrap();

        let err = catalog
            .add_game(snes, None, "/roms/snes/mario.sfc", GameMetadata::new())
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicatePath(_)));
    }

    #[test]
    fn test_remove_entry_leaves_hole() {
        let (mut catalog, snes) = catalog_with_snes();
        let a = catalog
            .add_game(snes, None, "/roms/snes/a.sfc", GameMetadata::new())
            .unwrap();
        let b = catalog
            .add_game(snes, None, "/roms/snes/b.sfc", GameMetadata::new())
            .unwrap();

        catalog.remove_entry(a).unwrap();

        assert!(catalog.game(a).is_none());
        assert!(catalog.find_by_path("/roms/snes/a.sfc").is_none());
        assert_eq!(catalog.games_recursive(snes), vec![b]);
        assert!(matches!(
            catalog.remove_entry(a),
            Err(CatalogError::EntryNotFound(_))
        ));
    }

    #[test]
    fn test_remove_folder_removes_children() {
        let (mut catalog, snes) = catalog_with_snes();
        let hacks = catalog.add_folder(snes, None, "/roms/snes/hacks").unwrap();
        let nested = catalog
            .add_game(snes, Some(hacks), "/roms/snes/hacks/x.sfc", GameMetadata::new())
            .unwrap();
        let top = catalog
            .add_game(snes, None, "/roms/snes/top.sfc", GameMetadata::new())
            .unwrap();

        catalog.remove_entry(hacks).unwrap();

        assert!(catalog.game(nested).is_none());
        assert!(catalog.find_by_path("/roms/snes/hacks/x.sfc").is_none());
        assert_eq!(catalog.games_recursive(snes), vec![top]);
    }

    #[test]
    fn test_metadata_mutations() {
        let (mut catalog, snes) = catalog_with_snes();
        let game = catalog
            .add_game(snes, None, "/roms/snes/a.sfc", GameMetadata::new())
            .unwrap();

        assert!(catalog.toggle_favorite(game).unwrap());
        catalog.record_play(game, 42).unwrap();

        let meta = &catalog.game(game).unwrap().metadata;
        assert!(meta.favorite);
        assert_eq!(meta.play_count, 1);
        assert_eq!(meta.last_played, Some(42));

        let root = catalog.system(snes).unwrap().root;
        assert!(matches!(
            catalog.set_favorite(root, true),
            Err(CatalogError::NotAGame(_))
        ));
    }
}
