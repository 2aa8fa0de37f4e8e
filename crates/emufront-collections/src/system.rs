//! Synthesized systems and the entries they hold

use crate::{CollectionDeclaration, SearchIndex, SortOrder};
use emufront_catalog::{Catalog, EntryId, GameMetadata, SystemMetadata};
use rand::seq::SliceRandom;
use std::cmp::Ordering;

/// Manufacturer reported by every synthesized system
pub const COLLECTIONS_MANUFACTURER: &str = "Collections";
pub const AUTO_HARDWARE_TYPE: &str = "auto collection";
pub const CUSTOM_HARDWARE_TYPE: &str = "custom collection";

/// Number of member names quoted in a collection description
const DESCRIPTION_SAMPLE: usize = 4;

/// Reference to a catalog game placed inside a collection.
///
/// The catalog owns the game. Dropping an entry never touches it, and a
/// removed game simply stops resolving through `game`.
#[derive(Debug, Clone)]
pub struct CollectionEntry {
    pub game: EntryId,
    /// Full path of the game, the identity key
    pub key: String,
    pub name: String,
    pub system_name: String,
    /// Snapshot of the game's metadata at the last refresh
    pub metadata: GameMetadata,
}

impl CollectionEntry {
    /// Wrap a catalog game, `None` if the id is not a live game
    pub fn from_catalog(catalog: &Catalog, game: EntryId) -> Option<Self> {
        let entry = catalog.game(game)?;
        let system_name = catalog
            .system(entry.system)
            .map(|s| s.name().to_string())
            .unwrap_or_default();

        Some(Self {
            game,
            key: entry.full_path(),
            name: entry.name(),
            system_name,
            metadata: entry.metadata.clone(),
        })
    }

    /// Copy the current catalog metadata. False when the game is gone.
    pub fn refresh_metadata(&mut self, catalog: &Catalog) -> bool {
        match catalog.game(self.game) {
            Some(game) => {
                self.name = game.name();
                self.metadata = game.metadata.clone();
                true
            }
            None => false,
        }
    }
}

/// Aggregated metadata shown on a collection's tile
#[derive(Debug, Clone, PartialEq)]
pub struct FolderMetadata {
    pub description: String,
    pub rating: f32,
    pub players: String,
    pub release_date: String,
    pub developer: String,
    pub genre: String,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub video: Option<String>,
}

impl Default for FolderMetadata {
    fn default() -> Self {
        Self {
            description: "This collection is empty.".to_string(),
            rating: 0.0,
            players: "1".to_string(),
            release_date: "N/A".to_string(),
            developer: "None".to_string(),
            genre: "None".to_string(),
            image: None,
            thumbnail: None,
            video: None,
        }
    }
}

/// Ordered list of entries at the root of a synthesized system
#[derive(Debug, Clone, Default)]
pub struct CollectionFolder {
    pub metadata: FolderMetadata,
    children: Vec<CollectionEntry>,
}

impl CollectionFolder {
    pub fn children(&self) -> &[CollectionEntry] {
        &self.children
    }

    pub fn find(&self, key: &str) -> Option<&CollectionEntry> {
        self.children.iter().find(|e| e.key == key)
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut CollectionEntry> {
        self.children.iter_mut().find(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|e| e.key.as_str())
    }

    fn push(&mut self, entry: CollectionEntry) {
        self.children.push(entry);
    }

    fn remove(&mut self, key: &str) -> Option<CollectionEntry> {
        let pos = self.children.iter().position(|e| e.key == key)?;
        Some(self.children.remove(pos))
    }

    fn clear(&mut self) {
        self.children.clear();
    }

    fn sort(&mut self, order: SortOrder) {
        self.children.sort_by(|a, b| compare_entries(a, b, order));
    }

    /// Recompute the tile metadata from the current children
    pub fn update_metadata(&mut self) {
        let mut md = FolderMetadata::default();

        if !self.children.is_empty() {
            let mut developer: Option<String> = None;
            let mut genre: Option<String> = None;
            let mut names = String::new();

            for entry in self.children.iter().take(DESCRIPTION_SAMPLE) {
                let game = &entry.metadata;
                if let Some(rating) = game.rating
                    && rating > md.rating
                {
                    md.rating = rating;
                }
                if let Some(players) = game.players.as_deref().filter(|p| !p.is_empty())
                    && players > md.players.as_str()
                {
                    md.players = players.to_string();
                }
                if let Some(date) = game.release_date.as_deref().filter(|d| !d.is_empty())
                    && date < md.release_date.as_str()
                {
                    md.release_date = date.to_string();
                }
                developer = Some(collapse(developer, game.developer.as_deref()));
                genre = Some(collapse(genre, game.genre.as_deref()));

                names.push_str("\n- ");
                names.push_str(&entry.name);
            }

            let count = self.children.len();
            let noun = if count == 1 { "game" } else { "games" };
            md.description = format!("This collection contains {} {}, including :{}", count, noun, names);
            md.developer = developer.unwrap_or(md.developer);
            md.genre = genre.unwrap_or(md.genre);

            if let Some(random) = self.children.choose(&mut rand::thread_rng()) {
                md.image = random.metadata.image.clone();
                md.thumbnail = random.metadata.thumbnail.clone();
                md.video = random.metadata.video.clone();
            }
        }

        self.metadata = md;
    }
}

/// Keep a shared value, or "Various" once two members disagree
fn collapse(current: Option<String>, next: Option<&str>) -> String {
    let next = next.unwrap_or_default();
    match current {
        None => next.to_string(),
        Some(current) if current == next => current,
        Some(_) => "Various".to_string(),
    }
}

fn compare_entries(a: &CollectionEntry, b: &CollectionEntry, order: SortOrder) -> Ordering {
    let by_name = || a.name.to_lowercase().cmp(&b.name.to_lowercase());
    match order {
        SortOrder::FilenameAscending => by_name(),
        SortOrder::LastPlayedAscending => a
            .metadata
            .last_played
            .cmp(&b.metadata.last_played)
            .then_with(by_name),
        // Never played sorts last
        SortOrder::LastPlayedDescending => b
            .metadata
            .last_played
            .cmp(&a.metadata.last_played)
            .then_with(by_name),
    }
}

/// A virtual system built from catalog games
#[derive(Debug, Clone)]
pub struct SynthesizedSystem {
    pub metadata: SystemMetadata,
    pub root: CollectionFolder,
    pub index: SearchIndex,
    pub sort: SortOrder,
    displayed_game_count: usize,
}

impl SynthesizedSystem {
    pub fn new(decl: &CollectionDeclaration) -> Self {
        let hardware_type = if decl.is_custom {
            CUSTOM_HARDWARE_TYPE
        } else {
            AUTO_HARDWARE_TYPE
        };

        Self {
            metadata: SystemMetadata {
                name: decl.short_name.clone(),
                full_name: decl.display_name.clone(),
                theme_folder: decl.theme_folder.clone(),
                manufacturer: COLLECTIONS_MANUFACTURER.to_string(),
                hardware_type: hardware_type.to_string(),
                release_year: 0,
            },
            root: CollectionFolder::default(),
            index: SearchIndex::new(),
            sort: decl.default_sort,
            displayed_game_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn contains(&self, key: &str) -> bool {
        self.root.find(key).is_some()
    }

    pub fn game_count(&self) -> usize {
        self.root.len()
    }

    /// Add and index an entry. An existing entry with the same key is kept.
    pub fn add_entry(&mut self, entry: CollectionEntry) -> bool {
        if self.contains(&entry.key) {
            return false;
        }
        self.index.add(&entry);
        self.root.push(entry);
        true
    }

    /// Remove an entry from the root and the index
    pub fn remove_entry(&mut self, key: &str) -> Option<CollectionEntry> {
        self.index.remove(key);
        self.root.remove(key)
    }

    pub fn clear(&mut self) {
        self.root.clear();
        self.index.reset();
        self.displayed_game_count = 0;
    }

    pub fn sort_children(&mut self) {
        self.root.sort(self.sort);
    }

    /// Re-apply `sort` and drop everything past `max`, returning the evicted entries
    pub fn sort_and_trim(&mut self, max: usize) -> Vec<CollectionEntry> {
        self.sort_children();
        if self.root.children.len() <= max {
            return Vec::new();
        }
        let evicted = self.root.children.split_off(max);
        for entry in &evicted {
            self.index.remove(&entry.key);
        }
        evicted
    }

    pub fn update_displayed_game_count(&mut self) {
        self.displayed_game_count = self
            .root
            .children()
            .iter()
            .filter(|e| !e.metadata.hidden)
            .count();
    }

    pub fn displayed_game_count(&self) -> usize {
        self.displayed_game_count
    }

    pub fn random_game(&self) -> Option<&CollectionEntry> {
        self.root.children().choose(&mut rand::thread_rng())
    }
}

/// The shared system holding custom collections that have no theme slot.
///
/// Members are collection names; the records keep ownership of the
/// collections themselves.
#[derive(Debug, Clone)]
pub struct BundleSystem {
    pub system: SynthesizedSystem,
    members: Vec<String>,
}

impl BundleSystem {
    pub fn new(decl: &CollectionDeclaration) -> Self {
        Self {
            system: SynthesizedSystem::new(decl),
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.system.name()
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Attach a collection and merge its index
    pub fn attach(&mut self, collection: &SynthesizedSystem) {
        if !self.contains(collection.name()) {
            self.members.push(collection.name().to_string());
        }
        self.system.index.import(&collection.index);
    }

    /// Drop one member. The index keeps its games until rebuilt.
    pub fn remove_member(&mut self, name: &str) {
        self.members.retain(|m| m != name);
    }

    /// Detach every member without touching the member collections
    pub fn detach_all(&mut self) {
        self.members.clear();
        self.system.index.reset();
    }
}

/// Strip parenthesised and bracketed tags from a display name
pub fn remove_parenthesis(name: &str) -> String {
    let mut clean = String::with_capacity(name.len());
    let mut depth = 0usize;
    for c in name.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' if depth > 0 => depth -= 1,
            _ if depth == 0 => clean.push(c),
            _ => {}
        }
    }
    clean.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration;

    fn entry(key: &str, name: &str, last_played: Option<i64>) -> CollectionEntry {
        CollectionEntry {
            game: EntryId(0),
            key: key.to_string(),
            name: name.to_string(),
            system_name: "snes".to_string(),
            metadata: GameMetadata {
                last_played,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_synthesized_metadata() {
        let all = SynthesizedSystem::new(declaration("all").unwrap());
        assert_eq!(all.metadata.full_name, "all games");
        assert_eq!(all.metadata.manufacturer, COLLECTIONS_MANUFACTURER);
        assert_eq!(all.metadata.hardware_type, AUTO_HARDWARE_TYPE);

        let custom = SynthesizedSystem::new(&CollectionDeclaration::custom(
            "mine",
            crate::CollectionKind::CustomFlat,
        ));
        assert_eq!(custom.metadata.hardware_type, CUSTOM_HARDWARE_TYPE);
    }

    #[test]
    fn test_add_is_keyed_by_path() {
        let mut system = SynthesizedSystem::new(declaration("all").unwrap());
        assert!(system.add_entry(entry("/a/game.rom", "game", None)));
        assert!(system.add_entry(entry("/b/game.rom", "game", None)));
        assert!(!system.add_entry(entry("/a/game.rom", "game", None)));
        assert_eq!(system.game_count(), 2);
        assert_eq!(system.index.len(), 2);

        assert!(system.remove_entry("/a/game.rom").is_some());
        assert!(!system.index.contains("/a/game.rom"));
    }

    #[test]
    fn test_sort_and_trim_keeps_most_recent() {
        let mut system = SynthesizedSystem::new(declaration("recent").unwrap());
        for i in 0..5 {
            system.add_entry(entry(&format!("/g{}", i), &format!("g{}", i), Some(i)));
        }

        let evicted = system.sort_and_trim(3);
        let kept: Vec<&str> = system.root.keys().collect();
        assert_eq!(kept, vec!["/g4", "/g3", "/g2"]);
        assert_eq!(evicted.len(), 2);
        assert!(!system.index.contains("/g0"));
    }

    #[test]
    fn test_folder_metadata() {
        let mut folder = CollectionFolder::default();
        folder.update_metadata();
        assert_eq!(folder.metadata.description, "This collection is empty.");

        let mut a = entry("/a", "Alpha", None);
        a.metadata.developer = Some("Capcom".to_string());
        a.metadata.release_date = Some("19910101".to_string());
        a.metadata.rating = Some(0.8);
        let mut b = entry("/b", "Beta", None);
        b.metadata.developer = Some("Konami".to_string());
        b.metadata.release_date = Some("19890101".to_string());
        folder.push(a);
        folder.push(b);
        folder.update_metadata();

        let md = &folder.metadata;
        assert_eq!(
            md.description,
            "This collection contains 2 games, including :\n- Alpha\n- Beta"
        );
        assert_eq!(md.developer, "Various");
        assert_eq!(md.release_date, "19890101");
        assert_eq!(md.rating, 0.8);
    }

    #[test]
    fn test_bundle_detach_keeps_members_alive() {
        let mut bundle = BundleSystem::new(declaration("collections").unwrap());
        let mut mine = SynthesizedSystem::new(&CollectionDeclaration::custom(
            "mine",
            crate::CollectionKind::CustomFlat,
        ));
        mine.add_entry(entry("/a", "a", None));

        bundle.attach(&mine);
        assert!(bundle.contains("mine"));
        assert!(bundle.system.index.contains("/a"));

        bundle.detach_all();
        assert!(bundle.is_empty());
        assert_eq!(mine.game_count(), 1);
    }

    #[test]
    fn test_remove_parenthesis() {
        assert_eq!(remove_parenthesis("Street Fighter II (USA) [!]"), "Street Fighter II");
        assert_eq!(remove_parenthesis("Plain"), "Plain");
    }
}
