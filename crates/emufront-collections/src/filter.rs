//! Filter ("dynamic") collections
//!
//! A filter collection is stored as `<name>.xcc`, a TOML document naming
//! the source systems it draws from and the attribute predicates a game
//! must satisfy.

use crate::{CollectionEntry, CollectionError, SearchIndex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Persisted filter definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    /// Source systems; empty selects every system
    #[serde(default)]
    pub systems: Vec<String>,

    #[serde(default)]
    pub genres: Vec<String>,

    /// Exact `players` values
    #[serde(default)]
    pub players: Vec<String>,

    #[serde(default)]
    pub developers: Vec<String>,

    #[serde(default)]
    pub publishers: Vec<String>,

    pub favorite: Option<bool>,
    pub kidgame: Option<bool>,
    /// Require the game to have been played (or never played)
    pub played: Option<bool>,
    pub min_rating: Option<f32>,

    /// Case-insensitive substring of the game name
    pub text: Option<String>,
}

/// A filter definition plus the per-system index it builds while populating
#[derive(Debug, Clone, Default)]
pub struct CollectionFilter {
    pub definition: FilterDefinition,
    index: SearchIndex,
}

impl CollectionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definition(definition: FilterDefinition) -> Self {
        Self {
            definition,
            index: SearchIndex::new(),
        }
    }

    /// Replace the definition with the one stored at `path`
    pub fn load(&mut self, path: &Path) -> Result<(), CollectionError> {
        if !path.exists() {
            return Err(CollectionError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        self.definition = toml::from_str(&content)?;
        tracing::debug!("Loaded filter {}", path.display());
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), CollectionError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(&self.definition)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn reset_index(&mut self) {
        self.index.reset();
    }

    /// Games of the selected systems, whether or not they pass the predicates
    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn is_system_selected(&self, system: &str) -> bool {
        self.definition.systems.is_empty() || self.definition.systems.iter().any(|s| s == system)
    }

    pub fn add_to_index(&mut self, entry: &CollectionEntry) {
        self.index.add(entry);
    }

    /// Whether the game belongs in the collection
    pub fn show_file(&self, entry: &CollectionEntry) -> bool {
        let def = &self.definition;
        let md = &entry.metadata;

        if !self.is_system_selected(&entry.system_name) {
            return false;
        }
        if !matches_any(&def.genres, md.genre.as_deref())
            || !matches_any(&def.players, md.players.as_deref())
            || !matches_any(&def.developers, md.developer.as_deref())
            || !matches_any(&def.publishers, md.publisher.as_deref())
        {
            return false;
        }
        if def.favorite.is_some_and(|f| f != md.favorite)
            || def.kidgame.is_some_and(|k| k != md.kidgame)
            || def.played.is_some_and(|p| p != md.has_been_played())
        {
            return false;
        }
        if let Some(min) = def.min_rating
            && md.rating.unwrap_or(0.0) < min
        {
            return false;
        }
        match def.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => entry.name.to_lowercase().contains(&text.to_lowercase()),
            None => true,
        }
    }
}

/// Empty `wanted` accepts anything; otherwise case-insensitive equality
fn matches_any(wanted: &[String], value: Option<&str>) -> bool {
    if wanted.is_empty() {
        return true;
    }
    let Some(value) = value else {
        return false;
    };
    wanted.iter().any(|w| w.eq_ignore_ascii_case(value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use emufront_catalog::{EntryId, GameMetadata};
    use tempfile::TempDir;

    fn entry(system: &str, name: &str, genre: &str) -> CollectionEntry {
        CollectionEntry {
            game: EntryId(1),
            key: format!("/roms/{}/{}.rom", system, name),
            name: name.to_string(),
            system_name: system.to_string(),
            metadata: GameMetadata {
                genre: Some(genre.to_string()),
                rating: Some(0.6),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_system_selection() {
        let filter = CollectionFilter::from_definition(FilterDefinition {
            systems: vec!["snes".to_string()],
            ..Default::default()
        });
        assert!(filter.is_system_selected("snes"));
        assert!(!filter.is_system_selected("nes"));
        assert!(CollectionFilter::new().is_system_selected("nes"));
    }

    #[test]
    fn test_predicates() {
        let filter = CollectionFilter::from_definition(FilterDefinition {
            genres: vec!["shooter".to_string()],
            min_rating: Some(0.5),
            text: Some("gun".to_string()),
            ..Default::default()
        });

        assert!(filter.show_file(&entry("snes", "Gunforce", "Shooter")));
        assert!(!filter.show_file(&entry("snes", "Gunforce", "Platform")));
        assert!(!filter.show_file(&entry("snes", "Axelay", "Shooter")));

        let strict = CollectionFilter::from_definition(FilterDefinition {
            min_rating: Some(0.9),
            favorite: Some(true),
            ..Default::default()
        });
        assert!(!strict.show_file(&entry("snes", "Gunforce", "Shooter")));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shmups.xcc");

        let filter = CollectionFilter::from_definition(FilterDefinition {
            systems: vec!["snes".to_string(), "megadrive".to_string()],
            genres: vec!["Shooter".to_string()],
            played: Some(false),
            ..Default::default()
        });
        filter.save(&path).unwrap();

        let mut loaded = CollectionFilter::new();
        loaded.load(&path).unwrap();
        assert_eq!(loaded.definition, filter.definition);
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        let mut filter = CollectionFilter::new();

        let missing = filter.load(&dir.path().join("missing.xcc")).unwrap_err();
        assert!(matches!(missing, CollectionError::NotFound(_)));

        let bad = dir.path().join("bad.xcc");
        fs::write(&bad, "systems = [unclosed").unwrap();
        assert!(matches!(
            filter.load(&bad),
            Err(CollectionError::TomlParse(_))
        ));
    }

    #[test]
    fn test_index_tracks_selected_games() {
        let mut filter = CollectionFilter::new();
        filter.add_to_index(&entry("snes", "Gunforce", "Shooter"));
        assert_eq!(filter.index().len(), 1);
        filter.reset_index();
        assert!(filter.index().is_empty());
    }
}
