//! File entries: games, folders and placeholders

use crate::{GameMetadata, SystemId};
use std::fmt;
use std::path::{Path, PathBuf};

/// Index of an entry inside a [`crate::Catalog`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub usize);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A game file
#[derive(Debug, Clone)]
pub struct GameEntry {
    pub path: PathBuf,
    pub system: SystemId,
    pub metadata: GameMetadata,
}

impl GameEntry {
    /// Full path, used as the identity key everywhere
    pub fn full_path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Lowercased extension with its leading dot, empty when there is none
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default()
    }

    /// Display name: metadata name, else the file stem
    pub fn name(&self) -> String {
        match &self.metadata.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => stem(&self.path),
        }
    }
}

/// A directory inside a system
#[derive(Debug, Clone)]
pub struct FolderEntry {
    pub path: PathBuf,
    pub system: SystemId,
    pub children: Vec<EntryId>,
}

/// Stand-in for content that is listed but not launchable
#[derive(Debug, Clone)]
pub struct PlaceholderEntry {
    pub path: PathBuf,
    pub system: SystemId,
    pub label: String,
}

#[derive(Debug, Clone)]
pub enum FileEntry {
    Game(GameEntry),
    Folder(FolderEntry),
    Placeholder(PlaceholderEntry),
}

impl FileEntry {
    pub fn path(&self) -> &Path {
        match self {
            FileEntry::Game(game) => &game.path,
            FileEntry::Folder(folder) => &folder.path,
            FileEntry::Placeholder(placeholder) => &placeholder.path,
        }
    }

    pub fn system(&self) -> SystemId {
        match self {
            FileEntry::Game(game) => game.system,
            FileEntry::Folder(folder) => folder.system,
            FileEntry::Placeholder(placeholder) => placeholder.system,
        }
    }

    pub fn name(&self) -> String {
        match self {
            FileEntry::Game(game) => game.name(),
            FileEntry::Folder(folder) => stem(&folder.path),
            FileEntry::Placeholder(placeholder) => placeholder.label.clone(),
        }
    }

    pub fn full_path(&self) -> String {
        self.path().to_string_lossy().to_string()
    }

    pub fn as_game(&self) -> Option<&GameEntry> {
        match self {
            FileEntry::Game(game) => Some(game),
            _ => None,
        }
    }

    pub fn as_game_mut(&mut self) -> Option<&mut GameEntry> {
        match self {
            FileEntry::Game(game) => Some(game),
            _ => None,
        }
    }

    pub fn as_folder(&self) -> Option<&FolderEntry> {
        match self {
            FileEntry::Folder(folder) => Some(folder),
            _ => None,
        }
    }
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}
