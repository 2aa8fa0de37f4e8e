//! Game catalog for emufront
//!
//! Holds the real game systems and their file entries, scans ROM
//! directories into that structure, and keeps a SQLite-backed gamelist
//! recovery store for metadata edits.

mod catalog;
mod entry;
mod metadata;
mod platform;
mod recovery;
mod scanner;
mod system;

pub use catalog::Catalog;
pub use entry::{EntryId, FileEntry, FolderEntry, GameEntry, PlaceholderEntry};
pub use metadata::GameMetadata;
pub use platform::{ARCADE_SYSTEMS, ArcadePlatform, PlatformId};
pub use recovery::RecoveryStore;
pub use scanner::{RomScanner, ScanConfig, ScanResult};
pub use system::{SystemData, SystemId, SystemMetadata};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("System not found: {0}")]
    SystemNotFound(String),

    #[error("Entry not found: {0}")]
    EntryNotFound(EntryId),

    #[error("Entry is not a game: {0}")]
    NotAGame(EntryId),

    #[error("Entry is not a folder: {0}")]
    NotAFolder(EntryId),

    #[error("Duplicate path: {0}")]
    DuplicatePath(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Metadata encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::NotAGame(EntryId(7));
        assert_eq!(format!("{}", err), "Entry is not a game: #7");
    }
}
