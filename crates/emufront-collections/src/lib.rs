//! Collection systems for emufront
//!
//! Collections are virtual systems built from the games of the real
//! systems in a [`emufront_catalog::Catalog`]: automatic ones (all games,
//! favorites, last played, player counts, arcade boards) and user-defined
//! ones, either an explicit list or a filter. The
//! [`CollectionSystemManager`] populates them on demand, keeps them in sync
//! with metadata changes, persists custom collections and assembles the
//! list of systems shown to the user.

mod decl;
mod displayed;
mod filter;
mod index;
mod manager;
pub mod mock;
mod players;
mod record;
mod storage;
mod system;
mod theme;
mod view;

pub use decl::{
    ARCADE_PLATFORM_OFFSET, CUSTOM_COLLECTIONS_NAME, CollectionDeclaration, CollectionKind,
    SortOrder, declaration, declarations,
};
pub use displayed::{DisplayedSystems, SystemRef};
pub use filter::{CollectionFilter, FilterDefinition};
pub use index::{Facet, SearchIndex};
pub use manager::CollectionSystemManager;
pub use players::{OPEN_UPPER_BOUND, PlayerRange, players_include};
pub use record::{CollectionRecord, PopulateStatus};
pub use storage::{
    CollectionPaths, HOME_PLACEHOLDER, discover_collections, portable_path, read_flat,
    resolve_portable_path, write_flat,
};
pub use system::{
    AUTO_HARDWARE_TYPE, BundleSystem, COLLECTIONS_MANUFACTURER, CUSTOM_HARDWARE_TYPE,
    CollectionEntry, CollectionFolder, FolderMetadata, SynthesizedSystem, remove_parenthesis,
};
pub use theme::{StaticThemeFolders, ThemeDirectory, ThemeFolders};
pub use view::{ChangeKind, NullView, ViewBinding, ViewTarget};

use std::path::PathBuf;
use thiserror::Error;

/// Most entries kept in the last played collection
pub const LAST_PLAYED_MAX: usize = 50;

#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Collection already exists: {0}")]
    AlreadyExists(String),

    #[error("Collection file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Filter parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Filter serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
