//! Real game systems

use crate::{EntryId, PlatformId};
use std::fmt;

/// Index of a system inside a [`crate::Catalog`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(pub usize);

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "system#{}", self.0)
    }
}

/// Descriptive metadata shared by real and synthesized systems
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemMetadata {
    /// Short name, e.g. "snes"
    pub name: String,
    pub full_name: String,
    pub theme_folder: String,
    pub manufacturer: String,
    pub hardware_type: String,
    pub release_year: u32,
}

impl SystemMetadata {
    /// Metadata whose full name and theme folder default to the short name
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            full_name: name.clone(),
            theme_folder: name.clone(),
            name,
            ..Default::default()
        }
    }
}

/// A real system owning a tree of file entries
#[derive(Debug, Clone)]
pub struct SystemData {
    pub metadata: SystemMetadata,
    pub platforms: Vec<PlatformId>,
    /// Root folder entry
    pub root: EntryId,
    /// False for tool/media systems that hold no games
    pub is_game_system: bool,
    /// Group systems aggregate other systems and are skipped by collections
    pub is_group: bool,
}

impl SystemData {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn has_platform(&self, platform: PlatformId) -> bool {
        self.platforms.contains(&platform)
    }

    pub fn is_arcade(&self) -> bool {
        self.has_platform(PlatformId::Arcade)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_metadata() {
        let md = SystemMetadata::named("snes");
        assert_eq!(md.full_name, "snes");
        assert_eq!(md.theme_folder, "snes");
        assert_eq!(md.release_year, 0);
    }
}
