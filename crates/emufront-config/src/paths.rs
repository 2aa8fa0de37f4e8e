//! Filesystem locations used by the front-end

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Home directory, replaced by `~` in portable collection files
    #[serde(default = "default_home_dir")]
    pub home_dir: PathBuf,

    /// Root of the per-system ROM directories
    #[serde(default = "default_roms_dir")]
    pub roms_dir: PathBuf,

    /// Where `custom-<name>.cfg` and `<name>.xcc` files live
    #[serde(default = "default_collections_dir")]
    pub collections_dir: PathBuf,

    /// Installed theme sets
    #[serde(default = "default_themes_dir")]
    pub themes_dir: PathBuf,

    /// Active theme set (empty picks the first available)
    #[serde(default)]
    pub theme_set: String,

    /// SQLite file holding gamelist recovery records
    #[serde(default = "default_recovery_db")]
    pub recovery_db: PathBuf,
}

fn default_home_dir() -> PathBuf {
    PathBuf::from("/userdata")
}

fn default_roms_dir() -> PathBuf {
    PathBuf::from("/userdata/roms")
}

fn default_collections_dir() -> PathBuf {
    PathBuf::from("/userdata/system/.emufront/collections")
}

fn default_themes_dir() -> PathBuf {
    PathBuf::from("/userdata/themes")
}

fn default_recovery_db() -> PathBuf {
    PathBuf::from("/userdata/system/.emufront/recovery.db")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            home_dir: default_home_dir(),
            roms_dir: default_roms_dir(),
            collections_dir: default_collections_dir(),
            themes_dir: default_themes_dir(),
            theme_set: String::new(),
            recovery_db: default_recovery_db(),
        }
    }
}

impl PathsConfig {
    /// Directory of the active theme set, if one can be chosen
    pub fn active_theme_dir(&self) -> Option<PathBuf> {
        if !self.theme_set.is_empty() {
            return Some(self.themes_dir.join(&self.theme_set));
        }

        // Selected set missing: pick the first available one
        let mut sets: Vec<PathBuf> = std::fs::read_dir(&self.themes_dir)
            .ok()?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        sets.sort();
        sets.into_iter().next()
    }
}
