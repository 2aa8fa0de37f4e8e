//! Which system folders the active theme provides

use emufront_config::PathsConfig;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const THEME_FILE: &str = "theme.xml";

pub trait ThemeFolders {
    /// System folders of the active theme, sorted
    fn system_folders(&self) -> Vec<String>;

    fn has_system_folder(&self, folder: &str) -> bool {
        self.system_folders().iter().any(|f| f == folder)
    }

    /// Whether the theme ships a default `theme.xml` used for any system
    fn has_default_theme(&self) -> bool;
}

/// Theme folders read from a theme set on disk.
///
/// A system folder is a subdirectory holding a `theme.xml`.
#[derive(Debug, Clone, Default)]
pub struct ThemeDirectory {
    root: Option<PathBuf>,
    folders: BTreeSet<String>,
    has_default: bool,
}

impl ThemeDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let mut theme = Self {
            root: Some(root.into()),
            ..Default::default()
        };
        theme.rescan();
        theme
    }

    /// Theme of the configured theme set, empty when none is installed
    pub fn from_config(paths: &PathsConfig) -> Self {
        match paths.active_theme_dir() {
            Some(dir) => Self::new(dir),
            None => {
                tracing::warn!("No theme set found under {}", paths.themes_dir.display());
                Self::default()
            }
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Re-read the theme set, e.g. after a theme install
    pub fn rescan(&mut self) {
        self.folders.clear();
        self.has_default = false;

        let Some(root) = &self.root else {
            return;
        };
        self.has_default = root.join(THEME_FILE).is_file();

        let Ok(entries) = fs::read_dir(root) else {
            tracing::warn!("Cannot read theme set {}", root.display());
            return;
        };
        for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
            if path.is_dir()
                && path.join(THEME_FILE).is_file()
                && let Some(name) = path.file_name()
            {
                self.folders.insert(name.to_string_lossy().to_string());
            }
        }
        tracing::debug!("Theme provides {} system folders", self.folders.len());
    }
}

impl ThemeFolders for ThemeDirectory {
    fn system_folders(&self) -> Vec<String> {
        self.folders.iter().cloned().collect()
    }

    fn has_system_folder(&self, folder: &str) -> bool {
        self.folders.contains(folder)
    }

    fn has_default_theme(&self) -> bool {
        self.has_default
    }
}

/// Fixed set of theme folders
#[derive(Debug, Clone, Default)]
pub struct StaticThemeFolders {
    folders: BTreeSet<String>,
    has_default: bool,
}

impl StaticThemeFolders {
    pub fn new<I, S>(folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            folders: folders.into_iter().map(Into::into).collect(),
            has_default: false,
        }
    }

    pub fn with_default_theme(mut self) -> Self {
        self.has_default = true;
        self
    }
}

impl ThemeFolders for StaticThemeFolders {
    fn system_folders(&self) -> Vec<String> {
        self.folders.iter().cloned().collect()
    }

    fn has_system_folder(&self, folder: &str) -> bool {
        self.folders.contains(folder)
    }

    fn has_default_theme(&self) -> bool {
        self.has_default
    }
}
