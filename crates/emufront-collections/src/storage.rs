//! On-disk layout of custom collections

use crate::{CollectionError, CollectionKind};
use emufront_config::PathsConfig;
use std::fs;
use std::path::{Path, PathBuf};

const FLAT_PREFIX: &str = "custom-";
const FLAT_SUFFIX: &str = ".cfg";
const FILTER_EXTENSION: &str = "xcc";

/// Placeholder standing for the home directory in flat collection files
pub const HOME_PLACEHOLDER: &str = "~";

/// Where collection files live and how paths inside them are made portable
#[derive(Debug, Clone)]
pub struct CollectionPaths {
    pub collections_dir: PathBuf,
    pub home_dir: PathBuf,
}

impl CollectionPaths {
    pub fn new(collections_dir: impl Into<PathBuf>, home_dir: impl Into<PathBuf>) -> Self {
        Self {
            collections_dir: collections_dir.into(),
            home_dir: home_dir.into(),
        }
    }

    pub fn from_config(paths: &PathsConfig) -> Self {
        Self::new(&paths.collections_dir, &paths.home_dir)
    }

    /// `custom-<name>.cfg`
    pub fn custom_config_path(&self, name: &str) -> PathBuf {
        self.collections_dir
            .join(format!("{}{}{}", FLAT_PREFIX, name, FLAT_SUFFIX))
    }

    /// `<name>.xcc`
    pub fn filter_path(&self, name: &str) -> PathBuf {
        self.collections_dir
            .join(format!("{}.{}", name, FILTER_EXTENSION))
    }

    pub fn ensure_dir(&self) -> Result<(), CollectionError> {
        fs::create_dir_all(&self.collections_dir)?;
        Ok(())
    }
}

/// List the custom collections stored in `dir`, sorted by name.
///
/// A missing directory yields nothing.
pub fn discover_collections(dir: &Path) -> Vec<(String, CollectionKind)> {
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::debug!("No collections directory at {}", dir.display());
        return Vec::new();
    };

    let mut found = Vec::new();
    for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
        if !path.is_file() {
            continue;
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if let Some(name) = file_name
            .strip_prefix(FLAT_PREFIX)
            .and_then(|rest| rest.strip_suffix(FLAT_SUFFIX))
            .filter(|name| !name.is_empty())
        {
            found.push((name.to_string(), CollectionKind::CustomFlat));
        } else if path.extension().is_some_and(|e| e == FILTER_EXTENSION)
            && let Some(stem) = path.file_stem()
        {
            found.push((stem.to_string_lossy().to_string(), CollectionKind::CustomFilter));
        } else {
            tracing::info!("Ignoring non-collection file in collections folder: {}", file_name);
        }
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    found
}

/// Rewrite a path under `home` to start with the home placeholder
pub fn portable_path(path: &str, home: &Path) -> String {
    let home = home.to_string_lossy();
    let home = home.trim_end_matches('/');
    if home.is_empty() {
        return path.to_string();
    }
    match path.strip_prefix(home) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            format!("{}{}", HOME_PLACEHOLDER, rest)
        }
        _ => path.to_string(),
    }
}

/// Expand a leading home placeholder
pub fn resolve_portable_path(path: &str, home: &Path) -> String {
    match path.strip_prefix(HOME_PLACEHOLDER) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => {
            let home = home.to_string_lossy();
            format!("{}{}", home.trim_end_matches('/'), rest)
        }
        _ => path.to_string(),
    }
}

/// Read a flat collection file, one resolved path per non-empty line
pub fn read_flat(path: &Path, home: &Path) -> Result<Vec<String>, CollectionError> {
    if !path.exists() {
        return Err(CollectionError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| resolve_portable_path(line, home))
        .collect())
}

/// Overwrite a flat collection file with portable paths
pub fn write_flat(path: &Path, keys: &[String], home: &Path) -> Result<(), CollectionError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut content = String::new();
    for key in keys {
        content.push_str(&portable_path(key, home));
        content.push('\n');
    }
    fs::write(path, content)?;
    Ok(())
}
