//! ROM scanning functionality

use crate::{Catalog, CatalogError, EntryId, GameMetadata, PlatformId, SystemId, SystemMetadata};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Result of a ROM scan
#[derive(Debug, Default)]
pub struct ScanResult {
    pub systems_found: usize,
    pub games_found: usize,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

/// ROM scanner configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to scan
    pub extensions: HashSet<String>,

    /// Directories to skip
    pub skip_dirs: HashSet<String>,

    /// Scan subdirectories
    pub recursive: bool,

    /// Skip hidden files/directories
    pub skip_hidden: bool,
}

/// Extensions recognised as games, lowercase without the dot
const GAME_EXTENSIONS: &[&str] = &[
    "nes", "fds", "smc", "sfc", "n64", "z64", "v64", "gb", "gbc", "gba", "nds", "sms", "gg", "md",
    "gen", "bin", "32x", "pce", "sgx", "iso", "cso", "chd", "pbp", "cue", "a26", "a78", "lnx",
    "ngp", "ngc", "ws", "wsc", "zip", "7z", "sh",
];

/// System directories holding support files rather than games
const SUPPORT_DIRS: &[&str] = &["bios", "saves", "states", "screenshots", "media", "downloaded_images"];

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: GAME_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            skip_dirs: SUPPORT_DIRS.iter().map(|d| d.to_string()).collect(),
            recursive: true,
            skip_hidden: true,
        }
    }
}

/// ROM scanner
pub struct RomScanner {
    config: ScanConfig,
}

impl Default for RomScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl RomScanner {
    /// Create a new scanner with default config
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan every system directory under `roms_dir` into a new catalog
    pub fn scan_all(&self, roms_dir: &Path) -> Result<(Catalog, ScanResult), CatalogError> {
        let started = Instant::now();
        let mut catalog = Catalog::new();
        let mut result = ScanResult::default();

        if !roms_dir.exists() {
            return Err(CatalogError::PathNotFound(roms_dir.to_path_buf()));
        }

        let mut system_dirs: Vec<_> = fs::read_dir(roms_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        system_dirs.sort();

        for path in system_dirs {
            let system = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            // Skip special directories
            if self.config.skip_dirs.contains(&system.to_lowercase())
                || (self.config.skip_hidden && system.starts_with('.'))
            {
                continue;
            }

            let id = catalog.add_system(
                SystemMetadata::named(&system),
                PlatformId::for_system(&system),
                &path,
            );

            let root = catalog.system(id).map(|s| s.root);
            let before = result.games_found;
            self.scan_dir(&mut catalog, &path, id, root, &mut result);
            tracing::debug!(
                "Scanned {}: {} games",
                system,
                result.games_found - before
            );
            result.systems_found += 1;
        }

        result.duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            "Scan complete: {} systems, {} games in {}ms",
            result.systems_found,
            result.games_found,
            result.duration_ms
        );
        Ok((catalog, result))
    }

    /// Recursively scan a directory
    fn scan_dir(
        &self,
        catalog: &mut Catalog,
        path: &Path,
        system: SystemId,
        parent: Option<EntryId>,
        result: &mut ScanResult,
    ) {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                result.errors.push(format!("{}: {}", path.display(), e));
                return;
            }
        };

        let mut paths: Vec<_> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
        paths.sort();

        for entry_path in paths {
            let name = entry_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            // Skip hidden files/directories
            if self.config.skip_hidden && name.starts_with('.') {
                continue;
            }

            if entry_path.is_dir() {
                if self.config.skip_dirs.contains(&name.to_lowercase()) || !self.config.recursive {
                    continue;
                }

                match catalog.add_folder(system, parent, &entry_path) {
                    Ok(folder) => self.scan_dir(catalog, &entry_path, system, Some(folder), result),
                    Err(e) => result.errors.push(e.to_string()),
                }
            } else if entry_path.is_file()
                && let Some(ext) = entry_path.extension().and_then(|e| e.to_str())
                && self.config.extensions.contains(&ext.to_lowercase())
            {
                match catalog.add_game(system, parent, &entry_path, GameMetadata::new()) {
                    Ok(_) => result.games_found += 1,
                    Err(e) => result.errors.push(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_config_default() {
        let config = ScanConfig::default();
        assert!(config.extensions.contains("gba"));
        assert!(config.extensions.contains("nes"));
        assert!(config.skip_dirs.contains("bios"));
        assert!(!config.extensions.contains("txt"));
    }

    #[test]
    fn test_scan_all_builds_catalog() {
        let dir = TempDir::new().unwrap();
        let roms = dir.path();
        fs::create_dir_all(roms.join("snes/hacks")).unwrap();
        fs::create_dir_all(roms.join("mame")).unwrap();
        fs::create_dir_all(roms.join("bios")).unwrap();
        fs::write(roms.join("snes/Super Metroid (USA).sfc"), b"rom").unwrap();
        fs::write(roms.join("snes/readme.txt"), b"text").unwrap();
        fs::write(roms.join("snes/hacks/kaizo.sfc"), b"rom").unwrap();
        fs::write(roms.join("mame/sf2.zip"), b"rom").unwrap();
        fs::write(roms.join("bios/scph1001.bin"), b"bios").unwrap();

        let (catalog, result) = RomScanner::new().scan_all(roms).unwrap();

        assert_eq!(result.systems_found, 2);
        assert_eq!(result.games_found, 3);
        assert!(result.errors.is_empty());

        let snes = catalog.system_by_name("snes").unwrap();
        assert_eq!(catalog.games_recursive(snes).len(), 2);

        let metroid = catalog
            .find_by_path(&roms.join("snes/Super Metroid (USA).sfc").to_string_lossy())
            .unwrap();
        assert_eq!(catalog.game(metroid).unwrap().name(), "Super Metroid (USA)");

        let mame = catalog.system_by_name("mame").unwrap();
        assert!(catalog.system(mame).unwrap().is_arcade());
        assert!(catalog.system_by_name("bios").is_none());
    }

    #[test]
    fn test_scan_missing_dir() {
        let err = RomScanner::new()
            .scan_all(Path::new("/nonexistent/roms"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::PathNotFound(_)));
    }
}
