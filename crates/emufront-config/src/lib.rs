//! Configuration management for emufront
//!
//! Handles front-end paths, collection settings and per-system options.
//! Settings live in a single TOML file, optionally overridden from the
//! environment.

mod collections;
mod paths;
mod systems;

pub use collections::{CollectionSettings, SortMode, comma_string_to_vec, vec_to_comma_string};
pub use paths::PathsConfig;
pub use systems::SystemSettings;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Layered configuration error: {0}")]
    Layered(#[from] config::ConfigError),
}

/// Standard configuration paths
pub const CONFIG_DIR: &str = "/etc/emufront";
pub const USER_CONFIG_DIR: &str = "/userdata/system/.emufront";

/// Prefix for environment overrides, e.g. `EMUFRONT__COLLECTIONS__SORT_SYSTEMS=alpha`
pub const ENV_PREFIX: &str = "EMUFRONT";

/// Main front-end configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontendConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub collections: CollectionSettings,

    /// Per-system options, keyed by system short name
    #[serde(default)]
    pub systems: BTreeMap<String, SystemSettings>,
}

impl FrontendConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load the system config with the user config merged over it,
    /// or defaults when neither exists
    pub fn load_default() -> Result<Self, ConfigError> {
        let mut merged: Option<toml::Value> = None;
        for dir in [CONFIG_DIR, USER_CONFIG_DIR] {
            let path = Path::new(dir).join("config.toml");
            if !path.exists() {
                continue;
            }
            let value: toml::Value = toml::from_str(&std::fs::read_to_string(&path)?)?;
            tracing::debug!("Read configuration layer {}", path.display());
            match merged.as_mut() {
                Some(base) => merge_toml(base, value),
                None => merged = Some(value),
            }
        }

        match merged {
            Some(value) => Ok(value.try_into()?),
            None => {
                tracing::warn!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load a file (if present) and apply `EMUFRONT__*` environment overrides on top
    pub fn load_layered(path: &Path) -> Result<Self, ConfigError> {
        let layered = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let config: Self = layered.try_deserialize()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Save to default user configuration location
    pub fn save_default(&self) -> Result<(), ConfigError> {
        let user_config = Path::new(USER_CONFIG_DIR).join("config.toml");
        self.save(&user_config)
    }

    /// Hidden extensions for a system, lowercased with a leading dot
    pub fn hidden_extensions(&self, system: &str) -> Vec<String> {
        self.systems
            .get(system)
            .map(SystemSettings::hidden_extension_list)
            .unwrap_or_default()
    }

    /// Hidden extensions for every configured system
    pub fn hidden_extensions_by_system(&self) -> BTreeMap<String, Vec<String>> {
        self.systems
            .iter()
            .map(|(name, settings)| (name.clone(), settings.hidden_extension_list()))
            .filter(|(_, exts)| !exts.is_empty())
            .collect()
    }
}

/// Merge `overlay` into `base`, recursing into tables
pub fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
