//! Collection settings

use serde::{Deserialize, Serialize};

/// How the displayed system list is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Keep catalog order
    None,
    /// Case-insensitive by name
    Alpha,
    /// By manufacturer, then release year, then name
    Manufacturer,
}

/// Collection-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSettings {
    /// Comma-separated short names of enabled automatic collections
    #[serde(default)]
    pub auto: String,

    /// Comma-separated names of enabled custom collections
    #[serde(default)]
    pub custom: String,

    /// Bundle custom collections without a theme folder into one system
    #[serde(default = "default_true")]
    pub use_custom_collections_system: bool,

    /// System sort mode: "", "alpha" or "manufacturer"
    #[serde(default)]
    pub sort_systems: String,
}

fn default_true() -> bool {
    true
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            auto: String::new(),
            custom: String::new(),
            use_custom_collections_system: true,
            sort_systems: String::new(),
        }
    }
}

impl CollectionSettings {
    pub fn auto_enabled(&self) -> Vec<String> {
        comma_string_to_vec(&self.auto)
    }

    pub fn custom_enabled(&self) -> Vec<String> {
        comma_string_to_vec(&self.custom)
    }

    pub fn set_auto_enabled(&mut self, names: &[String]) -> bool {
        let value = vec_to_comma_string(names);
        let changed = value != self.auto;
        self.auto = value;
        changed
    }

    pub fn set_custom_enabled(&mut self, names: &[String]) -> bool {
        let value = vec_to_comma_string(names);
        let changed = value != self.custom;
        self.custom = value;
        changed
    }

    /// Any value other than "" and "manufacturer" sorts alphabetically
    pub fn sort_mode(&self) -> SortMode {
        match self.sort_systems.as_str() {
            "" => SortMode::None,
            "manufacturer" => SortMode::Manufacturer,
            _ => SortMode::Alpha,
        }
    }
}

/// Split a comma list, dropping empty items
pub fn comma_string_to_vec(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn vec_to_comma_string(values: &[String]) -> String {
    values.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_lists() {
        assert_eq!(comma_string_to_vec("all, favorites,,recent"), vec!["all", "favorites", "recent"]);
        assert!(comma_string_to_vec("").is_empty());
        assert_eq!(
            vec_to_comma_string(&["a".to_string(), "b".to_string()]),
            "a,b"
        );
    }

    #[test]
    fn test_sort_mode() {
        let mut settings = CollectionSettings::default();
        assert_eq!(settings.sort_mode(), SortMode::None);
        settings.sort_systems = "manufacturer".to_string();
        assert_eq!(settings.sort_mode(), SortMode::Manufacturer);
        settings.sort_systems = "whatever".to_string();
        assert_eq!(settings.sort_mode(), SortMode::Alpha);
    }

    #[test]
    fn test_set_enabled_reports_change() {
        let mut settings = CollectionSettings::default();
        assert!(settings.set_custom_enabled(&["mine".to_string()]));
        assert!(!settings.set_custom_enabled(&["mine".to_string()]));
        assert_eq!(settings.custom_enabled(), vec!["mine"]);
    }
}
