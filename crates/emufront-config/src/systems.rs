//! Per-system settings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemSettings {
    /// Semicolon-separated extensions hidden from automatic collections, e.g. "zip;7z"
    #[serde(default)]
    pub hidden_extensions: String,
}

impl SystemSettings {
    /// Extensions lowercased with a leading dot
    pub fn hidden_extension_list(&self) -> Vec<String> {
        self.hidden_extensions
            .split(';')
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
            .map(|ext| format!(".{}", ext.trim_start_matches('.').to_lowercase()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_extension_list() {
        let settings = SystemSettings {
            hidden_extensions: "ZIP; .cue;;".to_string(),
        };
        assert_eq!(settings.hidden_extension_list(), vec![".zip", ".cue"]);
        assert!(SystemSettings::default().hidden_extension_list().is_empty());
    }
}
