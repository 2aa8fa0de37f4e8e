//! Game metadata handling

use serde::{Deserialize, Serialize};

/// Game metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Release date as `YYYYMMDD...`, compared lexically
    pub release_date: Option<String>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub genre: Option<String>,
    /// Free text player count: `N`, `N-M` or `N+`
    pub players: Option<String>,
    pub rating: Option<f32>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub kidgame: bool,
    #[serde(default)]
    pub play_count: u32,
    /// Unix timestamp of the last play session
    pub last_played: Option<i64>,
    /// Arcade board the game runs on (e.g. "cps2"), for arcade systems
    pub arcade_system_name: Option<String>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub video: Option<String>,
}

impl GameMetadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the end of a play session
    pub fn record_play(&mut self, timestamp: i64) {
        self.play_count = self.play_count.saturating_add(1);
        self.last_played = Some(timestamp);
    }

    pub fn has_been_played(&self) -> bool {
        self.play_count > 0
    }

    /// Flip the favorite flag, returning the new value
    pub fn toggle_favorite(&mut self) -> bool {
        self.favorite = !self.favorite;
        self.favorite
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_play() {
        let mut meta = GameMetadata::new();
        assert!(!meta.has_been_played());

        meta.record_play(1_700_000_000);
        meta.record_play(1_700_000_500);

        assert_eq!(meta.play_count, 2);
        assert_eq!(meta.last_played, Some(1_700_000_500));
    }

    #[test]
    fn test_toggle_favorite() {
        let mut meta = GameMetadata::new();
        assert!(meta.toggle_favorite());
        assert!(!meta.toggle_favorite());
    }

    #[test]
    fn test_serde_defaults() {
        let meta: GameMetadata = serde_json::from_str(r#"{"name":"Metal Slug","players":"1-2"}"#).unwrap();
        assert_eq!(meta.name.as_deref(), Some("Metal Slug"));
        assert_eq!(meta.players.as_deref(), Some("1-2"));
        assert!(!meta.favorite);
        assert_eq!(meta.play_count, 0);
    }
}
