//! Gamelist recovery store using SQLite
//!
//! Metadata edits made from the front-end (favorite toggles, play
//! sessions) are written here one game at a time, so they survive a
//! crash before the full gamelist is rewritten.

use crate::{Catalog, CatalogError, EntryId, GameMetadata};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

/// Recovery store handle
pub struct RecoveryStore {
    conn: Connection,
}

impl RecoveryStore {
    /// Open or create a store
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;

        let store = Self { conn };
        store.init_schema()?;

        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()?;

        let store = Self { conn };
        store.init_schema()?;

        Ok(store)
    }

    fn init_schema(&self) -> Result<(), CatalogError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS gamelist_recovery (
                path TEXT PRIMARY KEY,
                system TEXT NOT NULL,
                metadata TEXT NOT NULL,
                updated_at TEXT DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_recovery_system ON gamelist_recovery(system);
        "#,
        )?;

        Ok(())
    }

    /// Save the current metadata of one game
    pub fn save_game(&self, catalog: &Catalog, id: EntryId) -> Result<(), CatalogError> {
        let game = catalog.game(id).ok_or(CatalogError::NotAGame(id))?;
        let system = catalog
            .system(game.system)
            .map(|s| s.name().to_string())
            .unwrap_or_default();
        let metadata = serde_json::to_string(&game.metadata)?;

        self.conn.execute(
            r#"INSERT INTO gamelist_recovery (path, system, metadata, updated_at)
               VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
               ON CONFLICT(path) DO UPDATE SET
                   system = ?2,
                   metadata = ?3,
                   updated_at = CURRENT_TIMESTAMP"#,
            params![game.full_path(), system, metadata],
        )?;

        tracing::debug!("Saved recovery record for {}", game.full_path());
        Ok(())
    }

    /// Load the recovered metadata for a path
    pub fn load_game(&self, path: &str) -> Result<Option<GameMetadata>, CatalogError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT metadata FROM gamelist_recovery WHERE path = ?1",
                params![path],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Drop the record for a path
    pub fn remove_game(&self, path: &str) -> Result<bool, CatalogError> {
        let removed = self
            .conn
            .execute("DELETE FROM gamelist_recovery WHERE path = ?1", params![path])?;
        Ok(removed > 0)
    }

    /// Apply every recovered record to the matching catalog game.
    ///
    /// Records whose path is no longer in the catalog are skipped.
    pub fn restore(&self, catalog: &mut Catalog) -> Result<usize, CatalogError> {
        let mut stmt = self
            .conn
            .prepare("SELECT path, metadata FROM gamelist_recovery ORDER BY path")?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut restored = 0;
        for (path, json) in rows {
            let Some(id) = catalog.find_by_path(&path) else {
                tracing::debug!("Recovery record for unknown path {}", path);
                continue;
            };
            let metadata: GameMetadata = match serde_json::from_str(&json) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!("Skipping corrupt recovery record for {}: {}", path, e);
                    continue;
                }
            };
            if let Some(game) = catalog.game_mut(id) {
                game.metadata = metadata;
                restored += 1;
            }
        }

        Ok(restored)
    }

    /// Number of stored records
    pub fn record_count(&self) -> Result<i64, CatalogError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM gamelist_recovery", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlatformId, SystemMetadata};

    fn catalog_with_game() -> (Catalog, EntryId) {
        let mut catalog = Catalog::new();
        let gba = catalog.add_system(
            SystemMetadata::named("gba"),
            PlatformId::for_system("gba"),
            "/roms/gba",
        );
        let game = catalog
            .add_game(gba, None, "/roms/gba/test.gba", GameMetadata::new())
            .unwrap();
        (catalog, game)
    }

    #[test]
    fn test_store_creation() {
        let store = RecoveryStore::in_memory().unwrap();
        assert_eq!(store.record_count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_load_game() {
        let store = RecoveryStore::in_memory().unwrap();
        let (mut catalog, game) = catalog_with_game();

        catalog.set_favorite(game, true).unwrap();
        store.save_game(&catalog, game).unwrap();
        // Saving twice updates in place
        catalog.record_play(game, 100).unwrap();
        store.save_game(&catalog, game).unwrap();

        assert_eq!(store.record_count().unwrap(), 1);
        let loaded = store.load_game("/roms/gba/test.gba").unwrap().unwrap();
        assert!(loaded.favorite);
        assert_eq!(loaded.play_count, 1);
        assert!(store.load_game("/roms/gba/other.gba").unwrap().is_none());
    }

    #[test]
    fn test_restore_into_fresh_catalog() {
        let store = RecoveryStore::in_memory().unwrap();
        let (mut catalog, game) = catalog_with_game();
        catalog.set_favorite(game, true).unwrap();
        store.save_game(&catalog, game).unwrap();

        let (mut fresh, fresh_game) = catalog_with_game();
        assert!(!fresh.game(fresh_game).unwrap().metadata.favorite);

        assert_eq!(store.restore(&mut fresh).unwrap(), 1);
        assert!(fresh.game(fresh_game).unwrap().metadata.favorite);
    }

    #[test]
    fn test_remove_game() {
        let store = RecoveryStore::in_memory().unwrap();
        let (catalog, game) = catalog_with_game();
        store.save_game(&catalog, game).unwrap();

        assert!(store.remove_game("/roms/gba/test.gba").unwrap());
        assert!(!store.remove_game("/roms/gba/test.gba").unwrap());
    }

    #[test]
    fn test_save_rejects_folders() {
        let store = RecoveryStore::in_memory().unwrap();
        let (catalog, game) = catalog_with_game();
        let root = catalog.system_of(game).unwrap().root;
        assert!(matches!(
            store.save_game(&catalog, root),
            Err(CatalogError::NotAGame(_))
        ));
    }
}
