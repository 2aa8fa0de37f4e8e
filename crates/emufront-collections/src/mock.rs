//! Test doubles for exercising the collection manager without a UI
//!
//! [`RecordingView`] logs every call the manager makes on the view layer
//! into a shared [`ViewLog`]. [`TestEnvironment`] lays out a fake home
//! directory and builds catalogs and managers on top of it.
//!
//! ```no_run
//! use emufront_collections::mock::{RecordingView, TestEnvironment};
//! use emufront_config::CollectionSettings;
//!
//! let env = TestEnvironment::new("/tmp/emufront-test");
//! let catalog = env.scenario_catalog();
//! let (view, log) = RecordingView::new();
//! let mut manager = env.manager(CollectionSettings::default(), view);
//! manager.load_collection_systems(&catalog);
//! assert!(log.lock().unwrap().changes.is_empty());
//! ```

use crate::{
    ChangeKind, CollectionPaths, CollectionSystemManager, StaticThemeFolders, SystemRef,
    ViewBinding, ViewTarget, write_flat,
};
use emufront_catalog::{Catalog, EntryId, GameMetadata, PlatformId, SystemMetadata};
use emufront_config::CollectionSettings;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Everything a [`RecordingView`] was asked to do
#[derive(Debug, Default)]
pub struct ViewLog {
    pub changes: Vec<(ViewTarget, ChangeKind)>,
    pub removed_views: Vec<SystemRef>,
    pub removed_entries: Vec<(SystemRef, String)>,
    pub repopulated: Vec<SystemRef>,
    pub notifications: Vec<(String, Duration)>,
    /// Systems with a built game list view; seed it to simulate open views
    pub live_views: HashSet<SystemRef>,
}

/// View binding that records calls instead of drawing
#[derive(Debug, Clone)]
pub struct RecordingView {
    log: Arc<Mutex<ViewLog>>,
}

impl RecordingView {
    /// A view plus a handle on its log
    pub fn new() -> (Self, Arc<Mutex<ViewLog>>) {
        let log = Arc::new(Mutex::new(ViewLog::default()));
        (Self { log: log.clone() }, log)
    }

    fn record(&self, f: impl FnOnce(&mut ViewLog)) {
        if let Ok(mut log) = self.log.lock() {
            f(&mut log);
        }
    }
}

impl ViewBinding for RecordingView {
    fn on_file_changed(&mut self, target: ViewTarget, change: ChangeKind) {
        self.record(|log| log.changes.push((target, change)));
    }

    fn remove_game_list_view(&mut self, system: &SystemRef) {
        self.record(|log| {
            if log.live_views.remove(system) {
                log.removed_views.push(system.clone());
            }
        });
    }

    fn has_game_list_view(&self, system: &SystemRef) -> bool {
        self.log
            .lock()
            .map(|log| log.live_views.contains(system))
            .unwrap_or(false)
    }

    fn remove_entry(&mut self, system: &SystemRef, key: &str) {
        self.record(|log| log.removed_entries.push((system.clone(), key.to_string())));
    }

    fn repopulate(&mut self, system: &SystemRef) {
        self.record(|log| log.repopulated.push(system.clone()));
    }

    fn notify(&mut self, message: &str, duration: Duration) {
        self.record(|log| log.notifications.push((message.to_string(), duration)));
    }
}

/// A fake home directory: `<root>/home` with ROMs under `roms/` and
/// collections under `collections/`
#[derive(Debug, Clone)]
pub struct TestEnvironment {
    home: PathBuf,
}

impl TestEnvironment {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            home: root.into().join("home"),
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn roms_dir(&self) -> PathBuf {
        self.home.join("roms")
    }

    pub fn system_dir(&self, system: &str) -> PathBuf {
        self.roms_dir().join(system)
    }

    pub fn rom_path(&self, system: &str, file: &str) -> PathBuf {
        self.system_dir(system).join(file)
    }

    pub fn paths(&self) -> CollectionPaths {
        CollectionPaths::new(self.home.join("collections"), &self.home)
    }

    /// Manager over this environment with a theme providing no folders
    pub fn manager(
        &self,
        settings: CollectionSettings,
        view: impl ViewBinding + 'static,
    ) -> CollectionSystemManager {
        self.manager_with_theme(settings, view, StaticThemeFolders::default())
    }

    pub fn manager_with_theme(
        &self,
        settings: CollectionSettings,
        view: impl ViewBinding + 'static,
        theme: StaticThemeFolders,
    ) -> CollectionSystemManager {
        CollectionSystemManager::new(settings, self.paths(), Box::new(view), Box::new(theme))
    }

    /// Two systems with one game each:
    ///
    /// - `systemA/game1.rom`, never played
    /// - `systemB/game1.rom`, played three times and a favorite
    pub fn scenario_catalog(&self) -> Catalog {
        let mut catalog = Catalog::new();
        let played = GameMetadata {
            play_count: 3,
            favorite: true,
            last_played: Some(1_700_000_000),
            ..Default::default()
        };

        for (system, metadata) in [("systemA", GameMetadata::new()), ("systemB", played)] {
            let id = catalog.add_system(
                SystemMetadata::named(system),
                PlatformId::for_system(system),
                self.system_dir(system),
            );
            if let Err(e) = catalog.add_game(id, None, self.rom_path(system, "game1.rom"), metadata) {
                tracing::error!("Cannot add scenario game to {}: {}", system, e);
            }
        }
        catalog
    }

    /// Id of the game at `<system>/<file>`. Resolves to nothing in the
    /// catalog when no such game exists.
    pub fn game(&self, catalog: &Catalog, system: &str, file: &str) -> EntryId {
        let path = self.rom_path(system, file);
        catalog
            .find_by_path(&path.to_string_lossy())
            .unwrap_or(EntryId(usize::MAX))
    }

    /// Write a flat collection file listing `games`
    pub fn write_flat_collection(&self, name: &str, games: &[PathBuf]) {
        let paths = self.paths();
        let keys: Vec<String> = games
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect();
        if let Err(e) = write_flat(&paths.custom_config_path(name), &keys, &self.home) {
            tracing::error!("Cannot write collection {}: {}", name, e);
        }
    }
}
