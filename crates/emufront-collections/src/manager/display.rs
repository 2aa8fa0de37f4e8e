//! Assembling the displayed system list

use super::CollectionSystemManager;
use crate::SystemRef;
use emufront_catalog::{Catalog, SystemMetadata};
use emufront_config::SortMode;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Systems moved to the end of a sorted list
const TRAILING_SYSTEMS: &[&str] = &["retropie", "retrobat"];

impl CollectionSystemManager {
    /// Rebuild the displayed system list from the enabled collections
    pub fn update_systems_list(&mut self, catalog: &Catalog) {
        let sort_mode = self.settings.sort_mode();
        let by_manufacturer = sort_mode == SortMode::Manufacturer
            && catalog
                .systems()
                .any(|(_, s)| !s.metadata.manufacturer.is_empty());

        self.remove_collections_from_displayed_systems();

        self.add_enabled_collections_to_displayed_systems(catalog, true);

        if sort_mode != SortMode::None && !by_manufacturer {
            let metadata = self.displayed_metadata(catalog);
            self.displayed
                .sort_by(|a, b| compare_by_name(metadata.get(a), metadata.get(b)));
        }

        if !self.bundle.is_empty() {
            self.displayed.push(SystemRef::Bundle);
        }

        self.add_enabled_collections_to_displayed_systems(catalog, false);

        if sort_mode != SortMode::None {
            if by_manufacturer {
                let metadata = self.displayed_metadata(catalog);
                self.displayed.sort_by(|a, b| {
                    compare_by_manufacturer(
                        (a, metadata.get(a)),
                        (b, metadata.get(b)),
                    )
                });
            }

            let trailing = self.displayed.iter().find_map(|s| {
                let name = self.system_name(catalog, s)?;
                TRAILING_SYSTEMS.contains(&name.as_str()).then(|| s.clone())
            });
            if let Some(trailing) = trailing {
                self.displayed.move_to_end(|s| *s == trailing);
            }
        }

        if let Some(name) = &self.editing
            && !self.custom.get(name).is_some_and(|r| r.enabled)
        {
            self.exit_edit_mode();
        }

        tracing::debug!("Displaying {} systems", self.displayed.len());
    }

    /// Add every enabled custom (or automatic) collection, populating as
    /// needed. Custom collections without their own theme folder go into
    /// the bundle when bundling is on.
    pub fn add_enabled_collections_to_displayed_systems(&mut self, catalog: &Catalog, custom: bool) {
        let records = if custom { &self.custom } else { &self.auto };
        let names: Vec<String> = records
            .iter()
            .filter(|(_, r)| r.enabled)
            .map(|(name, _)| name.clone())
            .collect();

        for name in names {
            let system = if custom {
                SystemRef::Custom(name.clone())
            } else {
                SystemRef::Auto(name.clone())
            };
            self.populate_collection(catalog, &system);

            let records = if custom { &self.custom } else { &self.auto };
            let Some(record) = records.get(&name) else {
                continue;
            };

            let own_slot = !record.decl.is_custom
                || self.theme.has_system_folder(&name)
                || !self.settings.use_custom_collections_system;

            if own_slot {
                if record.decl.display_when_empty || record.system.game_count() > 0 {
                    self.displayed.push(system);
                }
            } else {
                self.bundle.attach(&record.system);
            }
        }
    }

    /// Drop every collection from the displayed list and detach the
    /// bundle's members. The collections themselves stay alive.
    pub fn remove_collections_from_displayed_systems(&mut self) {
        self.displayed.retain(|s| !s.is_collection());
        self.bundle.detach_all();
        self.view.remove_game_list_view(&SystemRef::Bundle);
    }

    /// Rebuild the bundle index from its current members
    pub(super) fn rebuild_bundle_index(&mut self) {
        let members = self.bundle.members().to_vec();
        self.bundle.detach_all();
        for name in members {
            if let Some(record) = self.custom.get(&name) {
                self.bundle.attach(&record.system);
            }
        }
    }

    fn system_metadata(&self, catalog: &Catalog, system: &SystemRef) -> Option<SystemMetadata> {
        match system {
            SystemRef::Real(id) => catalog.system(*id).map(|s| s.metadata.clone()),
            SystemRef::Bundle => Some(self.bundle.system.metadata.clone()),
            other => self.record(other).map(|r| r.system.metadata.clone()),
        }
    }

    fn system_name(&self, catalog: &Catalog, system: &SystemRef) -> Option<String> {
        self.system_metadata(catalog, system).map(|md| md.name)
    }

    fn displayed_metadata(&self, catalog: &Catalog) -> HashMap<SystemRef, SystemMetadata> {
        self.displayed
            .iter()
            .filter_map(|s| Some((s.clone(), self.system_metadata(catalog, s)?)))
            .collect()
    }
}

fn upper_name(metadata: Option<&SystemMetadata>) -> String {
    metadata.map(|m| m.name.to_uppercase()).unwrap_or_default()
}

fn compare_by_name(a: Option<&SystemMetadata>, b: Option<&SystemMetadata>) -> Ordering {
    upper_name(a).cmp(&upper_name(b))
}

/// Real systems first; collections by hardware type descending so custom
/// collections precede automatic ones; then manufacturer, year, name
fn compare_by_manufacturer(
    (a, a_md): (&SystemRef, Option<&SystemMetadata>),
    (b, b_md): (&SystemRef, Option<&SystemMetadata>),
) -> Ordering {
    a.is_collection()
        .cmp(&b.is_collection())
        .then_with(|| {
            if a.is_collection() && b.is_collection() {
                let hw = |md: Option<&SystemMetadata>| {
                    md.map(|m| m.hardware_type.to_uppercase()).unwrap_or_default()
                };
                hw(b_md).cmp(&hw(a_md))
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| {
            let mf = |md: Option<&SystemMetadata>| {
                md.map(|m| m.manufacturer.to_uppercase()).unwrap_or_default()
            };
            mf(a_md).cmp(&mf(b_md))
        })
        .then_with(|| {
            let year = |md: Option<&SystemMetadata>| md.map(|m| m.release_year).unwrap_or(0);
            year(a_md).cmp(&year(b_md))
        })
        .then_with(|| compare_by_name(a_md, b_md))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{RecordingView, TestEnvironment};
    use crate::{CollectionKind, StaticThemeFolders};
    use emufront_catalog::{GameMetadata, PlatformId, SystemId};
    use emufront_config::CollectionSettings;
    use tempfile::TempDir;

    fn named(manager: &CollectionSystemManager, catalog: &Catalog) -> Vec<String> {
        manager
            .displayed_systems()
            .iter()
            .filter_map(|s| manager.system_name(catalog, s))
            .collect()
    }

    #[test]
    fn test_auto_collections_follow_real_systems() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let catalog = env.scenario_catalog();
        let (view, _log) = RecordingView::new();
        let settings = CollectionSettings {
            auto: "favorites,all".to_string(),
            ..Default::default()
        };
        let mut manager = env.manager(settings, view);
        manager.load_collection_systems(&catalog);

        assert_eq!(
            named(&manager, &catalog),
            vec!["systemA", "systemB", "all", "favorites"]
        );
    }

    #[test]
    fn test_empty_arcade_platforms_are_hidden() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let catalog = env.scenario_catalog();
        let (view, _log) = RecordingView::new();
        let settings = CollectionSettings {
            auto: "zcps2,arcade".to_string(),
            ..Default::default()
        };
        let mut manager = env.manager(settings, view);
        manager.load_collection_systems(&catalog);

        let displayed = manager.displayed_systems();
        assert!(displayed.contains(&SystemRef::Auto("arcade".to_string())));
        assert!(!displayed.contains(&SystemRef::Auto("zcps2".to_string())));
        assert!(manager.auto_collections()["zcps2"].populated);
    }

    #[test]
    fn test_alpha_sort_and_trailing_systems() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let mut catalog = Catalog::new();
        for name in ["snes", "retropie", "Amiga"] {
            let id = catalog.add_system(SystemMetadata::named(name), PlatformId::for_system(name), env.system_dir(name));
            catalog
                .add_game(id, None, env.rom_path(name, "game.rom"), GameMetadata::new())
                .unwrap();
        }
        let (view, _log) = RecordingView::new();
        let settings = CollectionSettings {
            auto: "all".to_string(),
            sort_systems: "alpha".to_string(),
            ..Default::default()
        };
        let mut manager = env.manager(settings, view);
        manager.load_collection_systems(&catalog);

        assert_eq!(
            named(&manager, &catalog),
            vec!["Amiga", "snes", "all", "retropie"]
        );
    }

    #[test]
    fn test_manufacturer_sort() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let mut catalog = Catalog::new();
        for (name, manufacturer, year) in [("snes", "Nintendo", 1990), ("megadrive", "Sega", 1988), ("nes", "Nintendo", 1983)] {
            let metadata = SystemMetadata {
                manufacturer: manufacturer.to_string(),
                release_year: year,
                ..SystemMetadata::named(name)
            };
            catalog.add_system(metadata, PlatformId::for_system(name), env.system_dir(name));
        }
        env.write_flat_collection("mine", &[]);

        let (view, _log) = RecordingView::new();
        let settings = CollectionSettings {
            auto: "all".to_string(),
            custom: "mine".to_string(),
            use_custom_collections_system: false,
            sort_systems: "manufacturer".to_string(),
        };
        let mut manager = env.manager(settings, view);
        manager.load_collection_systems(&catalog);

        assert_eq!(
            named(&manager, &catalog),
            vec!["nes", "snes", "megadrive", "mine", "all"]
        );
    }

    #[test]
    fn test_unthemed_custom_collections_are_bundled() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let catalog = env.scenario_catalog();
        env.write_flat_collection("loose", &[env.rom_path("systemA", "game1.rom")]);
        env.write_flat_collection("themed", &[env.rom_path("systemB", "game1.rom")]);

        let (view, _log) = RecordingView::new();
        let settings = CollectionSettings {
            custom: "loose,themed".to_string(),
            ..Default::default()
        };
        let theme = StaticThemeFolders::new(["themed"]);
        let mut manager = env.manager_with_theme(settings, view, theme);
        manager.load_collection_systems(&catalog);

        let displayed = manager.displayed_systems();
        assert!(displayed.contains(&SystemRef::Custom("themed".to_string())));
        assert!(!displayed.contains(&SystemRef::Custom("loose".to_string())));
        assert!(displayed.contains(&SystemRef::Bundle));
        assert_eq!(manager.bundle().members(), ["loose".to_string()]);
        assert_eq!(manager.bundle().system.index.len(), 1);

        manager.remove_collections_from_displayed_systems();
        assert!(manager.bundle().is_empty());
        assert_eq!(manager.custom_collections()["loose"].system.game_count(), 1);
        assert_eq!(manager.displayed_systems().len(), 2);
        assert!(manager.displayed_systems().iter().all(|s| matches!(s, SystemRef::Real(SystemId(_)))));
    }

    #[test]
    fn test_disabling_edited_collection_exits_edit_mode() {
        let dir = TempDir::new().unwrap();
        let env = TestEnvironment::new(dir.path());
        let catalog = env.scenario_catalog();
        let (view, _log) = RecordingView::new();
        let settings = CollectionSettings {
            custom: "mine".to_string(),
            ..Default::default()
        };
        let mut manager = env.manager(settings, view);
        manager.load_collection_systems(&catalog);
        manager.add_new_custom_collection("mine", CollectionKind::CustomFlat);
        manager.load_enabled_list_from_settings();
        assert!(manager.set_edit_mode(&catalog, "mine"));

        manager.update_systems_list(&catalog);
        assert!(manager.is_editing());

        manager.settings_mut().custom = String::new();
        manager.load_enabled_list_from_settings();
        manager.update_systems_list(&catalog);
        assert!(!manager.is_editing());
    }
}
