//! Collection names and theme folder compatibility

use super::CollectionSystemManager;
use emufront_catalog::Catalog;
use std::collections::BTreeSet;

const DEFAULT_COLLECTION_NAME: &str = "New Collection";
const ALLOWED_PUNCTUATION: &str = "-[]() ";

impl CollectionSystemManager {
    /// Sanitize a user-supplied collection name and make it unique.
    ///
    /// Characters other than ASCII alphanumerics and `-[]() ` are dropped.
    /// Clashes with system names, theme folders or built-in collections
    /// get a ` (n)` suffix.
    pub fn valid_new_collection_name(&self, catalog: &Catalog, name: &str) -> String {
        let mut base: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || ALLOWED_PUNCTUATION.contains(*c))
            .collect();
        if base.trim().is_empty() {
            base = DEFAULT_COLLECTION_NAME.to_string();
        }
        if base != name {
            tracing::info!("Had to change name, from: {} to: {}", name, base);
        }

        let taken = self.names_in_use(catalog);
        let mut candidate = base.clone();
        let mut suffix = 0;
        while taken.contains(&candidate) {
            suffix += 1;
            candidate = format!("{} ({})", base, suffix);
        }
        candidate
    }

    fn names_in_use(&self, catalog: &Catalog) -> BTreeSet<String> {
        let mut taken: BTreeSet<String> = catalog
            .systems()
            .flat_map(|(_, s)| [s.metadata.name.clone(), s.metadata.theme_folder.clone()])
            .collect();
        taken.extend(self.collection_theme_folders(false));
        taken.extend(self.collection_theme_folders(true));
        taken.extend(self.user_collection_theme_folders());
        taken.extend(self.decls.keys().cloned());
        taken
    }

    pub fn theme_folder_exists(&self, folder: &str) -> bool {
        self.theme.has_system_folder(folder)
    }

    /// Theme folders of the built-in custom (or automatic) declarations
    pub fn collection_theme_folders(&self, custom: bool) -> Vec<String> {
        self.decls
            .values()
            .filter(|d| d.is_custom == custom)
            .map(|d| d.theme_folder.clone())
            .collect()
    }

    /// Theme folders of the user's custom collections
    pub fn user_collection_theme_folders(&self) -> Vec<String> {
        self.custom
            .values()
            .map(|r| r.decl.theme_folder.clone())
            .collect()
    }

    /// Whether the theme styles every built-in custom (or automatic) collection
    pub fn is_theme_generic_collection_compatible(&self, generic_custom: bool) -> bool {
        self.collection_theme_folders(generic_custom)
            .iter()
            .all(|f| self.theme_folder_exists(f))
    }

    /// Whether every given custom collection would have a themed view
    pub fn is_theme_custom_collection_compatible(&self, names: &[String]) -> bool {
        if self.is_theme_generic_collection_compatible(true) || self.theme.has_default_theme() {
            return true;
        }
        names.iter().all(|n| self.theme_folder_exists(n))
    }

    /// Theme folders no system or collection uses, candidates for new
    /// custom collection names
    pub fn unused_systems_from_theme(&self, catalog: &Catalog) -> Vec<String> {
        let taken = self.names_in_use(catalog);
        self.theme
            .system_folders()
            .into_iter()
            .filter(|f| !taken.contains(f))
            .collect()
    }
}
