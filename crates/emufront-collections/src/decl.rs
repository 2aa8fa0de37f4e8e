//! Built-in collection declarations

use emufront_catalog::ARCADE_SYSTEMS;
use std::sync::OnceLock;

/// Short name of the bundle system and of the custom collection template
pub const CUSTOM_COLLECTIONS_NAME: &str = "collections";

/// Numeric ids of arcade platform collections start here
pub const ARCADE_PLATFORM_OFFSET: u32 = 1000;

/// Ordering applied to a collection's entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    FilenameAscending,
    /// Oldest play first
    LastPlayedAscending,
    /// Most recent play first
    LastPlayedDescending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    AllGames,
    LastPlayed,
    Favorites,
    At2Players,
    At4Players,
    NeverPlayed,
    Arcade,
    /// One arcade board, by platform id
    ArcadePlatform(u32),
    /// User collection with an explicit member list
    CustomFlat,
    /// User collection driven by a filter definition
    CustomFilter,
}

impl CollectionKind {
    pub fn id(&self) -> u32 {
        match self {
            CollectionKind::AllGames => 0,
            CollectionKind::LastPlayed => 1,
            CollectionKind::Favorites => 2,
            CollectionKind::At2Players => 3,
            CollectionKind::At4Players => 4,
            CollectionKind::NeverPlayed => 5,
            CollectionKind::Arcade => 6,
            CollectionKind::CustomFlat => 7,
            CollectionKind::CustomFilter => 8,
            CollectionKind::ArcadePlatform(id) => ARCADE_PLATFORM_OFFSET + id,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, CollectionKind::CustomFlat | CollectionKind::CustomFilter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDeclaration {
    pub kind: CollectionKind,
    pub short_name: String,
    pub display_name: String,
    pub default_sort: SortOrder,
    pub theme_folder: String,
    pub is_custom: bool,
    pub display_when_empty: bool,
}

impl CollectionDeclaration {
    fn builtin(
        kind: CollectionKind,
        short_name: &str,
        display_name: &str,
        default_sort: SortOrder,
        theme_folder: &str,
    ) -> Self {
        Self {
            kind,
            short_name: short_name.to_string(),
            display_name: display_name.to_string(),
            default_sort,
            theme_folder: theme_folder.to_string(),
            is_custom: kind.is_custom(),
            display_when_empty: true,
        }
    }

    /// Declaration for a user collection, derived from the custom template
    pub fn custom(name: &str, kind: CollectionKind) -> Self {
        let mut decl = declaration(CUSTOM_COLLECTIONS_NAME)
            .cloned()
            .unwrap_or_else(|| {
                Self::builtin(
                    CollectionKind::CustomFlat,
                    CUSTOM_COLLECTIONS_NAME,
                    "collections",
                    SortOrder::FilenameAscending,
                    "custom-collections",
                )
            });
        decl.kind = kind;
        decl.short_name = name.to_string();
        decl.display_name = name.to_string();
        decl.theme_folder = name.to_string();
        decl
    }
}

static DECLARATIONS: OnceLock<Vec<CollectionDeclaration>> = OnceLock::new();

/// Every built-in declaration: the fixed table, then one per arcade platform
pub fn declarations() -> &'static [CollectionDeclaration] {
    DECLARATIONS.get_or_init(|| {
        use CollectionKind::*;
        use SortOrder::*;

        let mut decls = vec![
            CollectionDeclaration::builtin(AllGames, "all", "all games", FilenameAscending, "auto-allgames"),
            CollectionDeclaration::builtin(LastPlayed, "recent", "last played", LastPlayedDescending, "auto-lastplayed"),
            CollectionDeclaration::builtin(Favorites, "favorites", "favorites", FilenameAscending, "auto-favorites"),
            CollectionDeclaration::builtin(At2Players, "2players", "2 players", FilenameAscending, "auto-at2players"),
            CollectionDeclaration::builtin(At4Players, "4players", "4 players", FilenameAscending, "auto-at4players"),
            CollectionDeclaration::builtin(NeverPlayed, "neverplayed", "never played", FilenameAscending, "auto-neverplayed"),
            CollectionDeclaration::builtin(Arcade, "arcade", "arcade", FilenameAscending, "arcade"),
            CollectionDeclaration::builtin(CustomFlat, CUSTOM_COLLECTIONS_NAME, "collections", FilenameAscending, "custom-collections"),
        ];

        for platform in ARCADE_SYSTEMS {
            decls.push(CollectionDeclaration {
                kind: ArcadePlatform(platform.id),
                short_name: format!("z{}", platform.name),
                display_name: platform.long_name.to_string(),
                default_sort: FilenameAscending,
                theme_folder: platform.name.to_string(),
                is_custom: false,
                display_when_empty: false,
            });
        }

        decls
    })
}

pub fn declaration(short_name: &str) -> Option<&'static CollectionDeclaration> {
    declarations().iter().find(|d| d.short_name == short_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_table_order() {
        let names: Vec<&str> = declarations()
            .iter()
            .take(8)
            .map(|d| d.short_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["all", "recent", "favorites", "2players", "4players", "neverplayed", "arcade", "collections"]
        );
    }

    #[test]
    fn test_arcade_platforms_follow_registry() {
        let platforms: Vec<&CollectionDeclaration> = declarations()
            .iter()
            .filter(|d| matches!(d.kind, CollectionKind::ArcadePlatform(_)))
            .collect();
        assert_eq!(platforms.len(), ARCADE_SYSTEMS.len());

        for (decl, platform) in platforms.iter().zip(ARCADE_SYSTEMS) {
            assert_eq!(decl.short_name, format!("z{}", platform.name));
            assert_eq!(decl.theme_folder, platform.name);
            assert!(!decl.display_when_empty);
            assert!(decl.kind.id() > ARCADE_PLATFORM_OFFSET);
        }
    }

    #[test]
    fn test_declarations_are_stable() {
        assert!(std::ptr::eq(declarations(), declarations()));
        assert!(declaration("favorites").is_some());
        assert!(declaration("nope").is_none());
    }

    #[test]
    fn test_custom_declaration() {
        let decl = CollectionDeclaration::custom("shmups", CollectionKind::CustomFilter);
        assert!(decl.is_custom);
        assert_eq!(decl.theme_folder, "shmups");
        assert_eq!(decl.kind, CollectionKind::CustomFilter);
        assert!(decl.display_when_empty);
    }
}
