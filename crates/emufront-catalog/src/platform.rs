//! Platform identifiers and the arcade platform registry

/// Platform tags attached to a system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformId {
    /// Entries of this system are never part of automatic collections
    Ignore,
    Arcade,

    // Nintendo
    Nes,
    Snes,
    N64,
    GameBoy,
    GameBoyColor,
    GameBoyAdvance,
    Nds,

    // Sega
    MasterSystem,
    Genesis,
    GameGear,
    Saturn,
    Dreamcast,

    // Sony
    Psx,
    Psp,

    // Other
    NeoGeo,
    PcEngine,
    Atari2600,
    Dos,
}

impl PlatformId {
    /// Platform tags for a system directory name
    pub fn for_system(name: &str) -> Vec<PlatformId> {
        match name.to_lowercase().as_str() {
            "nes" | "famicom" => vec![PlatformId::Nes],
            "snes" | "sfc" => vec![PlatformId::Snes],
            "n64" => vec![PlatformId::N64],
            "gb" => vec![PlatformId::GameBoy],
            "gbc" => vec![PlatformId::GameBoyColor],
            "gba" => vec![PlatformId::GameBoyAdvance],
            "nds" => vec![PlatformId::Nds],
            "mastersystem" | "sms" => vec![PlatformId::MasterSystem],
            "megadrive" | "genesis" => vec![PlatformId::Genesis],
            "gamegear" | "gg" => vec![PlatformId::GameGear],
            "saturn" => vec![PlatformId::Saturn],
            "dreamcast" => vec![PlatformId::Dreamcast],
            "psx" => vec![PlatformId::Psx],
            "psp" => vec![PlatformId::Psp],
            "pcengine" | "pce" => vec![PlatformId::PcEngine],
            "atari2600" => vec![PlatformId::Atari2600],
            "dos" => vec![PlatformId::Dos],
            "neogeo" => vec![PlatformId::Arcade, PlatformId::NeoGeo],
            "mame" | "fbneo" | "arcade" | "naomi" | "atomiswave" | "model2" | "model3" | "cps1"
            | "cps2" | "cps3" | "daphne" => vec![PlatformId::Arcade],
            "kodi" | "imageviewer" | "retropie" | "retrobat" => vec![PlatformId::Ignore],
            _ => Vec::new(),
        }
    }
}

/// A known arcade board, used to build per-platform collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcadePlatform {
    pub id: u32,
    /// Short name, matched against a game's `arcade_system_name`
    pub name: &'static str,
    pub long_name: &'static str,
}

/// Arcade boards in registration order
pub const ARCADE_SYSTEMS: &[ArcadePlatform] = &[
    ArcadePlatform { id: 1, name: "atomiswave", long_name: "Sammy Atomiswave" },
    ArcadePlatform { id: 2, name: "cps1", long_name: "Capcom Play System" },
    ArcadePlatform { id: 3, name: "cps2", long_name: "Capcom Play System II" },
    ArcadePlatform { id: 4, name: "cps3", long_name: "Capcom Play System III" },
    ArcadePlatform { id: 5, name: "dataeast", long_name: "Data East" },
    ArcadePlatform { id: 6, name: "irem", long_name: "Irem" },
    ArcadePlatform { id: 7, name: "konami", long_name: "Konami" },
    ArcadePlatform { id: 8, name: "midway", long_name: "Midway" },
    ArcadePlatform { id: 9, name: "model2", long_name: "Sega Model 2" },
    ArcadePlatform { id: 10, name: "model3", long_name: "Sega Model 3" },
    ArcadePlatform { id: 11, name: "namco", long_name: "Namco" },
    ArcadePlatform { id: 12, name: "naomi", long_name: "Sega NAOMI" },
    ArcadePlatform { id: 13, name: "neogeo", long_name: "SNK Neo-Geo" },
    ArcadePlatform { id: 14, name: "sega", long_name: "Sega Classics" },
    ArcadePlatform { id: 15, name: "taito", long_name: "Taito" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platforms_for_system() {
        assert_eq!(PlatformId::for_system("GBA"), vec![PlatformId::GameBoyAdvance]);
        assert!(PlatformId::for_system("neogeo").contains(&PlatformId::Arcade));
        assert_eq!(PlatformId::for_system("kodi"), vec![PlatformId::Ignore]);
        assert!(PlatformId::for_system("unknown").is_empty());
    }

    #[test]
    fn test_arcade_registry_ids_unique() {
        let mut ids: Vec<u32> = ARCADE_SYSTEMS.iter().map(|p| p.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), ARCADE_SYSTEMS.len());
        assert!(ARCADE_SYSTEMS.iter().any(|p| p.name == "cps2"));
    }
}
