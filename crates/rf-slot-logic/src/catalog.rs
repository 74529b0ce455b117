//! Game catalog
//!
//! Maps game ids to their configuration and builds machines for them.

use serde::Serialize;

use crate::config::GameSetting;
use crate::error::{SlotError, SlotResult};
use crate::game::Machine;
use crate::registry::{LogicKey, LogicRegistry};
use crate::rng::Core;

/// Embedded demo configurations, `(config name, YAML)`
pub const BUILTIN_CONFIGS: [(&str, &str); 2] = [
    ("demo_0.yaml", include_str!("../configs/demo_0.yaml")),
    ("demo_1.yaml", include_str!("../configs/demo_1.yaml")),
];

/// One configured game
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub game_id: u32,
    pub name: String,
    /// File the setting came from
    pub config_name: String,
    pub setting: GameSetting,
}

/// Listing line for a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub game_id: u32,
    pub name: String,
    pub logic: LogicKey,
    pub config_name: String,
    pub modes: usize,
}

/// Registry plus configured games
#[derive(Debug, Clone)]
pub struct SlotLab {
    registry: LogicRegistry,
    entries: Vec<CatalogEntry>,
}

impl SlotLab {
    /// Built-in logics with the embedded demo configurations
    pub fn builtin() -> SlotResult<Self> {
        Self::from_sources(LogicRegistry::builtin()?, BUILTIN_CONFIGS)
    }

    /// Build from `(config name, YAML)` pairs.
    ///
    /// Every config must name a registered logic, and game ids must be unique.
    pub fn from_sources<'a>(
        registry: LogicRegistry,
        sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> SlotResult<Self> {
        let mut entries: Vec<CatalogEntry> = Vec::new();
        for (config_name, yaml) in sources {
            let setting = GameSetting::from_yaml_str(yaml).map_err(|e| match e {
                SlotError::Config(msg) => SlotError::Config(format!("{config_name}: {msg}")),
                other => other,
            })?;
            if !registry.has(&setting.logic) {
                return Err(SlotError::UnknownLogic(setting.logic.clone()));
            }
            if entries.iter().any(|e| e.game_id == setting.game_id) {
                return Err(SlotError::DuplicateGame(setting.game_id));
            }
            entries.push(CatalogEntry {
                game_id: setting.game_id,
                name: setting.game_name.clone(),
                config_name: config_name.to_string(),
                setting,
            });
        }
        entries.sort_by_key(|e| e.game_id);
        log::info!("catalog loaded {} games", entries.len());
        Ok(Self { registry, entries })
    }

    pub fn registry(&self) -> &LogicRegistry {
        &self.registry
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry_by_id(&self, game_id: u32) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.game_id == game_id)
    }

    /// One summary per game, ordered by id
    pub fn summary(&self) -> Vec<GameSummary> {
        self.entries
            .iter()
            .map(|e| GameSummary {
                game_id: e.game_id,
                name: e.name.clone(),
                logic: e.setting.logic.clone(),
                config_name: e.config_name.clone(),
                modes: e.setting.modes.len(),
            })
            .collect()
    }

    /// Fresh machine for a game; `seed = None` seeds from the OS
    pub fn new_machine(&self, game_id: u32, is_sim: bool, seed: Option<u64>) -> SlotResult<Machine> {
        let entry = self
            .entry_by_id(game_id)
            .ok_or(SlotError::UnknownGame(game_id))?;
        let core = match seed {
            Some(seed) => Core::seeded(seed),
            None => Core::from_os_rng(),
        };
        self.registry
            .build_machine(entry.setting.clone(), is_sim, core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_entries() {
        let lab = SlotLab::builtin().unwrap();
        assert_eq!(lab.entry_by_id(0).unwrap().config_name, "demo_0.yaml");
        assert_eq!(lab.entry_by_id(1).unwrap().config_name, "demo_1.yaml");
        assert!(lab.entry_by_id(2).is_none());
    }

    #[test]
    fn test_summary_logic_keys() {
        let lab = SlotLab::builtin().unwrap();
        let summary = lab.summary();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].logic, LogicKey::from("demo_normal"));
        assert_eq!(summary[1].logic, LogicKey::from("demo_cascade"));
        assert!(summary.iter().all(|s| s.modes == 2));
    }

    #[test]
    fn test_new_machine_for_every_game() {
        let lab = SlotLab::builtin().unwrap();
        for id in [0, 1] {
            let machine = lab.new_machine(id, true, Some(42)).unwrap();
            assert!(machine.game().is_sim());
            assert_eq!(machine.game().setting().game_id, id);
        }
        assert!(matches!(
            lab.new_machine(9, true, None).err().unwrap(),
            SlotError::UnknownGame(9)
        ));
    }

    #[test]
    fn test_duplicate_game_id() {
        let yaml = BUILTIN_CONFIGS[0].1;
        let err = SlotLab::from_sources(
            LogicRegistry::builtin().unwrap(),
            [("a.yaml", yaml), ("b.yaml", yaml)],
        )
        .unwrap_err();
        assert!(matches!(err, SlotError::DuplicateGame(0)));
    }

    #[test]
    fn test_unregistered_logic() {
        let err = SlotLab::from_sources(LogicRegistry::new(), BUILTIN_CONFIGS).unwrap_err();
        assert!(matches!(err, SlotError::UnknownLogic(_)));
    }
}
