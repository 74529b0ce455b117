//! Logic Registry: binds logic keys to constructors

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::GameSetting;
use crate::error::{SlotError, SlotResult};
use crate::game::{BoxedGameLogic, Game, Machine};
use crate::logic::{CascadeLogic, NormalLogic, demo_cascade, demo_normal};
use crate::rng::Core;

/// Name a game configuration uses to pick its logic
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicKey(pub String);

impl LogicKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LogicKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LogicKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for LogicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Constructor of a logic unit: game setting and simulation flag in
pub type LogicBuilder = fn(&GameSetting, bool) -> SlotResult<BoxedGameLogic>;

/// Registry of logic constructors
///
/// Assembled once at startup and then only read. It is passed by ownership
/// to whatever dispatches spins; there is no global instance.
///
/// ## Usage
///
/// ```rust,ignore
/// let registry = LogicRegistry::builtin()?;
/// let machine = registry.build_machine(setting, true, Core::seeded(7))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogicRegistry {
    builders: HashMap<LogicKey, LogicBuilder>,
}

impl LogicRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `demo_normal` and `demo_cascade`
    pub fn builtin() -> SlotResult<Self> {
        let mut registry = Self::new();
        registry.register(demo_normal::KEY, NormalLogic::build)?;
        registry.register(demo_cascade::KEY, CascadeLogic::build)?;
        log::info!("logic registry ready: {:?}", registry.keys());
        Ok(registry)
    }

    /// Register a constructor; a key can be bound only once
    pub fn register(&mut self, key: impl Into<LogicKey>, builder: LogicBuilder) -> SlotResult<()> {
        let key = key.into();
        if self.builders.contains_key(&key) {
            return Err(SlotError::AlreadyRegistered(key));
        }
        self.builders.insert(key, builder);
        Ok(())
    }

    pub fn has(&self, key: &LogicKey) -> bool {
        self.builders.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<&LogicKey> {
        let mut keys: Vec<_> = self.builders.keys().collect();
        keys.sort();
        keys
    }

    /// Construct the logic a setting names
    pub fn build_logic(&self, setting: &GameSetting, is_sim: bool) -> SlotResult<BoxedGameLogic> {
        let builder = self
            .builders
            .get(&setting.logic)
            .ok_or_else(|| SlotError::UnknownLogic(setting.logic.clone()))?;
        builder(setting, is_sim)
    }

    /// Construct the substrate and logic for a setting
    pub fn build_machine(
        &self,
        setting: GameSetting,
        is_sim: bool,
        core: Core,
    ) -> SlotResult<Machine> {
        let logic = self.build_logic(&setting, is_sim)?;
        let game = Game::new(setting, core, is_sim)?;
        Ok(Machine::new(game, logic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keys() {
        let registry = LogicRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.has(&LogicKey::from("demo_normal")));
        assert!(registry.has(&LogicKey::from("demo_cascade")));
        assert_eq!(
            registry.keys(),
            vec![&LogicKey::from("demo_cascade"), &LogicKey::from("demo_normal")]
        );
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = LogicRegistry::builtin().unwrap();
        let err = registry
            .register("demo_normal", CascadeLogic::build)
            .unwrap_err();
        assert!(matches!(err, SlotError::AlreadyRegistered(key) if key.as_str() == "demo_normal"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_logic() {
        let registry = LogicRegistry::new();
        assert!(registry.is_empty());
        let setting =
            GameSetting::from_yaml_str(include_str!("../configs/demo_0.yaml")).unwrap();
        let err = registry
            .build_machine(setting, true, Core::seeded(1))
            .err()
            .unwrap();
        assert!(matches!(err, SlotError::UnknownLogic(_)));
    }

    #[test]
    fn test_key_serde_is_plain_string() {
        let key: LogicKey = serde_json::from_str("\"demo_cascade\"").unwrap();
        assert_eq!(key, LogicKey::new("demo_cascade"));
        assert_eq!(key.to_string(), "demo_cascade");
    }
}
