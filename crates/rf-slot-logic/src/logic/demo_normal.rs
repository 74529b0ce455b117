//! `demo_normal`: single-pass base and free rounds
//!
//! Free mode unlocks when the base screen shows more than two scatters
//! unless the game configures another rule.

use crate::config::GameSetting;
use crate::error::{SlotError, SlotResult};
use crate::game::{BASE_MODE, BoxedGameLogic, Game, GameLogic};
use crate::result::{SpinRequest, SpinResult};
use crate::trigger::TriggerRule;

use super::fixed::{FixedConfig, FixedParams};
use super::orchestrator::RoundOrchestrator;

/// Registry key of this variant
pub const KEY: &str = "demo_normal";

/// Non-cascading logic
#[derive(Debug, Clone)]
pub struct NormalLogic {
    rounds: RoundOrchestrator,
}

impl NormalLogic {
    pub fn default_rule() -> TriggerRule {
        TriggerRule::above(2)
    }

    pub fn new(setting: &GameSetting, is_sim: bool) -> SlotResult<Self> {
        let params: FixedParams = setting.decode_fixed()?;
        if params.max_cascade_steps != 0 {
            return Err(SlotError::config(format!(
                "game '{}': {KEY} does not cascade, max_cascade_steps must be 0",
                setting.game_name
            )));
        }
        let fixed = FixedConfig::build(setting, params, Self::default_rule())?;
        let screen_size = setting.mode(BASE_MODE)?.screen.size();
        Ok(Self {
            rounds: RoundOrchestrator::new(fixed, screen_size, is_sim)?,
        })
    }

    /// Registry builder
    pub fn build(setting: &GameSetting, is_sim: bool) -> SlotResult<BoxedGameLogic> {
        Ok(Box::new(Self::new(setting, is_sim)?))
    }

    pub fn orchestrator(&self) -> &RoundOrchestrator {
        &self.rounds
    }
}

impl GameLogic for NormalLogic {
    fn get_result(&mut self, request: &SpinRequest, game: &mut Game) -> SlotResult<SpinResult> {
        self.rounds.get_result(request, game)
    }
}
