//! `demo_cascade`: cascading rounds with a paying scatter trigger

use crate::config::GameSetting;
use crate::error::SlotResult;
use crate::game::{BASE_MODE, BoxedGameLogic, Game, GameLogic};
use crate::result::{SpinRequest, SpinResult};
use crate::trigger::TriggerRule;

use super::fixed::{FixedConfig, FixedParams};
use super::orchestrator::RoundOrchestrator;

/// Registry key of this variant
pub const KEY: &str = "demo_cascade";

/// Cascading logic; every mode refills from its `refill_reel_set`
#[derive(Debug, Clone)]
pub struct CascadeLogic {
    rounds: RoundOrchestrator,
}

impl CascadeLogic {
    pub fn default_rule() -> TriggerRule {
        TriggerRule::at_least(3)
    }

    pub fn new(setting: &GameSetting, is_sim: bool) -> SlotResult<Self> {
        let params: FixedParams = setting.decode_fixed()?;
        if params.max_cascade_steps == 0 {
            log::warn!(
                "game '{}': {KEY} with max_cascade_steps 0 plays single-pass rounds",
                setting.game_name
            );
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

impl GameLogic for CascadeLogic {
    fn get_result(&mut self, request: &SpinRequest, game: &mut Game) -> SlotResult<SpinResult> {
        self.rounds.get_result(request, game)
    }
}
