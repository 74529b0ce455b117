//! Fixed configuration of a logic unit
//!
//! Decoded once from the `fixed` section of a [`GameSetting`]. Everything here
//! is read-only after construction except the per-mode fill buffers, which
//! are round-scoped scratch.

use serde::Deserialize;

use crate::cascade::FillBuffers;
use crate::config::GameSetting;
use crate::error::{SlotError, SlotResult};
use crate::game::FREE_MODE;
use crate::symbols::SymbolTable;
use crate::trigger::{TriggerCompare, TriggerRule};

fn default_free_round_cap() -> u32 {
    500
}

/// `fixed:` section as written in YAML
///
/// Counts are unsigned, so a negative value fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixedParams {
    /// Free rounds awarded per trigger
    pub free_rounds: u32,
    /// Cascade cap per round; 0 plays a single pass
    #[serde(default)]
    pub max_cascade_steps: u32,
    /// Scatter threshold; the variant supplies the default
    #[serde(default)]
    pub trigger_count: Option<u32>,
    #[serde(default)]
    pub trigger_compare: Option<TriggerCompare>,
    /// Trigger payout per unit of bet multiplier
    #[serde(default)]
    pub scatter_pay: u32,
    /// Let free rounds award further free rounds
    #[serde(default)]
    pub free_retrigger: bool,
    /// Upper bound on free rounds played in one spin
    #[serde(default = "default_free_round_cap")]
    pub free_round_cap: u32,
}

impl FixedParams {
    /// Plain params with the given free round count
    pub fn new(free_rounds: u32) -> Self {
        Self {
            free_rounds,
            max_cascade_steps: 0,
            trigger_count: None,
            trigger_compare: None,
            scatter_pay: 0,
            free_retrigger: false,
            free_round_cap: default_free_round_cap(),
        }
    }
}

/// Resolved, validated configuration owned by one logic unit
#[derive(Debug, Clone)]
pub struct FixedConfig {
    pub free_rounds: u32,
    pub max_cascade_steps: u32,
    pub trigger: TriggerRule,
    pub scatter_pay: i64,
    pub free_retrigger: bool,
    pub free_round_cap: u32,
    /// Symbol classification per mode
    pub tables: Vec<SymbolTable>,
    /// Refill scratch per mode, sized to that mode's columns
    pub(crate) buffers: Vec<FillBuffers>,
}

impl FixedConfig {
    /// Resolve `params` against the game setting.
    ///
    /// `default_rule` fills in a missing threshold or comparison.
    pub fn build(
        setting: &GameSetting,
        params: FixedParams,
        default_rule: TriggerRule,
    ) -> SlotResult<Self> {
        let game = &setting.game_name;
        if setting.modes.len() <= FREE_MODE {
            return Err(SlotError::config(format!(
                "game '{game}': a base and a free mode are required"
            )));
        }

        let threshold = params
            .trigger_count
            .map(|c| c as usize)
            .unwrap_or(default_rule.threshold);
        if threshold == 0 {
            return Err(SlotError::config(format!(
                "game '{game}': trigger_count must be >= 1"
            )));
        }
        let trigger = TriggerRule {
            compare: params.trigger_compare.unwrap_or(default_rule.compare),
            threshold,
        };

        if params.free_round_cap < params.free_rounds {
            return Err(SlotError::config(format!(
                "game '{game}': free_round_cap {} is below free_rounds {}",
                params.free_round_cap, params.free_rounds
            )));
        }

        if params.max_cascade_steps > 0 {
            if let Some(mode) = setting.modes.iter().find(|m| m.refill_reel_set.is_none()) {
                return Err(SlotError::config(format!(
                    "game '{game}': mode '{}' needs refill_reel_set to cascade",
                    mode.name
                )));
            }
        }

        if !setting.has_scatter() {
            log::warn!("game '{game}': base mode has no scatter symbol, free mode is unreachable");
        }

        Ok(Self {
            free_rounds: params.free_rounds,
            max_cascade_steps: params.max_cascade_steps,
            trigger,
            scatter_pay: i64::from(params.scatter_pay),
            free_retrigger: params.free_retrigger,
            free_round_cap: params.free_round_cap,
            tables: setting.modes.iter().map(|m| m.symbol_table()).collect(),
            buffers: setting
                .modes
                .iter()
                .map(|m| FillBuffers::new(m.screen.columns))
                .collect(),
        })
    }

    /// Symbol table of a mode
    pub fn table(&self, mode: usize) -> SlotResult<&SymbolTable> {
        self.tables
            .get(mode)
            .ok_or_else(|| SlotError::invariant(format!("no symbol table for mode {mode}")))
    }

    /// Fill buffers of a mode
    pub fn buffers(&self, mode: usize) -> Option<&FillBuffers> {
        self.buffers.get(mode)
    }
}
