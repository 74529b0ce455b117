//! Round orchestration
//!
//! ```text
//! get_result(request)
//!   ├── start_new_spin
//!   ├── base:  run_round → trigger? → scatter pay + "trigger" act → yield
//!   ├── free:  (only if base triggered)
//!   │          free_rounds × run_round [→ "retrigger" when enabled] → yield
//!   └── end
//! ```

use crate::cascade::{FillBuffers, run_round};
use crate::error::{SlotError, SlotResult};
use crate::ext::{ExtensionState, ScatterState};
use crate::game::{BASE_MODE, FREE_MODE, Game, ModeHandler};
use crate::paytable::scaled_pay;
use crate::result::{ActKind, GameModeResult, SpinRequest, SpinResult};
use crate::trigger::{TRIGGER_FREE, TriggerEvaluator};

use super::fixed::FixedConfig;

/// Base/free state machine shared by the logic variants
#[derive(Debug, Clone)]
pub struct RoundOrchestrator {
    fixed: FixedConfig,
    base_trigger: TriggerEvaluator,
    /// Present only when free rounds may retrigger
    free_trigger: Option<TriggerEvaluator>,
    ext: ScatterState,
}

impl RoundOrchestrator {
    pub fn new(fixed: FixedConfig, screen_size: usize, is_sim: bool) -> SlotResult<Self> {
        let base_trigger = TriggerEvaluator::new(fixed.table(BASE_MODE)?.clone(), fixed.trigger);
        let free_trigger = if fixed.free_retrigger {
            Some(TriggerEvaluator::new(fixed.table(FREE_MODE)?.clone(), fixed.trigger))
        } else {
            None
        };
        Ok(Self {
            fixed,
            base_trigger,
            free_trigger,
            ext: ScatterState::new(screen_size, is_sim),
        })
    }

    pub fn fixed(&self) -> &FixedConfig {
        &self.fixed
    }

    /// Extension state left by the last trigger evaluation
    pub fn ext(&self) -> &ScatterState {
        &self.ext
    }

    /// Play one spin: base mode, then free mode if base triggered
    pub fn get_result(&mut self, request: &SpinRequest, game: &mut Game) -> SlotResult<SpinResult> {
        let mut spin = game.start_new_spin(request)?;

        let base = self.play_base(game, request.bet_mult)?;
        let triggered = base.trigger != 0;
        spin.append_mode_result(base);

        if triggered {
            let free = self.play_free(game, request.bet_mult)?;
            spin.append_mode_result(free);
        }

        spin.end();
        Ok(spin)
    }

    fn play_base(&mut self, game: &mut Game, bet_mult: i64) -> SlotResult<GameModeResult> {
        let max_steps = self.fixed.max_cascade_steps;
        let scatter_pay = scaled_pay(self.fixed.scatter_pay, bet_mult)?;
        let (mode, core) = game.mode(BASE_MODE)?;
        let buffers = mode_buffers(&mut self.fixed.buffers, BASE_MODE)?;

        let outcome = run_round(mode, core, buffers, max_steps, bet_mult)?;
        let code = self.base_trigger.evaluate(&outcome.screen, &mut self.ext)?;
        mode.result.trigger = code;
        if code != 0 {
            log::debug!(
                "base triggered with {} scatters after {} passes",
                self.ext.scatter_count(),
                outcome.passes
            );
            record_trigger(mode, &self.ext, "trigger", scatter_pay)?;
        }
        mode.result.finish_round();
        Ok(mode.result.yield_result())
    }

    fn play_free(&mut self, game: &mut Game, bet_mult: i64) -> SlotResult<GameModeResult> {
        let max_steps = self.fixed.max_cascade_steps;
        let award = self.fixed.free_rounds;
        let cap = self.fixed.free_round_cap;
        let scatter_pay = scaled_pay(self.fixed.scatter_pay, bet_mult)?;
        let (mode, core) = game.mode(FREE_MODE)?;
        let buffers = mode_buffers(&mut self.fixed.buffers, FREE_MODE)?;
        self.ext.reset();

        log::debug!("entering free mode with {award} rounds");
        let mut remaining = award;
        let mut played = 0u32;
        while remaining > 0 {
            remaining -= 1;
            let outcome = run_round(mode, core, buffers, max_steps, bet_mult)?;
            played += 1;

            if let Some(trigger) = &self.free_trigger {
                if trigger.evaluate(&outcome.screen, &mut self.ext)? != 0 {
                    let room = cap.saturating_sub(played + remaining);
                    let granted = award.min(room);
                    if granted < award {
                        log::warn!(
                            "free round cap {cap} reached, retrigger granted {granted} of {award}"
                        );
                    }
                    remaining += granted;
                    mode.result.trigger = TRIGGER_FREE;
                    record_trigger(mode, &self.ext, "retrigger", scatter_pay)?;
                }
            }
            mode.result.finish_round();
        }
        log::trace!("free mode played {played} rounds");
        Ok(mode.result.yield_result())
    }
}

fn mode_buffers(buffers: &mut [FillBuffers], mode: usize) -> SlotResult<&mut FillBuffers> {
    buffers
        .get_mut(mode)
        .ok_or_else(|| SlotError::invariant(format!("no fill buffers for mode {mode}")))
}

/// Pay the scatter award into the open round and record the extension state
fn record_trigger<E: ExtensionState>(
    mode: &mut ModeHandler,
    ext: &E,
    label: &str,
    payout: i64,
) -> SlotResult<()> {
    mode.result.update_tmp_win(payout);
    let extra = ext.snapshot_value()?;
    mode.result.add_act(ActKind::FinishAct, label, None, extra);
    Ok(())
}
