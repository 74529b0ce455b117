//! Cascade step machine
//!
//! Drives one round: generate a screen, then evaluate → stop check → clear →
//! gravity → refill until a pass wins nothing or the step cap is reached.
//! A cap of 0 is the single-pass (non-cascading) case.

use crate::error::{SlotError, SlotResult};
use crate::game::ModeHandler;
use crate::ops;
use crate::result::{ActKind, ModeResult};
use crate::rng::Core;
use crate::screen::Screen;

/// Per-column refill scratch, reused across rounds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillBuffers {
    /// Strip cursor per column
    pub fill_idx: Vec<usize>,
    /// Empty cells per column after gravity
    pub fill_pos: Vec<usize>,
}

impl FillBuffers {
    pub fn new(columns: usize) -> Self {
        Self {
            fill_idx: vec![0; columns],
            fill_pos: vec![0; columns],
        }
    }

    /// Zero both buffers
    pub fn reset(&mut self) {
        self.fill_idx.fill(0);
        self.fill_pos.fill(0);
    }

    pub fn columns(&self) -> usize {
        self.fill_idx.len()
    }
}

/// What a round left behind
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    /// Final screen, input to trigger evaluation
    pub screen: Screen,
    /// Evaluation passes made
    pub passes: u32,
    /// Clear/gravity/refill cycles made
    pub cascades: u32,
}

/// Play one round on `mode`.
///
/// Every pass is committed into the mode's result; closing the round
/// (`finish_round`) is left to the caller so it can record trigger acts first.
pub fn run_round(
    mode: &mut ModeHandler,
    core: &mut Core,
    buffers: &mut FillBuffers,
    max_steps: u32,
    bet_mult: i64,
) -> SlotResult<RoundOutcome> {
    buffers.reset();

    let mut screen = mode.generator.gen_screen(core);
    if screen.columns() != buffers.columns() {
        return Err(SlotError::invariant(format!(
            "generated screen has {} columns, fill buffers have {}",
            screen.columns(),
            buffers.columns()
        )));
    }
    screen_act(&mut mode.result, ActKind::FinishAct, "gen_screen", &screen);

    let refill = if max_steps > 0 {
        let set = mode.refill.as_ref().ok_or_else(|| {
            SlotError::invariant(format!(
                "mode '{}' cascades without a refill reel set",
                mode.setting.name
            ))
        })?;
        set.pick_stops(core, &mut buffers.fill_idx);
        Some(set)
    } else {
        None
    };

    let mut passes = 0u32;
    let mut cascades = 0u32;
    loop {
        mode.evaluator.calc_screen(bet_mult, &screen, &mut mode.result)?;
        passes += 1;

        if mode.result.tmp_win() == 0 {
            mode.result.finish_step();
            break;
        }
        mode.result.add_act(ActKind::FinishAct, "win", None, None);

        let set = match refill {
            Some(set) if cascades < max_steps => set,
            _ => {
                mode.result.finish_step();
                break;
            }
        };

        ops::clear(&mut screen, mode.result.hit_map_tmp())?;
        screen_act(&mut mode.result, ActKind::FinishStep, "clear", &screen);

        ops::gravity(&mut screen, &mut buffers.fill_pos)?;
        screen_act(&mut mode.result, ActKind::FinishAct, "gravity", &screen);

        ops::fill_screen(&mut screen, set, &buffers.fill_pos, &mut buffers.fill_idx)?;
        screen_act(&mut mode.result, ActKind::FinishAct, "fill_screen", &screen);

        cascades += 1;
        log::trace!("mode {} cascade {}", mode.result.mode(), cascades);
    }

    Ok(RoundOutcome {
        screen,
        passes,
        cascades,
    })
}

fn screen_act(result: &mut ModeResult, kind: ActKind, label: &str, screen: &Screen) {
    result.add_act(kind, label, Some(screen), None);
}
