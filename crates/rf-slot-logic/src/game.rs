//! Game substrate and the logic interface
//!
//! ```text
//! Machine
//!     │
//!     ├── Game (setting, PRNG core, one ModeHandler per mode)
//!     │     └── ModeHandler (generator, evaluator, refill reels, ModeResult)
//!     └── Box<dyn GameLogic>
//!           │
//!           v
//!     get_result(request) → SpinResult
//! ```

use crate::config::{GameModeSetting, GameSetting};
use crate::error::{SlotError, SlotResult};
use crate::paytable::{PayoutEvaluator, evaluator_for};
use crate::reels::ReelSet;
use crate::result::{ModeResult, SpinRequest, SpinResult};
use crate::rng::Core;
use crate::screen::{ReelScreenGenerator, ScreenGenerator};

/// Base mode index
pub const BASE_MODE: usize = 0;
/// Free mode index
pub const FREE_MODE: usize = 1;

/// Services and result accumulator of one play mode
pub struct ModeHandler {
    pub setting: GameModeSetting,
    pub generator: Box<dyn ScreenGenerator>,
    pub evaluator: Box<dyn PayoutEvaluator>,
    /// Reel set used by cascade refill, if the mode configures one
    pub refill: Option<ReelSet>,
    pub result: ModeResult,
}

impl ModeHandler {
    pub fn from_setting(index: usize, setting: &GameModeSetting, is_sim: bool) -> SlotResult<Self> {
        let gen_set = ReelSet::from_setting(setting.reel_set(setting.gen_reel_set)?);
        let refill = setting
            .refill_reel_set
            .map(|idx| setting.reel_set(idx).map(ReelSet::from_setting))
            .transpose()?;
        Ok(Self {
            generator: Box::new(ReelScreenGenerator::new(gen_set, setting.screen)),
            evaluator: evaluator_for(setting),
            refill,
            result: ModeResult::new(index, setting.screen.size(), !is_sim),
            setting: setting.clone(),
        })
    }

    pub fn columns(&self) -> usize {
        self.setting.screen.columns
    }

    pub fn rows(&self) -> usize {
        self.setting.screen.rows
    }
}

/// Runtime substrate a logic plays against
pub struct Game {
    setting: GameSetting,
    core: Core,
    modes: Vec<ModeHandler>,
    is_sim: bool,
}

impl Game {
    pub fn new(setting: GameSetting, core: Core, is_sim: bool) -> SlotResult<Self> {
        setting.validate()?;
        let modes = setting
            .modes
            .iter()
            .enumerate()
            .map(|(idx, mode)| ModeHandler::from_setting(idx, mode, is_sim))
            .collect::<SlotResult<Vec<_>>>()?;
        Ok(Self {
            setting,
            core,
            modes,
            is_sim,
        })
    }

    pub fn setting(&self) -> &GameSetting {
        &self.setting
    }

    pub fn is_sim(&self) -> bool {
        self.is_sim
    }

    pub fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    /// Mode handler together with the PRNG core
    pub fn mode(&mut self, idx: usize) -> SlotResult<(&mut ModeHandler, &mut Core)> {
        let mode = self
            .modes
            .get_mut(idx)
            .ok_or_else(|| SlotError::invariant(format!("no mode handler at index {idx}")))?;
        Ok((mode, &mut self.core))
    }

    /// Replace the screen generator of a mode
    pub fn set_generator(
        &mut self,
        idx: usize,
        generator: Box<dyn ScreenGenerator>,
    ) -> SlotResult<()> {
        let (mode, _) = self.mode(idx)?;
        mode.generator = generator;
        Ok(())
    }

    /// Open a spin record for a request
    ///
    /// Every mode's accumulator is cleared first, so a spin that aborted
    /// halfway leaves nothing behind.
    pub fn start_new_spin(&mut self, request: &SpinRequest) -> SlotResult<SpinResult> {
        if request.bet_mult < 1 {
            return Err(SlotError::InvalidRequest(format!(
                "bet multiplier must be >= 1, got {}",
                request.bet_mult
            )));
        }
        let unit = self.setting.bet_unit(request.bet_mode).map_err(|_| {
            SlotError::InvalidRequest(format!("unknown bet mode {}", request.bet_mode))
        })?;
        let bet = unit.checked_mul(request.bet_mult).ok_or_else(|| {
            SlotError::InvalidRequest(format!(
                "bet unit {unit} x bet multiplier {} overflows",
                request.bet_mult
            ))
        })?;
        for mode in &mut self.modes {
            mode.result.clear();
        }
        Ok(SpinResult::new(*request, bet))
    }
}

/// A game variant's round logic
///
/// One instance serves one caller at a time; it is reused across sequential
/// spins of the same machine.
pub trait GameLogic: Send {
    /// Play one spin to completion
    fn get_result(&mut self, request: &SpinRequest, game: &mut Game) -> SlotResult<SpinResult>;
}

/// Boxed logic for dynamic dispatch
pub type BoxedGameLogic = Box<dyn GameLogic + 'static>;

/// A game substrate bound to its logic
pub struct Machine {
    game: Game,
    logic: BoxedGameLogic,
}

impl Machine {
    pub fn new(game: Game, logic: BoxedGameLogic) -> Self {
        Self { game, logic }
    }

    /// Execute a spin
    pub fn spin(&mut self, request: &SpinRequest) -> SlotResult<SpinResult> {
        self.logic.get_result(request, &mut self.game)
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }
}
