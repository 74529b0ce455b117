//! Round, mode and spin result accumulation

use serde::{Deserialize, Serialize};

use crate::screen::Screen;
use crate::symbols::SymbolId;

/// What an act closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActKind {
    /// Plain record, the pending step stays open
    FinishAct,
    /// Record and commit the pending step win
    FinishStep,
}

/// One recorded action within a round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Act {
    pub kind: ActKind,
    pub label: String,
    /// Screen copy at the time of the act
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<Vec<SymbolId>>,
    /// Pending step win at the time of the act
    pub win: i64,
    /// Logic-specific payload (extension state snapshot)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<serde_json::Value>,
}

/// A finished round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundResult {
    pub acts: Vec<Act>,
    pub win: i64,
    /// Number of committed steps
    pub steps: u32,
}

impl RoundResult {
    /// Labels of the recorded acts, in order
    pub fn labels(&self) -> Vec<&str> {
        self.acts.iter().map(|a| a.label.as_str()).collect()
    }
}

/// Result of one mode for one spin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameModeResult {
    /// Mode index (0 = base, 1 = free)
    pub mode: usize,
    pub rounds: Vec<RoundResult>,
    pub total_win: i64,
    /// Non-zero when the mode triggered a feature
    pub trigger: u32,
}

impl GameModeResult {
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }
}

/// Accumulator for the mode currently being played
///
/// Evaluators add wins and hit positions to the pending step; acts of kind
/// [`ActKind::FinishStep`] and the lifecycle calls commit them.
#[derive(Debug, Clone)]
pub struct ModeResult {
    mode: usize,
    record_history: bool,
    tmp_win: i64,
    hit_map: Vec<usize>,
    round_win: i64,
    round_steps: u32,
    acts: Vec<Act>,
    rounds: Vec<RoundResult>,
    total_win: i64,
    /// Trigger code of the current mode result
    pub trigger: u32,
}

impl ModeResult {
    /// `record_history = false` skips act recording (simulation mode)
    pub fn new(mode: usize, screen_size: usize, record_history: bool) -> Self {
        Self {
            mode,
            record_history,
            tmp_win: 0,
            hit_map: Vec::with_capacity(screen_size),
            round_win: 0,
            round_steps: 0,
            acts: Vec::new(),
            rounds: Vec::new(),
            total_win: 0,
            trigger: 0,
        }
    }

    pub fn mode(&self) -> usize {
        self.mode
    }

    pub fn records_history(&self) -> bool {
        self.record_history
    }

    /// Record an act. `FinishStep` acts commit the pending step afterwards.
    pub fn add_act(
        &mut self,
        kind: ActKind,
        label: &str,
        screen: Option<&Screen>,
        extra: Option<serde_json::Value>,
    ) {
        if self.record_history {
            self.acts.push(Act {
                kind,
                label: label.to_string(),
                screen: screen.map(|s| s.cells().to_vec()),
                win: self.tmp_win,
                extra,
            });
        }
        if kind == ActKind::FinishStep {
            self.finish_step();
        }
    }

    /// Add a win and its contributing cells to the pending step
    pub fn add_win(&mut self, amount: i64, positions: impl IntoIterator<Item = usize>) {
        self.tmp_win = self.tmp_win.saturating_add(amount);
        self.hit_map.extend(positions);
    }

    /// Win of the pending step
    pub fn tmp_win(&self) -> i64 {
        self.tmp_win
    }

    /// Cells that contributed to the pending step's wins
    pub fn hit_map_tmp(&self) -> &[usize] {
        &self.hit_map
    }

    /// Add an amount to the pending step without hit cells
    pub fn update_tmp_win(&mut self, amount: i64) {
        self.tmp_win = self.tmp_win.saturating_add(amount);
    }

    /// Commit the pending step into the current round
    pub fn finish_step(&mut self) {
        self.round_win = self.round_win.saturating_add(self.tmp_win);
        self.round_steps += 1;
        self.tmp_win = 0;
        self.hit_map.clear();
    }

    /// Commit a pending step if any and close the current round
    pub fn finish_round(&mut self) {
        if self.tmp_win != 0 || !self.hit_map.is_empty() {
            self.finish_step();
        }
        self.total_win = self.total_win.saturating_add(self.round_win);
        self.rounds.push(RoundResult {
            acts: std::mem::take(&mut self.acts),
            win: self.round_win,
            steps: self.round_steps,
        });
        self.round_win = 0;
        self.round_steps = 0;
    }

    /// Win of the round in progress, committed steps only
    pub fn round_win(&self) -> i64 {
        self.round_win
    }

    pub fn total_win(&self) -> i64 {
        self.total_win
    }

    /// Hand out the finished mode result and reset for the next spin
    pub fn yield_result(&mut self) -> GameModeResult {
        if !self.acts.is_empty() || self.round_win != 0 || self.tmp_win != 0 {
            log::warn!("mode {} yielded with an open round; closing it", self.mode);
            self.finish_round();
        }
        let result = GameModeResult {
            mode: self.mode,
            rounds: std::mem::take(&mut self.rounds),
            total_win: self.total_win,
            trigger: self.trigger,
        };
        self.total_win = 0;
        self.trigger = 0;
        result
    }

    /// Drop everything accumulated so far, finished rounds included
    ///
    /// Used when a spin starts so nothing left by an aborted spin leaks
    /// into the next result.
    pub fn clear(&mut self) {
        self.tmp_win = 0;
        self.hit_map.clear();
        self.round_win = 0;
        self.round_steps = 0;
        self.acts.clear();
        self.rounds.clear();
        self.total_win = 0;
        self.trigger = 0;
    }

    /// Whether nothing is pending or finished
    pub fn is_clear(&self) -> bool {
        self.tmp_win == 0
            && self.hit_map.is_empty()
            && self.round_win == 0
            && self.round_steps == 0
            && self.acts.is_empty()
            && self.rounds.is_empty()
            && self.total_win == 0
            && self.trigger == 0
    }
}

/// Request for one spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinRequest {
    /// Bet mode index into the game's bet units
    pub bet_mode: usize,
    /// Bet multiplier applied to every pay
    pub bet_mult: i64,
}

impl SpinRequest {
    pub fn new(bet_mode: usize, bet_mult: i64) -> Self {
        Self { bet_mode, bet_mult }
    }
}

impl Default for SpinRequest {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

/// Complete spin result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinResult {
    pub request: SpinRequest,
    /// Cost of the spin
    pub bet: i64,
    pub modes: Vec<GameModeResult>,
    pub total_win: i64,
    /// Set by [`SpinResult::end`]
    pub ended: bool,
}

impl SpinResult {
    pub fn new(request: SpinRequest, bet: i64) -> Self {
        Self {
            request,
            bet,
            modes: Vec::with_capacity(2),
            total_win: 0,
            ended: false,
        }
    }

    pub fn append_mode_result(&mut self, result: GameModeResult) {
        self.modes.push(result);
    }

    /// Close the spin and total its wins
    pub fn end(&mut self) {
        self.total_win = self.modes.iter().map(|m| m.total_win).sum();
        self.ended = true;
    }

    pub fn is_win(&self) -> bool {
        self.total_win > 0
    }

    /// Whether the base mode triggered a feature
    pub fn triggered(&self) -> bool {
        self.modes.first().is_some_and(|m| m.trigger != 0)
    }

    /// Mode result by mode index
    pub fn mode(&self, mode: usize) -> Option<&GameModeResult> {
        self.modes.iter().find(|m| m.mode == mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_step_act_commits_pending_win() {
        let mut mr = ModeResult::new(0, 4, true);
        mr.add_win(5, [0, 1]);
        assert_eq!(mr.tmp_win(), 5);
        assert_eq!(mr.hit_map_tmp(), &[0, 1]);

        mr.add_act(ActKind::FinishAct, "win", None, None);
        assert_eq!(mr.tmp_win(), 5);

        mr.add_act(ActKind::FinishStep, "clear", None, None);
        assert_eq!(mr.tmp_win(), 0);
        assert!(mr.hit_map_tmp().is_empty());
        assert_eq!(mr.round_win(), 5);
    }

    #[test]
    fn test_round_and_yield() {
        let mut mr = ModeResult::new(1, 4, true);
        mr.add_act(ActKind::FinishAct, "screen", None, None);
        mr.update_tmp_win(3);
        mr.finish_round();
        mr.finish_round();

        let result = mr.yield_result();
        assert_eq!(result.mode, 1);
        assert_eq!(result.round_count(), 2);
        assert_eq!(result.rounds[0].win, 3);
        assert_eq!(result.rounds[0].labels(), vec!["screen"]);
        assert_eq!(result.total_win, 3);

        // Reset for the next spin
        let next = mr.yield_result();
        assert_eq!(next.round_count(), 0);
        assert_eq!(next.total_win, 0);
    }

    #[test]
    fn test_no_history_still_commits() {
        let mut mr = ModeResult::new(0, 4, false);
        mr.add_win(7, [2]);
        mr.add_act(ActKind::FinishStep, "clear", None, None);
        mr.finish_round();
        let result = mr.yield_result();
        assert!(result.rounds[0].acts.is_empty());
        assert_eq!(result.total_win, 7);
    }

    #[test]
    fn test_clear_drops_partial_spin() {
        let mut mr = ModeResult::new(1, 4, true);
        mr.add_win(8, [0, 1]);
        mr.add_act(ActKind::FinishAct, "win", None, None);
        mr.finish_round();
        mr.trigger = 1;
        mr.add_win(4, [3]);
        mr.add_act(ActKind::FinishStep, "clear", None, None);
        mr.add_act(ActKind::FinishAct, "gravity", None, None);
        assert!(!mr.is_clear());

        mr.clear();
        assert!(mr.is_clear());
        let result = mr.yield_result();
        assert_eq!(result.round_count(), 0);
        assert_eq!(result.total_win, 0);
        assert_eq!(result.trigger, 0);
    }

    #[test]
    fn test_spin_result_totals() {
        let mut sr = SpinResult::new(SpinRequest::new(0, 2), 20);
        sr.append_mode_result(GameModeResult {
            mode: 0,
            rounds: Vec::new(),
            total_win: 10,
            trigger: 1,
        });
        sr.append_mode_result(GameModeResult {
            mode: 1,
            rounds: Vec::new(),
            total_win: 30,
            trigger: 0,
        });
        assert!(!sr.ended);
        sr.end();
        assert!(sr.ended);
        assert_eq!(sr.total_win, 40);
        assert!(sr.triggered());
        assert_eq!(sr.mode(1).map(|m| m.total_win), Some(30));
    }
}
