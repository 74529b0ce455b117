//! Simulation runs
//!
//! Machine-level runs accumulate [`SimStats`]; player runs replay short
//! sessions on a fixed starting balance and report [`PlayerStats`]. Parallel
//! runs give every worker its own machine, seeded `seed + worker`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::SlotLab;
use crate::error::{SlotError, SlotResult};
use crate::game::{FREE_MODE, Machine};
use crate::result::{SpinRequest, SpinResult};

/// Most players a single player run simulates
pub const MAX_PLAYERS: usize = 100_000;
/// Most spins per player in a player run
pub const MAX_PLAYER_SPINS: u64 = 15_000;

/// Machine-level statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimStats {
    pub spins: u64,
    pub total_bet: i64,
    pub total_win: i64,
    /// Spins with a positive win
    pub hits: u64,
    /// Spins whose base mode triggered free mode
    pub triggers: u64,
    /// Part of `total_win` paid in free mode
    pub free_win: i64,
    pub max_win: i64,
}

impl SimStats {
    pub fn record(&mut self, spin: &SpinResult) {
        self.spins += 1;
        self.total_bet += spin.bet;
        self.total_win += spin.total_win;
        if spin.is_win() {
            self.hits += 1;
        }
        if spin.triggered() {
            self.triggers += 1;
        }
        if let Some(free) = spin.mode(FREE_MODE) {
            self.free_win += free.total_win;
        }
        self.max_win = self.max_win.max(spin.total_win);
    }

    /// Return to player, percent
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            (self.total_win as f64 / self.total_bet as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Winning spins, percent
    pub fn hit_rate(&self) -> f64 {
        self.per_spin(self.hits)
    }

    /// Triggering spins, percent
    pub fn trigger_rate(&self) -> f64 {
        self.per_spin(self.triggers)
    }

    pub fn merge(&mut self, other: &SimStats) {
        self.spins += other.spins;
        self.total_bet += other.total_bet;
        self.total_win += other.total_win;
        self.hits += other.hits;
        self.triggers += other.triggers;
        self.free_win += other.free_win;
        self.max_win = self.max_win.max(other.max_win);
    }

    fn per_spin(&self, count: u64) -> f64 {
        if self.spins > 0 {
            (count as f64 / self.spins as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Player-session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub players: u64,
    /// Players who could no longer afford a spin before their session ended
    pub busted: u64,
    pub spins_played: u64,
    pub start_balance: i64,
    /// Sum of final balances over all players
    pub final_balance: i64,
}

impl PlayerStats {
    /// Players still funded at the end, percent
    pub fn survival_rate(&self) -> f64 {
        if self.players > 0 {
            ((self.players - self.busted) as f64 / self.players as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn avg_spins(&self) -> f64 {
        if self.players > 0 {
            self.spins_played as f64 / self.players as f64
        } else {
            0.0
        }
    }

    /// Average final balance over the starting balance
    pub fn avg_balance_ratio(&self) -> f64 {
        if self.players > 0 && self.start_balance > 0 {
            self.final_balance as f64 / (self.players as f64 * self.start_balance as f64)
        } else {
            0.0
        }
    }

    pub fn merge(&mut self, other: &PlayerStats) {
        self.players += other.players;
        self.busted += other.busted;
        self.spins_played += other.spins_played;
        self.start_balance = self.start_balance.max(other.start_balance);
        self.final_balance += other.final_balance;
    }
}

/// Simulation driver for one catalog game
pub struct Simulator<'a> {
    lab: &'a SlotLab,
    game_id: u32,
    seed: u64,
}

impl<'a> Simulator<'a> {
    pub fn new(lab: &'a SlotLab, game_id: u32, seed: u64) -> SlotResult<Self> {
        if lab.entry_by_id(game_id).is_none() {
            return Err(SlotError::UnknownGame(game_id));
        }
        Ok(Self { lab, game_id, seed })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn machine(&self, worker: u64) -> SlotResult<Machine> {
        self.lab
            .new_machine(self.game_id, true, Some(self.seed.wrapping_add(worker)))
    }

    /// Play `spins` spins on a single machine
    pub fn run(&self, bet_mode: usize, spins: u64) -> SlotResult<SimStats> {
        let mut machine = self.machine(0)?;
        spin_many(&mut machine, bet_mode, spins)
    }

    /// Play `spins` spins on each of `workers` machines and merge the stats
    pub fn run_parallel(&self, bet_mode: usize, spins: u64, workers: usize) -> SlotResult<SimStats> {
        let workers = workers.max(1);
        let parts = self.install(workers, || {
            (0..workers as u64)
                .into_par_iter()
                .map(|worker| {
                    let mut machine = self.machine(worker)?;
                    spin_many(&mut machine, bet_mode, spins)
                })
                .collect::<SlotResult<Vec<_>>>()
        })?;

        let mut total = SimStats::default();
        for part in &parts {
            total.merge(part);
        }
        log::debug!("{workers} workers finished {} spins", total.spins);
        Ok(total)
    }

    /// Simulate `players` sessions of up to `spins` spins each, every player
    /// starting with `balance_bets` times the spin cost.
    pub fn run_players(
        &self,
        bet_mode: usize,
        players: usize,
        balance_bets: i64,
        spins: u64,
        workers: usize,
    ) -> SlotResult<PlayerStats> {
        if balance_bets < 1 {
            return Err(SlotError::config("player balance must be >= 1 bet"));
        }
        let players = if players > MAX_PLAYERS {
            log::warn!("{players} players requested, capped at {MAX_PLAYERS}");
            MAX_PLAYERS
        } else {
            players
        };
        let spins = if spins > MAX_PLAYER_SPINS {
            log::warn!("{spins} spins per player requested, capped at {MAX_PLAYER_SPINS}");
            MAX_PLAYER_SPINS
        } else {
            spins
        };
        let workers = workers.clamp(1, players.max(1));

        let parts = self.install(workers, || {
            (0..workers)
                .into_par_iter()
                .map(|worker| {
                    let mut machine = self.machine(worker as u64)?;
                    let share = (worker..players).step_by(workers).count();
                    play_sessions(&mut machine, bet_mode, share, balance_bets, spins)
                })
                .collect::<SlotResult<Vec<_>>>()
        })?;

        let mut total = PlayerStats::default();
        for part in &parts {
            total.merge(part);
        }
        Ok(total)
    }

    fn install<T: Send>(
        &self,
        workers: usize,
        job: impl FnOnce() -> SlotResult<T> + Send,
    ) -> SlotResult<T> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| SlotError::config(format!("worker pool: {e}")))?;
        pool.install(job)
    }
}

fn spin_many(machine: &mut Machine, bet_mode: usize, spins: u64) -> SlotResult<SimStats> {
    let request = SpinRequest::new(bet_mode, 1);
    let mut stats = SimStats::default();
    for _ in 0..spins {
        let spin = machine.spin(&request)?;
        stats.record(&spin);
    }
    Ok(stats)
}

fn play_sessions(
    machine: &mut Machine,
    bet_mode: usize,
    players: usize,
    balance_bets: i64,
    spins: u64,
) -> SlotResult<PlayerStats> {
    let request = SpinRequest::new(bet_mode, 1);
    let bet = machine.game().setting().bet_unit(bet_mode)?;
    let start = bet * balance_bets;
    let mut stats = PlayerStats {
        start_balance: start,
        ..PlayerStats::default()
    };

    for _ in 0..players {
        let mut balance = start;
        let mut played = 0u64;
        while played < spins && balance >= bet {
            let spin = machine.spin(&request)?;
            balance += spin.total_win - spin.bet;
            played += 1;
        }
        stats.players += 1;
        stats.spins_played += played;
        stats.final_balance += balance;
        if played < spins {
            stats.busted += 1;
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_rates() {
        let stats = SimStats {
            spins: 200,
            total_bet: 2000,
            total_win: 1900,
            hits: 50,
            triggers: 2,
            free_win: 300,
            max_win: 400,
        };
        assert!((stats.rtp() - 95.0).abs() < 1e-9);
        assert!((stats.hit_rate() - 25.0).abs() < 1e-9);
        assert!((stats.trigger_rate() - 1.0).abs() < 1e-9);
        assert_eq!(SimStats::default().rtp(), 0.0);
    }

    #[test]
    fn test_merge_keeps_max() {
        let mut a = SimStats {
            spins: 1,
            max_win: 10,
            ..SimStats::default()
        };
        let b = SimStats {
            spins: 2,
            max_win: 30,
            ..SimStats::default()
        };
        a.merge(&b);
        assert_eq!(a.spins, 3);
        assert_eq!(a.max_win, 30);
    }

    #[test]
    fn test_run_is_reproducible() {
        let lab = SlotLab::builtin().unwrap();
        let sim = Simulator::new(&lab, 1, 1234).unwrap();
        let a = sim.run(0, 300).unwrap();
        let b = sim.run(0, 300).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.spins, 300);
        assert_eq!(a.total_bet, 300 * 20);
    }

    #[test]
    fn test_parallel_matches_per_worker_runs() {
        let lab = SlotLab::builtin().unwrap();
        let sim = Simulator::new(&lab, 0, 77).unwrap();
        let parallel = sim.run_parallel(0, 100, 3).unwrap();
        assert_eq!(parallel.spins, 300);

        let mut sequential = SimStats::default();
        for worker in 0..3u64 {
            let mut machine = sim.machine(worker).unwrap();
            sequential.merge(&spin_many(&mut machine, 0, 100).unwrap());
        }
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_player_sessions() {
        let lab = SlotLab::builtin().unwrap();
        let sim = Simulator::new(&lab, 0, 5).unwrap();
        let stats = sim.run_players(0, 10, 50, 100, 2).unwrap();
        assert_eq!(stats.players, 10);
        assert_eq!(stats.start_balance, 500);
        assert!(stats.spins_played <= 1000);
        assert!(stats.busted <= 10);
        assert!(stats.final_balance >= 0);
        assert!(sim.run_players(0, 1, 0, 10, 1).is_err());
    }

    #[test]
    fn test_unknown_game() {
        let lab = SlotLab::builtin().unwrap();
        assert!(Simulator::new(&lab, 42, 0).is_err());
    }
}
