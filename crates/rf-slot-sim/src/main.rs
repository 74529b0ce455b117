//! Slot simulator
//!
//! Usage:
//!   rf-slot-sim --list                       - List configured games
//!   rf-slot-sim --game 1 --spins 1000000     - Machine run on all cores
//!   rf-slot-sim --game 0 --players 1000      - Player-session run

use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rf_slot_logic::{PlayerStats, SimStats, Simulator, SlotLab};

#[derive(Parser, Debug)]
#[command(name = "rf-slot-sim", about = "Simulate spins of a configured slot game")]
struct Cli {
    /// Target game id
    #[arg(long, default_value_t = 0)]
    game: u32,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    worker: Option<usize>,

    /// Spins per worker, or per player in a player run
    #[arg(long, default_value_t = 1_000_000)]
    spins: u64,

    /// Bet mode index
    #[arg(long, default_value_t = 0)]
    mode: usize,

    /// Seed; random when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Simulate player sessions instead of one long machine run
    #[arg(long, default_value_t = 1)]
    players: usize,

    /// Starting balance per player, in bets
    #[arg(long, default_value_t = 200)]
    bets: i64,

    /// Print the stats as JSON
    #[arg(long)]
    json: bool,

    /// List configured games and exit
    #[arg(long)]
    list: bool,
}

impl Cli {
    fn validate(&self) -> Result<usize> {
        let workers = self.worker.unwrap_or_else(num_cpus::get);
        if workers < 1 {
            bail!("workers must be > 0");
        }
        if self.spins < 1 {
            bail!("spins must be > 0");
        }
        if self.players < 1 {
            bail!("players must be > 0");
        }
        if self.players > 1 && self.bets < 1 {
            bail!("balance must be >= 1 bet");
        }
        Ok(workers)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let lab = SlotLab::builtin().context("failed to load game catalog")?;

    if cli.list {
        for game in lab.summary() {
            println!(
                "{:>4}  {:<16} {:<14} {}",
                game.game_id, game.name, game.logic, game.config_name
            );
        }
        return Ok(());
    }

    let workers = cli.validate()?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    let entry = lab
        .entry_by_id(cli.game)
        .with_context(|| format!("unknown game id {}", cli.game))?;
    let sim = Simulator::new(&lab, cli.game, seed)?;
    log::info!("seed {seed}");

    let started = Instant::now();
    if cli.players == 1 {
        println!(
            "[GAME:{}] [WORKERS:{}] [PLAYMODE:{}] [SPINS:{}]",
            entry.name,
            workers,
            cli.mode,
            cli.spins * workers as u64
        );
        let stats = if workers == 1 {
            sim.run(cli.mode, cli.spins)?
        } else {
            sim.run_parallel(cli.mode, cli.spins, workers)?
        };
        report_machine(&stats, started, cli.json)?;
    } else {
        println!(
            "[GAME:{}] [WORKERS:{}] [PLAYERS:{} BALANCE:{} PLAYMODE:{} SPINS:{}]",
            entry.name, workers, cli.players, cli.bets, cli.mode, cli.spins
        );
        let stats = sim.run_players(cli.mode, cli.players, cli.bets, cli.spins, workers)?;
        report_players(&stats, started, cli.json)?;
    }
    Ok(())
}

fn report_machine(stats: &SimStats, started: Instant, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }
    let secs = started.elapsed().as_secs_f64();
    println!("spins        {}", stats.spins);
    println!("rtp          {:.4}%", stats.rtp());
    println!("hit rate     {:.4}%", stats.hit_rate());
    println!("trigger rate {:.4}%", stats.trigger_rate());
    println!("free win     {}", stats.free_win);
    println!("max win      {}", stats.max_win);
    println!(
        "elapsed      {secs:.2}s ({:.0} spins/s)",
        stats.spins as f64 / secs.max(f64::EPSILON)
    );
    Ok(())
}

fn report_players(stats: &PlayerStats, started: Instant, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }
    println!("players      {}", stats.players);
    println!("survival     {:.2}%", stats.survival_rate());
    println!("avg spins    {:.1}", stats.avg_spins());
    println!("avg balance  {:.4}x", stats.avg_balance_ratio());
    println!("elapsed      {:.2}s", started.elapsed().as_secs_f64());
    Ok(())
}
