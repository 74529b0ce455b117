//! # rf-slot-logic: Cascading Round Engine for slot math
//!
//! Plays spins of configured slot games: base rounds, cascades, scatter
//! triggers and free rounds, with deterministic seeding for simulation.
//!
//! ## Features
//!
//! - **Cascade Step Machine**: evaluate → clear → gravity → refill, bounded by a step cap
//! - **Trigger Evaluation**: scatter counting with an explicit `>` / `>=` rule
//! - **Round Orchestrator**: base mode plus conditional free mode per spin
//! - **Logic Registry**: logic keys bound to constructors, no global state
//! - **Simulation**: machine and player-session runs, parallel over workers
//!
//! ## Architecture
//!
//! ```text
//! SlotLab (catalog)
//!     │
//!     ├── LogicRegistry (logic key → builder)
//!     └── GameSetting (YAML: modes, reels, pays, fixed section)
//!           │
//!           v
//!     Machine
//!     ├── Game (PRNG core, mode handlers, result accumulators)
//!     └── GameLogic (NormalLogic | CascadeLogic)
//!           └── RoundOrchestrator
//!                 ├── FixedConfig + fill buffers
//!                 ├── TriggerEvaluator + ScatterState
//!                 └── cascade::run_round
//!           │
//!           v
//!     SpinResult
//! ```

pub mod cascade;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ext;
pub mod game;
pub mod logic;
pub mod ops;
pub mod paytable;
pub mod reels;
pub mod registry;
pub mod result;
pub mod rng;
pub mod screen;
pub mod sim;
pub mod symbols;
pub mod trigger;

pub use cascade::{FillBuffers, RoundOutcome, run_round};
pub use catalog::{CatalogEntry, GameSummary, SlotLab};
pub use config::*;
pub use error::{SlotError, SlotResult};
pub use ext::{ExtensionState, ScatterState};
pub use game::*;
pub use logic::{CascadeLogic, FixedConfig, FixedParams, NormalLogic, RoundOrchestrator};
pub use paytable::*;
pub use reels::*;
pub use registry::{LogicBuilder, LogicKey, LogicRegistry};
pub use result::*;
pub use rng::Core;
pub use screen::*;
pub use sim::{PlayerStats, SimStats, Simulator};
pub use symbols::*;
pub use trigger::*;
