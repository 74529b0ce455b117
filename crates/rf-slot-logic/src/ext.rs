//! Per-machine extension state
//!
//! A small scratch record that a logic keeps across spins. It is reset once
//! per trigger evaluation and leaves the machine only through
//! [`ExtensionState::snapshot`].

use serde::{Deserialize, Serialize};

/// Resettable, snapshot-able extension state
pub trait ExtensionState {
    /// Detached copy handed out for history/replay
    type Snapshot: Serialize;

    /// Clear counters, keeping allocated storage
    fn reset(&mut self);

    /// Independent copy of the current state, `None` when no history is kept
    fn snapshot(&self) -> Option<Self::Snapshot>;

    /// Snapshot encoded for a result act
    fn snapshot_value(&self) -> serde_json::Result<Option<serde_json::Value>> {
        self.snapshot().map(serde_json::to_value).transpose()
    }
}

/// Scatter trigger state
///
/// `scatter_count` always equals `scatter_hits.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScatterState {
    #[serde(rename = "is_trigger")]
    triggered: bool,
    #[serde(rename = "scatters")]
    scatter_count: usize,
    scatter_hits: Vec<usize>,
    #[serde(skip)]
    is_sim: bool,
}

impl ScatterState {
    /// `screen_size` pre-sizes the hit buffer; `is_sim` disables snapshots
    pub fn new(screen_size: usize, is_sim: bool) -> Self {
        Self {
            triggered: false,
            scatter_count: 0,
            scatter_hits: Vec::with_capacity(screen_size),
            is_sim,
        }
    }

    /// Record a scatter at a cell; positions arrive in scan order
    pub fn record_scatter_hit(&mut self, position: usize) {
        self.scatter_count += 1;
        self.scatter_hits.push(position);
    }

    pub fn set_triggered(&mut self) {
        self.triggered = true;
    }

    pub fn triggered(&self) -> bool {
        self.triggered
    }

    pub fn scatter_count(&self) -> usize {
        self.scatter_count
    }

    pub fn scatter_hits(&self) -> &[usize] {
        &self.scatter_hits
    }

    pub fn is_sim(&self) -> bool {
        self.is_sim
    }

    /// Allocated hit buffer capacity
    pub fn capacity(&self) -> usize {
        self.scatter_hits.capacity()
    }
}

impl ExtensionState for ScatterState {
    type Snapshot = ScatterState;

    fn reset(&mut self) {
        self.triggered = false;
        self.scatter_count = 0;
        self.scatter_hits.clear();
    }

    fn snapshot(&self) -> Option<ScatterState> {
        if self.is_sim {
            return None;
        }
        Some(ScatterState {
            triggered: self.triggered,
            scatter_count: self.scatter_count,
            scatter_hits: self.scatter_hits.clone(),
            is_sim: false,
        })
    }
}
