//! Declarative game configuration
//!
//! A game is described by one YAML document: shared settings, one
//! [`GameModeSetting`] per play mode (index 0 = base, 1 = free) and a
//! logic-specific `fixed` section that the selected logic decodes itself.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::registry::LogicKey;
use crate::symbols::{SymbolId, SymbolKind, SymbolSetting, SymbolTable};

/// Screen geometry (columns × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSetting {
    /// Number of columns (reels)
    pub columns: usize,
    /// Number of visible rows per column
    pub rows: usize,
}

impl ScreenSetting {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    /// Total cell count
    pub fn size(&self) -> usize {
        self.columns * self.rows
    }
}

/// How a mode's screen is paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayMode {
    /// Left-to-right paylines, wilds substitute
    #[default]
    Lines,
    /// N-of-a-kind anywhere on the screen
    Anywhere,
}

fn default_min_count() -> usize {
    3
}

/// Pay evaluation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaySetting {
    #[serde(default)]
    pub mode: PayMode,
    /// Minimum match count that pays
    #[serde(default = "default_min_count")]
    pub min_count: usize,
    /// Payline row positions per column (lines mode only)
    #[serde(default)]
    pub lines: Vec<Vec<usize>>,
}

impl Default for PaySetting {
    fn default() -> Self {
        Self {
            mode: PayMode::Lines,
            min_count: default_min_count(),
            lines: Vec::new(),
        }
    }
}

/// A set of reel strips, one per column
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReelSetSetting {
    #[serde(default)]
    pub name: String,
    pub reels: Vec<Vec<SymbolId>>,
}

/// Per-mode settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameModeSetting {
    #[serde(default)]
    pub name: String,
    pub screen: ScreenSetting,
    pub symbols: Vec<SymbolSetting>,
    #[serde(default)]
    pub pay: PaySetting,
    pub reel_sets: Vec<ReelSetSetting>,
    /// Reel set used to generate fresh screens
    #[serde(default)]
    pub gen_reel_set: usize,
    /// Reel set used to refill cleared cells during cascades
    #[serde(default)]
    pub refill_reel_set: Option<usize>,
}

impl GameModeSetting {
    /// Symbol classification table for this mode
    pub fn symbol_table(&self) -> SymbolTable {
        SymbolTable::from_settings(&self.symbols)
    }

    pub fn reel_set(&self, idx: usize) -> SlotResult<&ReelSetSetting> {
        self.reel_sets.get(idx).ok_or_else(|| {
            SlotError::config(format!("mode '{}': no reel set at index {}", self.name, idx))
        })
    }

    fn validate(&self, index: usize) -> SlotResult<()> {
        let name = if self.name.is_empty() {
            format!("#{index}")
        } else {
            self.name.clone()
        };
        let screen = self.screen;
        if screen.columns == 0 || screen.rows == 0 {
            return Err(SlotError::config(format!(
                "mode '{name}': screen must have at least one column and one row"
            )));
        }
        if self.symbols.is_empty() {
            return Err(SlotError::config(format!("mode '{name}': no symbols")));
        }
        if self.symbols.len() >= EMPTY_GUARD {
            return Err(SlotError::config(format!(
                "mode '{name}': too many symbols ({})",
                self.symbols.len()
            )));
        }
        if self.pay.min_count == 0 {
            return Err(SlotError::config(format!(
                "mode '{name}': pay.min_count must be >= 1"
            )));
        }
        if self.reel_sets.is_empty() {
            return Err(SlotError::config(format!("mode '{name}': no reel sets")));
        }
        for (set_idx, set) in self.reel_sets.iter().enumerate() {
            if set.reels.len() != screen.columns {
                return Err(SlotError::config(format!(
                    "mode '{name}': reel set {set_idx} has {} strips for {} columns",
                    set.reels.len(),
                    screen.columns
                )));
            }
            for (col, strip) in set.reels.iter().enumerate() {
                if strip.is_empty() {
                    return Err(SlotError::config(format!(
                        "mode '{name}': reel set {set_idx} strip {col} is empty"
                    )));
                }
                if let Some(bad) = strip.iter().find(|&&s| s as usize >= self.symbols.len()) {
                    return Err(SlotError::config(format!(
                        "mode '{name}': reel set {set_idx} strip {col} has unknown symbol {bad}"
                    )));
                }
            }
        }
        self.reel_set(self.gen_reel_set)?;
        if let Some(refill) = self.refill_reel_set {
            self.reel_set(refill)?;
        }
        if self.pay.mode == PayMode::Lines {
            if self.pay.lines.is_empty() {
                return Err(SlotError::config(format!(
                    "mode '{name}': lines mode needs at least one payline"
                )));
            }
            for (line_idx, line) in self.pay.lines.iter().enumerate() {
                if line.len() != screen.columns || line.iter().any(|&r| r >= screen.rows) {
                    return Err(SlotError::config(format!(
                        "mode '{name}': payline {line_idx} does not fit a {}x{} screen",
                        screen.columns, screen.rows
                    )));
                }
            }
        }
        Ok(())
    }
}

// Symbol ids must stay below the EMPTY_CELL marker.
const EMPTY_GUARD: usize = crate::symbols::EMPTY_CELL as usize;

/// Complete game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSetting {
    pub game_id: u32,
    pub game_name: String,
    /// Logic key this game is built with
    pub logic: LogicKey,
    /// Spin cost per bet mode at bet multiplier 1
    #[serde(default = "default_bet_units")]
    pub bet_units: Vec<i64>,
    pub modes: Vec<GameModeSetting>,
    /// Logic-specific parameters
    #[serde(default)]
    pub fixed: serde_yml::Value,
}

fn default_bet_units() -> Vec<i64> {
    vec![1]
}

impl GameSetting {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> SlotResult<Self> {
        let setting: GameSetting = serde_yml::from_str(yaml)?;
        setting.validate()?;
        Ok(setting)
    }

    /// Read, parse and validate a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> SlotResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> SlotResult<()> {
        if self.modes.is_empty() {
            return Err(SlotError::config(format!(
                "game '{}': at least one mode is required",
                self.game_name
            )));
        }
        if self.bet_units.is_empty() || self.bet_units.iter().any(|&b| b <= 0) {
            return Err(SlotError::config(format!(
                "game '{}': bet_units must be non-empty and positive",
                self.game_name
            )));
        }
        for (idx, mode) in self.modes.iter().enumerate() {
            mode.validate(idx)?;
        }
        Ok(())
    }

    pub fn mode(&self, idx: usize) -> SlotResult<&GameModeSetting> {
        self.modes.get(idx).ok_or_else(|| {
            SlotError::config(format!("game '{}': no mode at index {}", self.game_name, idx))
        })
    }

    pub fn bet_unit(&self, bet_mode: usize) -> SlotResult<i64> {
        self.bet_units.get(bet_mode).copied().ok_or_else(|| {
            SlotError::config(format!(
                "game '{}': no bet mode {}",
                self.game_name, bet_mode
            ))
        })
    }

    /// Decode the logic-specific `fixed` section
    pub fn decode_fixed<T: DeserializeOwned>(&self) -> SlotResult<T> {
        if self.fixed.is_null() {
            return Err(SlotError::config(format!(
                "game '{}': missing fixed section",
                self.game_name
            )));
        }
        Ok(serde_yml::from_value(self.fixed.clone())?)
    }

    /// Whether any symbol of the base mode is classified as scatter
    pub fn has_scatter(&self) -> bool {
        self.modes
            .first()
            .map(|m| m.symbols.iter().any(|s| s.kind == SymbolKind::Scatter))
            .unwrap_or(false)
    }
}
