//! Symbol definitions and classification

use serde::{Deserialize, Serialize};

/// Symbol identifier, the index of the symbol in its mode's symbol list
pub type SymbolId = u16;

/// Marker for a cell emptied by a cascade clear, pending refill
pub const EMPTY_CELL: SymbolId = SymbolId::MAX;

/// Symbol kind classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SymbolKind {
    /// Regular paying symbol
    #[default]
    Regular = 0,
    /// Wild - substitutes for regular symbols on lines
    Wild = 1,
    /// Scatter - counts toward feature triggers regardless of position
    Scatter = 2,
    /// Blank position, never pays
    Blank = 3,
}

/// A symbol definition as it appears in a mode setting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSetting {
    /// Symbol name (e.g., "H1", "L3", "WILD", "SC")
    pub name: String,
    /// Symbol kind
    #[serde(default)]
    pub kind: SymbolKind,
    /// Pay per match count, index 0 = the mode's `min_count`
    #[serde(default)]
    pub pays: Vec<i64>,
}

impl SymbolSetting {
    /// Create a regular symbol
    pub fn regular(name: impl Into<String>, pays: &[i64]) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Regular,
            pays: pays.to_vec(),
        }
    }

    /// Create a wild symbol
    pub fn wild(name: impl Into<String>, pays: &[i64]) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Wild,
            pays: pays.to_vec(),
        }
    }

    /// Create a scatter symbol
    pub fn scatter(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Scatter,
            pays: Vec::new(),
        }
    }

    /// Pay for `count` matches given the mode's minimum match count.
    ///
    /// Counts past the end of the pay list use the last entry.
    pub fn pay(&self, count: usize, min_count: usize) -> i64 {
        if count < min_count || self.pays.is_empty() {
            return 0;
        }
        let idx = (count - min_count).min(self.pays.len() - 1);
        self.pays[idx]
    }
}

/// Symbol classification table, indexed by symbol id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    kinds: Vec<SymbolKind>,
}

impl SymbolTable {
    pub fn new(kinds: Vec<SymbolKind>) -> Self {
        Self { kinds }
    }

    /// Build the table from a mode's symbol list
    pub fn from_settings(symbols: &[SymbolSetting]) -> Self {
        Self::new(symbols.iter().map(|s| s.kind).collect())
    }

    /// Kind of a symbol, `None` if the id is not part of the table
    pub fn kind(&self, id: SymbolId) -> Option<SymbolKind> {
        self.kinds.get(id as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
