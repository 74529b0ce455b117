//! Reel strips and reel sets

use crate::config::ReelSetSetting;
use crate::rng::Core;
use crate::symbols::SymbolId;

/// A virtual reel strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelStrip {
    /// Symbol IDs in order
    pub symbols: Vec<SymbolId>,
}

impl ReelStrip {
    pub fn new(symbols: Vec<SymbolId>) -> Self {
        Self { symbols }
    }

    /// Symbol at a position (wraps around)
    pub fn symbol_at(&self, position: usize) -> SymbolId {
        self.symbols[position % self.symbols.len()]
    }

    /// Uniform stop position on this strip
    pub fn pick(&self, core: &mut Core) -> usize {
        core.pick(self.symbols.len())
    }

    /// Position one step above `position` (wraps around)
    pub fn prev(&self, position: usize) -> usize {
        let len = self.symbols.len();
        (position % len + len - 1) % len
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// One strip per column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelSet {
    pub name: String,
    pub reels: Vec<ReelStrip>,
}

impl ReelSet {
    pub fn from_setting(setting: &ReelSetSetting) -> Self {
        Self {
            name: setting.name.clone(),
            reels: setting.reels.iter().cloned().map(ReelStrip::new).collect(),
        }
    }

    /// Strip for a column
    pub fn reel(&self, column: usize) -> &ReelStrip {
        &self.reels[column]
    }

    /// Pick a stop position for every column into `stops`
    pub fn pick_stops(&self, core: &mut Core, stops: &mut [usize]) {
        for (stop, strip) in stops.iter_mut().zip(&self.reels) {
            *stop = strip.pick(core);
        }
    }

    pub fn columns(&self) -> usize {
        self.reels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reel_strip_wrap() {
        let strip = ReelStrip::new(vec![1, 2, 3, 4, 5]);
        assert_eq!(strip.symbol_at(0), 1);
        assert_eq!(strip.symbol_at(5), 1);
        assert_eq!(strip.symbol_at(7), 3);
    }

    #[test]
    fn test_prev_wraps_to_end() {
        let strip = ReelStrip::new(vec![1, 2, 3]);
        assert_eq!(strip.prev(0), 2);
        assert_eq!(strip.prev(2), 1);
    }

    #[test]
    fn test_pick_stops_in_range() {
        let set = ReelSet::from_setting(&ReelSetSetting {
            name: "base".into(),
            reels: vec![vec![0, 1, 2], vec![3], vec![4, 5]],
        });
        let mut core = Core::seeded(9);
        let mut stops = [0usize; 3];
        for _ in 0..50 {
            set.pick_stops(&mut core, &mut stops);
            assert!(stops[0] < 3);
            assert_eq!(stops[1], 0);
            assert!(stops[2] < 2);
        }
    }
}
