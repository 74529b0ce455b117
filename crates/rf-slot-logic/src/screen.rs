//! Screens and screen generation

use serde::{Deserialize, Serialize};

use crate::config::ScreenSetting;
use crate::error::{SlotError, SlotResult};
use crate::reels::ReelSet;
use crate::rng::Core;
use crate::symbols::{EMPTY_CELL, SymbolId};

/// A screen of symbols
///
/// Cells are stored column-major: `index = column * rows + row`, row 0 on
/// top. Each column is therefore a contiguous slice, which is what gravity
/// and refill work on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    columns: usize,
    rows: usize,
    cells: Vec<SymbolId>,
}

impl Screen {
    /// Build a screen from column-major cells
    pub fn new(columns: usize, rows: usize, cells: Vec<SymbolId>) -> SlotResult<Self> {
        if cells.len() != columns * rows {
            return Err(SlotError::invariant(format!(
                "screen of {columns}x{rows} needs {} cells, got {}",
                columns * rows,
                cells.len()
            )));
        }
        Ok(Self {
            columns,
            rows,
            cells,
        })
    }

    /// Screen filled with a single symbol
    pub fn filled(setting: ScreenSetting, symbol: SymbolId) -> Self {
        Self {
            columns: setting.columns,
            rows: setting.rows,
            cells: vec![symbol; setting.size()],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell index of (column, row)
    pub fn index(&self, column: usize, row: usize) -> usize {
        column * self.rows + row
    }

    pub fn get(&self, column: usize, row: usize) -> SymbolId {
        self.cells[self.index(column, row)]
    }

    pub fn cells(&self) -> &[SymbolId] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [SymbolId] {
        &mut self.cells
    }

    pub fn column(&self, column: usize) -> &[SymbolId] {
        let start = column * self.rows;
        &self.cells[start..start + self.rows]
    }

    pub fn column_mut(&mut self, column: usize) -> &mut [SymbolId] {
        let start = column * self.rows;
        &mut self.cells[start..start + self.rows]
    }

    /// Number of cells waiting for a refill
    pub fn empty_cells(&self) -> usize {
        self.cells.iter().filter(|&&s| s == EMPTY_CELL).count()
    }
}

/// Produces a fresh screen at the start of every round
pub trait ScreenGenerator: Send {
    fn gen_screen(&mut self, core: &mut Core) -> Screen;
}

/// Generates screens as windows of a reel set at random stops
#[derive(Debug, Clone)]
pub struct ReelScreenGenerator {
    reel_set: ReelSet,
    setting: ScreenSetting,
    stops: Vec<usize>,
}

impl ReelScreenGenerator {
    pub fn new(reel_set: ReelSet, setting: ScreenSetting) -> Self {
        Self {
            stops: vec![0; setting.columns],
            reel_set,
            setting,
        }
    }

    /// Stops used by the last generated screen
    pub fn last_stops(&self) -> &[usize] {
        &self.stops
    }
}

impl ScreenGenerator for ReelScreenGenerator {
    fn gen_screen(&mut self, core: &mut Core) -> Screen {
        self.reel_set.pick_stops(core, &mut self.stops);
        let rows = self.setting.rows;
        let mut cells = Vec::with_capacity(self.setting.size());
        for (column, &stop) in self.stops.iter().enumerate() {
            let strip = self.reel_set.reel(column);
            cells.extend((0..rows).map(|row| strip.symbol_at(stop + row)));
        }
        Screen {
            columns: self.setting.columns,
            rows,
            cells,
        }
    }
}

/// Replays a fixed list of screens in order, wrapping around at the end.
///
/// Used for deterministic replays and scripted scenarios. Cell lists are
/// column-major; short lists are padded with [`EMPTY_CELL`].
#[derive(Debug, Clone)]
pub struct ScriptedScreens {
    setting: ScreenSetting,
    screens: Vec<Vec<SymbolId>>,
    next: usize,
}

impl ScriptedScreens {
    pub fn new(setting: ScreenSetting, screens: Vec<Vec<SymbolId>>) -> Self {
        Self {
            setting,
            screens,
            next: 0,
        }
    }

    /// Screens handed out so far
    pub fn served(&self) -> usize {
        self.next
    }
}

impl ScreenGenerator for ScriptedScreens {
    fn gen_screen(&mut self, _core: &mut Core) -> Screen {
        let size = self.setting.size();
        let mut cells = if self.screens.is_empty() {
            Vec::new()
        } else {
            self.screens[self.next % self.screens.len()].clone()
        };
        cells.resize(size, EMPTY_CELL);
        self.next += 1;
        Screen {
            columns: self.setting.columns,
            rows: self.setting.rows,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReelSetSetting;

    #[test]
    fn test_column_major_layout() {
        let screen = Screen::new(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(screen.get(0, 2), 3);
        assert_eq!(screen.get(1, 0), 4);
        assert_eq!(screen.column(1), &[4, 5, 6]);
    }

    #[test]
    fn test_scripted_screens_cycle() {
        let mut generator = ScriptedScreens::new(ScreenSetting::new(2, 1), vec![vec![1, 2], vec![3]]);
        let mut core = Core::seeded(0);
        assert_eq!(generator.gen_screen(&mut core).cells(), &[1, 2]);
        assert_eq!(generator.gen_screen(&mut core).cells(), &[3, EMPTY_CELL]);
        assert_eq!(generator.gen_screen(&mut core).cells(), &[1, 2]);
        assert_eq!(generator.served(), 3);
    }

    #[test]
    fn test_wrong_cell_count() {
        assert!(Screen::new(2, 2, vec![1, 2, 3]).is_err());
    }

    #[test]
    fn test_generated_screen_is_strip_window() {
        let set = ReelSet::from_setting(&ReelSetSetting {
            name: String::new(),
            reels: vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]],
        });
        let mut generator = ReelScreenGenerator::new(set, ScreenSetting::new(2, 3));
        let mut core = Core::seeded(3);
        for _ in 0..20 {
            let screen = generator.gen_screen(&mut core);
            assert_eq!(screen.len(), 6);
            let stops = generator.last_stops().to_vec();
            for row in 0..3 {
                assert_eq!(screen.get(0, row), ((stops[0] + row) % 4) as SymbolId);
                assert_eq!(screen.get(1, row), (4 + (stops[1] + row) % 4) as SymbolId);
            }
        }
    }
}
