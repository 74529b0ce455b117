//! Scatter trigger evaluation

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::ext::{ExtensionState, ScatterState};
use crate::screen::Screen;
use crate::symbols::{SymbolKind, SymbolTable};

/// Trigger code for "free mode unlocked"
pub const TRIGGER_FREE: u32 = 1;

/// How the scatter count is compared against the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCompare {
    /// `count > threshold`
    Above,
    /// `count >= threshold`
    #[default]
    AtLeast,
}

/// Scatter count rule that unlocks the feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRule {
    pub compare: TriggerCompare,
    pub threshold: usize,
}

impl TriggerRule {
    pub fn above(threshold: usize) -> Self {
        Self {
            compare: TriggerCompare::Above,
            threshold,
        }
    }

    pub fn at_least(threshold: usize) -> Self {
        Self {
            compare: TriggerCompare::AtLeast,
            threshold,
        }
    }

    pub fn passes(&self, count: usize) -> bool {
        match self.compare {
            TriggerCompare::Above => count > self.threshold,
            TriggerCompare::AtLeast => count >= self.threshold,
        }
    }
}

/// Counts scatters on a screen and decides the trigger
#[derive(Debug, Clone)]
pub struct TriggerEvaluator {
    table: SymbolTable,
    rule: TriggerRule,
}

impl TriggerEvaluator {
    pub fn new(table: SymbolTable, rule: TriggerRule) -> Self {
        Self { table, rule }
    }

    pub fn rule(&self) -> TriggerRule {
        self.rule
    }

    /// Reset `ext`, scan the screen in index order and return the trigger
    /// code (0 = not triggered).
    pub fn evaluate(&self, screen: &Screen, ext: &mut ScatterState) -> SlotResult<u32> {
        ext.reset();
        for (pos, &sym) in screen.cells().iter().enumerate() {
            match self.table.kind(sym) {
                Some(SymbolKind::Scatter) => ext.record_scatter_hit(pos),
                Some(_) => {}
                None => {
                    return Err(SlotError::invariant(format!(
                        "cell {pos} holds symbol {sym} outside the symbol table"
                    )));
                }
            }
        }
        if self.rule.passes(ext.scatter_count()) {
            ext.set_triggered();
            return Ok(TRIGGER_FREE);
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const S: u16 = 0;
    const X: u16 = 1;

    fn table() -> SymbolTable {
        SymbolTable::new(vec![SymbolKind::Scatter, SymbolKind::Regular])
    }

    #[test]
    fn test_rule_comparisons() {
        assert!(!TriggerRule::above(2).passes(2));
        assert!(TriggerRule::above(2).passes(3));
        assert!(TriggerRule::at_least(3).passes(3));
        assert!(!TriggerRule::at_least(3).passes(2));
    }

    #[test]
    fn test_three_scatters_above_two() {
        let eval = TriggerEvaluator::new(table(), TriggerRule::above(2));
        let screen = Screen::new(5, 1, vec![S, S, S, X, X]).unwrap();
        let mut ext = ScatterState::new(5, false);

        let code = eval.evaluate(&screen, &mut ext).unwrap();
        assert_eq!(code, 1);
        assert_eq!(ext.scatter_count(), 3);
        assert_eq!(ext.scatter_hits(), &[0, 1, 2]);
        assert!(ext.triggered());
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let eval = TriggerEvaluator::new(table(), TriggerRule::at_least(3));
        let screen = Screen::new(5, 1, vec![X, S, X, S, S]).unwrap();
        let mut ext = ScatterState::new(5, false);

        let first = eval.evaluate(&screen, &mut ext).unwrap();
        let first_count = ext.scatter_count();
        let second = eval.evaluate(&screen, &mut ext).unwrap();
        assert_eq!(first, second);
        assert_eq!(first_count, ext.scatter_count());
        assert_eq!(ext.scatter_hits(), &[1, 3, 4]);
    }

    #[test]
    fn test_no_trigger_clears_previous_state() {
        let eval = TriggerEvaluator::new(table(), TriggerRule::at_least(3));
        let mut ext = ScatterState::new(5, false);
        let hit = Screen::new(5, 1, vec![S, S, S, X, X]).unwrap();
        let miss = Screen::new(5, 1, vec![S, X, X, X, X]).unwrap();

        assert_eq!(eval.evaluate(&hit, &mut ext).unwrap(), 1);
        assert_eq!(eval.evaluate(&miss, &mut ext).unwrap(), 0);
        assert!(!ext.triggered());
        assert_eq!(ext.scatter_count(), 1);
    }

    #[test]
    fn test_unknown_symbol() {
        let eval = TriggerEvaluator::new(table(), TriggerRule::at_least(3));
        let screen = Screen::new(2, 1, vec![S, 5]).unwrap();
        let mut ext = ScatterState::new(2, false);
        assert!(eval.evaluate(&screen, &mut ext).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_count_matches_hits(cells in proptest::collection::vec(0u16..2, 1..40)) {
            let eval = TriggerEvaluator::new(table(), TriggerRule::at_least(3));
            let len = cells.len();
            let screen = Screen::new(len, 1, cells.clone()).unwrap();
            let mut ext = ScatterState::new(len, false);
            // Stale state from an earlier scan must not leak in
            ext.record_scatter_hit(0);

            let code = eval.evaluate(&screen, &mut ext).unwrap();
            let expected: Vec<usize> = cells
                .iter()
                .enumerate()
                .filter_map(|(i, &s)| (s == S).then_some(i))
                .collect();
            prop_assert_eq!(ext.scatter_count(), ext.scatter_hits().len());
            prop_assert_eq!(ext.scatter_hits(), expected.as_slice());
            prop_assert_eq!(code != 0, expected.len() >= 3);
        }
    }
}
