//! Payout evaluation
//!
//! Evaluators add every win of a screen to the pending step of a
//! [`ModeResult`], together with the cells that produced it.

use crate::config::{GameModeSetting, PayMode};
use crate::error::{SlotError, SlotResult};
use crate::result::ModeResult;
use crate::screen::Screen;
use crate::symbols::{SymbolId, SymbolKind, SymbolSetting, SymbolTable};

/// Computes and accumulates the wins of a screen
pub trait PayoutEvaluator: Send {
    fn calc_screen(&self, bet_mult: i64, screen: &Screen, result: &mut ModeResult)
    -> SlotResult<()>;
}

/// Build the evaluator configured for a mode
pub fn evaluator_for(setting: &GameModeSetting) -> Box<dyn PayoutEvaluator> {
    match setting.pay.mode {
        PayMode::Lines => Box::new(LinePayEvaluator::new(setting)),
        PayMode::Anywhere => Box::new(AnywherePayEvaluator::new(setting)),
    }
}

/// A pay multiplied by the bet multiplier, failing instead of overflowing
pub fn scaled_pay(pay: i64, bet_mult: i64) -> SlotResult<i64> {
    pay.checked_mul(bet_mult).ok_or_else(|| {
        SlotError::InvalidRequest(format!("pay {pay} x bet multiplier {bet_mult} overflows"))
    })
}

fn check_symbols(screen: &Screen, table: &SymbolTable) -> SlotResult<()> {
    if let Some((pos, sym)) = screen
        .cells()
        .iter()
        .enumerate()
        .find(|&(_, &s)| table.kind(s).is_none())
    {
        return Err(SlotError::invariant(format!(
            "cell {pos} holds symbol {sym} outside the symbol table"
        )));
    }
    Ok(())
}

/// Left-to-right payline evaluator with wild substitution
#[derive(Debug, Clone)]
pub struct LinePayEvaluator {
    symbols: Vec<SymbolSetting>,
    table: SymbolTable,
    lines: Vec<Vec<usize>>,
    min_count: usize,
}

impl LinePayEvaluator {
    pub fn new(setting: &GameModeSetting) -> Self {
        Self {
            symbols: setting.symbols.clone(),
            table: setting.symbol_table(),
            lines: setting.pay.lines.clone(),
            min_count: setting.pay.min_count,
        }
    }

    fn pay(&self, symbol: SymbolId, count: usize) -> i64 {
        self.symbols[symbol as usize].pay(count, self.min_count)
    }
}

impl PayoutEvaluator for LinePayEvaluator {
    fn calc_screen(
        &self,
        bet_mult: i64,
        screen: &Screen,
        result: &mut ModeResult,
    ) -> SlotResult<()> {
        check_symbols(screen, &self.table)?;

        for line in &self.lines {
            let mut target: Option<SymbolId> = None;
            let mut wild: Option<SymbolId> = None;
            let mut wild_run = 0usize;
            let mut count = 0usize;

            for (column, &row) in line.iter().enumerate() {
                let sym = screen.get(column, row);
                match self.table.kind(sym) {
                    Some(SymbolKind::Wild) => {
                        count += 1;
                        if target.is_none() {
                            wild_run += 1;
                            wild.get_or_insert(sym);
                        }
                    }
                    Some(SymbolKind::Regular) => match target {
                        None => {
                            target = Some(sym);
                            count += 1;
                        }
                        Some(t) if t == sym => count += 1,
                        Some(_) => break,
                    },
                    _ => break,
                }
            }

            let line_pay = target.map(|t| self.pay(t, count)).unwrap_or(0);
            let wild_pay = wild.map(|w| self.pay(w, wild_run)).unwrap_or(0);
            let (pay, run) = if wild_pay > line_pay {
                (wild_pay, wild_run)
            } else {
                (line_pay, count)
            };
            if pay > 0 {
                let positions = line[..run]
                    .iter()
                    .enumerate()
                    .map(|(column, &row)| screen.index(column, row));
                result.add_win(scaled_pay(pay, bet_mult)?, positions);
            }
        }
        Ok(())
    }
}

/// N-of-a-kind anywhere on the screen; wilds count toward every symbol
#[derive(Debug, Clone)]
pub struct AnywherePayEvaluator {
    symbols: Vec<SymbolSetting>,
    table: SymbolTable,
    min_count: usize,
}

impl AnywherePayEvaluator {
    pub fn new(setting: &GameModeSetting) -> Self {
        Self {
            symbols: setting.symbols.clone(),
            table: setting.symbol_table(),
            min_count: setting.pay.min_count,
        }
    }
}

impl PayoutEvaluator for AnywherePayEvaluator {
    fn calc_screen(
        &self,
        bet_mult: i64,
        screen: &Screen,
        result: &mut ModeResult,
    ) -> SlotResult<()> {
        check_symbols(screen, &self.table)?;

        let cells = screen.cells();
        let wilds = cells
            .iter()
            .filter(|&&s| self.table.kind(s) == Some(SymbolKind::Wild))
            .count();

        for (id, symbol) in self.symbols.iter().enumerate() {
            if symbol.kind != SymbolKind::Regular {
                continue;
            }
            let id = id as SymbolId;
            let own = cells.iter().filter(|&&s| s == id).count();
            if own == 0 {
                continue;
            }
            let pay = symbol.pay(own + wilds, self.min_count);
            if pay > 0 {
                let positions = cells.iter().enumerate().filter_map(|(pos, &s)| {
                    (s == id || self.table.kind(s) == Some(SymbolKind::Wild)).then_some(pos)
                });
                result.add_win(scaled_pay(pay, bet_mult)?, positions);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PaySetting, ReelSetSetting, ScreenSetting};

    // 0 = SC, 1 = W, 2 = H1, 3 = L1
    fn mode(pay: PaySetting, columns: usize, rows: usize) -> GameModeSetting {
        GameModeSetting {
            name: "base".into(),
            screen: ScreenSetting::new(columns, rows),
            symbols: vec![
                SymbolSetting::scatter("SC"),
                SymbolSetting::wild("W", &[50, 100, 200]),
                SymbolSetting::regular("H1", &[10, 20, 40]),
                SymbolSetting::regular("L1", &[2, 4, 8]),
            ],
            pay,
            reel_sets: vec![ReelSetSetting {
                name: String::new(),
                reels: vec![vec![2]; columns],
            }],
            gen_reel_set: 0,
            refill_reel_set: None,
        }
    }

    fn lines_mode() -> GameModeSetting {
        mode(
            PaySetting {
                mode: PayMode::Lines,
                min_count: 3,
                lines: vec![vec![0, 0, 0, 0, 0]],
            },
            5,
            1,
        )
    }

    #[test]
    fn test_line_three_of_a_kind() {
        let eval = LinePayEvaluator::new(&lines_mode());
        let screen = Screen::new(5, 1, vec![2, 2, 2, 3, 3]).unwrap();
        let mut mr = ModeResult::new(0, 5, true);
        eval.calc_screen(2, &screen, &mut mr).unwrap();
        assert_eq!(mr.tmp_win(), 20);
        assert_eq!(mr.hit_map_tmp(), &[0, 1, 2]);
    }

    #[test]
    fn test_line_wild_substitutes() {
        let eval = LinePayEvaluator::new(&lines_mode());
        let screen = Screen::new(5, 1, vec![2, 1, 2, 2, 3]).unwrap();
        let mut mr = ModeResult::new(0, 5, true);
        eval.calc_screen(1, &screen, &mut mr).unwrap();
        assert_eq!(mr.tmp_win(), 20);
        assert_eq!(mr.hit_map_tmp(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_line_leading_wilds_pay_best() {
        let eval = LinePayEvaluator::new(&lines_mode());
        // W W W L1 L1: wild run of 3 pays 50, L1 x5 pays 8
        let screen = Screen::new(5, 1, vec![1, 1, 1, 3, 3]).unwrap();
        let mut mr = ModeResult::new(0, 5, true);
        eval.calc_screen(1, &screen, &mut mr).unwrap();
        assert_eq!(mr.tmp_win(), 50);
        assert_eq!(mr.hit_map_tmp(), &[0, 1, 2]);
    }

    #[test]
    fn test_line_scatter_breaks() {
        let eval = LinePayEvaluator::new(&lines_mode());
        let screen = Screen::new(5, 1, vec![2, 2, 0, 2, 2]).unwrap();
        let mut mr = ModeResult::new(0, 5, true);
        eval.calc_screen(1, &screen, &mut mr).unwrap();
        assert_eq!(mr.tmp_win(), 0);
        assert!(mr.hit_map_tmp().is_empty());
    }

    #[test]
    fn test_unknown_symbol_is_invariant_error() {
        let eval = LinePayEvaluator::new(&lines_mode());
        let screen = Screen::new(5, 1, vec![2, 2, 9, 2, 2]).unwrap();
        let mut mr = ModeResult::new(0, 5, true);
        let err = eval.calc_screen(1, &screen, &mut mr).unwrap_err();
        assert!(matches!(err, SlotError::Invariant(_)));
    }

    #[test]
    fn test_overflowing_bet_mult_is_rejected() {
        let eval = LinePayEvaluator::new(&lines_mode());
        let screen = Screen::new(5, 1, vec![2, 2, 2, 3, 3]).unwrap();
        let mut mr = ModeResult::new(0, 5, true);
        let err = eval.calc_screen(i64::MAX / 2, &screen, &mut mr).unwrap_err();
        assert!(matches!(err, SlotError::InvalidRequest(_)));
        assert_eq!(scaled_pay(10, 3).unwrap(), 30);
    }

    #[test]
    fn test_anywhere_counts_with_wilds() {
        let setting = mode(
            PaySetting {
                mode: PayMode::Anywhere,
                min_count: 4,
                lines: Vec::new(),
            },
            3,
            2,
        );
        let eval = evaluator_for(&setting);
        // columns: [2, 3] [2, 1] [2, 0]
        let screen = Screen::new(3, 2, vec![2, 3, 2, 1, 2, 0]).unwrap();
        let mut mr = ModeResult::new(0, 6, true);
        eval.calc_screen(3, &screen, &mut mr).unwrap();
        // H1 x3 + wild = 4 -> 10 * 3; L1 x1 + wild = 2 -> nothing
        assert_eq!(mr.tmp_win(), 30);
        assert_eq!(mr.hit_map_tmp(), &[0, 2, 3, 4]);
    }
}
