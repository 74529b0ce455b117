//! In-place screen transforms used by cascades
//!
//! Order within one cascade step is fixed: [`clear`], then [`gravity`], then
//! [`fill_screen`]. Gravity writes the per-column empty count that refill
//! consumes as its insertion depth.

use crate::error::{SlotError, SlotResult};
use crate::reels::ReelSet;
use crate::screen::Screen;
use crate::symbols::EMPTY_CELL;

/// Empty every hit cell
pub fn clear(screen: &mut Screen, hits: &[usize]) -> SlotResult<()> {
    let len = screen.len();
    let cells = screen.cells_mut();
    for &pos in hits {
        if pos >= len {
            return Err(SlotError::invariant(format!(
                "hit position {pos} outside screen of {len} cells"
            )));
        }
        cells[pos] = EMPTY_CELL;
    }
    Ok(())
}

/// Drop remaining symbols to the bottom of each column.
///
/// `fill_pos[c]` receives the number of empty cells left on top of column `c`.
pub fn gravity(screen: &mut Screen, fill_pos: &mut [usize]) -> SlotResult<()> {
    check_columns(screen, fill_pos.len(), "fill position")?;
    let rows = screen.rows();
    for (column, empty) in fill_pos.iter_mut().enumerate() {
        let cells = screen.column_mut(column);
        let mut write = rows;
        for read in (0..rows).rev() {
            if cells[read] != EMPTY_CELL {
                write -= 1;
                cells[write] = cells[read];
            }
        }
        cells[..write].fill(EMPTY_CELL);
        *empty = write;
    }
    Ok(())
}

/// Refill the top `fill_pos[c]` cells of each column from the reel set.
///
/// `fill_idx[c]` is the column's strip cursor; every inserted symbol is the
/// one just above the cursor, and the cursor moves onto it.
pub fn fill_screen(
    screen: &mut Screen,
    reel_set: &ReelSet,
    fill_pos: &[usize],
    fill_idx: &mut [usize],
) -> SlotResult<()> {
    check_columns(screen, fill_pos.len(), "fill position")?;
    check_columns(screen, fill_idx.len(), "fill index")?;
    check_columns(screen, reel_set.columns(), "reel set")?;
    let rows = screen.rows();
    for column in 0..screen.columns() {
        let depth = fill_pos[column];
        if depth > rows {
            return Err(SlotError::invariant(format!(
                "fill depth {depth} exceeds {rows} rows in column {column}"
            )));
        }
        let strip = reel_set.reel(column);
        let cells = screen.column_mut(column);
        for row in (0..depth).rev() {
            fill_idx[column] = strip.prev(fill_idx[column]);
            cells[row] = strip.symbol_at(fill_idx[column]);
        }
    }
    Ok(())
}

fn check_columns(screen: &Screen, len: usize, what: &str) -> SlotResult<()> {
    if len != screen.columns() {
        return Err(SlotError::invariant(format!(
            "{what} buffer has {len} columns, screen has {}",
            screen.columns()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReelSetSetting;

    const E: u16 = EMPTY_CELL;

    fn screen_2x3() -> Screen {
        // column 0: 1 2 3 (top to bottom), column 1: 4 5 6
        Screen::new(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap()
    }

    #[test]
    fn test_clear_marks_hits_empty() {
        let mut screen = screen_2x3();
        clear(&mut screen, &[1, 5]).unwrap();
        assert_eq!(screen.cells(), &[1, E, 3, 4, 5, E]);
    }

    #[test]
    fn test_clear_out_of_bounds_is_invariant_error() {
        let mut screen = screen_2x3();
        let err = clear(&mut screen, &[6]).unwrap_err();
        assert!(matches!(err, SlotError::Invariant(_)));
    }

    #[test]
    fn test_gravity_compacts_downward() {
        let mut screen = screen_2x3();
        clear(&mut screen, &[1, 5]).unwrap();
        let mut fill_pos = [0usize; 2];
        gravity(&mut screen, &mut fill_pos).unwrap();
        assert_eq!(screen.column(0), &[E, 1, 3]);
        assert_eq!(screen.column(1), &[E, 4, 5]);
        assert_eq!(fill_pos, [1, 1]);
    }

    #[test]
    fn test_gravity_full_column_clear() {
        let mut screen = screen_2x3();
        clear(&mut screen, &[0, 1, 2]).unwrap();
        let mut fill_pos = [0usize; 2];
        gravity(&mut screen, &mut fill_pos).unwrap();
        assert_eq!(screen.column(0), &[E, E, E]);
        assert_eq!(fill_pos, [3, 0]);
    }

    #[test]
    fn test_fill_screen_takes_symbols_above_cursor() {
        let set = ReelSet::from_setting(&ReelSetSetting {
            name: String::new(),
            reels: vec![vec![10, 11, 12, 13], vec![20, 21]],
        });
        let mut screen = screen_2x3();
        clear(&mut screen, &[0, 1, 4]).unwrap();
        let mut fill_pos = [0usize; 2];
        gravity(&mut screen, &mut fill_pos).unwrap();
        assert_eq!(fill_pos, [2, 1]);

        let mut fill_idx = [0usize, 1];
        fill_screen(&mut screen, &set, &fill_pos, &mut fill_idx).unwrap();
        // column 0: cursor 0 -> 3 (13) into row 1, -> 2 (12) into row 0
        assert_eq!(screen.column(0), &[12, 13, 3]);
        // column 1: cursor 1 -> 0 (20) into row 0
        assert_eq!(screen.column(1), &[20, 4, 6]);
        assert_eq!(fill_idx, [2, 0]);
        assert_eq!(screen.empty_cells(), 0);
    }

    #[test]
    fn test_buffer_size_mismatch() {
        let mut screen = screen_2x3();
        let mut fill_pos = [0usize; 3];
        assert!(gravity(&mut screen, &mut fill_pos).is_err());
    }
}
