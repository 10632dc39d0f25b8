//! Single-pass separator insertion that breaks up invalid runs.
//!
//! Used by the repair pipeline variant, where the model does not bound
//! invalid runs and the solver's filler letters routinely produce them. For
//! each invalid run of length ≥3 found in the *pre-repair* grid, one letter
//! is replaced with a separator:
//!
//! - preferred: the first break position `k` (scanned left to right over
//!   1..len) where both `text[..k]` and `text[k..]` are each a bank word or
//!   a single letter; the separator overwrites the letter at `k`, consuming
//!   the first letter of the right part,
//! - fallback (length ≥4 only): the midpoint.
//!
//! A length-3 run with no acceptable break is left as is. Length-2 invalid
//! runs are left alone; replacing either letter would only trade one blemish
//! for another. All runs are read from the input grid before any insertion,
//! so row repairs never cascade into column decisions. One pass, no fixed
//! point; the validator reports whatever remains.

use crate::grid::{Cell, Grid};
use crate::word_bank::WordBank;

/// Break up invalid runs by replacing one letter per run with a separator.
#[must_use]
pub fn repair_grid(grid: &Grid, bank: &WordBank) -> Grid {
    let mut repaired = grid.clone();
    let mut inserted = 0;

    for run in grid.runs() {
        if run.len() < 3 || bank.contains(&run.text) {
            continue;
        }
        if let Some(offset) = split_offset(&run.text, bank) {
            let (dr, dc) = run.dir.step();
            repaired.set_cell(run.row + dr * offset, run.col + dc * offset, Cell::Separator);
            inserted += 1;
        }
    }

    if inserted > 0 {
        log::debug!("repair: inserted {inserted} separators");
    }
    repaired
}

/// The offset of the letter to replace, or `None` when the run is best left
/// alone. Break positions are judged on the unbroken text: offset `k` is
/// taken when `text[..k]` and `text[k..]` are both acceptable, and the
/// separator then overwrites the letter at `k`. A run ending in a bank word
/// plus one stray letter is therefore cut cleanly (k = len - 1).
fn split_offset(text: &str, bank: &WordBank) -> Option<usize> {
    let len = text.len();
    for k in 1..len {
        if part_acceptable(&text[..k], bank) && part_acceptable(&text[k..], bank) {
            return Some(k);
        }
    }
    (len >= 4).then_some(len / 2)
}

fn part_acceptable(part: &str, bank: &WordBank) -> bool {
    part.len() <= 1 || bank.contains(part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_grid;

    fn bank() -> WordBank {
        WordBank::from_words(["CAT", "TO", "ON"])
    }

    #[test]
    fn test_prefers_split_into_bank_words() {
        // "TOON" breaks at k=2 ("TO" + "ON"); the separator overwrites the O
        let grid = Grid::from_rows(&["TOON"]);
        let repaired = repair_grid(&grid, &bank());
        assert_eq!(repaired.to_row_strings(), vec!["TO#N"]);
    }

    #[test]
    fn test_cuts_trailing_stray_letter() {
        // "CATX" breaks at k=3 ("CAT" + "X"), cutting off the stray letter
        let grid = Grid::from_rows(&["CATX"]);
        let repaired = repair_grid(&grid, &bank());
        assert_eq!(repaired.to_row_strings(), vec!["CAT#"]);
    }

    #[test]
    fn test_length_three_splits_when_a_part_matches() {
        // "XTO" breaks at k=1 ("X" + "TO")
        let grid = Grid::from_rows(&["XTO"]);
        let repaired = repair_grid(&grid, &bank());
        assert_eq!(repaired.to_row_strings(), vec!["X#O"]);
    }

    #[test]
    fn test_length_three_without_a_break_is_left_alone() {
        let grid = Grid::from_rows(&["XYZ"]);
        let repaired = repair_grid(&grid, &bank());
        assert_eq!(repaired.to_row_strings(), vec!["XYZ"]);
    }

    #[test]
    fn test_falls_back_to_midpoint() {
        // no split of "QWXZ" yields bank words; midpoint offset 2
        let grid = Grid::from_rows(&["QWXZ"]);
        let repaired = repair_grid(&grid, &bank());
        assert_eq!(repaired.to_row_strings(), vec!["QW#Z"]);
    }

    #[test]
    fn test_valid_and_short_runs_untouched() {
        let grid = Grid::from_rows(&["CAT#XZ"]);
        let repaired = repair_grid(&grid, &bank());
        // "CAT" is valid, "XZ" too short to split
        assert_eq!(repaired.to_row_strings(), vec!["CAT#XZ"]);
    }

    #[test]
    fn test_repairs_columns_too() {
        let grid = Grid::from_rows(&["X", "T", "O"]);
        let repaired = repair_grid(&grid, &bank());
        assert_eq!(repaired.to_row_strings(), vec!["X", "#", "O"]);
    }

    #[test]
    fn test_repair_reduces_long_invalid_runs() {
        let grid = Grid::from_rows(&["TOON#CATX"]);
        let before = validate_grid(&grid, &bank());
        let repaired = repair_grid(&grid, &bank());
        let after = validate_grid(&repaired, &bank());

        assert_eq!(before.invalid_words.len(), 2);
        assert_eq!(repaired.to_row_strings(), vec!["TO#N#CAT#"]);
        assert!(after.invalid_words.is_empty());
    }
}
