//! Post-hoc classification of a finished grid against the word bank.
//!
//! Every maximal letter run is classified as a valid word (length ≥2 and a
//! bank member), an invalid run (length ≥2, not in the bank), or a fragment
//! (a single letter). Classification is read-only and idempotent; the report
//! is a plain summary the caller records, never a pass/fail gate on its own.

use crate::grid::Grid;
use crate::word_bank::WordBank;

/// Classification of every letter run in a grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Runs of length ≥2 found in the bank, in scan order (rows then columns).
    pub valid_words: Vec<String>,
    /// Runs of length ≥2 not found in the bank.
    pub invalid_words: Vec<String>,
    /// Single-letter runs, as one-character strings.
    pub fragments: Vec<String>,
}

impl ValidationReport {
    /// A grid with no invalid runs and at most one stray single letter.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.invalid_words.is_empty() && self.fragments.len() <= 1
    }
}

/// Scan `grid` and classify each run against `bank`.
#[must_use]
pub fn validate_grid(grid: &Grid, bank: &WordBank) -> ValidationReport {
    let mut report = ValidationReport::default();
    for run in grid.runs() {
        if run.len() < 2 {
            report.fragments.push(run.text);
        } else if bank.contains(&run.text) {
            report.valid_words.push(run.text);
        } else {
            report.invalid_words.push(run.text);
        }
    }
    log::debug!(
        "validate: {} valid, {} invalid, {} fragments",
        report.valid_words.len(),
        report.invalid_words.len(),
        report.fragments.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> WordBank {
        WordBank::from_words(["CAT", "TO", "ON"])
    }

    #[test]
    fn test_classifies_valid_invalid_and_fragments() {
        // rows: CAT, XZ; cols: C, AX(?), T...
        let grid = Grid::from_rows(&["CAT", "#XZ"]);
        let report = validate_grid(&grid, &bank());

        assert_eq!(report.valid_words, vec!["CAT"]);
        // row run "XZ" plus column runs "AX" and "TZ"
        assert_eq!(report.invalid_words, vec!["XZ", "AX", "TZ"]);
        assert_eq!(report.fragments, vec!["C"]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_duplicate_runs_are_counted_twice() {
        let grid = Grid::from_rows(&["TO", "##", "TO"]);
        let report = validate_grid(&grid, &bank());

        assert_eq!(report.valid_words, vec!["TO", "TO"]);
        // columns "T#T" and "O#O" split into four single-letter runs
        assert_eq!(report.fragments, vec!["T", "T", "O", "O"]);
    }

    #[test]
    fn test_clean_grid_with_no_fragments() {
        let grid = Grid::from_rows(&["TO", "ON"]);
        let report = validate_grid(&grid, &bank());
        // rows TO, ON; columns TO, ON
        assert_eq!(report.valid_words, vec!["TO", "ON", "TO", "ON"]);
        assert!(report.fragments.is_empty());
        assert!(report.is_clean());
    }

    #[test]
    fn test_clean_allows_one_fragment() {
        let report = ValidationReport {
            valid_words: vec!["CAT".to_string()],
            invalid_words: Vec::new(),
            fragments: vec!["X".to_string()],
        };
        assert!(report.is_clean());

        let two_fragments = ValidationReport {
            fragments: vec!["X".to_string(), "Y".to_string()],
            ..report.clone()
        };
        assert!(!two_fragments.is_clean());

        let invalid = ValidationReport {
            invalid_words: vec!["XZ".to_string()],
            fragments: Vec::new(),
            ..report
        };
        assert!(!invalid.is_clean());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let grid = Grid::from_rows(&["CAT", "O##", "N#X"]);
        let first = validate_grid(&grid, &bank());
        let second = validate_grid(&grid, &bank());
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_separator_grid_is_clean() {
        let grid = Grid::from_rows(&["##", "##"]);
        let report = validate_grid(&grid, &bank());
        assert!(report.valid_words.is_empty());
        assert!(report.is_clean());
    }
}
