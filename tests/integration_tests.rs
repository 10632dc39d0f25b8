//! Integration tests for the word-grid generator.
//!
//! These tests verify the complete pipeline from configuration through
//! solving, extraction, repair, and validation, using small word banks and
//! grids whose behavior can be reasoned about by hand.

use std::time::Duration;

use wordgrid::config::{GenerationConfig, SolverBackend};
use wordgrid::generator::{generate, GenerationResult};
use wordgrid::solver::SolveStatus;
use wordgrid::validate::validate_grid;
use wordgrid::word_bank::{Selection, WordBank, WordFilter};

/// A request with a short budget and an explicit backend, so tests stay
/// fast and deterministic.
fn test_config(rows: usize, cols: usize, backend: SolverBackend) -> GenerationConfig {
    GenerationConfig {
        time_limit: Duration::from_secs(20),
        backend,
        ..GenerationConfig::new(rows, cols)
    }
}

/// Words of the result's grid that also appear in `expected`.
fn placed_from(result: &GenerationResult, expected: &[&str]) -> Vec<String> {
    result
        .valid_words
        .iter()
        .filter(|w| expected.contains(&w.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod exact_backend {
    use super::*;

    #[test]
    fn test_small_grid_places_crossing_words() {
        let bank = WordBank::from_words(["CAT", "DOG", "CATS", "TO"]);
        let config = test_config(5, 5, SolverBackend::BranchBound);
        let result = generate(&config, &bank).unwrap();

        assert!(result.success);
        assert!(result.status.as_ref().unwrap().is_success());
        assert_eq!(result.solver_backend, "branch-bound");

        // at least two words placed, and everything the validator found
        // valid really is in the bank
        let placed = placed_from(&result, &["CAT", "DOG", "CATS", "TO"]);
        assert!(placed.len() >= 2, "expected a crossing pair, got {placed:?}");
        for word in &result.valid_words {
            assert!(bank.contains(word), "validator accepted non-bank word {word}");
        }

        let grid = result.grid.unwrap();
        assert_eq!((grid.rows(), grid.cols()), (5, 5));
        // the repair pass only ever adds separators, never removes letters
        // belonging to placed words, so the placed words survive as runs
        assert!(grid.separator_count() < 25);
    }

    #[test]
    fn test_impossible_instance_is_proven_infeasible() {
        // two distinct words cannot cross inside a single cell
        let bank = WordBank::from_words(["AB", "CD"]);
        let config = test_config(1, 1, SolverBackend::BranchBound);
        let result = generate(&config, &bank).unwrap();

        assert!(!result.success);
        assert_eq!(result.status, Some(SolveStatus::Infeasible));
        assert_eq!(result.failure.unwrap().code(), "G002");
        assert!(result.grid.is_none());
    }

    #[test]
    fn test_run_control_zero_yields_no_invalid_runs() {
        let bank = WordBank::from_words(["TO", "ON"]);
        let mut config = test_config(2, 2, SolverBackend::BranchBound);
        config.n_limit = Some(0);
        let result = generate(&config, &bank).unwrap();

        assert!(result.success);
        assert!(result.invalid_words.is_empty(), "n_limit=0 must forbid invalid runs");
    }

    #[test]
    fn test_run_control_budget_is_tighter() {
        let bank = WordBank::from_words(["CAT", "TO"]);
        let mut config = test_config(3, 3, SolverBackend::BranchBound);
        config.n_limit = Some(1);
        let result = generate(&config, &bank).unwrap();

        assert!(result.success);
        // run-control budget: at most a third of the cells
        assert!(result.grid.unwrap().separator_count() <= 3);
    }
}

#[cfg(test)]
mod restart_backend {
    use super::*;

    fn larger_bank() -> WordBank {
        WordBank::from_words([
            "CAT", "DOG", "CATS", "DOGS", "TO", "ON", "NO", "AT", "TOP", "POT",
        ])
    }

    #[test]
    fn test_restart_finds_a_feasible_grid() {
        let mut config = test_config(6, 6, SolverBackend::Restart);
        config.seed = Some(11);
        let result = generate(&config, &larger_bank()).unwrap();

        assert!(result.success);
        assert_eq!(result.status, Some(SolveStatus::Feasible));
        assert_eq!(result.solver_backend, "restart");
        assert!(!result.valid_words.is_empty());
    }

    #[test]
    fn test_equal_seeds_reproduce_the_grid() {
        let mut config = test_config(6, 6, SolverBackend::Restart);
        config.seed = Some(42);

        let a = generate(&config, &larger_bank()).unwrap();
        let b = generate(&config, &larger_bank()).unwrap();
        assert_eq!(
            a.grid.unwrap().to_row_strings(),
            b.grid.unwrap().to_row_strings()
        );
    }
}

#[cfg(test)]
mod pipeline_failures {
    use super::*;

    #[test]
    fn test_empty_bank_fails_without_solving() {
        let bank = WordBank::from_words(Vec::<String>::new());
        let config = test_config(9, 9, SolverBackend::Restart);
        let result = generate(&config, &bank).unwrap();

        assert!(!result.success);
        assert!(result.status.is_none(), "no solver run for an empty bank");
        assert_eq!(result.failure.unwrap().code(), "G001");
        assert!(result.elapsed_seconds < 1.0);
    }

    #[test]
    fn test_contradictory_config_is_rejected() {
        let bank = WordBank::from_words(["CAT"]);
        let mut config = test_config(5, 5, SolverBackend::BranchBound);
        config.min_word_length = 8;
        config.max_word_length = 4;

        let err = generate(&config, &bank).unwrap_err();
        assert_eq!(err.code(), "G004");
        assert!(err.display_detailed().contains("G004"));
    }
}

#[cfg(test)]
mod validation_and_repair {
    use super::*;
    use wordgrid::grid::Grid;
    use wordgrid::repair::repair_grid;

    #[test]
    fn test_validation_is_idempotent_on_generated_grids() {
        let bank = WordBank::from_words(["CAT", "TO"]);
        let config = test_config(4, 4, SolverBackend::BranchBound);
        let result = generate(&config, &bank).unwrap();
        assert!(result.success);

        let grid = result.grid.unwrap();
        let again = validate_grid(&grid, &bank);
        assert_eq!(again.valid_words, result.valid_words);
        assert_eq!(again.invalid_words, result.invalid_words);
        assert_eq!(again.fragments, result.fragments);
    }

    #[test]
    fn test_repair_never_increases_invalid_runs() {
        let bank = WordBank::from_words(["CAT", "TO", "ON"]);
        let grid = Grid::from_rows(&["TOONQ", "CATXY", "#####", "QQ#ZZ", "A#B#C"]);

        let before = validate_grid(&grid, &bank);
        let repaired = repair_grid(&grid, &bank);
        let after = validate_grid(&repaired, &bank);

        assert!(after.invalid_words.len() <= before.invalid_words.len());
        // repair only turns letters into separators
        assert!(repaired.separator_count() >= grid.separator_count());
    }
}

#[cfg(test)]
mod word_bank_loading {
    use super::*;

    const FILTER: WordFilter = WordFilter { min_len: 3, max_len: 5, min_frequency: 1e-5 };

    #[test]
    fn test_frequency_list_drives_generation() {
        let list = "cat;2e-4\nto;3e-4\ntoad;1e-4\nrarest;1e-9\nxx;5e-4";
        let bank = WordBank::parse_from_str(list, FILTER, 10, Selection::Ranked);

        // "to" and "xx" are too short, "rarest" too rare and too long
        assert_eq!(bank.words(), &["CAT", "TOAD"]);

        let config = test_config(4, 4, SolverBackend::BranchBound);
        let result = generate(&config, &bank).unwrap();
        assert!(result.success);
    }

    #[test]
    fn test_preset_configs_generate() {
        let mut config = GenerationConfig::preset("easier-challenge").unwrap();
        config.backend = SolverBackend::BranchBound;
        config.time_limit = Duration::from_secs(20);

        let bank = WordBank::from_words(["CATS", "TOAD", "SODA", "DATA"]);
        let result = generate(&config, &bank).unwrap();
        // run control with n_limit=1 tolerates at most one invalid run
        if result.success {
            assert!(result.invalid_words.len() <= 1);
        } else {
            assert!(result.failure.unwrap().is_accepted_failure());
        }
    }
}
