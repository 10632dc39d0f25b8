//! Caller-supplied configuration for a generation request.
//!
//! Everything here is plain data handed to [`crate::generator::generate`];
//! there is no process-global default state. The named presets reproduce the
//! two stock puzzle shapes the tool has always shipped with, and the auto
//! backend selection reproduces the original size heuristic (small grid or
//! small bank favors the exact backend, everything else the stochastic one).

use std::time::Duration;

use crate::errors::GenerateError;
use crate::word_bank::{Selection, WordFilter};

/// Grid size below which the exact backend is preferred in auto mode.
pub const SMALL_GRID_THRESHOLD: usize = 5;
/// Bank size below which the exact backend is preferred in auto mode.
pub const SMALL_BANK_THRESHOLD: usize = 40;

/// Which constraint-solver backend runs the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverBackend {
    /// Exact branch-and-bound search; proves optimality and infeasibility,
    /// practical for small grids and banks.
    BranchBound,
    /// Randomized restart search; scales to large grids and banks but only
    /// ever reports feasible incumbents.
    Restart,
    /// Pick by the size heuristic at solve time.
    Auto,
}

impl SolverBackend {
    /// Backend name as reported in the result record.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            SolverBackend::BranchBound => "branch-bound",
            SolverBackend::Restart => "restart",
            SolverBackend::Auto => "auto",
        }
    }
}

/// Objective weights: `placement · Σx − separator · Σblack − junk · Σjunk`.
///
/// The placement reward must stay strictly larger per unit than either
/// penalty, otherwise an empty grid scores as well as a full one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectiveWeights {
    pub placement: i64,
    pub separator: i64,
    pub junk: i64,
}

impl ObjectiveWeights {
    /// Weights used when invalid runs are handled by the repair pass.
    pub const REPAIR: ObjectiveWeights =
        ObjectiveWeights { placement: 20, separator: 1, junk: 0 };
    /// Weights used when run control bounds invalid runs inside the model.
    pub const RUN_CONTROL: ObjectiveWeights =
        ObjectiveWeights { placement: 10, separator: 2, junk: 5 };
}

/// Feature flags and tunables for the model builder. One parametrized
/// builder replaces the historical per-backend formulation copies.
#[derive(Debug, Clone, Copy)]
pub struct ModelOptions {
    /// Bound invalid runs inside the model (`Some(limit)`) or leave them to
    /// the post-hoc repair pass (`None`).
    pub n_limit: Option<u32>,
    /// Separators are capped at `⌊fraction · R·C⌋`.
    pub separator_budget_fraction: f64,
    pub weights: ObjectiveWeights,
}

impl ModelOptions {
    /// Derive the per-variant defaults from a request: run control uses the
    /// tighter 1/3 separator budget and junk-penalizing weights, the repair
    /// variant the looser 1/2 budget.
    #[must_use]
    pub fn for_config(config: &GenerationConfig) -> ModelOptions {
        match config.n_limit {
            Some(limit) => ModelOptions {
                n_limit: Some(limit),
                separator_budget_fraction: 1.0 / 3.0,
                weights: ObjectiveWeights::RUN_CONTROL,
            },
            None => ModelOptions {
                n_limit: None,
                separator_budget_fraction: 0.5,
                weights: ObjectiveWeights::REPAIR,
            },
        }
    }

    #[must_use]
    pub fn run_control_enabled(&self) -> bool {
        self.n_limit.is_some()
    }
}

/// One generation request. All fields are required; `n_limit` and `seed` use
/// `Option` because absence is meaningful (no run control / entropy seed).
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub rows: usize,
    pub cols: usize,
    pub min_word_length: usize,
    pub max_word_length: usize,
    pub min_frequency: f64,
    pub max_words: usize,
    pub time_limit: Duration,
    /// Tolerated invalid-run count; `Some` enables run control.
    pub n_limit: Option<u32>,
    pub random_selection: bool,
    pub seed: Option<u64>,
    pub backend: SolverBackend,
}

impl GenerationConfig {
    /// A request with the long-standing defaults: word lengths 3-5,
    /// frequency floor 1e-5, 200-word bank, 5-minute budget, repair variant,
    /// auto backend.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> GenerationConfig {
        GenerationConfig {
            rows,
            cols,
            min_word_length: 3,
            max_word_length: 5,
            min_frequency: 1e-5,
            max_words: 200,
            time_limit: Duration::from_secs(300),
            n_limit: None,
            random_selection: false,
            seed: None,
            backend: SolverBackend::Auto,
        }
    }

    /// Preset: 5×5 grid, lengths 4-5, 60 randomly sampled words, run control
    /// tolerating one invalid run.
    #[must_use]
    pub fn easier_challenge() -> GenerationConfig {
        GenerationConfig {
            min_word_length: 4,
            max_word_length: 5,
            max_words: 60,
            time_limit: Duration::from_secs(100),
            n_limit: Some(1),
            random_selection: true,
            ..GenerationConfig::new(5, 5)
        }
    }

    /// Preset: 9×9 grid, lengths 4-8, the 1000 most frequent words, run
    /// control tolerating two invalid runs.
    #[must_use]
    pub fn challenge() -> GenerationConfig {
        GenerationConfig {
            min_word_length: 4,
            max_word_length: 8,
            max_words: 1000,
            time_limit: Duration::from_secs(100),
            n_limit: Some(2),
            random_selection: false,
            ..GenerationConfig::new(9, 9)
        }
    }

    /// Look up a preset by name.
    #[must_use]
    pub fn preset(name: &str) -> Option<GenerationConfig> {
        match name {
            "easier-challenge" => Some(Self::easier_challenge()),
            "challenge" => Some(Self::challenge()),
            _ => None,
        }
    }

    /// Check the request for contradictions before any work happens.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), GenerateError> {
        let fail = |reason: &str| {
            Err(GenerateError::InvalidConfig { reason: reason.to_string() })
        };
        if self.rows == 0 || self.cols == 0 {
            return fail("grid dimensions must be at least 1x1");
        }
        if self.min_word_length == 0 {
            return fail("minimum word length must be at least 1");
        }
        if self.min_word_length > self.max_word_length {
            return fail("minimum word length exceeds maximum word length");
        }
        if self.max_words == 0 {
            return fail("word bank cap must be at least 1");
        }
        if self.time_limit.is_zero() {
            return fail("time limit must be positive");
        }
        Ok(())
    }

    /// The word-bank filter implied by this request.
    #[must_use]
    pub fn word_filter(&self) -> WordFilter {
        WordFilter {
            min_len: self.min_word_length,
            max_len: self.max_word_length,
            min_frequency: self.min_frequency,
        }
    }

    /// The word-bank selection mode implied by this request.
    #[must_use]
    pub fn selection(&self) -> Selection {
        if self.random_selection {
            Selection::RandomSeeded(self.seed)
        } else {
            Selection::Ranked
        }
    }

    /// Resolve `Auto` to a concrete backend for a bank of `bank_len` words:
    /// small grid or small bank favors exact search.
    #[must_use]
    pub fn resolve_backend(&self, bank_len: usize) -> SolverBackend {
        match self.backend {
            SolverBackend::Auto => {
                let grid_size = self.rows.max(self.cols);
                if grid_size < SMALL_GRID_THRESHOLD || bank_len < SMALL_BANK_THRESHOLD {
                    SolverBackend::BranchBound
                } else {
                    SolverBackend::Restart
                }
            }
            explicit => explicit,
        }
    }

    /// A human-readable backend recommendation for this problem size,
    /// surfaced by the CLI when the user asked for `auto`.
    #[must_use]
    pub fn recommendation(&self) -> (&'static str, &'static str) {
        let grid_size = self.rows.max(self.cols);
        if grid_size <= 4 {
            ("branch-bound", "exact search is typically faster for small grids")
        } else if grid_size >= 7 || self.max_words >= 50 {
            ("restart", "restart search is typically faster for large grids or many words")
        } else {
            ("auto", "either backend is reasonable at this size")
        }
    }
}
