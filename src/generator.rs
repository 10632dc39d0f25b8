//! The generation pipeline: model, solve, extract, repair, validate.
//!
//! [`generate`] runs the pipeline once and returns a [`GenerationResult`]
//! record. There is no retry loop and no backend switching on failure: an
//! infeasible or timed-out solve is recorded as a failed result with its
//! cause, exactly once per request. Only caller mistakes (bad configuration)
//! and internal inconsistencies propagate as `Err`.
//!
//! The repair pass runs only for the repair pipeline variant (no `n_limit`);
//! with run control the model already bounds invalid runs and the grid is
//! recorded as solved.

use instant::Instant;

use crate::config::{GenerationConfig, ModelOptions};
use crate::errors::GenerateError;
use crate::extract::extract_grid;
use crate::grid::Grid;
use crate::model::Model;
use crate::repair::repair_grid;
use crate::solver::{solve_with_backend, SolveStatus};
use crate::validate::validate_grid;
use crate::word_bank::WordBank;

/// The record of one generation attempt, successful or not.
#[derive(Debug)]
pub struct GenerationResult {
    /// True when the solver produced a grid. Validation findings (invalid
    /// runs, fragments) are reported but do not revoke success.
    pub success: bool,
    pub grid: Option<Grid>,
    pub valid_words: Vec<String>,
    pub invalid_words: Vec<String>,
    pub fragments: Vec<String>,
    pub elapsed_seconds: f64,
    /// Name of the backend that ran (after `auto` resolution).
    pub solver_backend: &'static str,
    /// Solver status, when the solver ran at all.
    pub status: Option<SolveStatus>,
    /// The accepted failure that ended the attempt, for failed results.
    pub failure: Option<GenerateError>,
}

impl GenerationResult {
    /// No invalid runs and at most one stray single letter.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.invalid_words.is_empty() && self.fragments.len() <= 1
    }
}

/// Run the pipeline once for `config` over `bank`.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidConfig`] for contradictory requests and
/// [`GenerateError::InconsistentSolution`] if extraction finds an undecided
/// cell. Empty banks, infeasibility, and timeouts are *not* errors; they
/// come back as a failed [`GenerationResult`] carrying the cause.
pub fn generate(
    config: &GenerationConfig,
    bank: &WordBank,
) -> Result<GenerationResult, GenerateError> {
    config.validate()?;
    let start = Instant::now();

    if bank.is_empty() {
        log::warn!("word bank is empty after filtering; nothing to place");
        return Ok(failed(GenerateError::EmptyWordBank, None, "auto", start));
    }

    let options = ModelOptions::for_config(config);
    let model = Model::build(bank, config.rows, config.cols, options);

    let backend = config.resolve_backend(bank.len());
    log::info!(
        "generating {}x{} grid, {} candidate words, {} backend, {} pipeline",
        config.rows,
        config.cols,
        bank.len(),
        backend.name(),
        if options.run_control_enabled() { "run-control" } else { "repair" }
    );

    let outcome = solve_with_backend(&model, backend, config.time_limit, config.seed);
    let backend_name = backend.name();

    let Some(assignment) = outcome.assignment else {
        let failure = match outcome.status {
            SolveStatus::Infeasible => GenerateError::Infeasible,
            _ => GenerateError::TimedOut { elapsed: outcome.elapsed },
        };
        log::warn!("solve failed: {failure}");
        return Ok(failed(failure, Some(outcome.status), backend_name, start));
    };

    let solved = extract_grid(&model, &assignment)?;
    let grid = if options.run_control_enabled() {
        solved
    } else {
        repair_grid(&solved, bank)
    };

    let report = validate_grid(&grid, bank);
    let elapsed_seconds = start.elapsed().as_secs_f64();
    log::info!(
        "generated grid in {elapsed_seconds:.2}s ({:?}): {} words placed, {} invalid runs",
        outcome.status,
        report.valid_words.len(),
        report.invalid_words.len()
    );

    Ok(GenerationResult {
        success: true,
        grid: Some(grid),
        valid_words: report.valid_words,
        invalid_words: report.invalid_words,
        fragments: report.fragments,
        elapsed_seconds,
        solver_backend: backend_name,
        status: Some(outcome.status),
        failure: None,
    })
}

fn failed(
    failure: GenerateError,
    status: Option<SolveStatus>,
    solver_backend: &'static str,
    start: Instant,
) -> GenerationResult {
    GenerationResult {
        success: false,
        grid: None,
        valid_words: Vec::new(),
        invalid_words: Vec::new(),
        fragments: Vec::new(),
        elapsed_seconds: start.elapsed().as_secs_f64(),
        solver_backend,
        status,
        failure: Some(failure),
    }
}
