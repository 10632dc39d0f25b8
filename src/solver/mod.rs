//! Constraint-solver backends for the grid model.
//!
//! The contract is the [`ConstraintSolver`] trait: given a [`Model`] and a
//! wall-clock [`TimeBudget`], return a [`SolveStatus`] and, for
//! Optimal/Feasible, a total variable assignment. Callers must treat
//! Feasible (a valid but not proven-optimal assignment found before the
//! budget expired) as a success equivalent to Optimal.
//!
//! Two backends implement the contract:
//!
//! - [`BranchBoundSolver`]: exact depth-first search over per-word placement
//!   decisions with objective-bound pruning. Proves Optimal and Infeasible;
//!   the backend of choice for small grids and banks.
//! - [`RestartSolver`]: randomized greedy dives restarted until the budget
//!   expires. Scales to large instances but only ever reports Feasible
//!   incumbents (it cannot prove anything).
//!
//! Both drive the shared working-grid machinery in [`search`] and vet every
//! candidate through [`Model::check`] before accepting it, so the model
//! rather than the search code stays the ground truth for feasibility.

mod branch_bound;
mod restart;
mod search;

pub use branch_bound::BranchBoundSolver;
pub use restart::RestartSolver;

use std::time::Duration;

use instant::Instant;

use crate::config::SolverBackend;
use crate::model::{Assignment, Model};

/// Status of a solver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    /// The search space was exhausted; the returned assignment is the best
    /// possible under the objective.
    Optimal,
    /// A valid assignment was found, but optimality was not proven before
    /// the budget expired. An accepted success.
    Feasible,
    /// The search space was exhausted without finding any valid assignment.
    Infeasible,
    /// The time budget expired with no usable incumbent.
    TimedOut,
}

impl SolveStatus {
    /// True for the statuses that carry a usable assignment.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// Result of a solver run: status, assignment (for successes), wall time.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub assignment: Option<Assignment>,
    pub elapsed: Duration,
}

/// Wall-clock time budget for a solver run.
///
/// Usage:
/// ```ignore
/// let budget = TimeBudget::new(Duration::from_secs(30));
/// while !budget.expired() {
///     // do some work
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TimeBudget {
    start: Instant,
    limit: Duration,
}

impl TimeBudget {
    /// Create a new budget that lasts for `limit`.
    #[must_use]
    pub fn new(limit: Duration) -> Self {
        Self { start: Instant::now(), limit }
    }

    /// How long this budget has been running.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Returns true if the allowed time has fully elapsed.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.limit
    }
}

/// A backend that can solve the grid model under a time budget.
pub trait ConstraintSolver {
    /// Solve `model`, returning the best incumbent found within `budget`.
    /// Must never block past the budget.
    fn solve(&mut self, model: &Model, budget: &TimeBudget) -> SolveOutcome;

    /// Backend name for the result record.
    fn name(&self) -> &'static str;
}

/// Solve with a concrete backend choice. `Auto` must be resolved by the
/// caller (see [`crate::config::GenerationConfig::resolve_backend`]); backend
/// switching is a caller decision, never done automatically here.
#[must_use]
pub fn solve_with_backend(
    model: &Model,
    backend: SolverBackend,
    time_limit: Duration,
    seed: Option<u64>,
) -> SolveOutcome {
    debug_assert_ne!(backend, SolverBackend::Auto, "Auto must be resolved before solving");
    let budget = TimeBudget::new(time_limit);
    match backend {
        SolverBackend::Restart => RestartSolver::new(seed).solve(model, &budget),
        _ => BranchBoundSolver::new().solve(model, &budget),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_expiry() {
        let budget = TimeBudget::new(Duration::ZERO);
        assert!(budget.expired());

        let generous = TimeBudget::new(Duration::from_secs(3600));
        assert!(!generous.expired());
        assert!(generous.elapsed() < Duration::from_secs(3600));
    }

    #[test]
    fn test_status_success_classification() {
        assert!(SolveStatus::Optimal.is_success());
        assert!(SolveStatus::Feasible.is_success());
        assert!(!SolveStatus::Infeasible.is_success());
        assert!(!SolveStatus::TimedOut.is_success());
    }
}
