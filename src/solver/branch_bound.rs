//! Exact branch-and-bound backend.
//!
//! Depth-first search over per-word decisions: for each bank word in order,
//! branch on every placement compatible with the partial grid, plus the
//! branch that leaves the word out. Leaves are completed and audited through
//! the shared [`SearchGrid`] machinery, so every incumbent has already passed
//! [`Model::check`](crate::model::Model::check).
//!
//! Pruning uses the optimistic bound
//! `w1 · (placed + placeable remaining) − w2 · separators so far`; separator
//! and junk penalties only grow toward the leaf, so a subtree whose bound
//! cannot beat the incumbent is safe to drop. Exhausting the tree proves
//! Optimal (or Infeasible when no leaf survived the audit); running out of
//! budget downgrades the result to Feasible or TimedOut.

use super::search::{Candidate, SearchGrid};
use super::{ConstraintSolver, SolveOutcome, SolveStatus, TimeBudget};
use crate::model::Model;

/// How many search nodes pass between wall-clock checks.
const TIME_CHECK_INTERVAL: u64 = 1024;

#[derive(Debug, Default)]
pub struct BranchBoundSolver;

impl BranchBoundSolver {
    #[must_use]
    pub fn new() -> BranchBoundSolver {
        BranchBoundSolver
    }
}

impl ConstraintSolver for BranchBoundSolver {
    fn solve(&mut self, model: &Model, budget: &TimeBudget) -> SolveOutcome {
        let mut search = Search::new(model, budget);
        search.dfs(0);

        let status = match (&search.best, search.timed_out) {
            (Some(_), false) => SolveStatus::Optimal,
            (Some(_), true) => SolveStatus::Feasible,
            (None, false) => SolveStatus::Infeasible,
            (None, true) => SolveStatus::TimedOut,
        };
        log::debug!(
            "branch-bound: {:?} after {} nodes, {} incumbents",
            status,
            search.nodes,
            search.incumbents
        );
        SolveOutcome {
            status,
            assignment: search.best.map(|c| c.assignment),
            elapsed: budget.elapsed(),
        }
    }

    fn name(&self) -> &'static str {
        "branch-bound"
    }
}

struct Search<'a> {
    model: &'a Model,
    grid: SearchGrid<'a>,
    budget: &'a TimeBudget,
    /// Words at index ≥ w that have at least one in-bounds placement.
    placeable_suffix: Vec<usize>,
    best: Option<Candidate>,
    timed_out: bool,
    nodes: u64,
    incumbents: u64,
}

impl<'a> Search<'a> {
    fn new(model: &'a Model, budget: &'a TimeBudget) -> Search<'a> {
        let words = model.bank.len();
        let mut placeable_suffix = vec![0; words + 1];
        for word in (0..words).rev() {
            let here = usize::from(!model.placements_by_word[word].is_empty());
            placeable_suffix[word] = placeable_suffix[word + 1] + here;
        }
        Search {
            model,
            grid: SearchGrid::new(model),
            budget,
            placeable_suffix,
            best: None,
            timed_out: false,
            nodes: 0,
            incumbents: 0,
        }
    }

    fn dfs(&mut self, word: usize) {
        if self.timed_out {
            return;
        }
        self.nodes += 1;
        if self.nodes % TIME_CHECK_INTERVAL == 0 && self.budget.expired() {
            self.timed_out = true;
            return;
        }

        if word == self.model.bank.len() {
            self.visit_leaf();
            return;
        }

        // Optimistic bound: every remaining placeable word lands, and no
        // further separators or junk penalties accrue.
        if let Some(best) = &self.best {
            let weights = self.model.options.weights;
            let bound = weights.placement
                * (self.grid.placed_count() + self.placeable_suffix[word]) as i64
                - weights.separator * self.grid.black_count() as i64;
            if bound <= best.score {
                return;
            }
        }

        // Placements first so good leaves surface before the all-skip one.
        for i in 0..self.model.placements_by_word[word].len() {
            let index = self.model.placements_by_word[word][i];
            if self.grid.place(index) {
                self.dfs(word + 1);
                self.grid.unplace(index);
                if self.timed_out {
                    return;
                }
            }
        }
        self.dfs(word + 1);
    }

    fn visit_leaf(&mut self) {
        let Some(candidate) = self.grid.complete_and_audit() else {
            return;
        };
        if self.best.as_ref().map_or(true, |b| candidate.score > b.score) {
            log::debug!(
                "branch-bound: incumbent score {} ({} words, {} invalid runs)",
                candidate.score,
                self.grid.placed_count(),
                candidate.invalid_runs
            );
            self.incumbents += 1;
            self.best = Some(candidate);
        }
    }
}
