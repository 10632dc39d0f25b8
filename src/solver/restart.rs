//! Randomized restart backend.
//!
//! Each *dive* builds a grid greedily from scratch: the bank is shuffled, the
//! first word lands at a random compatible position, and every later word
//! must cross a letter already on the grid (words with no compatible crossing
//! placement are skipped for that dive). The completed grid is audited and
//! checked like any other candidate, and the best incumbent across dives is
//! kept.
//!
//! Dives repeat until the wall-clock budget expires, or until a long stall
//! (many dives without improving the incumbent) suggests the neighborhood is
//! exhausted. The backend can prove nothing: a successful run is Feasible,
//! never Optimal, and a run with no incumbent is TimedOut rather than
//! Infeasible.
//!
//! The RNG is a local [`StdRng`] seeded from the request (or entropy when no
//! seed was given), so equal seeds reproduce the whole dive sequence.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::search::{Candidate, SearchGrid};
use super::{ConstraintSolver, SolveOutcome, SolveStatus, TimeBudget};
use crate::model::Model;

/// Give up after this many consecutive dives without a better incumbent.
const STALL_LIMIT: u32 = 500;

#[derive(Debug)]
pub struct RestartSolver {
    rng: StdRng,
}

impl RestartSolver {
    /// `seed` of `None` draws a fresh entropy seed.
    #[must_use]
    pub fn new(seed: Option<u64>) -> RestartSolver {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        RestartSolver { rng }
    }

    /// One greedy randomized construction. Returns the audited candidate,
    /// or `None` when the dive produced nothing usable.
    fn dive(&mut self, grid: &mut SearchGrid<'_>, model: &Model) -> Option<Candidate> {
        grid.reset();

        let mut order: Vec<usize> = (0..model.bank.len()).collect();
        order.shuffle(&mut self.rng);

        let mut indices = Vec::new();
        for word in order {
            indices.clear();
            indices.extend_from_slice(&model.placements_by_word[word]);
            indices.shuffle(&mut self.rng);

            // After the first word every placement must touch the grid,
            // otherwise dives drift into disconnected islands.
            let need_crossing = grid.placed_count() > 0;
            for &index in &indices {
                if need_crossing && !grid.crosses_existing(index) {
                    continue;
                }
                if grid.place(index) {
                    break;
                }
            }
        }

        if grid.placed_count() == 0 {
            return None;
        }
        grid.complete_and_audit()
    }
}

impl ConstraintSolver for RestartSolver {
    fn solve(&mut self, model: &Model, budget: &TimeBudget) -> SolveOutcome {
        let mut grid = SearchGrid::new(model);
        let mut best: Option<Candidate> = None;
        let mut dives: u64 = 0;
        let mut stalled: u32 = 0;

        while !budget.expired() {
            dives += 1;
            if let Some(candidate) = self.dive(&mut grid, model) {
                if best.as_ref().map_or(true, |b| candidate.score > b.score) {
                    log::debug!(
                        "restart: dive {dives} improved incumbent to score {}",
                        candidate.score
                    );
                    best = Some(candidate);
                    stalled = 0;
                    continue;
                }
            }
            stalled += 1;
            if best.is_some() && stalled >= STALL_LIMIT {
                log::debug!("restart: stalled after {dives} dives, keeping incumbent");
                break;
            }
        }

        let status = if best.is_some() { SolveStatus::Feasible } else { SolveStatus::TimedOut };
        log::debug!("restart: {:?} after {dives} dives", status);
        SolveOutcome {
            status,
            assignment: best.map(|c| c.assignment),
            elapsed: budget.elapsed(),
        }
    }

    fn name(&self) -> &'static str {
        "restart"
    }
}
