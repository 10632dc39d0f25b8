//! Shared search machinery for both solver backends.
//!
//! A [`SearchGrid`] tracks the partial grid implied by the placement
//! decisions made so far: covered cells with their forced letters, boundary
//! separators with pin counts, and the running separator total against the
//! budget. Backends branch over placements; candidate solutions are produced
//! by [`SearchGrid::complete_and_audit`], which
//!
//! 1. completes undecided cells canonically (separators in row-major order
//!    while the budget allows, filler letters after),
//! 2. audits the completed grid (crossing requirement, run-control cap),
//!    rejecting candidates that cannot satisfy the model,
//! 3. derives the total boolean assignment and verifies it with
//!    [`Model::check`], so no unchecked candidate ever becomes an incumbent.
//!
//! The canonical completion makes "optimal" well-defined for the exact
//! backend: optimal over placement sets under this completion rule.

use crate::grid::Direction;
use crate::model::{Assignment, Model, VarKey, MAX_JUNK_LEN};

/// Cell state during search. `Free` cells are decided at completion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellVal {
    Free,
    Letter(u8),
    Black,
}

/// A completed, audited, model-checked candidate solution.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub assignment: Assignment,
    /// Objective value under the model's weights.
    pub score: i64,
    /// Invalid maximal runs in the completed grid (all lengths).
    pub invalid_runs: usize,
}

/// The working grid state shared by the backends.
pub(crate) struct SearchGrid<'a> {
    model: &'a Model,
    /// Letter indices per bank word, precomputed once.
    word_letters: Vec<Vec<u8>>,
    cells: Vec<CellVal>,
    /// Active placements covering each cell (crossings have ≥2).
    cover: Vec<u32>,
    /// Boundary-separator pins per cell; a black cell frees when unpinned.
    pins: Vec<u32>,
    black_count: usize,
    /// Chosen placement-catalog index per word.
    chosen: Vec<Option<usize>>,
    placed_count: usize,
}

impl<'a> SearchGrid<'a> {
    pub(crate) fn new(model: &'a Model) -> Self {
        let cell_count = model.rows * model.cols;
        SearchGrid {
            model,
            word_letters: (0..model.bank.len()).map(|w| model.word_letters(w)).collect(),
            cells: vec![CellVal::Free; cell_count],
            cover: vec![0; cell_count],
            pins: vec![0; cell_count],
            black_count: 0,
            chosen: vec![None; model.bank.len()],
            placed_count: 0,
        }
    }

    /// Reset to the empty grid (used between restart dives).
    pub(crate) fn reset(&mut self) {
        self.cells.fill(CellVal::Free);
        self.cover.fill(0);
        self.pins.fill(0);
        self.black_count = 0;
        self.chosen.fill(None);
        self.placed_count = 0;
    }

    pub(crate) fn placed_count(&self) -> usize {
        self.placed_count
    }

    pub(crate) fn black_count(&self) -> usize {
        self.black_count
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.model.cols + col
    }

    /// Would this placement cross at least one already-placed letter?
    pub(crate) fn crosses_existing(&self, index: usize) -> bool {
        self.model.placements[index]
            .cells()
            .any(|(r, c)| self.cover[self.idx(r, c)] > 0)
    }

    /// Try to place catalog entry `index`. Returns false (and changes
    /// nothing) if it conflicts with the current state or would exceed the
    /// separator budget.
    pub(crate) fn place(&mut self, index: usize) -> bool {
        let placement = self.model.placements[index];
        debug_assert!(self.chosen[placement.word].is_none(), "word already placed");
        let letters = &self.word_letters[placement.word];

        // Dry compatibility pass first, so failure changes nothing.
        for (k, (r, c)) in placement.cells().enumerate() {
            match self.cells[self.idx(r, c)] {
                CellVal::Free => {}
                CellVal::Letter(existing) if existing == letters[k] => {}
                _ => return false,
            }
        }
        let mut new_blacks = 0;
        let boundary = [
            placement.cell_before(),
            placement.cell_after(self.model.rows, self.model.cols),
        ];
        for (r, c) in boundary.iter().flatten() {
            match self.cells[self.idx(*r, *c)] {
                CellVal::Free => new_blacks += 1,
                CellVal::Black => {}
                CellVal::Letter(_) => return false,
            }
        }
        if self.black_count + new_blacks > self.model.separator_budget {
            return false;
        }

        // Apply.
        for (k, (r, c)) in placement.cells().enumerate() {
            let i = self.idx(r, c);
            self.cells[i] = CellVal::Letter(letters[k]);
            self.cover[i] += 1;
        }
        for (r, c) in boundary.iter().flatten() {
            let i = self.idx(*r, *c);
            if self.cells[i] == CellVal::Free {
                self.cells[i] = CellVal::Black;
                self.black_count += 1;
            }
            self.pins[i] += 1;
        }
        self.chosen[placement.word] = Some(index);
        self.placed_count += 1;
        true
    }

    /// Undo a previous successful [`place`](Self::place) of the same entry.
    pub(crate) fn unplace(&mut self, index: usize) {
        let placement = self.model.placements[index];
        debug_assert_eq!(self.chosen[placement.word], Some(index));

        for (r, c) in placement.cells() {
            let i = self.idx(r, c);
            self.cover[i] -= 1;
            if self.cover[i] == 0 {
                self.cells[i] = CellVal::Free;
            }
        }
        let boundary = [
            placement.cell_before(),
            placement.cell_after(self.model.rows, self.model.cols),
        ];
        for (r, c) in boundary.iter().flatten() {
            let i = self.idx(*r, *c);
            self.pins[i] -= 1;
            if self.pins[i] == 0 {
                self.cells[i] = CellVal::Free;
                self.black_count -= 1;
            }
        }
        self.chosen[placement.word] = None;
        self.placed_count -= 1;
    }

    /// Complete the grid canonically, audit it, and derive the checked
    /// assignment. Returns `None` when the candidate cannot satisfy the
    /// model (no crossing, run-control cap exceeded, or a check failure).
    pub(crate) fn complete_and_audit(&self) -> Option<Candidate> {
        let model = self.model;

        // Canonical completion: separators while the budget allows,
        // arbitrary filler letters after.
        let mut completed = self.cells.clone();
        let mut blacks = self.black_count;
        for (i, cell) in completed.iter_mut().enumerate() {
            if *cell == CellVal::Free {
                if blacks < model.separator_budget {
                    *cell = CellVal::Black;
                    blacks += 1;
                } else {
                    *cell = CellVal::Letter((i % 26) as u8);
                }
            }
        }

        // A grid with no words is never a solution, and multi-word banks
        // additionally need a crossing cell.
        if self.placed_count == 0 {
            return None;
        }
        if model.bank.len() > 1 && !self.cover.iter().any(|&n| n >= 2) {
            return None;
        }

        // Run audit: every maximal letter run of length ≥2 that is not a
        // bank member counts against the run-control limit, regardless of
        // whether a junk variable exists for its length.
        let invalid_runs = scan_invalid_runs(model, &completed);
        if let Some(n_limit) = model.options.n_limit {
            if invalid_runs.len() > n_limit as usize {
                return None;
            }
        }

        let assignment = self.derive_assignment(&completed, &invalid_runs);
        if let Err(violation) = model.check(&assignment) {
            // The audits above should make this unreachable; a violation
            // here means the search and the model disagree.
            log::warn!("discarding candidate: {violation}");
            debug_assert!(false, "candidate failed model check: {violation}");
            return None;
        }

        Some(Candidate {
            score: model.objective_value(&assignment),
            invalid_runs: invalid_runs.len(),
            assignment,
        })
    }

    /// Map the completed grid onto the model's boolean variables.
    fn derive_assignment(
        &self,
        completed: &[CellVal],
        invalid_runs: &[RunSpan],
    ) -> Assignment {
        let model = self.model;
        let mut assignment = Assignment::all_false(model.num_vars());

        for index in self.chosen.iter().flatten() {
            assignment.set(model.placement_var(*index), true);
        }
        for row in 0..model.rows {
            for col in 0..model.cols {
                match completed[self.idx(row, col)] {
                    CellVal::Letter(letter) => {
                        assignment.set(model.letter_var(row, col, letter), true);
                    }
                    CellVal::Black => assignment.set(model.black_var(row, col), true),
                    CellVal::Free => unreachable!("completion decides every cell"),
                }
            }
        }
        if model.bank.len() > 1 {
            for row in 0..model.rows {
                for col in 0..model.cols {
                    if self.cover[self.idx(row, col)] >= 2 {
                        if let Some(var) = model.var(VarKey::Cross { row, col }) {
                            assignment.set(var, true);
                        }
                    }
                }
            }
        }
        if model.options.run_control_enabled() {
            for span in invalid_runs {
                if span.len <= MAX_JUNK_LEN {
                    let key = VarKey::Junk {
                        row: span.row,
                        col: span.col,
                        len: span.len,
                        dir: span.dir,
                    };
                    if let Some(var) = model.var(key) {
                        assignment.set(var, true);
                    }
                }
            }
        }
        assignment
    }
}

/// A maximal letter run found during the audit.
pub(crate) struct RunSpan {
    pub row: usize,
    pub col: usize,
    pub len: usize,
    pub dir: Direction,
}

/// Scan all maximal letter runs of the completed grid and return those of
/// length ≥2 whose text is not a bank member.
fn scan_invalid_runs(model: &Model, completed: &[CellVal]) -> Vec<RunSpan> {
    let mut invalid = Vec::new();
    let at = |r: usize, c: usize| completed[r * model.cols + c];

    let mut scan = |start_row: usize, start_col: usize, dir: Direction, len: usize| {
        let (dr, dc) = dir.step();
        let mut text = String::new();
        let mut run_start = (start_row, start_col);
        let flush = |text: &mut String, start: (usize, usize), invalid: &mut Vec<RunSpan>| {
            if text.len() >= 2 && !model.bank.contains(text) {
                invalid.push(RunSpan { row: start.0, col: start.1, len: text.len(), dir });
            }
            text.clear();
        };
        for k in 0..len {
            let (r, c) = (start_row + dr * k, start_col + dc * k);
            match at(r, c) {
                CellVal::Letter(letter) => {
                    if text.is_empty() {
                        run_start = (r, c);
                    }
                    text.push((b'A' + letter) as char);
                }
                CellVal::Black => flush(&mut text, run_start, &mut invalid),
                CellVal::Free => unreachable!("completion decides every cell"),
            }
        }
        flush(&mut text, run_start, &mut invalid);
    };

    for r in 0..model.rows {
        scan(r, 0, Direction::Across, model.cols);
    }
    for c in 0..model.cols {
        scan(0, c, Direction::Down, model.rows);
    }
    invalid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenerationConfig, ModelOptions};
    use crate::word_bank::WordBank;

    fn model_for(words: &[&str], rows: usize, cols: usize) -> Model {
        let options = ModelOptions::for_config(&GenerationConfig::new(rows, cols));
        Model::build(&WordBank::from_words(words), rows, cols, options)
    }

    /// Find the catalog index of a specific placement.
    fn placement_index(model: &Model, word: usize, row: usize, col: usize, dir: Direction) -> usize {
        model
            .placements
            .iter()
            .position(|p| p.word == word && p.row == row && p.col == col && p.dir == dir)
            .expect("placement should exist")
    }

    #[test]
    fn test_place_conflicting_letters_fails() {
        let model = model_for(&["CAT", "DOG"], 3, 3);
        let mut grid = SearchGrid::new(&model);

        let cat = placement_index(&model, 0, 0, 0, Direction::Across);
        assert!(grid.place(cat));

        // DOG across the same row conflicts on every cell
        let dog = placement_index(&model, 1, 0, 0, Direction::Down);
        // (0,0) holds 'C', DOG starts with 'D'
        assert!(!grid.place(dog));
        assert_eq!(grid.placed_count(), 1);
    }

    #[test]
    fn test_place_compatible_crossing() {
        let model = model_for(&["CAT", "TO"], 3, 3);
        let mut grid = SearchGrid::new(&model);

        let cat = placement_index(&model, 0, 0, 0, Direction::Across);
        assert!(grid.place(cat));

        // TO down from (0,2) shares the 'T'
        let to = placement_index(&model, 1, 0, 2, Direction::Down);
        assert!(grid.place(to));
        assert!(grid.crosses_existing(to));
        assert_eq!(grid.placed_count(), 2);

        // boundary black below TO
        assert!(grid.black_count() >= 1);
    }

    #[test]
    fn test_unplace_restores_state() {
        let model = model_for(&["CAT", "TO"], 3, 3);
        let mut grid = SearchGrid::new(&model);

        let cat = placement_index(&model, 0, 0, 0, Direction::Across);
        let to = placement_index(&model, 1, 0, 2, Direction::Down);
        assert!(grid.place(cat));
        assert!(grid.place(to));

        grid.unplace(to);
        grid.unplace(cat);
        assert_eq!(grid.placed_count(), 0);
        assert_eq!(grid.black_count(), 0);
        assert!(grid.cells.iter().all(|&c| c == CellVal::Free));
    }

    #[test]
    fn test_candidate_requires_crossing_for_multi_word_banks() {
        let model = model_for(&["CAT", "DOG"], 3, 3);
        let mut grid = SearchGrid::new(&model);

        // parallel, non-crossing placements
        let cat = placement_index(&model, 0, 0, 0, Direction::Across);
        let dog = placement_index(&model, 1, 2, 0, Direction::Across);
        assert!(grid.place(cat));
        assert!(grid.place(dog));
        assert!(grid.complete_and_audit().is_none());
    }

    #[test]
    fn test_candidate_with_crossing_is_checked_and_scored() {
        let model = model_for(&["CAT", "TO"], 3, 3);
        let mut grid = SearchGrid::new(&model);

        let cat = placement_index(&model, 0, 0, 0, Direction::Across);
        let to = placement_index(&model, 1, 0, 2, Direction::Down);
        assert!(grid.place(cat));
        assert!(grid.place(to));

        let candidate = grid.complete_and_audit().expect("crossing candidate");
        // two placements at weight 20 dominate the separator penalties
        assert!(candidate.score > 20);
    }
}
