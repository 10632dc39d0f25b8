//! The constraint model that defines a legal grid.
//!
//! One parametrized builder replaces the historical per-backend formulation
//! copies: run control, the separator budget fraction, and the objective
//! weights are [`ModelOptions`] flags rather than divergent code paths.
//!
//! Variables are booleans keyed by tagged [`VarKey`] structs (word × position
//! × direction and friends), registered in a dense [`VarId`] space so an
//! assignment is just a bit vector. The constraint families are:
//!
//! 1. Cell exclusivity: per cell, exactly one of 26 letters or the separator.
//! 2. Letter consistency: an active placement forces each covered cell's
//!    letter indicator (implication, not equality, since crossings share
//!    cells).
//! 3. Single use: at most one active placement per word.
//! 4. Boundary separation: a placement not flush with an edge forces a
//!    separator immediately before its start and after its end.
//! 5. Run control (optional): a junk indicator may be set only if its span
//!    is all letters with separator bounds, and Σ junk ≤ `n_limit`.
//! 6. Intersection requirement (bank size > 1): a crossing indicator may be
//!    set only where ≥2 active placements cover the cell, and Σ crossing ≥ 1.
//! 7. Separator budget: Σ separators ≤ ⌊fraction · R·C⌋.
//!
//! The model is ground truth: [`Model::check`] evaluates every constraint
//! against a total assignment, and solvers vet each candidate through it
//! before accepting an incumbent.

use std::collections::HashMap;
use std::fmt;

use crate::config::ModelOptions;
use crate::grid::Direction;
use crate::word_bank::WordBank;

/// Number of letter symbols per cell.
pub const ALPHABET: usize = 26;

/// Longest run length that gets an explicit junk variable; longer invalid
/// runs are handled by the solver's run audit.
pub const MAX_JUNK_LEN: usize = 5;

/// Dense index of a boolean model variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

impl VarId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Tagged key identifying what a variable means. Replaces the ad hoc tuple
/// dictionaries of the source formulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKey {
    /// Word `word` starts at (row, col) reading in `dir`.
    Placement { word: usize, row: usize, col: usize, dir: Direction },
    /// Cell (row, col) holds letter `letter` (0 = 'A' .. 25 = 'Z').
    Letter { row: usize, col: usize, letter: u8 },
    /// Cell (row, col) is a separator block.
    Black { row: usize, col: usize },
    /// A junk (non-word) run of `len` letters starts at (row, col) in `dir`.
    Junk { row: usize, col: usize, len: usize, dir: Direction },
    /// Cell (row, col) is a crossing: covered by at least two placements.
    Cross { row: usize, col: usize },
}

/// A variable with polarity, for implication consequents.
#[derive(Debug, Clone, Copy)]
pub struct Lit {
    pub var: VarId,
    pub positive: bool,
}

impl Lit {
    #[must_use]
    pub fn pos(var: VarId) -> Lit {
        Lit { var, positive: true }
    }

    #[must_use]
    pub fn neg(var: VarId) -> Lit {
        Lit { var, positive: false }
    }

    #[must_use]
    pub fn holds(self, assignment: &Assignment) -> bool {
        assignment.get(self.var) == self.positive
    }
}

/// One constraint over boolean variables. Linear terms allow negative
/// coefficients, which is how the crossing-link condition is expressed.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Exactly one of the variables is set.
    ExactlyOne(Vec<VarId>),
    /// At most one of the variables is set.
    AtMostOne(Vec<VarId>),
    /// If `cond` is set, `then` holds.
    Implies { cond: VarId, then: Lit },
    /// Σ coef·var ≤ bound.
    LinearLe { terms: Vec<(VarId, i64)>, bound: i64 },
    /// Σ coef·var ≥ bound.
    LinearGe { terms: Vec<(VarId, i64)>, bound: i64 },
}

/// A candidate (word, start, direction) that fits the grid bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub word: usize,
    pub row: usize,
    pub col: usize,
    pub dir: Direction,
    pub len: usize,
}

impl Placement {
    /// The cells the word occupies, in reading order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (dr, dc) = self.dir.step();
        (0..self.len).map(move |k| (self.row + dr * k, self.col + dc * k))
    }

    /// The cell immediately before the start, unless flush with the edge.
    #[must_use]
    pub fn cell_before(&self) -> Option<(usize, usize)> {
        match self.dir {
            Direction::Across => self.col.checked_sub(1).map(|c| (self.row, c)),
            Direction::Down => self.row.checked_sub(1).map(|r| (r, self.col)),
        }
    }

    /// The cell immediately after the end, unless flush with the edge.
    #[must_use]
    pub fn cell_after(&self, rows: usize, cols: usize) -> Option<(usize, usize)> {
        match self.dir {
            Direction::Across => {
                let c = self.col + self.len;
                (c < cols).then_some((self.row, c))
            }
            Direction::Down => {
                let r = self.row + self.len;
                (r < rows).then_some((r, self.col))
            }
        }
    }
}

/// A total assignment to the model's boolean variables.
#[derive(Debug, Clone)]
pub struct Assignment {
    bits: Vec<bool>,
}

impl Assignment {
    #[must_use]
    pub fn all_false(num_vars: usize) -> Assignment {
        Assignment { bits: vec![false; num_vars] }
    }

    #[must_use]
    pub fn get(&self, var: VarId) -> bool {
        self.bits[var.index()]
    }

    pub fn set(&mut self, var: VarId, value: bool) {
        self.bits[var.index()] = value;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
}

/// First violated constraint found by [`Model::check`].
#[derive(Debug, Clone)]
pub struct Violation {
    /// Index into the model's constraint list.
    pub constraint: usize,
    pub summary: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constraint {} violated: {}", self.constraint, self.summary)
    }
}

/// The built model: variable registry, constraints, objective, and the
/// search metadata (placement catalog, word bank) solvers drive on.
#[derive(Debug, Clone)]
pub struct Model {
    pub rows: usize,
    pub cols: usize,
    vars: Vec<VarKey>,
    lookup: HashMap<VarKey, VarId>,
    pub constraints: Vec<Constraint>,
    /// Objective terms: maximize Σ coef·var.
    pub objective: Vec<(VarId, i64)>,
    /// Every in-bounds placement, in registration order.
    pub placements: Vec<Placement>,
    /// Placement-catalog indices grouped by word index.
    pub placements_by_word: Vec<Vec<usize>>,
    /// ⌊fraction · R·C⌋.
    pub separator_budget: usize,
    pub options: ModelOptions,
    /// The bank the model was built from; the membership oracle for audits.
    pub bank: WordBank,
}

impl Model {
    /// Build the model for `bank` on an R×C grid under `options`.
    ///
    /// A grid too small for any word still builds (no placement variables);
    /// the solver reports the consequences, not the builder.
    #[must_use]
    pub fn build(bank: &WordBank, rows: usize, cols: usize, options: ModelOptions) -> Model {
        let mut model = Model {
            rows,
            cols,
            vars: Vec::new(),
            lookup: HashMap::new(),
            constraints: Vec::new(),
            objective: Vec::new(),
            placements: Vec::new(),
            placements_by_word: vec![Vec::new(); bank.len()],
            separator_budget: (options.separator_budget_fraction * (rows * cols) as f64)
                .floor() as usize,
            options,
            bank: bank.clone(),
        };

        model.register_placements();
        model.register_cells();
        model.add_cell_exclusivity();
        model.add_letter_consistency();
        model.add_single_use();
        model.add_boundary_separation();
        if options.run_control_enabled() {
            model.add_run_control();
        }
        if model.bank.len() > 1 {
            model.add_intersection_requirement();
        }
        model.add_separator_budget();
        model.add_objective();

        log::debug!(
            "model: {} vars, {} constraints, {} placements, separator budget {}",
            model.num_vars(),
            model.constraints.len(),
            model.placements.len(),
            model.separator_budget
        );
        model
    }

    fn add_var(&mut self, key: VarKey) -> VarId {
        debug_assert!(!self.lookup.contains_key(&key), "duplicate variable {key:?}");
        let id = VarId(self.vars.len() as u32);
        self.vars.push(key);
        self.lookup.insert(key, id);
        id
    }

    /// Look up a registered variable.
    #[must_use]
    pub fn var(&self, key: VarKey) -> Option<VarId> {
        self.lookup.get(&key).copied()
    }

    #[must_use]
    pub fn key(&self, var: VarId) -> VarKey {
        self.vars[var.index()]
    }

    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    /// The placement variable for catalog entry `index`.
    #[must_use]
    pub fn placement_var(&self, index: usize) -> VarId {
        let p = self.placements[index];
        self.lookup[&VarKey::Placement { word: p.word, row: p.row, col: p.col, dir: p.dir }]
    }

    #[must_use]
    pub fn black_var(&self, row: usize, col: usize) -> VarId {
        self.lookup[&VarKey::Black { row, col }]
    }

    #[must_use]
    pub fn letter_var(&self, row: usize, col: usize, letter: u8) -> VarId {
        self.lookup[&VarKey::Letter { row, col, letter }]
    }

    /// Letter indices (0..26) of word `word`.
    #[must_use]
    pub fn word_letters(&self, word: usize) -> Vec<u8> {
        self.bank.word(word).bytes().map(|b| b - b'A').collect()
    }

    fn register_placements(&mut self) {
        for word in 0..self.bank.len() {
            let len = self.bank.word(word).chars().count();
            for dir in [Direction::Across, Direction::Down] {
                let (row_lim, col_lim) = match dir {
                    Direction::Across => (self.rows, self.cols.saturating_sub(len - 1)),
                    Direction::Down => (self.rows.saturating_sub(len - 1), self.cols),
                };
                // saturating_sub keeps too-long words at zero feasible starts
                if len > self.rows.max(self.cols) {
                    continue;
                }
                for row in 0..row_lim {
                    for col in 0..col_lim {
                        let placement = Placement { word, row, col, dir, len };
                        self.add_var(VarKey::Placement { word, row, col, dir });
                        self.placements_by_word[word].push(self.placements.len());
                        self.placements.push(placement);
                    }
                }
            }
        }
    }

    fn register_cells(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                for letter in 0..ALPHABET as u8 {
                    self.add_var(VarKey::Letter { row, col, letter });
                }
                self.add_var(VarKey::Black { row, col });
            }
        }
    }

    /// Constraint 1: per cell, exactly one of {26 letters, separator}.
    fn add_cell_exclusivity(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let mut vars: Vec<VarId> = (0..ALPHABET as u8)
                    .map(|letter| self.letter_var(row, col, letter))
                    .collect();
                vars.push(self.black_var(row, col));
                self.constraints.push(Constraint::ExactlyOne(vars));
            }
        }
    }

    /// Constraint 2: active placement ⇒ covered cells carry the word's letters.
    fn add_letter_consistency(&mut self) {
        for index in 0..self.placements.len() {
            let placement = self.placements[index];
            let cond = self.placement_var(index);
            let letters = self.word_letters(placement.word);
            for (k, (row, col)) in placement.cells().enumerate() {
                let then = Lit::pos(self.letter_var(row, col, letters[k]));
                self.constraints.push(Constraint::Implies { cond, then });
            }
        }
    }

    /// Constraint 3: each word has at most one active placement.
    fn add_single_use(&mut self) {
        for word in 0..self.bank.len() {
            let vars: Vec<VarId> = self.placements_by_word[word]
                .iter()
                .map(|&index| self.placement_var(index))
                .collect();
            if !vars.is_empty() {
                self.constraints.push(Constraint::AtMostOne(vars));
            }
        }
    }

    /// Constraint 4: separators immediately before and after a placement
    /// that is not flush with the grid edge.
    fn add_boundary_separation(&mut self) {
        for index in 0..self.placements.len() {
            let placement = self.placements[index];
            let cond = self.placement_var(index);
            if let Some((row, col)) = placement.cell_before() {
                let then = Lit::pos(self.black_var(row, col));
                self.constraints.push(Constraint::Implies { cond, then });
            }
            if let Some((row, col)) = placement.cell_after(self.rows, self.cols) {
                let then = Lit::pos(self.black_var(row, col));
                self.constraints.push(Constraint::Implies { cond, then });
            }
        }
    }

    /// Constraint 5: junk indicators may only mark an all-letter span with
    /// separator bounds; their total is capped by `n_limit`.
    fn add_run_control(&mut self) {
        let n_limit = self.options.n_limit.unwrap_or(0);
        let mut junk_vars = Vec::new();

        for row in 0..self.rows {
            for col in 0..self.cols {
                for dir in [Direction::Across, Direction::Down] {
                    let extent = match dir {
                        Direction::Across => self.cols - col,
                        Direction::Down => self.rows - row,
                    };
                    for len in 2..=MAX_JUNK_LEN.min(extent) {
                        let cond = self.add_var(VarKey::Junk { row, col, len, dir });
                        junk_vars.push(cond);

                        let span = Placement { word: usize::MAX, row, col, dir, len };
                        for (r, c) in span.cells() {
                            let then = Lit::neg(self.black_var(r, c));
                            self.constraints.push(Constraint::Implies { cond, then });
                        }
                        if let Some((r, c)) = span.cell_before() {
                            let then = Lit::pos(self.black_var(r, c));
                            self.constraints.push(Constraint::Implies { cond, then });
                        }
                        if let Some((r, c)) = span.cell_after(self.rows, self.cols) {
                            let then = Lit::pos(self.black_var(r, c));
                            self.constraints.push(Constraint::Implies { cond, then });
                        }
                    }
                }
            }
        }

        let terms = junk_vars.into_iter().map(|v| (v, 1)).collect();
        self.constraints.push(Constraint::LinearLe { terms, bound: i64::from(n_limit) });
    }

    /// Constraint 6: a crossing indicator needs ≥2 covering active
    /// placements (2·cross − Σ covering x ≤ 0), and at least one crossing
    /// must exist. Only emitted for banks with more than one word.
    fn add_intersection_requirement(&mut self) {
        // cell → covering placement variables
        let mut covering: HashMap<(usize, usize), Vec<VarId>> = HashMap::new();
        for index in 0..self.placements.len() {
            let var = self.placement_var(index);
            for cell in self.placements[index].cells() {
                covering.entry(cell).or_default().push(var);
            }
        }

        let mut cross_vars = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cross = self.add_var(VarKey::Cross { row, col });
                cross_vars.push(cross);

                let mut terms = vec![(cross, 2)];
                if let Some(cover) = covering.get(&(row, col)) {
                    terms.extend(cover.iter().map(|&v| (v, -1)));
                }
                self.constraints.push(Constraint::LinearLe { terms, bound: 0 });
            }
        }

        let terms = cross_vars.into_iter().map(|v| (v, 1)).collect();
        self.constraints.push(Constraint::LinearGe { terms, bound: 1 });
    }

    /// Constraint 7: Σ separators ≤ budget.
    fn add_separator_budget(&mut self) {
        let terms = (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| (row, col)))
            .map(|(row, col)| (self.black_var(row, col), 1))
            .collect();
        self.constraints.push(Constraint::LinearLe {
            terms,
            bound: self.separator_budget as i64,
        });
    }

    /// Maximize w1·Σx − w2·Σblack − w3·Σjunk.
    fn add_objective(&mut self) {
        let weights = self.options.weights;
        for index in 0..self.placements.len() {
            self.objective.push((self.placement_var(index), weights.placement));
        }
        for row in 0..self.rows {
            for col in 0..self.cols {
                self.objective.push((self.black_var(row, col), -weights.separator));
            }
        }
        if weights.junk != 0 {
            let junk_vars: Vec<VarId> = self
                .vars
                .iter()
                .enumerate()
                .filter(|(_, key)| matches!(key, VarKey::Junk { .. }))
                .map(|(i, _)| VarId(i as u32))
                .collect();
            for var in junk_vars {
                self.objective.push((var, -weights.junk));
            }
        }
    }

    /// Objective value of a total assignment.
    #[must_use]
    pub fn objective_value(&self, assignment: &Assignment) -> i64 {
        self.objective
            .iter()
            .map(|&(var, coef)| if assignment.get(var) { coef } else { 0 })
            .sum()
    }

    /// Evaluate every constraint against a total assignment.
    ///
    /// # Errors
    ///
    /// Returns the first [`Violation`] found.
    pub fn check(&self, assignment: &Assignment) -> Result<(), Violation> {
        debug_assert_eq!(assignment.len(), self.num_vars());

        for (index, constraint) in self.constraints.iter().enumerate() {
            let violated = match constraint {
                Constraint::ExactlyOne(vars) => {
                    let set = vars.iter().filter(|&&v| assignment.get(v)).count();
                    (set != 1).then(|| format!("{set} of {} set, expected 1", vars.len()))
                }
                Constraint::AtMostOne(vars) => {
                    let set = vars.iter().filter(|&&v| assignment.get(v)).count();
                    (set > 1).then(|| format!("{set} of {} set, expected at most 1", vars.len()))
                }
                Constraint::Implies { cond, then } => (assignment.get(*cond)
                    && !then.holds(assignment))
                .then(|| format!("{:?} set but consequent fails", self.key(*cond))),
                Constraint::LinearLe { terms, bound } => {
                    let sum = linear_sum(terms, assignment);
                    (sum > *bound).then(|| format!("sum {sum} exceeds bound {bound}"))
                }
                Constraint::LinearGe { terms, bound } => {
                    let sum = linear_sum(terms, assignment);
                    (sum < *bound).then(|| format!("sum {sum} below bound {bound}"))
                }
            };
            if let Some(summary) = violated {
                return Err(Violation { constraint: index, summary });
            }
        }
        Ok(())
    }
}

fn linear_sum(terms: &[(VarId, i64)], assignment: &Assignment) -> i64 {
    terms
        .iter()
        .map(|&(var, coef)| if assignment.get(var) { coef } else { 0 })
        .sum()
}
