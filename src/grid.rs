//! The solved puzzle grid and the run-scanning primitives built on it.
//!
//! A [`Grid`] is an R×C matrix of [`Cell`]s; every cell is exactly one of a
//! letter or a separator. Scanning a grid yields [`Run`]s: maximal
//! contiguous letter sequences in one row (left-to-right) or one column
//! (top-to-bottom), bounded by separators or the grid edge. Runs are the unit
//! of classification for the validator and the repairer.

use std::fmt;

/// One grid cell: a placed letter ('A'..='Z') or a separator block.
///
/// The two states are mutually exclusive by construction; there is no
/// "empty" state in a finished grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Letter(char),
    Separator,
}

impl Cell {
    #[must_use]
    pub fn is_letter(self) -> bool {
        matches!(self, Cell::Letter(_))
    }

    /// The display symbol: the letter itself, or '#' for a separator.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Cell::Letter(ch) => ch,
            Cell::Separator => '#',
        }
    }
}

/// Reading direction of a placement or run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    /// (row step, col step) for walking cells in this direction.
    #[must_use]
    pub fn step(self) -> (usize, usize) {
        match self {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
        }
    }
}

/// A maximal contiguous letter sequence in one row or column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Start cell of the run.
    pub row: usize,
    pub col: usize,
    pub dir: Direction,
    /// The letters of the run, in reading order.
    pub text: String,
}

impl Run {
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// An R×C matrix of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid from row-major cells.
    ///
    /// # Panics
    /// Panics if `cells.len() != rows * cols`. Grids are only built internally
    /// (extractor, tests), so a mismatch is a programming error.
    #[must_use]
    pub fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Self {
        assert_eq!(cells.len(), rows * cols, "cell count must equal rows * cols");
        Self { rows, cols, cells }
    }

    /// Parse a grid from string rows, e.g. `["CAT#", "##O#"]`.
    /// '#' is a separator; anything else is taken as a letter.
    /// Handy for tests and fixtures.
    ///
    /// # Panics
    /// Panics if the rows have uneven lengths.
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut cells = Vec::with_capacity(height * width);
        for row in rows {
            assert_eq!(row.chars().count(), width, "all rows must have equal length");
            for ch in row.chars() {
                cells.push(if ch == '#' {
                    Cell::Separator
                } else {
                    Cell::Letter(ch.to_ascii_uppercase())
                });
            }
        }
        Self { rows: height, cols: width, cells }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.cols + col] = cell;
    }

    /// Count of separator cells.
    #[must_use]
    pub fn separator_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Separator).count()
    }

    /// All maximal letter runs: every row left-to-right, then every column
    /// top-to-bottom. Single-letter runs are included (the validator
    /// classifies them as fragments).
    #[must_use]
    pub fn runs(&self) -> Vec<Run> {
        let mut runs = Vec::new();
        for r in 0..self.rows {
            self.scan_line(r, 0, Direction::Across, self.cols, &mut runs);
        }
        for c in 0..self.cols {
            self.scan_line(0, c, Direction::Down, self.rows, &mut runs);
        }
        runs
    }

    /// Scan one row or column, appending each maximal letter run.
    fn scan_line(
        &self,
        start_row: usize,
        start_col: usize,
        dir: Direction,
        len: usize,
        out: &mut Vec<Run>,
    ) {
        let (dr, dc) = dir.step();
        let mut text = String::new();
        let mut run_start = (start_row, start_col);

        for k in 0..len {
            let (r, c) = (start_row + dr * k, start_col + dc * k);
            match self.cell(r, c) {
                Cell::Letter(ch) => {
                    if text.is_empty() {
                        run_start = (r, c);
                    }
                    text.push(ch);
                }
                Cell::Separator => {
                    if !text.is_empty() {
                        out.push(Run {
                            row: run_start.0,
                            col: run_start.1,
                            dir,
                            text: std::mem::take(&mut text),
                        });
                    }
                }
            }
        }
        // run terminated by the grid edge
        if !text.is_empty() {
            out.push(Run { row: run_start.0, col: run_start.1, dir, text });
        }
    }

    /// Rows as plain strings of symbols, e.g. `"CAT#"`.
    #[must_use]
    pub fn to_row_strings(&self) -> Vec<String> {
        (0..self.rows)
            .map(|r| (0..self.cols).map(|c| self.cell(r, c).symbol()).collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    /// Space-joined symbols, one line per row:
    /// ```text
    /// C A T #
    /// # # O #
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                if c > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.cell(r, c).symbol())?;
            }
            if r + 1 < self.rows {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
