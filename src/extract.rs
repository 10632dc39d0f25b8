//! Extraction of a [`Grid`] from a solved assignment.
//!
//! The cell-exclusivity constraint guarantees every cell has exactly one set
//! indicator among its 26 letters and the separator, so extraction is a
//! direct per-cell lookup. A cell with no set indicator means the solver and
//! the model disagree and surfaces as
//! [`GenerateError::InconsistentSolution`]; it is a bug, not a user error.

use crate::errors::GenerateError;
use crate::grid::{Cell, Grid};
use crate::model::{Assignment, Model, ALPHABET};

/// Read the solved grid out of a checked assignment.
///
/// # Errors
///
/// Returns [`GenerateError::InconsistentSolution`] naming the first cell with
/// no set letter or separator indicator.
pub fn extract_grid(model: &Model, assignment: &Assignment) -> Result<Grid, GenerateError> {
    let mut cells = Vec::with_capacity(model.rows * model.cols);
    for row in 0..model.rows {
        for col in 0..model.cols {
            cells.push(extract_cell(model, assignment, row, col)?);
        }
    }
    Ok(Grid::from_cells(model.rows, model.cols, cells))
}

fn extract_cell(
    model: &Model,
    assignment: &Assignment,
    row: usize,
    col: usize,
) -> Result<Cell, GenerateError> {
    if assignment.get(model.black_var(row, col)) {
        return Ok(Cell::Separator);
    }
    for letter in 0..ALPHABET as u8 {
        if assignment.get(model.letter_var(row, col, letter)) {
            return Ok(Cell::Letter((b'A' + letter) as char));
        }
    }
    Err(GenerateError::InconsistentSolution { row, col })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenerationConfig, ModelOptions};
    use crate::word_bank::WordBank;

    fn tiny_model() -> Model {
        let options = ModelOptions::for_config(&GenerationConfig::new(1, 3));
        Model::build(&WordBank::from_words(["TO"]), 1, 3, options)
    }

    #[test]
    fn test_extracts_letters_and_separators() {
        let model = tiny_model();
        let mut assignment = Assignment::all_false(model.num_vars());
        assignment.set(model.letter_var(0, 0, b'T' - b'A'), true);
        assignment.set(model.letter_var(0, 1, b'O' - b'A'), true);
        assignment.set(model.black_var(0, 2), true);

        let grid = extract_grid(&model, &assignment).unwrap();
        assert_eq!(grid.to_row_strings(), vec!["TO#"]);
    }

    #[test]
    fn test_undecided_cell_is_an_inconsistency() {
        let model = tiny_model();
        let mut assignment = Assignment::all_false(model.num_vars());
        assignment.set(model.letter_var(0, 0, b'T' - b'A'), true);
        // (0,1) and (0,2) left with nothing set

        let err = extract_grid(&model, &assignment).unwrap_err();
        assert_eq!(err.code(), "G006");
        assert!(err.to_string().contains("(0, 1)"));
    }
}
