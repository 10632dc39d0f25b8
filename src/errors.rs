//! Error types for the generation pipeline, with error codes and helpful messages.
//!
//! # Error Codes
//!
//! Each error variant has a unique code (G001-G006) for documentation lookup:
//!
//! - G001: `EmptyWordBank` (Filters left no candidate words)
//! - G002: `Infeasible` (No grid satisfies the constraints)
//! - G003: `TimedOut` (Time budget exhausted with no usable solution)
//! - G004: `InvalidConfig` (Contradictory or out-of-range configuration)
//! - G005: `WordBankIo` (Word-bank file could not be read)
//! - G006: `InconsistentSolution` (Solver assignment violated cell exclusivity)
//!
//! `EmptyWordBank`, `Infeasible`, and `TimedOut` are *accepted* failures: the
//! generator folds them into a failed result record rather than propagating
//! them, per the pipeline's no-retry contract. The remaining variants indicate
//! caller or internal errors and surface as `Err`.

use std::io;
use std::time::Duration;

/// Unified error type for the generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The word-bank filters (length, frequency) left no candidates, so there
    /// is nothing to place. Detected before any solver work happens.
    #[error("word bank is empty after filtering")]
    EmptyWordBank,

    /// The solver proved that no assignment satisfies every constraint
    /// (e.g., no word fits the grid and the bank holds more than one word).
    #[error("no grid satisfies the constraints")]
    Infeasible,

    /// The time budget expired before any usable solution was found.
    #[error("solver timed out after {:.1}s with no solution", elapsed.as_secs_f64())]
    TimedOut { elapsed: Duration },

    /// The configuration is contradictory or out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The word-bank file could not be read.
    #[error("failed to read word bank: {0}")]
    WordBankIo(#[from] io::Error),

    /// A solver assignment left a cell with neither a letter nor a separator
    /// indicator set. Cannot happen for a checked assignment; indicates a
    /// solver bug.
    #[error("inconsistent solution: cell ({row}, {col}) has no state")]
    InconsistentSolution { row: usize, col: usize },
}

impl GenerateError {
    /// Returns the error code for this error variant
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            GenerateError::EmptyWordBank => "G001",
            GenerateError::Infeasible => "G002",
            GenerateError::TimedOut { .. } => "G003",
            GenerateError::InvalidConfig { .. } => "G004",
            GenerateError::WordBankIo(_) => "G005",
            GenerateError::InconsistentSolution { .. } => "G006",
        }
    }

    /// Returns a helpful suggestion for this error
    #[must_use]
    pub fn help(&self) -> Option<&'static str> {
        match self {
            GenerateError::EmptyWordBank => {
                Some("Lower --min-frequency or widen the word-length range")
            }
            GenerateError::Infeasible => {
                Some("Enlarge the grid, shorten the words, or relax --n-limit")
            }
            GenerateError::TimedOut { .. } => {
                Some("Raise --time-limit or switch solver backends with --backend")
            }
            GenerateError::InvalidConfig { .. } => None,
            GenerateError::WordBankIo(_) => {
                Some("Check that the word-bank path exists and is readable")
            }
            GenerateError::InconsistentSolution { .. } => {
                Some("This is an internal error; please report it")
            }
        }
    }

    /// True for the three failure kinds the generator folds into a failed
    /// result record instead of propagating.
    #[must_use]
    pub fn is_accepted_failure(&self) -> bool {
        matches!(
            self,
            GenerateError::EmptyWordBank
                | GenerateError::Infeasible
                | GenerateError::TimedOut { .. }
        )
    }

    /// Formats the error with code and optional help text
    #[must_use]
    pub fn display_detailed(&self) -> String {
        format_error_with_code_and_help(&self.to_string(), self.code(), self.help())
    }
}

/// Helper function to format error messages with code and optional help text
pub(crate) fn format_error_with_code_and_help(
    base_msg: &str,
    code: &str,
    help: Option<&str>,
) -> String {
    if let Some(help_text) = help {
        format!("{base_msg} ({code})\n{help_text}")
    } else {
        format!("{base_msg} ({code})")
    }
}
