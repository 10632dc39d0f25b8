// Reusable library API; the CLI binary and integration tests build on this.
pub mod config;
pub mod errors;
pub mod extract;
pub mod generator;
pub mod grid;
pub mod log;
pub mod model;
pub mod repair;
pub mod solver;
pub mod validate;
pub mod word_bank;
