use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use wordgrid::config::{GenerationConfig, SolverBackend};
use wordgrid::errors::GenerateError;
use wordgrid::generator;
use wordgrid::word_bank::WordBank;

/// Word-grid puzzle generator
#[derive(Parser, Debug)]
#[command(
    author,
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"),
    about,
    long_about = None
)]
struct Cli {
    /// Grid height in cells (default 5, or the preset's)
    #[arg(short, long)]
    rows: Option<usize>,

    /// Grid width in cells (default 5, or the preset's)
    #[arg(short, long)]
    cols: Option<usize>,

    /// Path to the word frequency list (word;frequency per line)
    #[arg(short, long)]
    word_list: String,

    /// Start from a named preset (easier-challenge, challenge); explicit
    /// flags still override individual fields
    #[arg(short, long)]
    preset: Option<String>,

    /// Minimum word length
    #[arg(long)]
    min_length: Option<usize>,

    /// Maximum word length
    #[arg(long)]
    max_length: Option<usize>,

    /// Minimum corpus frequency
    #[arg(long)]
    min_frequency: Option<f64>,

    /// Word-bank size cap
    #[arg(short = 'n', long)]
    max_words: Option<usize>,

    /// Solver time limit in seconds
    #[arg(short, long)]
    time_limit: Option<u64>,

    /// Tolerated invalid-run count; enables the run-control pipeline
    #[arg(long)]
    n_limit: Option<u32>,

    /// Sample the bank at random instead of keeping the most frequent words
    #[arg(long)]
    random: bool,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Solver backend: branch-bound, restart, or auto
    #[arg(short, long, default_value = "auto")]
    backend: String,
}

impl Cli {
    /// Fold the flags into a request, starting from the preset (or the
    /// plain defaults) and overriding field by field.
    fn to_config(&self) -> Result<GenerationConfig, GenerateError> {
        let mut config = match &self.preset {
            Some(name) => GenerationConfig::preset(name).ok_or_else(|| {
                GenerateError::InvalidConfig { reason: format!("unknown preset '{name}'") }
            })?,
            None => GenerationConfig::new(5, 5),
        };
        if let Some(v) = self.rows {
            config.rows = v;
        }
        if let Some(v) = self.cols {
            config.cols = v;
        }
        if let Some(v) = self.min_length {
            config.min_word_length = v;
        }
        if let Some(v) = self.max_length {
            config.max_word_length = v;
        }
        if let Some(v) = self.min_frequency {
            config.min_frequency = v;
        }
        if let Some(v) = self.max_words {
            config.max_words = v;
        }
        if let Some(v) = self.time_limit {
            config.time_limit = Duration::from_secs(v);
        }
        if self.n_limit.is_some() {
            config.n_limit = self.n_limit;
        }
        if self.random {
            config.random_selection = true;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.backend = match self.backend.as_str() {
            "branch-bound" => SolverBackend::BranchBound,
            "restart" => SolverBackend::Restart,
            "auto" => SolverBackend::Auto,
            other => {
                return Err(GenerateError::InvalidConfig {
                    reason: format!("unknown backend '{other}'"),
                })
            }
        };
        Ok(config)
    }
}

/// Entry point of the word-grid generator CLI.
///
/// Delegates to [`try_main`], catching any errors and printing them
/// in a user-friendly way before exiting with code 1.
fn main() -> ExitCode {
    // Set up logging
    let debug_enabled = std::env::var("WORDGRID_DEBUG").is_ok();
    wordgrid::log::init_logger(debug_enabled);

    log::info!("Starting word-grid generator");

    if let Err(e) = try_main() {
        // Print the error message to stderr, with detailed formatting if it's a GenerateError
        if let Some(gen_err) = e.downcast_ref::<GenerateError>() {
            eprintln!("Error: {}", gen_err.display_detailed());
        } else {
            eprintln!("Error: {e}");
        }
        // Exit explicitly with a nonzero code so scripts can detect failure
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Core application logic for the generator CLI.
///
/// Steps:
/// 1. Parse CLI arguments with Clap and fold them into a request.
/// 2. Load and filter the word bank from disk.
/// 3. Run the generation pipeline once.
/// 4. Print the grid on stdout and diagnostics on stderr.
///
/// A failed generation (empty bank, infeasible, timeout) exits nonzero with
/// the cause on stderr; it is not a crash.
fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.to_config()?;
    config.validate()?;

    if config.backend == SolverBackend::Auto {
        let (backend, reason) = config.recommendation();
        eprintln!("Backend: {backend} ({reason})");
    }

    let bank = WordBank::load_from_path(
        &cli.word_list,
        config.word_filter(),
        config.max_words,
        config.selection(),
    )?;
    eprintln!("Loaded {} candidate words from {}", bank.len(), cli.word_list);

    let result = generator::generate(&config, &bank)?;

    if let Some(grid) = &result.grid {
        println!("{grid}");
    }

    eprintln!(
        "Backend {} finished in {:.2}s ({:?})",
        result.solver_backend,
        result.elapsed_seconds,
        result.status
    );
    if result.success {
        eprintln!(
            "Placed {} words; {} invalid runs; {} fragments{}",
            result.valid_words.len(),
            result.invalid_words.len(),
            result.fragments.len(),
            if result.is_clean() { " (clean)" } else { "" }
        );
        if !result.invalid_words.is_empty() {
            eprintln!("Invalid runs: {}", result.invalid_words.join(", "));
        }
        Ok(())
    } else if let Some(failure) = result.failure {
        eprintln!("Generation failed: {}", failure.display_detailed());
        Err(failure.into())
    } else {
        Err("generation failed with no recorded cause".into())
    }
}
