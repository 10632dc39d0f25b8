use log::LevelFilter;

/// Initialize logging for the generator CLI.
///
/// Respects `debug_enabled` (set via the `WORDGRID_DEBUG` env var in the CLI)
/// or an explicit `RUST_LOG` filter, which takes precedence over our defaults.
pub fn init_logger(debug_enabled: bool) {
    use std::env;
    let level = if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    // Let RUST_LOG override our defaults if explicitly set
    if let Ok(spec) = env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    // try_init so tests that initialize twice don't panic
    let _ = builder.try_init();
}
