use log::LevelFilter;

/// Environment variable that turns on debug-level output.
pub const DEBUG_ENV_VAR: &str = "CROSSGEN_DEBUG";

/// Initialize logging for the CLI: `Info` by default, `Debug` if `debug_enabled`, and `RUST_LOG`
/// wins over both when set.
pub fn init_logger(debug_enabled: bool) {
    let level = if debug_enabled { LevelFilter::Debug } else { LevelFilter::Info };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    // A logger may already be installed (e.g. when called twice); keep the first one.
    if builder.try_init().is_ok() {
        log::debug!("Logger initialized at {level:?} level");
    }
}
