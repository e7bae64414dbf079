//! Logging using simplelog
//!
//! Warnings and errors go to stderr (more with `-v`). Everything down to
//! debug level also goes to a timestamped file in the cache directory
//! (~/.cache/gh-review/ on Linux) so a failed review can be diagnosed later.

use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::PathBuf;

/// Level for stderr: `-v` flags win over `RUST_LOG`.
fn term_level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => std::env::var("RUST_LOG")
            .map(|v| match v.to_lowercase().as_str() {
                "error" => LevelFilter::Error,
                "warn" => LevelFilter::Warn,
                "info" => LevelFilter::Info,
                "debug" => LevelFilter::Debug,
                "trace" => LevelFilter::Trace,
                _ => LevelFilter::Warn,
            })
            .unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialize logging
///
/// Returns the log file path, or `None` when only stderr logging could be
/// set up.
pub fn init(verbosity: u8) -> Option<PathBuf> {
    // Configure simplelog with timestamps
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c) // Fallback if local time offset fails
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        term_level(verbosity),
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
    let log_file = gh_review_config::paths::log_file_path(&stamp)
        .ok()
        .and_then(|path| File::create(&path).ok().map(|file| (path, file)));
    let log_path = log_file.map(|(path, file)| {
        loggers.push(WriteLogger::new(LevelFilter::Debug, config, file));
        path
    });

    if CombinedLogger::init(loggers).is_err() {
        eprintln!("gh-review: logger was already initialized");
    }
    log_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_overrides_env() {
        assert_eq!(term_level(1), LevelFilter::Info);
        assert_eq!(term_level(2), LevelFilter::Debug);
        assert_eq!(term_level(7), LevelFilter::Trace);
    }
}
