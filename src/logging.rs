//! Logger setup for the binary

use log::LevelFilter;

pub struct Logger;

impl Logger {
    /// Initialize logger with specified level; `RUST_LOG` still applies per module
    pub fn init(level: LevelFilter) {
        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .format_timestamp_secs()
            .init();
    }

    /// Level for `-v` repetitions and `-q`
    pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::Error;
        }
        match verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
