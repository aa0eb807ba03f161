//! env_logger setup.
//!
//! `RUST_LOG` wins when set, e.g. `RUST_LOG=oco_bot::exchanges=debug`.
//! Otherwise the level passed on the command line applies to every module.

use std::env;

use log::LevelFilter;

pub fn init_logging(default_level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(default_level)
        .format_timestamp_secs()
        .format_module_path(true)
        .format_target(false);
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // A second init (tests, embedding) keeps the first logger.
    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
}

/// Parses `error`, `warn`, `info`, `debug`, `trace` or `off`.
pub fn parse_level(raw: &str) -> Option<LevelFilter> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels() {
        assert_eq!(parse_level("warn"), Some(LevelFilter::Warn));
        assert_eq!(parse_level(" DEBUG "), Some(LevelFilter::Debug));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(LevelFilter::Warn);
        init_logging(LevelFilter::Debug);
    }
}
