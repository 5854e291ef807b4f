//! `log` facade setup; records go to the browser console through `wasm_logger`.
//!
//! # Invariants
//! - Initialization is idempotent: the first successful call wins, later calls
//!   only report success.
//! - Initialization never panics; an unknown level is rejected as an error.

use log::LevelFilter;
use std::sync::Once;

static INIT: Once = Once::new();

pub(crate) fn parse_level(level: &str) -> Result<LevelFilter, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::Trace),
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" | "warning" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" => Ok(LevelFilter::Off),
        other => Err(format!("unsupported log level `{other}`")),
    }
}

/// Installs the browser console logger at `level`.
pub(crate) fn init_logging(level: &str) -> Result<(), String> {
    let filter = parse_level(level)?;
    INIT.call_once(|| match filter.to_level() {
        Some(level) => wasm_logger::init(wasm_logger::Config::new(level)),
        None => log::set_max_level(LevelFilter::Off),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_is_case_insensitive() {
        assert_eq!(parse_level("DEBUG"), Ok(LevelFilter::Debug));
        assert_eq!(parse_level(" warn "), Ok(LevelFilter::Warn));
        assert_eq!(parse_level("off"), Ok(LevelFilter::Off));
    }

    #[test]
    fn test_parse_level_rejects_unknown() {
        assert!(parse_level("verbose").is_err());
    }

    #[test]
    fn test_init_with_unknown_level_installs_nothing() {
        assert!(init_logging("verbose").is_err());
        assert!(!INIT.is_completed());
    }
}
