//! Configuration validation.
//!
//! Validates the application config before a run and the structural shape
//! of screening option files. Indicator and alert specs are left to the
//! engines.

use crate::domain::error::ScreenerError;
use crate::domain::screening_option::{parse_tickers, OPTION_SECTION};
use crate::ports::config_port::ConfigPort;

pub const SCREEN_SECTION: &str = "screen";
/// Upper bound on the acquisition window, roughly a century.
pub const MAX_HISTORY_DAYS: i64 = 36_500;

pub fn validate_screen_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    validate_dir(config, "options_dir")?;
    validate_dir(config, "data_dir")?;
    validate_dir(config, "output_dir")?;
    validate_history_days(config)?;
    validate_max_run_seconds(config)?;
    validate_logging_format(config)?;
    Ok(())
}

pub fn validate_option_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    if !config.sections().iter().any(|s| s == OPTION_SECTION) {
        return Err(ScreenerError::ConfigMissing {
            section: OPTION_SECTION.to_string(),
            key: "name".to_string(),
        });
    }
    if let Some(name) = config.get_string(OPTION_SECTION, "name") {
        if name.trim().is_empty() {
            return Err(ScreenerError::ConfigInvalid {
                section: OPTION_SECTION.to_string(),
                key: "name".to_string(),
                reason: "name must not be empty".to_string(),
            });
        }
    }
    if let Some(tickers) = config.get_string(OPTION_SECTION, "observed_tickers") {
        if !tickers.trim().is_empty() {
            parse_tickers(&tickers).map_err(|reason| ScreenerError::ConfigInvalid {
                section: OPTION_SECTION.to_string(),
                key: "observed_tickers".to_string(),
                reason,
            })?;
        }
    }
    Ok(())
}

fn validate_dir(config: &dyn ConfigPort, key: &str) -> Result<(), ScreenerError> {
    match config.get_string(SCREEN_SECTION, key) {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(ScreenerError::ConfigMissing {
            section: SCREEN_SECTION.to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_history_days(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let value = config.get_int(SCREEN_SECTION, "history_days", 50);
    if !(1..=MAX_HISTORY_DAYS).contains(&value) {
        return Err(ScreenerError::ConfigInvalid {
            section: SCREEN_SECTION.to_string(),
            key: "history_days".to_string(),
            reason: format!("history_days must be between 1 and {}", MAX_HISTORY_DAYS),
        });
    }
    Ok(())
}

fn validate_max_run_seconds(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let value = config.get_int(SCREEN_SECTION, "max_run_seconds", 0);
    if value < 0 {
        return Err(ScreenerError::ConfigInvalid {
            section: SCREEN_SECTION.to_string(),
            key: "max_run_seconds".to_string(),
            reason: "max_run_seconds must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_logging_format(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let format = config
        .get_string("logging", "format")
        .map(|s| s.trim().to_lowercase());
    match format.as_deref() {
        None | Some("pretty") | Some("json") => Ok(()),
        Some(other) => Err(ScreenerError::ConfigInvalid {
            section: "logging".to_string(),
            key: "format".to_string(),
            reason: format!("unknown log format '{}', expected pretty or json", other),
        }),
    }
}
