//! Screening option: instruments, indicators and alerts screened together.
//!
//! Built from an INI source through `ConfigPort`:
//!
//! ```text
//! [option]
//! name = majors
//! active = true
//! observed_tickers = EURUSD, GBPUSD
//!
//! [indicator.1]
//! kind = moving_average
//! name = ma_9
//! width = 9
//!
//! [alert.1]
//! kind = threshold
//! name = above_open
//! depth = 5
//! indicators = ma_9
//! threshold = 1.05
//! ```
//!
//! `[indicator.N]` and `[alert.N]` sections apply in ascending `N`. Kinds
//! and names are not checked here; the engines report bad specs when they
//! run.

use crate::domain::alert::{AlertKind, AlertSpec, DEFAULT_DEPTH};
use crate::domain::error::ScreenerError;
use crate::domain::indicator::{IndicatorKind, IndicatorSpec};
use crate::domain::params::SpecParams;
use crate::ports::config_port::ConfigPort;
use std::collections::HashSet;

pub const OPTION_SECTION: &str = "option";
const INDICATOR_PREFIX: &str = "indicator.";
const ALERT_PREFIX: &str = "alert.";
const RESERVED_KEYS: [&str; 3] = ["kind", "name", "depth"];

#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningOption {
    pub name: String,
    pub active: bool,
    pub observed_tickers: Vec<String>,
    pub indicators: Vec<IndicatorSpec>,
    pub alerts: Vec<AlertSpec>,
}

impl ScreeningOption {
    /// Row labels for the result matrix, in alert order.
    pub fn alert_labels(&self) -> Vec<String> {
        self.alerts
            .iter()
            .map(|a| {
                if a.name.is_empty() {
                    format!("<unnamed {}>", a.kind)
                } else {
                    a.name.clone()
                }
            })
            .collect()
    }

    /// Builds an option from config. `fallback_name` is used when
    /// `[option] name` is absent.
    pub fn from_config(config: &dyn ConfigPort, fallback_name: &str) -> Result<Self, ScreenerError> {
        let name = config
            .get_string(OPTION_SECTION, "name")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fallback_name.to_string());
        if name.is_empty() {
            return Err(ScreenerError::ConfigMissing {
                section: OPTION_SECTION.into(),
                key: "name".into(),
            });
        }

        let observed_tickers = match config.get_string(OPTION_SECTION, "observed_tickers") {
            Some(raw) if !raw.trim().is_empty() => {
                parse_tickers(&raw).map_err(|reason| ScreenerError::ConfigInvalid {
                    section: OPTION_SECTION.into(),
                    key: "observed_tickers".into(),
                    reason,
                })?
            }
            _ => Vec::new(),
        };

        let indicators = ordered_sections(config, INDICATOR_PREFIX)
            .into_iter()
            .map(|section| {
                IndicatorSpec::new(
                    IndicatorKind::parse(&config.get_string(&section, "kind").unwrap_or_default()),
                    &config.get_string(&section, "name").unwrap_or_default(),
                    section_params(config, &section),
                )
            })
            .collect();

        let alerts = ordered_sections(config, ALERT_PREFIX)
            .into_iter()
            .map(|section| {
                AlertSpec::new(
                    AlertKind::parse(&config.get_string(&section, "kind").unwrap_or_default()),
                    &config.get_string(&section, "name").unwrap_or_default(),
                    config.get_int(&section, "depth", DEFAULT_DEPTH),
                    section_params(config, &section),
                )
            })
            .collect();

        Ok(Self {
            name,
            active: config.get_bool(OPTION_SECTION, "active", false),
            observed_tickers,
            indicators,
            alerts,
        })
    }
}

/// Parses a comma list of instrument identifiers, upper-casing each and
/// rejecting empty tokens and duplicates.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, String> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err("empty token in ticker list".into());
        }
        let ticker = trimmed.to_uppercase();
        if !seen.insert(ticker.clone()) {
            return Err(format!("duplicate ticker: {}", ticker));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}

/// Sections named `<prefix><N>`, sorted by numeric `N`. Sections whose
/// suffix is not a number sort after the numbered ones, by name.
fn ordered_sections(config: &dyn ConfigPort, prefix: &str) -> Vec<String> {
    let mut sections: Vec<(Option<u64>, String)> = config
        .sections()
        .into_iter()
        .filter_map(|s| {
            let suffix = s.strip_prefix(prefix)?.to_string();
            Some((suffix.parse::<u64>().ok(), s))
        })
        .collect();
    sections.sort_by(|a, b| match (a.0, b.0) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.1.cmp(&b.1),
    });
    sections.into_iter().map(|(_, s)| s).collect()
}

fn section_params(config: &dyn ConfigPort, section: &str) -> SpecParams {
    let mut params = SpecParams::new();
    for key in config.keys(section) {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        if let Some(value) = config.get_string(section, &key) {
            params.insert(&key, value);
        }
    }
    params
}
