//! Kind-specific parameters for indicator and alert specs.
//!
//! Values are kept as the raw strings read from configuration and parsed on
//! demand by the computation that needs them, so a bad value only
//! invalidates the spec that uses it.

use crate::domain::error::ScreenerError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecParams(BTreeMap<String, String>);

impl SpecParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl ToString) {
        self.0.insert(key.to_lowercase(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|s| s.as_str())
    }

    /// Positive integer parameter, `default` when absent.
    pub fn positive_usize(&self, spec: &str, key: &str, default: usize) -> Result<usize, ScreenerError> {
        let Some(raw) = self.get(key) else {
            return Ok(default);
        };
        match raw.trim().parse::<usize>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(ScreenerError::invalid_spec(
                spec,
                format!("{} must be a positive integer, got '{}'", key, raw),
            )),
        }
    }

    pub fn required_f64(&self, spec: &str, key: &str) -> Result<f64, ScreenerError> {
        let raw = self
            .get(key)
            .ok_or_else(|| ScreenerError::invalid_spec(spec, format!("missing parameter {}", key)))?;
        match raw.trim().parse::<f64>() {
            Ok(v) if !v.is_nan() => Ok(v),
            _ => Err(ScreenerError::invalid_spec(
                spec,
                format!("{} must be a number, got '{}'", key, raw),
            )),
        }
    }

    /// Comma-separated list parameter; empty when absent.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
