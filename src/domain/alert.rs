//! Alert specification types.
//!
//! - `AlertKind`: closed set of predicate kinds
//! - `AlertSpec`: kind, result label, trailing depth and parameters
//! - `AlertOutcome`: binary result plus the chart trigger flag

use crate::domain::params::SpecParams;
use std::fmt;

pub const DEFAULT_DEPTH: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Crossover,
    Threshold,
    Unknown(String),
}

impl AlertKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "crossover" => AlertKind::Crossover,
            "threshold" => AlertKind::Threshold,
            other => AlertKind::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::Crossover => write!(f, "crossover"),
            AlertKind::Threshold => write!(f, "threshold"),
            AlertKind::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertSpec {
    pub kind: AlertKind,
    /// Result matrix row label and artifact file stem.
    pub name: String,
    /// Trailing bars the predicate must hold over, as configured.
    pub depth: i64,
    pub params: SpecParams,
}

impl AlertSpec {
    pub fn new(kind: AlertKind, name: &str, depth: i64, params: SpecParams) -> Self {
        Self {
            kind,
            name: name.trim().to_string(),
            depth,
            params,
        }
    }

    /// Depth actually used for evaluation; non-positive values become 1.
    pub fn effective_depth(&self) -> usize {
        if self.depth < 1 { 1 } else { self.depth as usize }
    }

    /// Referenced indicator columns, in configured order.
    pub fn indicators(&self) -> Vec<String> {
        self.params.list("indicators")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertOutcome {
    pub result: bool,
    /// Set when the sink should render a supporting chart.
    pub triggered: bool,
}

impl AlertOutcome {
    pub const MISS: AlertOutcome = AlertOutcome {
        result: false,
        triggered: false,
    };

    pub fn as_flag(&self) -> u8 {
        u8::from(self.result)
    }
}
