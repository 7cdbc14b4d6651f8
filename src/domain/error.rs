//! Domain error types.

/// Top-level error type for fxscreen.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid spec '{name}': {reason}")]
    InvalidSpec { name: String, reason: String },

    #[error("acquisition failed for {ticker}: {reason}")]
    Acquisition { ticker: String, reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("invalid bar series: {reason}")]
    InvalidSeries { reason: String },

    #[error("result sink error: {reason}")]
    Sink { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ScreenerError {
    pub fn invalid_spec(name: &str, reason: impl Into<String>) -> Self {
        ScreenerError::InvalidSpec {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// True for failures scoped to a single instrument's acquisition.
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            ScreenerError::Acquisition { .. }
                | ScreenerError::NoData { .. }
                | ScreenerError::InvalidSeries { .. }
        )
    }
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        let code: u8 = match err {
            ScreenerError::Io(_) | ScreenerError::Csv(_) | ScreenerError::Sink { .. } => 1,
            ScreenerError::ConfigParse { .. }
            | ScreenerError::ConfigMissing { .. }
            | ScreenerError::ConfigInvalid { .. } => 2,
            ScreenerError::InvalidSpec { .. } => 4,
            ScreenerError::Acquisition { .. }
            | ScreenerError::NoData { .. }
            | ScreenerError::InvalidSeries { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
