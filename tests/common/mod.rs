#![allow(dead_code)]

use chrono::NaiveDate;
use fxscreen::domain::alert::{AlertKind, AlertSpec};
use fxscreen::domain::bar_series::BarSeries;
use fxscreen::domain::error::ScreenerError;
use fxscreen::domain::indicator::{IndicatorKind, IndicatorSpec};
pub use fxscreen::domain::ohlcv::Bar;
use fxscreen::domain::params::SpecParams;
use fxscreen::domain::result_matrix::ResultMatrix;
use fxscreen::domain::screening_option::ScreeningOption;
use fxscreen::ports::data_port::DataPort;
use fxscreen::ports::result_sink::ResultSink;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
    pub delay: Option<Duration>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            delay: None,
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    /// Every fetch sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        ticker: &str,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
    ) -> Result<Vec<Bar>, ScreenerError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if let Some(reason) = self.errors.get(ticker) {
            return Err(ScreenerError::Acquisition {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        self.data
            .get(ticker)
            .cloned()
            .ok_or_else(|| ScreenerError::NoData {
                ticker: ticker.to_string(),
            })
    }
}

/// Records everything handed to it, keyed by `option/ticker`.
#[derive(Default)]
pub struct RecordingSink {
    pub series: RefCell<Vec<(String, String, Vec<String>)>>,
    pub charts: RefCell<Vec<(String, String, String)>>,
    pub matrices: RefCell<Vec<(String, ResultMatrix)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chart_names(&self) -> Vec<String> {
        self.charts
            .borrow()
            .iter()
            .map(|(_, ticker, alert)| format!("{}/{}", alert, ticker))
            .collect()
    }
}

impl ResultSink for RecordingSink {
    fn write_series(
        &self,
        option: &str,
        ticker: &str,
        series: &BarSeries,
    ) -> Result<(), ScreenerError> {
        let columns = series.column_names().iter().map(|s| s.to_string()).collect();
        self.series
            .borrow_mut()
            .push((option.to_string(), ticker.to_string(), columns));
        Ok(())
    }

    fn write_chart(
        &self,
        option: &str,
        ticker: &str,
        alert: &AlertSpec,
        _series: &BarSeries,
    ) -> Result<(), ScreenerError> {
        self.charts
            .borrow_mut()
            .push((option.to_string(), ticker.to_string(), alert.name.clone()));
        Ok(())
    }

    fn write_matrix(&self, option: &str, matrix: &ResultMatrix) -> Result<(), ScreenerError> {
        self.matrices
            .borrow_mut()
            .push((option.to_string(), matrix.clone()));
        Ok(())
    }
}

pub fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset)
}

/// Bars with the given closes, high/low a fixed spread around close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::new(day(i as i64), c, c + 0.002, c - 0.002, c))
        .collect()
}

/// Steadily rising series starting at `start`.
pub fn uptrend(count: usize, start: f64, step: f64) -> Vec<Bar> {
    let closes: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
    bars_from_closes(&closes)
}

pub fn sma(name: &str, width: usize) -> IndicatorSpec {
    IndicatorSpec::new(
        IndicatorKind::MovingAverage,
        name,
        SpecParams::new().with("width", width),
    )
}

pub fn adx(name: &str, length: usize) -> IndicatorSpec {
    IndicatorSpec::new(
        IndicatorKind::DirectionalIndex,
        name,
        SpecParams::new().with("length", length),
    )
}

pub fn threshold(name: &str, column: &str, level: f64, depth: i64) -> AlertSpec {
    AlertSpec::new(
        AlertKind::Threshold,
        name,
        depth,
        SpecParams::new()
            .with("indicators", column)
            .with("threshold", level),
    )
}

pub fn crossover(name: &str, a: &str, b: &str, depth: i64) -> AlertSpec {
    AlertSpec::new(
        AlertKind::Crossover,
        name,
        depth,
        SpecParams::new().with("indicators", format!("{},{}", a, b)),
    )
}

pub fn option(
    name: &str,
    tickers: &[&str],
    indicators: Vec<IndicatorSpec>,
    alerts: Vec<AlertSpec>,
) -> ScreeningOption {
    ScreeningOption {
        name: name.to_string(),
        active: true,
        observed_tickers: tickers.iter().map(|t| t.to_string()).collect(),
        indicators,
        alerts,
    }
}
