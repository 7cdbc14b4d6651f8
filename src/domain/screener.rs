//! Screening orchestrator.
//!
//! For each active option: for each observed ticker, acquire bars, apply
//! every indicator in order, then evaluate every alert in order and record
//! the results in the option's `ResultMatrix`. Failures are scoped to one
//! ticker or one indicator/alert and never stop the run.

use crate::domain::alert_eval;
use crate::domain::bar_series::BarSeries;
use crate::domain::error::ScreenerError;
use crate::domain::indicator;
use crate::domain::result_matrix::ResultMatrix;
use crate::domain::screening_option::ScreeningOption;
use crate::ports::data_port::DataPort;
use crate::ports::result_sink::ResultSink;
use chrono::{Duration, NaiveDate};
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub const DEFAULT_HISTORY_DAYS: i64 = 50;

#[derive(Debug, Clone)]
pub struct ScreenSettings {
    /// Last day of the acquisition window.
    pub end_date: NaiveDate,
    /// Calendar days of history to acquire. Not related to alert depth.
    pub history_days: i64,
    /// Wall-clock budget for the whole run, checked between tickers.
    pub max_run: Option<std::time::Duration>,
}

impl ScreenSettings {
    pub fn new(end_date: NaiveDate) -> Self {
        Self {
            end_date,
            history_days: DEFAULT_HISTORY_DAYS,
            max_run: None,
        }
    }

    /// `end_date - history_days`, clamped to the earliest representable
    /// date.
    pub fn start_date(&self) -> NaiveDate {
        Duration::try_days(self.history_days)
            .and_then(|d| self.end_date.checked_sub_signed(d))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// What was skipped and why. `item` names the indicator or alert, or is
/// `None` when the whole ticker was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    pub ticker: String,
    pub item: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct OptionReport {
    pub option: String,
    pub matrix: ResultMatrix,
    pub skipped: Vec<SkippedEntry>,
    /// At least one ticker was left unscreened because the run budget ran out.
    pub budget_exhausted: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ScreenSummary {
    pub reports: Vec<OptionReport>,
    pub budget_exhausted: bool,
}

impl ScreenSummary {
    pub fn report(&self, option: &str) -> Option<&OptionReport> {
        self.reports.iter().find(|r| r.option == option)
    }
}

pub struct Screener<'a> {
    data_port: &'a dyn DataPort,
    sink: &'a dyn ResultSink,
    settings: ScreenSettings,
    deadline: Option<Instant>,
}

impl<'a> Screener<'a> {
    pub fn new(data_port: &'a dyn DataPort, sink: &'a dyn ResultSink, settings: ScreenSettings) -> Self {
        Self {
            data_port,
            sink,
            settings,
            deadline: None,
        }
    }

    /// Screens every active option in order.
    pub fn screen(&mut self, options: &[ScreeningOption]) -> ScreenSummary {
        self.deadline = self.settings.max_run.map(|d| Instant::now() + d);
        let names: Vec<&str> = options.iter().map(|o| o.name.as_str()).collect();
        info!(options = ?names, start = %self.settings.start_date(), end = %self.settings.end_date, "screening starts");

        let mut summary = ScreenSummary::default();
        for option in options {
            if !option.active {
                debug!(option = %option.name, "option inactive, skipping");
                continue;
            }
            let report = self.screen_option(option);
            summary.reports.push(report);
        }
        summary.budget_exhausted = summary.reports.iter().any(|r| r.budget_exhausted);
        info!(options = summary.reports.len(), "screening finished");
        summary
    }

    /// Screens one option regardless of its active flag.
    pub fn screen_option(&self, option: &ScreeningOption) -> OptionReport {
        info!(option = %option.name, tickers = option.observed_tickers.len(), "processing option");
        let mut matrix = ResultMatrix::new(option.alert_labels());
        let mut skipped = Vec::new();
        let mut budget_exhausted = false;

        for ticker in &option.observed_tickers {
            matrix.add_ticker(ticker);
            if self.budget_exhausted() {
                budget_exhausted = true;
                warn!(option = %option.name, ticker = %ticker, "run budget exhausted, leaving ticker undefined");
                skipped.push(SkippedEntry {
                    ticker: ticker.clone(),
                    item: None,
                    reason: "run budget exhausted".into(),
                });
                continue;
            }

            let mut series = match self.acquire(ticker) {
                Ok(series) => series,
                Err(e) => {
                    error!(option = %option.name, ticker = %ticker, error = %e, "acquisition failed");
                    skipped.push(SkippedEntry {
                        ticker: ticker.clone(),
                        item: None,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            info!(ticker = %ticker, bars = series.len(), "data fetched");

            for spec in &option.indicators {
                if let Err(e) = indicator::apply(spec, &mut series) {
                    skipped.push(SkippedEntry {
                        ticker: ticker.clone(),
                        item: Some(spec.label()),
                        reason: e.to_string(),
                    });
                }
            }

            if let Err(e) = self.sink.write_series(&option.name, ticker, &series) {
                warn!(ticker = %ticker, error = %e, "failed to write series");
            }

            for (row, spec) in option.alerts.iter().enumerate() {
                match alert_eval::evaluate(spec, &series) {
                    Ok(outcome) => {
                        matrix.set(ticker, row, Some(outcome.as_flag()));
                        if outcome.triggered {
                            info!(ticker = %ticker, alert = %spec.name, "alert triggered");
                            if let Err(e) = self.sink.write_chart(&option.name, ticker, spec, &series) {
                                warn!(ticker = %ticker, alert = %spec.name, error = %e, "failed to write chart");
                            }
                        }
                    }
                    Err(e) => {
                        warn!(ticker = %ticker, error = %e, "skipping alert");
                        skipped.push(SkippedEntry {
                            ticker: ticker.clone(),
                            item: Some(spec.name.clone()),
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        if let Err(e) = self.sink.write_matrix(&option.name, &matrix) {
            error!(option = %option.name, error = %e, "failed to write result matrix");
        }
        info!(option = %option.name, hits = matrix.hit_count(), skipped = skipped.len(), "option done");

        OptionReport {
            option: option.name.clone(),
            matrix,
            skipped,
            budget_exhausted,
        }
    }

    fn acquire(&self, ticker: &str) -> Result<BarSeries, ScreenerError> {
        let bars = self
            .data_port
            .fetch_bars(ticker, self.settings.start_date(), self.settings.end_date)?;
        BarSeries::new(bars)
    }

    fn budget_exhausted(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
