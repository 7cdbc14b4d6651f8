//! File-based result sink.
//!
//! Layout under `<root>/<screen_key>/<option>/`:
//! - `history_<TICKER>.csv`: bars plus every derived column
//! - `history_<TICKER>.svg`: close chart, when history charts are enabled
//! - `<ALERT>_<TICKER>.svg`: chart for a triggered alert
//! - `results.csv`: alert rows by ticker columns, `0`/`1`/empty

use crate::adapters::chart_svg::format_series_chart;
use crate::domain::alert::AlertSpec;
use crate::domain::bar_series::BarSeries;
use crate::domain::error::ScreenerError;
use crate::domain::result_matrix::ResultMatrix;
use crate::ports::result_sink::ResultSink;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct FileResultSink {
    run_dir: PathBuf,
    history_charts: bool,
}

impl FileResultSink {
    pub fn new(root: PathBuf, screen_key: &str, history_charts: bool) -> Self {
        Self {
            run_dir: root.join(sanitize(screen_key)),
            history_charts,
        }
    }

    pub fn run_dir(&self) -> &PathBuf {
        &self.run_dir
    }

    fn option_dir(&self, option: &str) -> Result<PathBuf, ScreenerError> {
        let dir = self.run_dir.join(sanitize(option));
        fs::create_dir_all(&dir).map_err(|e| ScreenerError::Sink {
            reason: format!("failed to create {}: {}", dir.display(), e),
        })?;
        Ok(dir)
    }

    fn write_file(path: PathBuf, content: &str) -> Result<(), ScreenerError> {
        fs::write(&path, content).map_err(|e| ScreenerError::Sink {
            reason: format!("failed to write {}: {}", path.display(), e),
        })?;
        debug!(path = %path.display(), "artifact written");
        Ok(())
    }
}

impl ResultSink for FileResultSink {
    fn write_series(
        &self,
        option: &str,
        ticker: &str,
        series: &BarSeries,
    ) -> Result<(), ScreenerError> {
        let dir = self.option_dir(option)?;
        let path = dir.join(format!("history_{}.csv", sanitize(ticker)));
        let mut wtr = csv::Writer::from_path(&path)?;

        let mut header = vec!["date", "open", "high", "low", "close"];
        header.extend(series.column_names());
        wtr.write_record(&header)?;

        for (i, bar) in series.bars().iter().enumerate() {
            let mut record = vec![
                bar.date.format("%Y-%m-%d").to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
            ];
            record.extend(
                series
                    .columns()
                    .iter()
                    .map(|c| c.values[i].map(|v| v.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }
        wtr.flush()?;

        if self.history_charts {
            let svg = format_series_chart(series, &[], &format!("{} {}", ticker, option));
            Self::write_file(dir.join(format!("history_{}.svg", sanitize(ticker))), &svg)?;
        }
        Ok(())
    }

    fn write_chart(
        &self,
        option: &str,
        ticker: &str,
        alert: &AlertSpec,
        series: &BarSeries,
    ) -> Result<(), ScreenerError> {
        let dir = self.option_dir(option)?;
        let refs = alert.indicators();
        let columns: Vec<&str> = refs.iter().map(|s| s.as_str()).collect();
        let svg = format_series_chart(series, &columns, &format!("{} {}", ticker, alert.name));
        Self::write_file(
            dir.join(format!("{}_{}.svg", sanitize(&alert.name), sanitize(ticker))),
            &svg,
        )
    }

    fn write_matrix(&self, option: &str, matrix: &ResultMatrix) -> Result<(), ScreenerError> {
        let dir = self.option_dir(option)?;
        let mut wtr = csv::Writer::from_path(dir.join("results.csv"))?;

        let mut header = vec!["alert".to_string()];
        header.extend(matrix.tickers().iter().cloned());
        wtr.write_record(&header)?;

        for (alert, cells) in matrix.rows() {
            let mut record = vec![alert.to_string()];
            record.extend(
                cells
                    .iter()
                    .map(|c| c.map(|v| v.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Replaces characters that are unsafe in file names (e.g. `C:EURUSD`).
/// A leading `.` is replaced too, so `.` and `..` never name a parent or
/// the current directory.
fn sanitize(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();
    let dots = out.chars().take_while(|&c| c == '.').count();
    if dots > 0 {
        out.replace_range(..dots, &"_".repeat(dots));
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}
