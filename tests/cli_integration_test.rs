//! CLI integration tests for the screen command orchestration.
//!
//! Tests cover:
//! - App config parsing (build_app_config)
//! - Option files on disk through FileOptionStore
//! - Full pipeline with CSV data and file results in a temp directory
//! - The `screen` command end to end through `cli::run`

mod common;

use chrono::NaiveDate;
use clap::Parser;
use common::*;
use fxscreen::adapters::csv_adapter::CsvAdapter;
use fxscreen::adapters::file_config_adapter::FileConfigAdapter;
use fxscreen::adapters::file_option_store::FileOptionStore;
use fxscreen::adapters::file_result_sink::FileResultSink;
use fxscreen::cli::{self, Cli};
use fxscreen::domain::error::ScreenerError;
use fxscreen::domain::screener::ScreenSettings;
use fxscreen::logging::LogFormat;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const VALID_INI: &str = r#"
[screen]
options_dir = /srv/fxscreen/options
data_dir = /srv/fxscreen/data
output_dir = /srv/fxscreen/out
history_days = 120
max_run_seconds = 300
history_charts = false

[logging]
format = json
"#;

const TREND_OPTION: &str = r#"
[option]
name = trend
active = true
observed_tickers = eurusd, GBPUSD, NZDUSD

[indicator.1]
kind = moving_average
name = ma_fast
width = 1

[indicator.2]
kind = sma
name = ma_slow
width = 3

[alert.1]
kind = threshold
name = above_110
depth = 5
indicators = ma_slow
threshold = 1.10

[alert.2]
kind = crossover
name = fast_cross
depth = 1
indicators = ma_fast, ma_slow
"#;

fn write_csv(dir: &Path, ticker: &str, bars: &[Bar]) {
    let mut content = String::from("date,open,high,low,close\n");
    for bar in bars {
        content.push_str(&format!(
            "{},{},{},{},{}\n",
            bar.date.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close
        ));
    }
    fs::write(dir.join(format!("{}.csv", ticker)), content).unwrap();
}

/// options/, data/ and out/ under one temp root.
fn workspace() -> TempDir {
    let root = TempDir::new().unwrap();
    for sub in ["options", "data", "out"] {
        fs::create_dir(root.path().join(sub)).unwrap();
    }
    fs::write(root.path().join("options/trend.ini"), TREND_OPTION).unwrap();
    fs::write(
        root.path().join("options/idle.ini"),
        "[option]\nname = idle\nactive = false\nobserved_tickers = EURUSD\n",
    )
    .unwrap();

    let data = root.path().join("data");
    write_csv(&data, "EURUSD", &uptrend(30, 1.10, 0.001));
    let crossing = bars_from_closes(&[
        1.30, 1.30, 1.30, 1.30, 1.30, 1.29, 1.28, 1.27, 1.26, 1.35,
    ]);
    write_csv(&data, "GBPUSD", &crossing);
    root
}

fn end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()
}

mod config_loading {
    use super::*;

    #[test]
    fn build_app_config_valid_full() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_app_config(&adapter).unwrap();

        assert_eq!(config.options_dir, Path::new("/srv/fxscreen/options"));
        assert_eq!(config.data_dir, Path::new("/srv/fxscreen/data"));
        assert_eq!(config.output_dir, Path::new("/srv/fxscreen/out"));
        assert_eq!(config.history_days, 120);
        assert_eq!(config.max_run_seconds, 300);
        assert!(!config.history_charts);
        assert_eq!(config.log_format, LogFormat::Json);

        let settings = config.settings(end_date());
        assert_eq!(settings.max_run, Some(std::time::Duration::from_secs(300)));
        assert_eq!(settings.history_days, 120);
    }

    #[test]
    fn build_app_config_uses_defaults() {
        let ini = "[screen]\noptions_dir = o\ndata_dir = d\noutput_dir = r\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let config = cli::build_app_config(&adapter).unwrap();

        assert_eq!(config.history_days, 50);
        assert_eq!(config.max_run_seconds, 0);
        assert!(config.history_charts);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.settings(end_date()).max_run.is_none());
    }

    #[test]
    fn build_app_config_missing_dir() {
        let ini = "[screen]\noptions_dir = o\ndata_dir = d\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_app_config(&adapter).unwrap_err();
        assert!(matches!(err, ScreenerError::ConfigMissing { ref key, .. } if key == "output_dir"));
    }

    #[test]
    fn build_app_config_rejects_bad_history() {
        let ini = "[screen]\noptions_dir = o\ndata_dir = d\noutput_dir = r\nhistory_days = 0\n";
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = cli::build_app_config(&adapter).unwrap_err();
        assert!(matches!(err, ScreenerError::ConfigInvalid { ref key, .. } if key == "history_days"));
    }

    #[test]
    fn default_key_is_a_timestamp() {
        let key = cli::default_screen_key();
        assert_eq!(key.len(), 15);
        assert_eq!(&key[8..9], "-");
        assert!(key.chars().filter(|c| *c != '-').all(|c| c.is_ascii_digit()));
    }
}

mod option_files {
    use super::*;
    use fxscreen::domain::alert::AlertKind;
    use fxscreen::domain::indicator::IndicatorKind;
    use fxscreen::ports::option_port::OptionPort;

    #[test]
    fn loads_option_from_disk() {
        let root = workspace();
        let store = FileOptionStore::new(root.path().join("options"));
        let option = store.get_option("trend").unwrap().unwrap();

        assert!(option.active);
        assert_eq!(option.observed_tickers, vec!["EURUSD", "GBPUSD", "NZDUSD"]);
        assert_eq!(option.indicators.len(), 2);
        assert_eq!(option.indicators[0].kind, IndicatorKind::MovingAverage);
        assert_eq!(option.indicators[1].kind, IndicatorKind::MovingAverage);
        assert_eq!(option.indicators[1].params.get("width"), Some("3"));
        assert_eq!(option.alerts[0].kind, AlertKind::Threshold);
        assert_eq!(option.alerts[0].depth, 5);
        assert_eq!(option.alerts[1].indicators(), vec!["ma_fast", "ma_slow"]);
    }

    #[test]
    fn lists_all_options_sorted() {
        let root = workspace();
        let store = FileOptionStore::new(root.path().join("options"));
        let names: Vec<String> = store
            .list_options()
            .unwrap()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["idle", "trend"]);
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn screens_and_writes_results() {
        let root = workspace();
        let store = FileOptionStore::new(root.path().join("options"));
        let data = CsvAdapter::new(root.path().join("data"));
        let sink = FileResultSink::new(root.path().join("out"), "run1", true);

        let summary = cli::run_screen_pipeline(
            &store,
            &data,
            &sink,
            ScreenSettings::new(end_date()),
            None,
        )
        .unwrap();

        assert_eq!(summary.reports.len(), 1);
        let report = summary.report("trend").unwrap();
        assert_eq!(report.matrix.get("above_110", "EURUSD"), Some(1));
        assert_eq!(report.matrix.get("fast_cross", "EURUSD"), Some(0));
        assert_eq!(report.matrix.get("above_110", "GBPUSD"), Some(1));
        assert_eq!(report.matrix.get("fast_cross", "GBPUSD"), Some(1));
        assert_eq!(report.matrix.get("above_110", "NZDUSD"), None);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].ticker, "NZDUSD");

        let out = root.path().join("out/run1/trend");
        let results = fs::read_to_string(out.join("results.csv")).unwrap();
        assert_eq!(
            results,
            "alert,EURUSD,GBPUSD,NZDUSD\nabove_110,1,1,\nfast_cross,0,1,\n"
        );
        assert!(out.join("history_EURUSD.csv").exists());
        assert!(out.join("history_EURUSD.svg").exists());
        assert!(out.join("fast_cross_GBPUSD.svg").exists());
        assert!(!out.join("fast_cross_EURUSD.svg").exists());
        assert!(!out.join("history_NZDUSD.csv").exists());
        assert!(!root.path().join("out/run1/idle").exists());
    }

    #[test]
    fn option_filter_narrows_run() {
        let root = workspace();
        let store = FileOptionStore::new(root.path().join("options"));
        let data = CsvAdapter::new(root.path().join("data"));
        let sink = RecordingSink::new();

        let summary = cli::run_screen_pipeline(
            &store,
            &data,
            &sink,
            ScreenSettings::new(end_date()),
            Some("idle"),
        )
        .unwrap();
        // Named explicitly but inactive: nothing to screen.
        assert!(summary.reports.is_empty());

        let err = cli::run_screen_pipeline(
            &store,
            &data,
            &sink,
            ScreenSettings::new(end_date()),
            Some("nope"),
        )
        .unwrap_err();
        assert!(matches!(err, ScreenerError::ConfigInvalid { .. }));
    }

    #[test]
    fn history_window_limits_bars() {
        let root = workspace();
        let store = FileOptionStore::new(root.path().join("options"));
        let data = CsvAdapter::new(root.path().join("data"));
        let sink = RecordingSink::new();
        // 2024-01-01 .. 2024-01-05 only: too short for any window.
        let settings = ScreenSettings {
            history_days: 4,
            ..ScreenSettings::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
        };

        let summary = cli::run_screen_pipeline(&store, &data, &sink, settings, None).unwrap();
        let report = summary.report("trend").unwrap();
        assert_eq!(report.matrix.get("above_110", "EURUSD"), Some(0));
        assert_eq!(report.matrix.get("fast_cross", "GBPUSD"), Some(0));
    }
}

mod command {
    use super::*;

    #[test]
    fn screen_command_end_to_end() {
        let root = workspace();
        let config = format!(
            "[screen]\noptions_dir = {}\ndata_dir = {}\noutput_dir = {}\nhistory_charts = false\n",
            root.path().join("options").display(),
            root.path().join("data").display(),
            root.path().join("out").display(),
        );
        let config_path = root.path().join("fxscreen.ini");
        fs::write(&config_path, config).unwrap();

        let cli = Cli::parse_from([
            "fxscreen",
            "screen",
            "--config",
            config_path.to_str().unwrap(),
            "--key",
            "nightly",
            "--end-date",
            "2024-02-15",
        ]);
        let _ = cli::run(cli);

        let out = root.path().join("out/nightly/trend");
        let results = fs::read_to_string(out.join("results.csv")).unwrap();
        assert!(results.starts_with("alert,EURUSD,GBPUSD,NZDUSD\n"));
        assert!(out.join("history_GBPUSD.csv").exists());
        assert!(!out.join("history_GBPUSD.svg").exists());
    }

    #[test]
    fn validate_command_parses() {
        let cli = Cli::parse_from(["fxscreen", "validate", "--option", "options/trend.ini"]);
        assert!(matches!(cli.command, cli::Command::Validate { .. }));
    }
}
