//! CLI definition and dispatch.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_option_store::FileOptionStore;
use crate::adapters::file_result_sink::FileResultSink;
use crate::domain::config_validation::{validate_screen_config, SCREEN_SECTION};
use crate::domain::error::ScreenerError;
use crate::domain::indicator::IndicatorKind;
use crate::domain::alert::AlertKind;
use crate::domain::screener::{ScreenSettings, ScreenSummary, Screener, DEFAULT_HISTORY_DAYS};
use crate::logging::{init_logging, LogFormat};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::option_port::OptionPort;
use crate::ports::result_sink::ResultSink;

#[derive(Parser, Debug)]
#[command(name = "fxscreen", about = "Screen instruments against indicator alerts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every active screening option
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        /// Run identifier, used as the output sub-directory
        #[arg(short, long)]
        key: Option<String>,
        /// Screen only this option
        #[arg(short, long)]
        option: Option<String>,
        /// Last day of the acquisition window (YYYY-MM-DD), defaults to today
        #[arg(long)]
        end_date: Option<NaiveDate>,
    },
    /// List configured screening options
    ListOptions {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a screening option file
    Validate {
        #[arg(short, long)]
        option: PathBuf,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub options_dir: PathBuf,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub history_days: i64,
    pub max_run_seconds: u64,
    pub history_charts: bool,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn settings(&self, end_date: NaiveDate) -> ScreenSettings {
        ScreenSettings {
            end_date,
            history_days: self.history_days,
            max_run: (self.max_run_seconds > 0).then(|| Duration::from_secs(self.max_run_seconds)),
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Screen {
            config,
            key,
            option,
            end_date,
        } => run_screen(&config, key, option.as_deref(), end_date),
        Command::ListOptions { config } => run_list_options(&config),
        Command::Validate { option } => run_validate(&option),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = ScreenerError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_app_config(adapter: &dyn ConfigPort) -> Result<AppConfig, ScreenerError> {
    validate_screen_config(adapter)?;
    let dir = |key: &str| -> Result<PathBuf, ScreenerError> {
        adapter
            .get_string(SCREEN_SECTION, key)
            .map(|s| PathBuf::from(s.trim()))
            .ok_or_else(|| ScreenerError::ConfigMissing {
                section: SCREEN_SECTION.into(),
                key: key.into(),
            })
    };

    Ok(AppConfig {
        options_dir: dir("options_dir")?,
        data_dir: dir("data_dir")?,
        output_dir: dir("output_dir")?,
        history_days: adapter.get_int(SCREEN_SECTION, "history_days", DEFAULT_HISTORY_DAYS),
        max_run_seconds: adapter.get_int(SCREEN_SECTION, "max_run_seconds", 0).max(0) as u64,
        history_charts: adapter.get_bool(SCREEN_SECTION, "history_charts", true),
        log_format: LogFormat::parse(adapter.get_string("logging", "format").as_deref()),
    })
}

/// Timestamp key for a run, e.g. `20240115-093000`.
pub fn default_screen_key() -> String {
    Utc::now().format("%Y%m%d-%H%M%S").to_string()
}

fn load_app_config(config_path: &PathBuf) -> Result<AppConfig, ExitCode> {
    let adapter = load_config(config_path)?;
    build_app_config(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn run_screen(
    config_path: &PathBuf,
    key: Option<String>,
    option_filter: Option<&str>,
    end_date: Option<NaiveDate>,
) -> ExitCode {
    let app = match load_app_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    init_logging(app.log_format);

    let screen_key = key.unwrap_or_else(default_screen_key);
    let end_date = end_date.unwrap_or_else(|| Utc::now().date_naive());
    info!(key = %screen_key, config = %config_path.display(), "screening run");

    let store = FileOptionStore::new(app.options_dir.clone());
    let data_port = CsvAdapter::new(app.data_dir.clone());
    let sink = FileResultSink::new(app.output_dir.clone(), &screen_key, app.history_charts);

    match run_screen_pipeline(
        &store,
        &data_port,
        &sink,
        app.settings(end_date),
        option_filter,
    ) {
        Ok(summary) => {
            print_summary(&summary);
            info!(dir = %sink.run_dir().display(), "results written");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "screening failed");
            (&e).into()
        }
    }
}

/// Loads options, narrows to `option_filter` when given, and screens them.
pub fn run_screen_pipeline(
    store: &dyn OptionPort,
    data_port: &dyn DataPort,
    sink: &dyn ResultSink,
    settings: ScreenSettings,
    option_filter: Option<&str>,
) -> Result<ScreenSummary, ScreenerError> {
    let mut options = store.list_options()?;
    if let Some(name) = option_filter {
        options.retain(|o| o.name == name);
        if options.is_empty() {
            return Err(ScreenerError::ConfigInvalid {
                section: "option".into(),
                key: "name".into(),
                reason: format!("no screening option named '{}'", name),
            });
        }
    }

    let mut screener = Screener::new(data_port, sink, settings);
    let summary = screener.screen(&options);
    if summary.budget_exhausted {
        warn!("run budget exhausted before all tickers were screened");
    }
    Ok(summary)
}

fn print_summary(summary: &ScreenSummary) {
    for report in &summary.reports {
        println!("== {} ==", report.option);
        let tickers = report.matrix.tickers();
        println!("{:<20} {}", "alert", tickers.join(" "));
        for (alert, cells) in report.matrix.rows() {
            let cells: Vec<String> = cells
                .iter()
                .zip(tickers)
                .map(|(c, t)| {
                    let v = c.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
                    format!("{:>width$}", v, width = t.len())
                })
                .collect();
            println!("{:<20} {}", alert, cells.join(" "));
        }
        for skip in &report.skipped {
            match &skip.item {
                Some(item) => println!("  skipped {} / {}: {}", skip.ticker, item, skip.reason),
                None => println!("  skipped {}: {}", skip.ticker, skip.reason),
            }
        }
    }
}

fn run_list_options(config_path: &PathBuf) -> ExitCode {
    let app = match load_app_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    init_logging(app.log_format);

    let store = FileOptionStore::new(app.options_dir);
    let options = match store.list_options() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if options.is_empty() {
        eprintln!("No screening options found");
    }
    for option in &options {
        println!(
            "{}\t{}\t{}",
            option.name,
            if option.active { "active" } else { "inactive" },
            option.observed_tickers.join(",")
        );
    }
    ExitCode::SUCCESS
}

fn run_validate(option_path: &PathBuf) -> ExitCode {
    init_logging(LogFormat::Pretty);
    eprintln!("Validating screening option: {}", option_path.display());

    let option = match FileOptionStore::load_file(option_path) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nOption: {} ({})", option.name, if option.active { "active" } else { "inactive" });
    eprintln!("  tickers: {}", option.observed_tickers.join(", "));

    let mut warnings = 0;
    eprintln!("\nIndicators:");
    for spec in &option.indicators {
        eprintln!("  {} [{}]", spec.label(), spec.kind);
        if spec.name.is_empty() {
            eprintln!("    warning: missing name, will be skipped");
            warnings += 1;
        }
        if matches!(spec.kind, IndicatorKind::Unknown(_)) {
            eprintln!("    warning: unknown kind, will be skipped");
            warnings += 1;
        }
    }

    eprintln!("\nAlerts:");
    for spec in &option.alerts {
        eprintln!("  {} [{}] depth={}", spec.name, spec.kind, spec.effective_depth());
        if spec.depth < 1 {
            eprintln!("    warning: non-positive depth {}, 1 will be used", spec.depth);
            warnings += 1;
        }
        if matches!(spec.kind, AlertKind::Unknown(_)) {
            eprintln!("    warning: unknown kind, result will always be 0");
            warnings += 1;
        }
    }

    eprintln!("\nScreening option is valid ({} warnings).", warnings);
    ExitCode::SUCCESS
}
