//! CSV file data adapter.
//!
//! Reads `<base_path>/<TICKER>.csv` with a `date,open,high,low,close`
//! header. Extra columns are ignored.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

fn parse_field(
    record: &csv::StringRecord,
    index: usize,
    field: &str,
    ticker: &str,
) -> Result<f64, ScreenerError> {
    record
        .get(index)
        .ok_or_else(|| ScreenerError::Acquisition {
            ticker: ticker.to_string(),
            reason: format!("missing {} column", field),
        })?
        .trim()
        .parse()
        .map_err(|e| ScreenerError::Acquisition {
            ticker: ticker.to_string(),
            reason: format!("invalid {} value: {}", field, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, ScreenerError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|_| ScreenerError::NoData {
            ticker: ticker.to_string(),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| ScreenerError::Acquisition {
                ticker: ticker.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| ScreenerError::Acquisition {
                ticker: ticker.to_string(),
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                ScreenerError::Acquisition {
                    ticker: ticker.to_string(),
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(Bar {
                date,
                open: parse_field(&record, 1, "open", ticker)?,
                high: parse_field(&record, 2, "high", ticker)?,
                low: parse_field(&record, 3, "low", ticker)?,
                close: parse_field(&record, 4, "close", ticker)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
