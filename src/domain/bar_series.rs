//! Bar series with named derived columns.
//!
//! A `BarSeries` holds one instrument's ordered bars plus every indicator
//! column computed over them. Columns are aligned with the bars position by
//! position; `None` marks a position without enough history.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;
use std::collections::HashMap;

/// One value per bar position. `None` is the "undefined" sentinel.
pub type Column = Vec<Option<f64>>;

#[derive(Debug, Clone)]
pub struct DerivedColumn {
    pub name: String,
    pub values: Column,
}

#[derive(Debug, Clone, Default)]
pub struct BarSeries {
    bars: Vec<Bar>,
    columns: Vec<DerivedColumn>,
    date_index: HashMap<NaiveDate, usize>,
}

impl BarSeries {
    /// Builds a series, rejecting NaN prices and non-increasing dates.
    pub fn new(bars: Vec<Bar>) -> Result<Self, ScreenerError> {
        for (i, bar) in bars.iter().enumerate() {
            if bar.has_nan() {
                return Err(ScreenerError::InvalidSeries {
                    reason: format!("NaN price on {}", bar.date),
                });
            }
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(ScreenerError::InvalidSeries {
                    reason: format!(
                        "dates not strictly increasing: {} follows {}",
                        bar.date,
                        bars[i - 1].date
                    ),
                });
            }
        }

        let date_index = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date, i))
            .collect();
        Ok(Self {
            bars,
            columns: Vec::new(),
            date_index,
        })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn get_bar(&self, date: NaiveDate) -> Option<&Bar> {
        self.date_index.get(&date).map(|&i| &self.bars[i])
    }

    pub fn get_bar_index(&self, date: NaiveDate) -> Option<usize> {
        self.date_index.get(&date).copied()
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn columns(&self) -> &[DerivedColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Adds a column, or replaces the values of an existing column with the
    /// same name. Insertion order is preserved.
    pub fn insert_column(&mut self, name: &str, values: Column) -> Result<(), ScreenerError> {
        if values.len() != self.bars.len() {
            return Err(ScreenerError::InvalidSeries {
                reason: format!(
                    "column '{}' has {} values for {} bars",
                    name,
                    values.len(),
                    self.bars.len()
                ),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(DerivedColumn {
                name: name.to_string(),
                values,
            }),
        }
        Ok(())
    }
}
