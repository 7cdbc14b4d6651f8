//! Core domain types and logic.

pub mod ohlcv;
pub mod bar_series;
pub mod params;
pub mod indicator;
pub mod indicator_helpers;
pub mod alert;
pub mod alert_eval;
pub mod result_matrix;
pub mod screening_option;
pub mod screener;
pub mod config_validation;
pub mod error;
