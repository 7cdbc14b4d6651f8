//! Market-data access port trait.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `ticker` between `start_date` and `end_date`
    /// inclusive, ordered by ascending date.
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, ScreenerError>;
}
