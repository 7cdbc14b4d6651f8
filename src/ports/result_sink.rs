//! Result sink port trait.
//!
//! The screener hands every completed series and result matrix to a sink;
//! file formats, charts and storage location are the sink's business.

use crate::domain::alert::AlertSpec;
use crate::domain::bar_series::BarSeries;
use crate::domain::error::ScreenerError;
use crate::domain::result_matrix::ResultMatrix;

pub trait ResultSink {
    /// Persists one instrument's bars and derived columns.
    fn write_series(
        &self,
        option: &str,
        ticker: &str,
        series: &BarSeries,
    ) -> Result<(), ScreenerError>;

    /// Renders the supporting chart for a triggered alert.
    fn write_chart(
        &self,
        option: &str,
        ticker: &str,
        alert: &AlertSpec,
        series: &BarSeries,
    ) -> Result<(), ScreenerError>;

    /// Persists the completed result matrix of one option.
    fn write_matrix(&self, option: &str, matrix: &ResultMatrix) -> Result<(), ScreenerError>;
}
