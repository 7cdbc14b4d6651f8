//! Per-option result matrix: alert rows by instrument columns.

/// Cell value: `Some(0)`, `Some(1)` or `None` for undefined.
pub type Cell = Option<u8>;

#[derive(Debug, Clone, PartialEq)]
pub struct ResultMatrix {
    alerts: Vec<String>,
    tickers: Vec<String>,
    /// Column-major: one `Vec<Cell>` per ticker, aligned with `alerts`.
    cells: Vec<Vec<Cell>>,
}

impl ResultMatrix {
    pub fn new(alerts: Vec<String>) -> Self {
        Self {
            alerts,
            tickers: Vec::new(),
            cells: Vec::new(),
        }
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Appends a ticker column with every cell undefined and returns its index.
    /// Adding a ticker twice returns the existing column.
    pub fn add_ticker(&mut self, ticker: &str) -> usize {
        if let Some(idx) = self.ticker_index(ticker) {
            return idx;
        }
        self.tickers.push(ticker.to_string());
        self.cells.push(vec![None; self.alerts.len()]);
        self.tickers.len() - 1
    }

    pub fn set(&mut self, ticker: &str, alert_row: usize, value: Cell) {
        let col = self.add_ticker(ticker);
        if let Some(cell) = self.cells[col].get_mut(alert_row) {
            *cell = value;
        }
    }

    pub fn get(&self, alert: &str, ticker: &str) -> Cell {
        let row = self.alerts.iter().position(|a| a == alert)?;
        let col = self.ticker_index(ticker)?;
        self.cells[col][row]
    }

    /// One row per alert, cells in ticker order.
    pub fn rows(&self) -> Vec<(&str, Vec<Cell>)> {
        self.alerts
            .iter()
            .enumerate()
            .map(|(row, alert)| {
                (
                    alert.as_str(),
                    self.cells.iter().map(|column| column[row]).collect(),
                )
            })
            .collect()
    }

    pub fn hit_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c == Some(1))
            .count()
    }

    fn ticker_index(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }
}
