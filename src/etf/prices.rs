//! Price Data
//!
//! Closing prices for the tickers an ETF may hold. The default source is a
//! wide CSV table: one date column followed by one column per ticker.
//!
//! ```text
//! DATE,AAPL,MSFT
//! 2024-01-02,185.64,370.87
//! 2024-01-03,184.25,370.60
//! ```

use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Provider of per-ticker price history
///
/// Implementations must return dates in chronological order, and every
/// series must be aligned with those dates.
pub trait PriceSource: Send + Sync {
    /// Trading dates, oldest first
    fn dates(&self) -> &[NaiveDate];

    /// Prices for a ticker, one slot per date. `None` marks a missing cell.
    fn series(&self, ticker: &str) -> Option<&[Option<f64>]>;

    /// Tickers with price data
    fn tickers(&self) -> Vec<&str>;
}

/// Errors raised while loading a price table
#[derive(Error, Debug)]
pub enum PriceTableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date column '{0}' not found in price table")]
    MissingDateColumn(String),

    #[error("Line {line}: invalid date '{value}'")]
    InvalidDate { line: usize, value: String },

    #[error("Line {line}: invalid price '{value}' for {ticker}")]
    InvalidPrice {
        line: usize,
        ticker: String,
        value: String,
    },

    #[error("Price table has no rows")]
    Empty,
}

/// Date formats accepted in the date column
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// In-memory price table loaded from CSV
#[derive(Debug, Clone, Default)]
pub struct CsvPriceTable {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    series: HashMap<String, Vec<Option<f64>>>,
}

impl CsvPriceTable {
    /// Load a price table from a CSV file
    pub fn from_path(path: &Path, date_column: &str) -> Result<Self, PriceTableError> {
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file, date_column)?;

        tracing::info!(
            path = %path.display(),
            tickers = table.tickers.len(),
            dates = table.dates.len(),
            "Loaded price table"
        );

        Ok(table)
    }

    /// Load a price table from any reader
    pub fn from_reader<R: Read>(reader: R, date_column: &str) -> Result<Self, PriceTableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let date_idx = headers
            .iter()
            .position(|h| h == date_column)
            .ok_or_else(|| PriceTableError::MissingDateColumn(date_column.to_string()))?;

        let tickers: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != date_idx)
            .map(|(idx, h)| (idx, h.to_string()))
            .collect();

        let mut rows: Vec<(NaiveDate, Vec<Option<f64>>)> = Vec::new();

        for (line_num, result) in reader.records().enumerate() {
            let line = line_num + 2;
            let record = result?;

            let raw_date = record.get(date_idx).unwrap_or("");
            let date = parse_date(raw_date).ok_or_else(|| PriceTableError::InvalidDate {
                line,
                value: raw_date.to_string(),
            })?;

            let mut prices = Vec::with_capacity(tickers.len());
            for (idx, ticker) in &tickers {
                let raw = record.get(*idx).unwrap_or("");
                if raw.is_empty() {
                    prices.push(None);
                    continue;
                }
                let price = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|p| p.is_finite())
                    .ok_or_else(|| PriceTableError::InvalidPrice {
                        line,
                        ticker: ticker.clone(),
                        value: raw.to_string(),
                    })?;
                prices.push(Some(price));
            }

            rows.push((date, prices));
        }

        if rows.is_empty() {
            return Err(PriceTableError::Empty);
        }

        rows.sort_by_key(|(date, _)| *date);

        let mut series: HashMap<String, Vec<Option<f64>>> = tickers
            .iter()
            .map(|(_, t)| (t.clone(), Vec::with_capacity(rows.len())))
            .collect();
        let mut dates = Vec::with_capacity(rows.len());

        for (date, prices) in rows {
            dates.push(date);
            for ((_, ticker), price) in tickers.iter().zip(prices) {
                if let Some(column) = series.get_mut(ticker) {
                    column.push(price);
                }
            }
        }

        Ok(Self {
            dates,
            tickers: tickers.into_iter().map(|(_, t)| t).collect(),
            series,
        })
    }

    /// Number of dates in the table
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl PriceSource for CsvPriceTable {
    fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    fn series(&self, ticker: &str) -> Option<&[Option<f64>]> {
        self.series.get(ticker).map(Vec::as_slice)
    }

    fn tickers(&self) -> Vec<&str> {
        self.tickers.iter().map(String::as_str).collect()
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "DATE,AAPL,MSFT\n\
                         2024-01-03,184.25,370.60\n\
                         2024-01-02,185.64,370.87\n\
                         2024-01-04,181.91,\n";

    #[test]
    fn test_rows_are_sorted_chronologically() {
        let table = CsvPriceTable::from_reader(TABLE.as_bytes(), "DATE").unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.dates()[0], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(table.series("AAPL").unwrap()[0], Some(185.64));
        assert_eq!(table.series("MSFT").unwrap()[1], Some(370.60));
    }

    #[test]
    fn test_blank_cells_are_missing_prices() {
        let table = CsvPriceTable::from_reader(TABLE.as_bytes(), "DATE").unwrap();
        assert_eq!(table.series("MSFT").unwrap()[2], None);
        assert!(table.series("GOOG").is_none());
        assert_eq!(table.tickers(), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_date_column_is_configurable() {
        let csv = "close_date,A\n01/05/2024,10\n";
        let table = CsvPriceTable::from_reader(csv.as_bytes(), "close_date").unwrap();
        assert_eq!(table.dates()[0], NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());

        let err = CsvPriceTable::from_reader(csv.as_bytes(), "DATE").unwrap_err();
        assert!(matches!(err, PriceTableError::MissingDateColumn(_)));
    }

    #[test]
    fn test_invalid_cells_report_line() {
        let err = CsvPriceTable::from_reader("DATE,A\nyesterday,1\n".as_bytes(), "DATE")
            .unwrap_err();
        assert_eq!(err.to_string(), "Line 2: invalid date 'yesterday'");

        let err = CsvPriceTable::from_reader("DATE,A\n2024-01-02,1\n2024-01-03,n/a\n".as_bytes(), "DATE")
            .unwrap_err();
        assert_eq!(err.to_string(), "Line 3: invalid price 'n/a' for A");
    }

    #[test]
    fn test_empty_table() {
        let err = CsvPriceTable::from_reader("DATE,A\n".as_bytes(), "DATE").unwrap_err();
        assert!(matches!(err, PriceTableError::Empty));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        std::fs::write(&path, TABLE).unwrap();

        let table = CsvPriceTable::from_path(&path, "DATE").unwrap();
        assert!(!table.is_empty());
    }
}
