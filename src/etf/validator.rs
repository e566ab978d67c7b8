//! Holdings CSV Validation
//!
//! Parses an uploaded holdings file and checks it before any prices are
//! looked up. Checks run in a fixed order and stop at the first failure, so
//! the user always sees the most fundamental problem first.

use std::path::Path;

use super::error::{EtfError, EtfResult};
use super::types::Holding;

/// Columns every holdings file must provide
pub const REQUIRED_COLUMNS: [&str; 2] = ["name", "weight"];

/// Accepted range for the sum of all weights
pub const WEIGHT_SUM_TOLERANCE: (f64, f64) = (0.95, 1.05);

/// How many offending rows are listed for missing names/weights
const MAX_REPORTED_ROWS: usize = 5;

/// How many offending values are listed for bad weights
const MAX_REPORTED_VALUES: usize = 3;

/// Validate a holdings file on disk
pub fn validate_holdings_file(path: &Path) -> EtfResult<Vec<Holding>> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => EtfError::FileNotFound(path.display().to_string()),
        _ => EtfError::Unexpected(e.to_string()),
    })?;

    validate_holdings(&bytes)
}

/// Validate raw holdings CSV bytes
pub fn validate_holdings(bytes: &[u8]) -> EtfResult<Vec<Holding>> {
    let content = std::str::from_utf8(bytes).map_err(|_| EtfError::FileEncoding)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    if content.trim().is_empty() {
        return Err(EtfError::InvalidCsvFormat(
            "No columns to parse from file".to_string(),
        ));
    }

    // Short rows leave blank cells for the checks below; long rows are rejected
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| EtfError::InvalidCsvFormat(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| EtfError::InvalidCsvFormat(e.to_string()))?;
        if record.len() > headers.len() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(EtfError::InvalidCsvFormat(format!(
                "Expected {} fields in line {}, saw {}",
                headers.len(),
                line,
                record.len()
            )));
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(EtfError::EmptyFile);
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(EtfError::MissingColumns {
            missing,
            found: headers,
        });
    }

    let name_idx = column_index(&headers, "name");
    let weight_idx = column_index(&headers, "weight");

    let names: Vec<&str> = records
        .iter()
        .map(|r| r.get(name_idx).unwrap_or(""))
        .collect();
    let raw_weights: Vec<&str> = records
        .iter()
        .map(|r| r.get(weight_idx).unwrap_or(""))
        .collect();

    let blank_names = blank_lines(&names);
    if !blank_names.is_empty() {
        return Err(EtfError::MissingStockNames(blank_names));
    }

    // A single numeric-looking ticker is still text; only an all-numeric column is rejected
    if names
        .iter()
        .all(|name| name.parse::<f64>().map(f64::is_finite).unwrap_or(false))
    {
        return Err(EtfError::InvalidStockNames);
    }

    let blank_weights = blank_lines(&raw_weights);
    if !blank_weights.is_empty() {
        return Err(EtfError::MissingWeights(blank_weights));
    }

    let non_numeric: Vec<String> = raw_weights
        .iter()
        .filter(|w| w.parse::<f64>().map(|v| !v.is_finite()).unwrap_or(true))
        .take(MAX_REPORTED_VALUES)
        .map(|w| w.to_string())
        .collect();
    if !non_numeric.is_empty() {
        return Err(EtfError::NonNumericWeights(non_numeric));
    }

    let holdings: Vec<Holding> = names
        .iter()
        .zip(&raw_weights)
        .filter_map(|(name, weight)| weight.parse().ok().map(|w| Holding::new(*name, w)))
        .collect();

    let negative = names_where(&holdings, |w| w < 0.0);
    if !negative.is_empty() {
        return Err(EtfError::NegativeWeights(negative));
    }

    let over_one = names_where(&holdings, |w| w > 1.0);
    if !over_one.is_empty() {
        return Err(EtfError::WeightsExceedOne(over_one));
    }

    let weight_sum: f64 = holdings.iter().map(|h| h.weight).sum();
    let (low, high) = WEIGHT_SUM_TOLERANCE;
    if !(low..=high).contains(&weight_sum) {
        return Err(EtfError::IncorrectWeightSum(weight_sum));
    }

    tracing::debug!(
        holdings = holdings.len(),
        weight_sum = weight_sum,
        "Holdings file validated"
    );

    Ok(holdings)
}

fn column_index(headers: &[String], name: &str) -> usize {
    headers.iter().position(|h| h == name).unwrap_or_default()
}

/// Line numbers (header = line 1) of blank cells
fn blank_lines(values: &[&str]) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_empty())
        .map(|(idx, _)| idx + 2)
        .take(MAX_REPORTED_ROWS)
        .collect()
}

fn names_where(holdings: &[Holding], pred: impl Fn(f64) -> bool) -> Vec<String> {
    holdings
        .iter()
        .filter(|h| pred(h.weight))
        .take(MAX_REPORTED_VALUES)
        .map(|h| h.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_of(result: EtfResult<Vec<Holding>>) -> String {
        let err = result.unwrap_err();
        assert_eq!(err.code(), 1004, "unexpected error: {:?}", err);
        err.detail().unwrap().to_lowercase()
    }

    #[test]
    fn test_valid_csv() {
        let csv = "name,weight\nA,0.5\nB,0.3\nC,0.2\n";
        let holdings = validate_holdings(csv.as_bytes()).unwrap();

        assert_eq!(holdings.len(), 3);
        assert_eq!(holdings[0], Holding::new("A", 0.5));
        assert_eq!(holdings[2], Holding::new("C", 0.2));
    }

    #[test]
    fn test_extra_columns_and_whitespace_are_accepted() {
        let csv = "\u{feff}sector, name , weight\nTech, AAPL , 0.6\nTech,MSFT,0.4\n";
        let holdings = validate_holdings(csv.as_bytes()).unwrap();

        assert_eq!(holdings[0].name, "AAPL");
        assert_eq!(holdings[1].weight, 0.4);
    }

    #[test]
    fn test_empty_csv() {
        let detail = detail_of(validate_holdings(b""));
        assert!(detail.contains("not a valid csv format"));
        assert!(detail.contains("no columns to parse"));
    }

    #[test]
    fn test_non_utf8_file() {
        let err = validate_holdings(&[0xff, 0xfe, 0x00, 0x41]).unwrap_err();
        assert_eq!(err, EtfError::FileEncoding);
    }

    #[test]
    fn test_long_rows_are_invalid_csv() {
        let detail = detail_of(validate_holdings(b"name,weight\nA,0.5,extra\nB,0.5\n"));
        assert!(detail.contains("not a valid csv format"));
        assert!(detail.contains("expected 2 fields in line 2, saw 3"));
    }

    #[test]
    fn test_short_rows_are_missing_weights() {
        let err = validate_holdings(b"name,weight\nA\nB,1.0\n").unwrap_err();
        assert_eq!(err, EtfError::MissingWeights(vec![2]));
        assert!(err.detail().unwrap().contains("rows: 2"));
    }

    #[test]
    fn test_no_data_rows() {
        let detail = detail_of(validate_holdings(b"name,weight\n"));
        assert!(detail.contains("empty"));
    }

    #[test]
    fn test_missing_weight_column() {
        let err = validate_holdings(b"name,price\nA,10\n").unwrap_err();
        let detail = err.detail().unwrap();

        assert!(detail.to_lowercase().contains("missing required columns"));
        assert!(detail.contains("weight"));
        assert!(detail.contains("Found columns: name, price"));
    }

    #[test]
    fn test_missing_name_column() {
        let err = validate_holdings(b"symbol,weight\nA,1.0\n").unwrap_err();
        assert!(matches!(
            err,
            EtfError::MissingColumns { ref missing, .. } if missing == &vec!["name".to_string()]
        ));
    }

    #[test]
    fn test_missing_stock_names() {
        let err = validate_holdings(b"name,weight\nA,0.5\n,0.3\nC,0.2\n").unwrap_err();
        assert_eq!(err, EtfError::MissingStockNames(vec![3]));
        assert!(err
            .detail()
            .unwrap()
            .to_lowercase()
            .contains("stock names are missing"));
    }

    #[test]
    fn test_numeric_stock_names() {
        let err = validate_holdings(b"name,weight\n123,0.5\n456,0.5\n").unwrap_err();
        assert_eq!(err, EtfError::InvalidStockNames);

        // a mixed column is text; the numeric ticker fails later at price lookup
        let holdings = validate_holdings(b"name,weight\n123,0.5\nB,0.5\n").unwrap();
        assert_eq!(holdings[0], Holding::new("123", 0.5));

        // tickers that happen to spell float keywords are still text
        assert!(validate_holdings(b"name,weight\nNAN,0.5\nINF,0.5\n").is_ok());
    }

    #[test]
    fn test_missing_weights() {
        let detail = detail_of(validate_holdings(b"name,weight\nA,0.5\nB,\nC,0.5\n"));
        assert!(detail.contains("weights are missing"));
        assert!(detail.contains("rows: 3"));
    }

    #[test]
    fn test_non_numeric_weights() {
        let err = validate_holdings(b"name,weight\nA,abc\nB,0.5\nC,x\nD,y\nE,z\n").unwrap_err();
        assert_eq!(
            err,
            EtfError::NonNumericWeights(vec!["abc".into(), "x".into(), "y".into()])
        );
        assert!(err
            .detail()
            .unwrap()
            .to_lowercase()
            .contains("weight values must be numbers"));
    }

    #[test]
    fn test_negative_weights() {
        let detail = detail_of(validate_holdings(b"name,weight\nA,-0.5\nB,1.0\nC,0.5\n"));
        assert!(detail.contains("cannot be negative"));
        assert!(detail.contains("for: a."));
    }

    #[test]
    fn test_weights_over_one() {
        let detail = detail_of(validate_holdings(b"name,weight\nA,1.5\nB,-0.5\n"));
        // negatives are reported before weights over one
        assert!(detail.contains("cannot be negative"));

        let detail = detail_of(validate_holdings(b"name,weight\nA,1.5\nB,0.5\n"));
        assert!(detail.contains("cannot exceed 1.0"));
    }

    #[test]
    fn test_weights_sum_incorrect() {
        let detail = detail_of(validate_holdings(b"name,weight\nA,0.5\nB,0.3\n"));
        assert!(detail.contains("should sum to approximately 1.0"));
    }

    #[test]
    fn test_weight_sum_within_tolerance() {
        assert!(validate_holdings(b"name,weight\nA,0.5\nB,0.47\n").is_ok());
        assert!(validate_holdings(b"name,weight\nA,0.54\nB,0.5\n").is_ok());
    }

    #[test]
    fn test_file_not_found() {
        let err = validate_holdings_file(Path::new("non_existent_file.csv")).unwrap_err();
        assert_eq!(err.code(), 2001);
        assert!(err.detail().unwrap().to_lowercase().contains("not found"));
    }

    #[test]
    fn test_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("etf.csv");
        std::fs::write(&path, "name,weight\nA,1.0\n").unwrap();

        let holdings = validate_holdings_file(&path).unwrap();
        assert_eq!(holdings, vec![Holding::new("A", 1.0)]);
    }
}
