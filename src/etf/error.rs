//! ETF processing error types
//!
//! Every error carries a stable numeric code that is returned to clients
//! alongside the human-readable message.

use thiserror::Error;

/// Generic message shown for any problem with the contents of an uploaded file.
/// The specific reason travels in the error detail.
pub const FILE_PROCESSING_MESSAGE: &str = "There was a problem processing the file.";

/// Errors that can occur while processing an ETF upload
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EtfError {
    /// Multipart body had no `file` field
    #[error("No file provided. Please select a file to upload.")]
    NoFileProvided,

    /// The `file` field had an empty filename
    #[error("No file selected. Please choose a CSV file to upload.")]
    NoFileSelected,

    #[error("Invalid file type. Expected a CSV file but received '{0}'. Please upload a .csv file.")]
    InvalidFileType(String),

    /// Holdings file could not be opened (local checks only)
    #[error("There was a problem. Please inform the service maintainer")]
    FileNotFound(String),

    #[error("The file cannot be read. Please ensure it's a valid text file encoded in UTF-8.")]
    FileEncoding,

    #[error("The file is not a valid CSV format. Please check that it has proper comma-separated values. Details: {0}")]
    InvalidCsvFormat(String),

    #[error("The CSV file appears to be empty. Please provide a file with ETF constituent data.")]
    EmptyFile,

    #[error(
        "Your CSV is missing required columns: {}. Found columns: {}. Please ensure your CSV has 'name' and 'weight' columns.",
        .missing.join(", "),
        .found.join(", ")
    )]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    /// Line numbers (1-based, header is line 1) of rows without a name
    #[error(
        "Some stock names are missing. Please check rows: {}. Every ETF constituent must have a name.",
        join_lines(.0)
    )]
    MissingStockNames(Vec<usize>),

    #[error("All stock names must be text values (e.g., 'A', 'AAPL', 'MSFT'). Please check your 'name' column.")]
    InvalidStockNames,

    #[error(
        "Some weights are missing. Please check rows: {}. Every constituent must have a weight value.",
        join_lines(.0)
    )]
    MissingWeights(Vec<usize>),

    #[error(
        "Weight values must be numbers (e.g., 0.15, 0.25). Found invalid values: {}. Please use decimal format.",
        .0.join(", ")
    )]
    NonNumericWeights(Vec<String>),

    #[error(
        "Weight values cannot be negative. Found negative weights for: {}. Weights must be between 0 and 1.",
        .0.join(", ")
    )]
    NegativeWeights(Vec<String>),

    #[error(
        "Weight values cannot exceed 1.0. Found weights greater than 1 for: {}. Please use decimal format (e.g., 0.25 for 25%).",
        .0.join(", ")
    )]
    WeightsExceedOne(Vec<String>),

    #[error(
        "The total weights sum to {0:.4} ({pct:.2}%), but should sum to approximately 1.0 (100%). Please verify your weight allocations.",
        pct = .0 * 100.0
    )]
    IncorrectWeightSum(f64),

    #[error("Price data for stock '{stock}' not found.")]
    StockPriceNotFound {
        stock: String,
        /// Set when the ticker exists but has no price on this date
        date: Option<String>,
    },

    #[error("An unexpected error occurred while processing your file. Please try again or contact support. Details: {0}")]
    Unexpected(String),
}

impl EtfError {
    /// Application-specific error code
    pub fn code(&self) -> u32 {
        match self {
            EtfError::NoFileProvided => 1001,
            EtfError::NoFileSelected => 1002,
            EtfError::InvalidFileType(_) => 1003,
            EtfError::FileNotFound(_) => 2001,
            EtfError::StockPriceNotFound { .. } => 3001,
            EtfError::Unexpected(_) => 5000,
            _ => 1004,
        }
    }

    /// Whether the error describes the contents of the uploaded file
    pub fn is_file_processing(&self) -> bool {
        self.code() == 1004
    }

    /// Whether the client, rather than the server, is at fault
    pub fn is_client_error(&self) -> bool {
        !matches!(self, EtfError::Unexpected(_))
    }

    /// Message returned in the `error` field
    pub fn message(&self) -> String {
        if self.is_file_processing() {
            FILE_PROCESSING_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }

    /// Optional diagnostic returned in the `error_detail` field
    pub fn detail(&self) -> Option<String> {
        match self {
            EtfError::StockPriceNotFound {
                date: Some(date), ..
            } => Some(format!("No price recorded on {}", date)),
            EtfError::FileNotFound(path) => Some(format!("ETF file not found: {}", path)),
            e if e.is_file_processing() => Some(e.to_string()),
            _ => None,
        }
    }

    /// One-line form used in log records
    pub fn log_message(&self) -> String {
        match self.detail() {
            Some(detail) => format!("[{}] {} | Details: {}", self.code(), self.message(), detail),
            None => format!("[{}] {}", self.code(), self.message()),
        }
    }
}

fn join_lines(lines: &[usize]) -> String {
    lines
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for ETF processing
pub type EtfResult<T> = Result<T, EtfError>;
