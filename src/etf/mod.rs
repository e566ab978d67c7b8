//! ETF Processing
//!
//! Turns an uploaded holdings CSV into the three datasets served to the
//! dashboard: constituents, top holdings and the ETF price history.
//!
//! The pipeline is:
//!
//! 1. [`validator`] parses and checks the holdings file
//! 2. [`prices`] supplies per-ticker closing prices
//! 3. [`analytics`] combines both into an [`EtfReport`]

pub mod analytics;
pub mod error;
pub mod prices;
pub mod types;
pub mod validator;

pub use analytics::{calculate_etf_data, DEFAULT_TOP_HOLDINGS_COUNT};
pub use error::{EtfError, EtfResult};
pub use prices::{CsvPriceTable, PriceSource};
pub use types::{Constituent, ErrorResponse, EtfReport, Holding, PricePoint, TopHolding};
pub use validator::{validate_holdings, validate_holdings_file};
