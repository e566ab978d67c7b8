//! UI Components
//!
//! The upload form, the three result views and their shared helpers.

pub mod chart;
pub mod constituents;
pub mod etf_prices;
pub mod file_upload;
pub mod loading;
pub mod top_holdings;

pub use constituents::Constituents;
pub use etf_prices::EtfPrices;
pub use file_upload::FileUpload;
pub use top_holdings::TopHoldings;
