//! State Management
//!
//! The upload store and the data it holds.

pub mod etf;
pub mod upload;

pub use etf::{Constituent, EtfData, PricePoint, TopHolding, UploadError, UploadRequest};
pub use upload::{provide_upload_store, use_upload_store, UploadState, UploadStatus, UploadStore};
