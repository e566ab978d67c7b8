//! API Module
//!
//! HTTP client for the ETF Monitor API.

pub mod client;

pub use client::*;
