//! ETF Monitor Dashboard
//!
//! Single-page dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Upload an ETF holdings CSV
//! - Searchable, sortable constituents table
//! - Top holdings bar chart
//! - ETF price history chart with summary statistics
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It talks to the ETF Monitor API over HTTP. All views read a
//! single [`state::UploadStore`] provided through context.

use leptos::*;

mod api;
mod app;
mod components;
mod format;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
