//! App Root Component
//!
//! Creates the upload store and lays out the form and the result views.

use leptos::*;

use crate::components::{Constituents, EtfPrices, FileUpload, TopHoldings};
use crate::state::provide_upload_store;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // One store per session, shared with every view
    provide_upload_store();

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            <header class="bg-gray-800 border-b border-gray-700 py-4 px-4">
                <div class="container mx-auto">
                    <h1 class="text-2xl font-bold">"ETF Price Monitor"</h1>
                </div>
            </header>

            <main class="flex-1 container mx-auto px-4 py-8 space-y-8">
                <FileUpload />
                <Constituents />
                <TopHoldings />
                <EtfPrices />
            </main>
        </div>
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn renders_header_and_empty_dashboard() {
        mount_to_body(|| view! { <App /> });

        let body = document().body().map(|b| b.inner_html()).unwrap_or_default();
        assert!(body.contains("ETF Price Monitor"));
        assert!(body.contains("ETF File Upload"));
        // result views stay hidden until an upload succeeds
        assert!(!body.contains("Constituents ("));
        assert!(!body.contains("Top Holdings ("));
    }
}
