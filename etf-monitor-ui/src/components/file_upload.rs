//! File Upload Component
//!
//! Picks one CSV file, checks its name locally and submits it to the
//! upload store. Local validation errors never reach the store.

use leptos::*;

use crate::components::loading::InlineLoading;
use crate::state::{use_upload_store, UploadStatus};

/// Problems caught before anything is sent
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    NotCsv,
    NoFileSelected,
}

impl ValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::NotCsv => "Please select a CSV file",
            ValidationError::NoFileSelected => "Please select a file first",
        }
    }
}

/// Accept only names ending in `.csv` (case-sensitive)
pub fn check_file_name(name: &str) -> Result<(), ValidationError> {
    if name.ends_with(".csv") {
        Ok(())
    } else {
        Err(ValidationError::NotCsv)
    }
}

/// Local form state: the accepted file and the last validation error
///
/// Generic over the file handle so it works without a browser.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadForm<F> {
    selected: Option<F>,
    error: Option<ValidationError>,
}

impl<F> Default for UploadForm<F> {
    fn default() -> Self {
        Self {
            selected: None,
            error: None,
        }
    }
}

impl<F: Clone> UploadForm<F> {
    pub fn selected(&self) -> Option<&F> {
        self.selected.as_ref()
    }

    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    /// A file was picked. A rejected name also drops the previous selection.
    pub fn choose(&mut self, name: &str, file: F) -> Result<(), ValidationError> {
        match check_file_name(name) {
            Ok(()) => {
                self.selected = Some(file);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.selected = None;
                self.error = Some(e);
                Err(e)
            }
        }
    }

    /// The picker closed without a file
    pub fn cancel_choice(&mut self) {
        self.error = None;
    }

    /// File to upload, or `None` with the reason recorded
    pub fn submission(&mut self) -> Option<F> {
        if self.selected.is_none() {
            self.error = Some(ValidationError::NoFileSelected);
        }
        self.selected.clone()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Upload form
#[component]
pub fn FileUpload() -> impl IntoView {
    let store = use_upload_store();

    let form = create_rw_signal(UploadForm::<web_sys::File>::default());
    let input_ref = create_node_ref::<html::Input>();

    let pending = move || store.is_pending();

    let on_change = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);

        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            form.update(UploadForm::cancel_choice);
            return;
        };

        let name = file.name();
        let accepted = form
            .try_update(|f| f.choose(&name, file).is_ok())
            .unwrap_or(false);
        if !accepted {
            input.set_value("");
        }
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let Some(file) = form.try_update(UploadForm::submission).flatten() else {
            return;
        };

        if let Err(e) = store.submit(file) {
            web_sys::console::error_1(&format!("Upload not started: {}", e).into());
        }
    };

    let on_reset = move |_| {
        form.update(UploadForm::reset);
        if let Some(input) = input_ref.get() {
            input.set_value("");
        }
        store.reset();
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"ETF File Upload"</h2>

            <form on:submit=on_submit class="space-y-4">
                <div>
                    <label for="file-input" class="block text-sm text-gray-400 mb-2">
                        "Select CSV File:"
                    </label>
                    <input
                        id="file-input"
                        type="file"
                        accept=".csv"
                        node_ref=input_ref
                        on:change=on_change
                        disabled=pending
                        class="block w-full text-sm text-gray-300 file:mr-4 file:py-2 file:px-4
                               file:rounded-lg file:border-0 file:bg-gray-700 file:text-white"
                    />
                    {move || {
                        form.with(|f| f.selected().cloned()).map(|file| view! {
                            <p class="text-sm text-gray-400 mt-2">"Selected: " {file.name()}</p>
                        })
                    }}
                </div>

                <div class="flex space-x-2">
                    <button
                        type="submit"
                        disabled=pending
                        class="px-4 py-2 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                               disabled:cursor-not-allowed rounded-lg font-medium transition-colors
                               flex items-center space-x-2"
                    >
                        {move || if pending() {
                            view! { <InlineLoading /> <span>"Uploading..."</span> }.into_view()
                        } else {
                            view! { <span>"Upload"</span> }.into_view()
                        }}
                    </button>
                    <button
                        type="button"
                        on:click=on_reset
                        disabled=pending
                        class="px-4 py-2 bg-gray-600 hover:bg-gray-500 disabled:bg-gray-700
                               disabled:cursor-not-allowed rounded-lg font-medium transition-colors"
                    >
                        "Reset"
                    </button>
                </div>
            </form>

            {move || {
                form.with(|f| f.error()).map(|e| view! {
                    <div class="mt-4 bg-red-900/40 border border-red-700 rounded-lg p-4">
                        <h3 class="font-semibold text-red-300">"Validation Error"</h3>
                        <p class="text-sm text-red-200">{e.message()}</p>
                    </div>
                })
            }}

            {move || {
                store.with_state(|s| s.error().cloned()).map(|e| view! {
                    <div class="mt-4 bg-red-900/40 border border-red-700 rounded-lg p-4">
                        <h3 class="font-semibold text-red-300">"Upload Error"</h3>
                        <p class="text-sm text-red-200">{e.error}</p>
                        {e.error_detail.map(|detail| view! {
                            <p class="text-xs text-red-300 mt-1">{detail}</p>
                        })}
                    </div>
                })
            }}

            {move || {
                (store.status() == UploadStatus::Fulfilled).then(|| view! {
                    <div class="mt-4 bg-green-900/40 border border-green-700 rounded-lg p-4">
                        <p class="text-sm text-green-300">"File uploaded successfully!"</p>
                    </div>
                })
            }}
        </section>
    }
}
