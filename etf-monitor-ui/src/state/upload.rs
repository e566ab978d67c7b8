//! Upload State
//!
//! Lifecycle of the most recent upload and its datasets.
//!
//! ```text
//! Idle/Fulfilled/Rejected --submit--> Pending
//! Pending --resolve--> Fulfilled
//! Pending --reject---> Rejected
//! any     --reset----> Idle
//! ```
//!
//! Every submit hands out a [`Ticket`]. A response is applied only if its
//! ticket is still current, so a late reply from an upload that was reset
//! or superseded never overwrites newer state.

use leptos::*;
use thiserror::Error;

use super::etf::{Constituent, EtfData, PricePoint, TopHolding, UploadError};
use crate::api;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Pending,
    Fulfilled,
    Rejected,
}

/// State of the last upload. Datasets and error live inside the variants,
/// so they are set and cleared together.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum UploadState {
    #[default]
    Idle,
    Pending,
    Fulfilled(EtfData),
    Rejected(UploadError),
}

impl UploadState {
    pub fn status(&self) -> UploadStatus {
        match self {
            UploadState::Idle => UploadStatus::Idle,
            UploadState::Pending => UploadStatus::Pending,
            UploadState::Fulfilled(_) => UploadStatus::Fulfilled,
            UploadState::Rejected(_) => UploadStatus::Rejected,
        }
    }

    pub fn data(&self) -> Option<&EtfData> {
        match self {
            UploadState::Fulfilled(data) => Some(data),
            _ => None,
        }
    }

    pub fn constituents(&self) -> Option<&[Constituent]> {
        self.data().map(|d| d.constituents.as_slice())
    }

    pub fn top_holdings(&self) -> Option<&[TopHolding]> {
        self.data().map(|d| d.top_holdings.as_slice())
    }

    pub fn etf_prices(&self) -> Option<&[PricePoint]> {
        self.data().map(|d| d.etf_prices.as_slice())
    }

    pub fn error(&self) -> Option<&UploadError> {
        match self {
            UploadState::Rejected(error) => Some(error),
            _ => None,
        }
    }
}

/// Identifies one submitted upload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("An upload is already in progress")]
    UploadInFlight,

    #[error("Upload store is no longer available")]
    Disposed,
}

/// Upload state plus the generation of the current upload
#[derive(Clone, Debug, Default)]
pub struct UploadMachine {
    state: UploadState,
    generation: u64,
}

impl UploadMachine {
    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Start an upload. Rejected while another one is pending.
    pub fn submit(&mut self) -> Result<Ticket, StoreError> {
        if self.state == UploadState::Pending {
            return Err(StoreError::UploadInFlight);
        }

        self.generation = self.generation.wrapping_add(1);
        self.state = UploadState::Pending;
        Ok(Ticket(self.generation))
    }

    /// Whether a response for `ticket` would still be applied
    pub fn accepts(&self, ticket: Ticket) -> bool {
        self.state == UploadState::Pending && ticket.0 == self.generation
    }

    pub fn resolve(&mut self, ticket: Ticket, data: EtfData) -> bool {
        self.settle(ticket, Ok(data))
    }

    pub fn reject(&mut self, ticket: Ticket, error: UploadError) -> bool {
        self.settle(ticket, Err(error))
    }

    /// Apply an upload outcome. Returns false for stale tickets.
    pub fn settle(&mut self, ticket: Ticket, result: Result<EtfData, UploadError>) -> bool {
        if !self.accepts(ticket) {
            return false;
        }

        self.state = match result {
            Ok(data) => UploadState::Fulfilled(data),
            Err(error) => UploadState::Rejected(error),
        };
        true
    }

    /// Back to Idle from any state; outstanding tickets become stale
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.state = UploadState::Idle;
    }
}

/// Reactive upload store shared through context
#[derive(Clone, Copy)]
pub struct UploadStore {
    machine: RwSignal<UploadMachine>,
}

impl Default for UploadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadStore {
    pub fn new() -> Self {
        Self {
            machine: create_rw_signal(UploadMachine::default()),
        }
    }

    /// Read the current state, subscribing the caller to changes
    pub fn with_state<R>(&self, f: impl FnOnce(&UploadState) -> R) -> R {
        self.machine.with(|m| f(m.state()))
    }

    pub fn status(&self) -> UploadStatus {
        self.with_state(UploadState::status)
    }

    pub fn is_pending(&self) -> bool {
        self.status() == UploadStatus::Pending
    }

    /// Move to Pending and hand out the ticket for this upload
    pub fn begin(&self) -> Result<Ticket, StoreError> {
        self.machine
            .try_update(|m| m.submit())
            .unwrap_or(Err(StoreError::Disposed))
    }

    /// Apply an outcome. Stale tickets leave the state and its subscribers alone.
    pub fn settle(&self, ticket: Ticket, result: Result<EtfData, UploadError>) -> bool {
        let current = self
            .machine
            .try_with_untracked(|m| m.accepts(ticket))
            .unwrap_or(false);
        if !current {
            return false;
        }

        self.machine
            .try_update(|m| m.settle(ticket, result))
            .unwrap_or(false)
    }

    pub fn reset(&self) {
        self.machine.update(UploadMachine::reset);
    }

    /// Start uploading `file`: Pending now, settled when the call returns
    pub fn submit(&self, file: web_sys::File) -> Result<(), StoreError> {
        let ticket = self.begin()?;
        let store = *self;

        spawn_local(async move {
            let result = match api::read_file(&file).await {
                Ok(request) => api::upload_etf(&request).await,
                Err(e) => Err(e),
            };

            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Upload failed: {}", e).into());
            }

            if !store.settle(ticket, result) {
                web_sys::console::log_1(&"Discarding response from a superseded upload".into());
            }
        });

        Ok(())
    }
}

/// Create the upload store and provide it to the component tree
pub fn provide_upload_store() -> UploadStore {
    let store = UploadStore::new();
    provide_context(store);
    store
}

pub fn use_upload_store() -> UploadStore {
    use_context::<UploadStore>().expect("UploadStore not found")
}
