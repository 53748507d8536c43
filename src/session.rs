//! Lifecycle of the active wallet: validation, loading, and the fetch outcome.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::address::{AddressError, WalletId, normalize_address};
use crate::collection::Collection;
use crate::error::FetchError;

/// What the front end should be showing for the active wallet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Loading {
        wallet: WalletId,
    },
    Failed {
        wallet: WalletId,
        message: String,
    },
    /// The fetch worked but nothing had an image.
    Empty {
        wallet: WalletId,
        total_count: usize,
    },
    Showing(Arc<Collection>),
}

/// Identifies one fetch. Only the newest ticket's result is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    wallet: WalletId,
    generation: u64,
}

impl FetchTicket {
    pub fn wallet(&self) -> &WalletId {
        &self.wallet
    }
}

#[derive(Debug, Default)]
pub struct Session {
    input: String,
    active: Option<WalletId>,
    validation_error: Option<AddressError>,
    generation: u64,
    view: ViewState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn active_wallet(&self) -> Option<&WalletId> {
        self.active.as_ref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn validation_error(&self) -> Option<AddressError> {
        self.validation_error
    }

    /// Validates typed input and, if it passes, starts loading it.
    ///
    /// A rejected input only records the field-level error; the active wallet
    /// and whatever is on screen stay as they were.
    pub fn submit(&mut self, input: &str) -> Result<FetchTicket, AddressError> {
        self.input = input.to_owned();
        match normalize_address(input) {
            Ok(wallet) => {
                self.validation_error = None;
                Ok(self.activate(wallet))
            }
            Err(err) => {
                debug!(error = %err, "wallet input rejected");
                self.validation_error = Some(err);
                Err(err)
            }
        }
    }

    /// The example shortcut: fills the field and loads the fixed wallet.
    pub fn use_example(&mut self) -> FetchTicket {
        let wallet = WalletId::example();
        self.input = wallet.to_string();
        self.validation_error = None;
        self.activate(wallet)
    }

    /// Applies a fetch outcome. Returns `false` when the ticket is stale.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Collection, FetchError>,
    ) -> bool {
        if ticket.generation != self.generation || self.active.as_ref() != Some(&ticket.wallet) {
            warn!(
                wallet = %ticket.wallet,
                "discarding response for a wallet that is no longer active"
            );
            return false;
        }
        let wallet = ticket.wallet.clone();
        self.view = match result {
            Ok(collection) if collection.is_empty() => ViewState::Empty {
                wallet,
                total_count: collection.total_count,
            },
            Ok(collection) => ViewState::Showing(Arc::new(collection)),
            Err(err) => ViewState::Failed {
                wallet,
                message: err.user_message().to_owned(),
            },
        };
        true
    }

    /// "Try another wallet": back to a blank form, any in-flight fetch orphaned.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.input.clear();
        self.active = None;
        self.validation_error = None;
        self.view = ViewState::Idle;
    }

    fn activate(&mut self, wallet: WalletId) -> FetchTicket {
        self.generation += 1;
        info!(%wallet, generation = self.generation, "loading wallet");
        self.active = Some(wallet.clone());
        self.view = ViewState::Loading {
            wallet: wallet.clone(),
        };
        FetchTicket {
            wallet,
            generation: self.generation,
        }
    }
}
