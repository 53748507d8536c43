use reqwest::StatusCode;
use thiserror::Error;

/// Message shown to the user for every fetch failure; the detail only goes to the log.
pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch NFTs. Please check the wallet address and try again.";

/// Field-level validation failures for the wallet input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Nothing but whitespace was entered.
    #[error("Please enter a wallet address")]
    Empty,

    /// Neither a `0x` hex address nor an ENS `.eth` name.
    #[error("Invalid wallet address or ENS name")]
    Malformed,
}

/// Failures talking to the NFT indexing service.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No API credential was configured.
    #[error("Indexer API key not configured")]
    MissingApiKey,

    /// The indexer answered with a non-success status.
    #[error("Failed to fetch NFTs: {text}")]
    Status { status: StatusCode, text: String },

    /// Connection, TLS, timeout or body read failure. Never carries the URL,
    /// whose path holds the API key.
    #[error(transparent)]
    Transport(reqwest::Error),

    /// The response body was not the expected JSON shape.
    #[error("malformed indexer response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

impl FetchError {
    pub(crate) fn from_status(status: StatusCode) -> Self {
        let text = status
            .canonical_reason()
            .map(str::to_owned)
            .unwrap_or_else(|| status.as_str().to_owned());
        Self::Status { status, text }
    }

    /// The message the user gets to see for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "Indexer API key not configured",
            _ => FETCH_FAILED_MESSAGE,
        }
    }
}
