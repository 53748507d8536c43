use reqwest::header::ACCEPT;
use tokio::sync::mpsc::Sender;
use tracing::{debug, error, info, instrument};

use crate::address::WalletId;
use crate::collection::{Collection, OwnedNftsResponse};
use crate::config::IndexerConfig;
use crate::error::FetchError;
use crate::session::FetchTicket;

/// Client for the hosted NFT indexer's owned-NFTs endpoint.
#[derive(Debug, Clone)]
pub struct IndexerClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl IndexerClient {
    pub fn new(cfg: &IndexerConfig, api_key: impl Into<String>) -> Result<Self, FetchError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FetchError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            api_key,
        })
    }

    /// Reads the key from the config/environment and builds the client.
    pub fn from_config(cfg: &IndexerConfig) -> Result<Self, FetchError> {
        let key = cfg.resolve_api_key()?;
        Self::new(cfg, key)
    }

    fn endpoint(&self) -> String {
        format!("{}/{}/getNFTs", self.base_url, self.api_key)
    }

    /// One request for everything `owner` holds, spam excluded, metadata included.
    #[instrument(skip(self, owner), fields(owner = %owner))]
    pub async fn fetch_collection(&self, owner: &WalletId) -> Result<Collection, FetchError> {
        let result = self.request(owner).await;
        match &result {
            Ok(collection) => info!(
                displayed = collection.len(),
                total = collection.total_count,
                "fetched collection"
            ),
            Err(err) => error!(error = %err, "error fetching NFTs"),
        }
        result
    }

    async fn request(&self, owner: &WalletId) -> Result<Collection, FetchError> {
        let response = self
            .http
            .get(self.endpoint())
            .query(&[
                ("owner", owner.as_str()),
                ("withMetadata", "true"),
                ("excludeFilters", "SPAM"),
            ])
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "indexer responded");
        if !status.is_success() {
            return Err(FetchError::from_status(status));
        }

        let body = response.bytes().await?;
        let parsed: OwnedNftsResponse = serde_json::from_slice(&body)?;
        if let Some(reported) = parsed.total_count {
            debug!(reported, returned = parsed.owned_nfts.len(), "indexer counts");
        }
        Ok(Collection::from_response(owner.clone(), parsed))
    }
}

/// Runs one fetch and reports it tagged with its ticket; the session decides whether it is still wanted.
pub async fn run(
    client: IndexerClient,
    ticket: FetchTicket,
    results: Sender<(FetchTicket, Result<Collection, FetchError>)>,
) {
    let result = client.fetch_collection(ticket.wallet()).await;
    if results.send((ticket, result)).await.is_err() {
        debug!("fetch result dropped; receiver gone");
    }
}
