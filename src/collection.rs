//! Gallery items and the normalization of raw indexer records into them.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::address::WalletId;

pub const UNKNOWN_COLLECTION: &str = "Unknown Collection";
pub const UNKNOWN_TOKEN: &str = "unknown";

/// Contract address plus token id; unique within one collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId {
    pub contract_address: String,
    pub token_id: String,
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.contract_address, self.token_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub id: ItemId,
    pub display_name: String,
    pub collection_name: String,
    pub description: Option<String>,
    pub image_url: String,
    pub raw_metadata: Option<Value>,
}

/// Everything displayable that one wallet owns, as returned by one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub owner: WalletId,
    pub items: Vec<GalleryItem>,
    /// Number of records before items without an image were dropped.
    pub total_count: usize,
}

impl Collection {
    /// Maps every raw record, then keeps only the ones with an image, in API order.
    pub fn from_response(owner: WalletId, response: OwnedNftsResponse) -> Self {
        let mapped: Vec<GalleryItem> = response
            .owned_nfts
            .into_iter()
            .map(GalleryItem::from_raw)
            .collect();
        let total_count = mapped.len();
        let items = mapped
            .into_iter()
            .filter(|item| !item.image_url.is_empty())
            .collect();
        Self {
            owner,
            items,
            total_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Body of the indexer's owned-NFTs endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedNftsResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub owned_nfts: Vec<RawNft>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNft {
    #[serde(default, deserialize_with = "lenient")]
    pub token_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawTokenRef>,
    #[serde(default, deserialize_with = "lenient")]
    pub contract: Option<RawContract>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub media: Vec<RawMedia>,
    #[serde(default, deserialize_with = "lenient")]
    pub image: Option<RawImage>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTokenRef {
    #[serde(default, deserialize_with = "lenient")]
    pub token_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContract {
    #[serde(default, deserialize_with = "lenient")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMedia {
    #[serde(default, deserialize_with = "lenient")]
    pub gateway: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub raw: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImage {
    #[serde(default, deserialize_with = "lenient")]
    pub original_url: Option<String>,
}

impl GalleryItem {
    pub fn from_raw(raw: RawNft) -> Self {
        let token_id = first_non_empty([
            raw.token_id.as_deref(),
            raw.id.as_ref().and_then(|id| id.token_id.as_deref()),
        ])
        .unwrap_or(UNKNOWN_TOKEN)
        .to_owned();

        let contract_address = first_non_empty([raw
            .contract
            .as_ref()
            .and_then(|c| c.address.as_deref())])
        .unwrap_or_default()
        .to_owned();

        let collection_name = first_non_empty([
            raw.contract.as_ref().and_then(|c| c.name.as_deref()),
            raw.title.as_deref(),
        ])
        .unwrap_or(UNKNOWN_COLLECTION)
        .to_owned();

        let display_name = first_non_empty([raw.title.as_deref(), raw.name.as_deref()])
            .map(str::to_owned)
            .unwrap_or_else(|| format!("#{token_id}"));

        let metadata_str = |key: &str| {
            raw.metadata
                .as_ref()
                .and_then(|m| m.get(key))
                .and_then(Value::as_str)
        };

        let description = first_non_empty([raw.description.as_deref(), metadata_str("description")])
            .map(str::to_owned);

        let first_media = raw.media.first();
        let image_url = first_non_empty([
            first_media.and_then(|m| m.gateway.as_deref()),
            first_media.and_then(|m| m.raw.as_deref()),
            metadata_str("image"),
            raw.image.as_ref().and_then(|i| i.original_url.as_deref()),
        ])
        .unwrap_or_default()
        .to_owned();

        Self {
            id: ItemId {
                contract_address,
                token_id,
            },
            display_name,
            collection_name,
            description,
            image_url,
            raw_metadata: raw.metadata,
        }
    }
}

fn first_non_empty<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}

/// Anything that does not have the expected shape reads as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

/// Non-arrays read as empty; malformed elements keep their slot as a blank default.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => values
            .into_iter()
            .map(|v| serde_json::from_value(v).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}
