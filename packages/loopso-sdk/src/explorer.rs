//! NFT metadata lookup through a Blockscout v2 explorer API
//!
//! A lookup is two stages: a free-text search for ERC-721 token contracts,
//! then the instance list of every contract found. Any failed request fails
//! the whole lookup.

use alloy::primitives::Address;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::SdkConfig;
use crate::error::BridgeError;
use crate::retry::{with_retry, RetryConfig};

/// LUKSO testnet Blockscout API
pub const DEFAULT_EXPLORER_URL: &str = "https://api.explorer.execution.testnet.lukso.network/api/v2";

/// Metadata of a single NFT instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftMetadata {
    /// Token ID as reported by the explorer
    pub id: String,
    pub contract_address: Address,
    pub metadata: NftMetadataFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftMetadataFields {
    pub description: Option<String>,
    pub image: Option<String>,
    pub name: Option<String>,
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(rename = "type")]
    kind: Option<String>,
    token_type: Option<String>,
    address: Option<Address>,
    /// Newer Blockscout releases name the field `address_hash`, some send both
    address_hash: Option<Address>,
}

impl SearchItem {
    fn erc721_address(&self) -> Option<Address> {
        match (self.kind.as_deref(), self.token_type.as_deref()) {
            (Some("token"), Some("ERC-721")) => self.address.or(self.address_hash),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Instance {
    id: serde_json::Value,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

fn string_field(metadata: &serde_json::Value, key: &str) -> Option<String> {
    metadata.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

impl Instance {
    fn into_metadata(self, contract_address: Address) -> NftMetadata {
        let id = match self.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        let metadata = self
            .metadata
            .map(|m| NftMetadataFields {
                description: string_field(&m, "description"),
                image: string_field(&m, "image"),
                name: string_field(&m, "name"),
            })
            .unwrap_or_default();

        NftMetadata {
            id,
            contract_address,
            metadata,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Blockscout v2 API client
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    base_url: String,
    client: Client,
    retry: RetryConfig,
}

impl Default for ExplorerClient {
    fn default() -> Self {
        Self::new(DEFAULT_EXPLORER_URL)
    }
}

impl ExplorerClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retry: RetryConfig::default(),
        }
    }

    /// Client for the configured explorer, retrying with the read policy
    pub fn from_config(config: &SdkConfig) -> Self {
        Self::new(&config.explorer_url).with_retry(config.policy.read.clone())
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search for ERC-721 collections matching `query` and list their instances
    pub async fn search_nfts(&self, query: &str) -> Result<Vec<NftMetadata>, BridgeError> {
        let url = format!("{}/search", self.base_url);
        let page: Page<SearchItem> = self.get_json(&url, &[("q", query)]).await?;

        let contracts: Vec<Address> = page
            .items
            .iter()
            .filter_map(SearchItem::erc721_address)
            .collect();

        debug!(
            query = query,
            hits = page.items.len(),
            erc721 = contracts.len(),
            "Explorer search complete"
        );

        let mut nfts = Vec::new();
        for contract in contracts {
            nfts.extend(self.token_instances(contract).await?);
        }
        Ok(nfts)
    }

    /// All instances of one ERC-721 collection (first page)
    pub async fn token_instances(&self, contract: Address) -> Result<Vec<NftMetadata>, BridgeError> {
        let url = format!("{}/tokens/{}/instances", self.base_url, contract);
        let page: Page<Instance> = self.get_json(&url, &[]).await?;

        debug!(contract = %contract, instances = page.items.len(), "Fetched token instances");

        Ok(page
            .items
            .into_iter()
            .map(|instance| instance.into_metadata(contract))
            .collect())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BridgeError> {
        with_retry(&self.retry, url, || async move {
            let response = self
                .client
                .get(url)
                .query(query)
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(|e| BridgeError::NetworkError(format!("GET {}: {}", url, e)))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(status_error(status, message));
            }

            response
                .json::<T>()
                .await
                .map_err(|e| BridgeError::Decode(format!("GET {}: {}", url, e)))
        })
        .await
    }
}

fn status_error(status: StatusCode, message: String) -> BridgeError {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        BridgeError::NetworkError(format!("explorer returned HTTP {}: {}", status, message))
    } else {
        BridgeError::Explorer {
            status: status.as_u16(),
            message,
        }
    }
}
