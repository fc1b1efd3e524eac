//! Loopso SDK: client library for the Loopso cross-chain bridge
//!
//! - **Client** - [`LoopsoClient`] bridges ERC20 amounts and ERC721 tokens, reads
//!   bridge state and wraps/unwraps native tokens
//! - **Registry** - [`ChainRegistry`] maps chain IDs to deployed bridge contracts
//! - **Ledger** - [`BridgeLedger`] abstracts the chain; [`AlloyLedger`] implements it over JSON-RPC
//! - **Explorer** - [`ExplorerClient`] looks up NFT metadata on a Blockscout explorer
//!
//! ## Usage
//!
//! ```ignore
//! let client = LoopsoClient::connect(SdkConfig::load()?)?;
//! let receipt = client
//!     .bridge_tokens(80001, 4201, token, "1.5", recipient)
//!     .await?;
//! println!("bridged in {}", receipt.tx_hash());
//! ```

pub mod approval;
pub mod client;
pub mod config;
pub mod confirmation;
pub mod error;
pub mod evm;
pub mod explorer;
pub mod hash;
pub mod ledger;
pub mod registry;
pub mod retry;
pub mod types;
pub mod units;

pub use client::LoopsoClient;
pub use config::SdkConfig;
pub use confirmation::ConfirmationConfig;
pub use error::BridgeError;
pub use evm::AlloyLedger;
pub use explorer::{ExplorerClient, NftMetadata, NftMetadataFields};
pub use hash::compute_attestation_id;
pub use ledger::{BridgeCall, BridgeLedger};
pub use registry::{ChainConfig, ChainRegistry};
pub use retry::{CallPolicy, RetryConfig};
pub use types::{
    BridgeAsset, BridgeDirection, BridgeReceipt, BridgeRequest, Fee, TokenAttestation, TokenType,
    TxReceipt, WrappedTokenInfo,
};
pub use units::{from_base_units, to_base_units};
