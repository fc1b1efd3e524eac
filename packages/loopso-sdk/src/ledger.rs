//! Remote ledger abstraction
//!
//! [`BridgeLedger`] is the set of on-chain reads and writes the bridge client
//! needs. [`crate::evm::AlloyLedger`] implements it over JSON-RPC; tests plug
//! in an in-memory ledger.
//!
//! Submitting methods return as soon as the node accepts the transaction.
//! Waiting for the receipt is done by the caller through [`BridgeLedger::receipt`].

use alloy::primitives::{Address, TxHash, B256, U256};
use async_trait::async_trait;

use crate::error::BridgeError;
use crate::registry::ChainConfig;
use crate::types::{TokenAttestation, TokenType, TxReceipt, WrappedTokenInfo};

/// A transfer-triggering call on the Loopso contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    /// `bridgeTokens(token, amount, dstChain, dstAddress)`
    Tokens {
        token: Address,
        amount: U256,
        dst_chain: u64,
        dst_address: Address,
    },
    /// `bridgeTokensBack(amount, to, attestationID)`
    TokensBack {
        amount: U256,
        to: Address,
        attestation_id: B256,
    },
    /// `bridgeNonFungibleTokens(token, tokenID, tokenURI, dstChain, dstAddress)`
    NonFungibleTokens {
        token: Address,
        token_id: U256,
        token_uri: String,
        dst_chain: u64,
        dst_address: Address,
    },
    /// `bridgeNonFungibleTokensBack(tokenId, to, attestationID)`
    NonFungibleTokensBack {
        token_id: U256,
        to: Address,
        attestation_id: B256,
    },
}

impl BridgeCall {
    /// Contract method name, used for logging and error context
    pub fn method(&self) -> &'static str {
        match self {
            BridgeCall::Tokens { .. } => "bridgeTokens",
            BridgeCall::TokensBack { .. } => "bridgeTokensBack",
            BridgeCall::NonFungibleTokens { .. } => "bridgeNonFungibleTokens",
            BridgeCall::NonFungibleTokensBack { .. } => "bridgeNonFungibleTokensBack",
        }
    }

    /// Whether this call burns a wrapped token
    pub fn is_back(&self) -> bool {
        matches!(
            self,
            BridgeCall::TokensBack { .. } | BridgeCall::NonFungibleTokensBack { .. }
        )
    }
}

/// On-chain operations used by the bridge client
#[async_trait]
pub trait BridgeLedger: Send + Sync {
    /// Address transactions are sent from
    fn signer_address(&self) -> Address;

    // ------------------------------------------------------------------------
    // Token reads
    // ------------------------------------------------------------------------

    /// ERC20 `allowance(owner, spender)`
    async fn allowance(
        &self,
        chain: &ChainConfig,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, BridgeError>;

    /// ERC721 `getApproved(tokenId)`
    async fn get_approved(
        &self,
        chain: &ChainConfig,
        nft: Address,
        token_id: U256,
    ) -> Result<Address, BridgeError>;

    /// ERC721 `tokenURI(tokenId)`
    async fn token_uri(
        &self,
        chain: &ChainConfig,
        nft: Address,
        token_id: U256,
    ) -> Result<String, BridgeError>;

    // ------------------------------------------------------------------------
    // Bridge contract reads
    // ------------------------------------------------------------------------

    async fn is_token_supported(
        &self,
        chain: &ChainConfig,
        token: Address,
        token_chain: u64,
    ) -> Result<bool, BridgeError>;

    async fn supported_tokens_len(&self, chain: &ChainConfig) -> Result<U256, BridgeError>;

    async fn all_supported_tokens(
        &self,
        chain: &ChainConfig,
    ) -> Result<Vec<TokenAttestation>, BridgeError>;

    async fn wrapped_token_info(
        &self,
        chain: &ChainConfig,
        token: Address,
    ) -> Result<WrappedTokenInfo, BridgeError>;

    /// Raw fee value for the token type (basis points or flat native units)
    async fn fee(&self, chain: &ChainConfig, token_type: TokenType) -> Result<U256, BridgeError>;

    // ------------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------------

    /// ERC20 `approve(spender, amount)`
    async fn approve(
        &self,
        chain: &ChainConfig,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, BridgeError>;

    /// ERC721 `approve(spender, tokenId)`
    async fn approve_nft(
        &self,
        chain: &ChainConfig,
        nft: Address,
        spender: Address,
        token_id: U256,
    ) -> Result<TxHash, BridgeError>;

    async fn submit_bridge(
        &self,
        chain: &ChainConfig,
        call: BridgeCall,
    ) -> Result<TxHash, BridgeError>;

    /// Wrapped native `deposit()` with `amount` attached
    async fn deposit_native(
        &self,
        chain: &ChainConfig,
        wrapped: Address,
        amount: U256,
    ) -> Result<TxHash, BridgeError>;

    /// Wrapped native `withdraw(amount)`
    async fn withdraw_native(
        &self,
        chain: &ChainConfig,
        wrapped: Address,
        amount: U256,
    ) -> Result<TxHash, BridgeError>;

    /// Receipt for a transaction, `None` while it is still pending
    async fn receipt(
        &self,
        chain: &ChainConfig,
        tx_hash: TxHash,
    ) -> Result<Option<TxReceipt>, BridgeError>;
}
