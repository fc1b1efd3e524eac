//! Loopso bridge client
//!
//! [`LoopsoClient`] turns a [`BridgeRequest`] into the contract calls that
//! move the asset: resolve the source chain, scale the amount, decide the
//! direction from the wrapped-token table, approve the bridge, submit and wait
//! for the receipt.

use alloy::primitives::{Address, U256};
use tracing::{debug, info};

use crate::approval::{ensure_allowance, ensure_nft_approval};
use crate::config::SdkConfig;
use crate::confirmation::wait_for_receipt;
use crate::error::BridgeError;
use crate::evm::AlloyLedger;
use crate::ledger::{BridgeCall, BridgeLedger};
use crate::registry::{ChainConfig, ChainRegistry};
use crate::retry::{with_retry, with_timeout, CallPolicy};
use crate::types::{
    BridgeAsset, BridgeDirection, BridgeReceipt, BridgeRequest, Fee, TokenAttestation, TokenType,
    TxReceipt, WrappedTokenInfo,
};
use crate::units::to_base_units;

/// Request asset with the amount already in base units
enum ScaledAsset {
    Amount(U256),
    Nft {
        token_id: U256,
        token_uri: Option<String>,
    },
}

/// Client for the Loopso bridge contracts
pub struct LoopsoClient<L = AlloyLedger> {
    ledger: L,
    registry: ChainRegistry,
    policy: CallPolicy,
}

impl LoopsoClient<AlloyLedger> {
    /// Build a client that signs with the configured key and talks JSON-RPC
    pub fn connect(config: SdkConfig) -> Result<Self, BridgeError> {
        let ledger = AlloyLedger::from_private_key(config.private_key())?;
        info!(
            signer = %ledger.signer_address(),
            chains = ?config.registry.chain_ids(),
            "Loopso client ready"
        );
        Ok(Self::new(ledger, config.registry).with_policy(config.policy))
    }
}

impl<L: BridgeLedger> LoopsoClient<L> {
    pub fn new(ledger: L, registry: ChainRegistry) -> Self {
        Self {
            ledger,
            registry,
            policy: CallPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: CallPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn policy(&self) -> &CallPolicy {
        &self.policy
    }

    // ========================================================================
    // Bridging
    // ========================================================================

    /// Bridge an ERC20 amount or a single ERC721 token
    pub async fn bridge(&self, request: &BridgeRequest) -> Result<BridgeReceipt, BridgeError> {
        let chain = self.registry.require(request.source_chain)?;

        if request.source_chain == request.destination_chain {
            return Err(BridgeError::InvalidRequest(format!(
                "source and destination chain are both {}",
                request.source_chain
            )));
        }
        if request.recipient.is_zero() {
            return Err(BridgeError::InvalidRequest(
                "recipient is the zero address".to_string(),
            ));
        }

        // Scale before any network call so a bad amount costs nothing
        let asset = match &request.asset {
            BridgeAsset::Fungible { amount } => {
                let scaled = to_base_units(amount, chain.decimals)?;
                if scaled.is_zero() {
                    return Err(BridgeError::InvalidAmount {
                        amount: amount.clone(),
                        reason: "amount must be greater than zero".to_string(),
                    });
                }
                ScaledAsset::Amount(scaled)
            }
            BridgeAsset::NonFungible {
                token_id,
                token_uri,
            } => ScaledAsset::Nft {
                token_id: *token_id,
                token_uri: token_uri.clone(),
            },
        };

        let info = self.wrapped_info(chain, request.token_address).await?;
        let direction = BridgeDirection::for_token(&info);

        info!(
            source = %chain.name,
            destination = request.destination_chain,
            token = %request.token_address,
            token_type = %request.asset.token_type(),
            direction = %direction,
            "Bridging"
        );

        if direction == BridgeDirection::Forward {
            let supported = self
                .read("isTokenSupported", || {
                    self.ledger
                        .is_token_supported(chain, request.token_address, chain.chain_id)
                })
                .await?;
            if !supported {
                return Err(BridgeError::UnsupportedToken {
                    token: request.token_address,
                    chain_id: chain.chain_id,
                });
            }
        }

        let (approval_tx, call) = match asset {
            ScaledAsset::Amount(amount) => {
                let approval_tx = ensure_allowance(
                    &self.ledger,
                    chain,
                    request.token_address,
                    chain.loopso_address,
                    amount,
                    &self.policy,
                )
                .await?;

                let call = match direction {
                    BridgeDirection::Forward => BridgeCall::Tokens {
                        token: request.token_address,
                        amount,
                        dst_chain: request.destination_chain,
                        dst_address: request.recipient,
                    },
                    BridgeDirection::Back => BridgeCall::TokensBack {
                        amount,
                        to: request.recipient,
                        attestation_id: info.attestation_id(),
                    },
                };
                (approval_tx, call)
            }
            ScaledAsset::Nft {
                token_id,
                token_uri,
            } => {
                let approval_tx = ensure_nft_approval(
                    &self.ledger,
                    chain,
                    request.token_address,
                    chain.loopso_address,
                    token_id,
                    &self.policy,
                )
                .await?;

                let call = match direction {
                    BridgeDirection::Forward => {
                        let token_uri = match token_uri {
                            Some(uri) => uri,
                            None => {
                                self.get_token_uri(chain.chain_id, request.token_address, token_id)
                                    .await?
                            }
                        };
                        BridgeCall::NonFungibleTokens {
                            token: request.token_address,
                            token_id,
                            token_uri,
                            dst_chain: request.destination_chain,
                            dst_address: request.recipient,
                        }
                    }
                    BridgeDirection::Back => BridgeCall::NonFungibleTokensBack {
                        token_id,
                        to: request.recipient,
                        attestation_id: info.attestation_id(),
                    },
                };
                (Some(approval_tx), call)
            }
        };

        let receipt = self.submit(chain, call).await?;

        Ok(BridgeReceipt {
            direction,
            approval_tx,
            receipt,
        })
    }

    /// Bridge `amount` (human-readable, e.g. "1.5") of an ERC20 token
    pub async fn bridge_tokens(
        &self,
        source_chain: u64,
        destination_chain: u64,
        token: Address,
        amount: &str,
        recipient: Address,
    ) -> Result<BridgeReceipt, BridgeError> {
        let request =
            BridgeRequest::fungible(source_chain, destination_chain, token, amount, recipient);
        self.bridge(&request).await
    }

    /// Bridge a single ERC721 token; the URI is read from the token when `None`
    pub async fn bridge_non_fungible_tokens(
        &self,
        source_chain: u64,
        destination_chain: u64,
        token: Address,
        token_id: U256,
        token_uri: Option<String>,
        recipient: Address,
    ) -> Result<BridgeReceipt, BridgeError> {
        let mut request =
            BridgeRequest::non_fungible(source_chain, destination_chain, token, token_id, recipient);
        if let Some(uri) = token_uri {
            request = request.with_token_uri(uri);
        }
        self.bridge(&request).await
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn is_token_supported(
        &self,
        chain_id: u64,
        token: Address,
        token_chain: u64,
    ) -> Result<bool, BridgeError> {
        let chain = self.registry.require(chain_id)?;
        self.read("isTokenSupported", || {
            self.ledger.is_token_supported(chain, token, token_chain)
        })
        .await
    }

    pub async fn get_all_supported_tokens(
        &self,
        chain_id: u64,
    ) -> Result<Vec<TokenAttestation>, BridgeError> {
        let chain = self.registry.require(chain_id)?;
        self.read("getAllSupportedTokens", || self.ledger.all_supported_tokens(chain))
            .await
    }

    pub async fn get_supported_tokens_len(&self, chain_id: u64) -> Result<U256, BridgeError> {
        let chain = self.registry.require(chain_id)?;
        self.read("getSupportedTokensLength", || {
            self.ledger.supported_tokens_len(chain)
        })
        .await
    }

    /// Bridge fee for the given token type
    pub async fn get_fee(&self, chain_id: u64, token_type: TokenType) -> Result<Fee, BridgeError> {
        let chain = self.registry.require(chain_id)?;
        let raw = self
            .read("fee", || self.ledger.fee(chain, token_type))
            .await?;
        Ok(Fee::from_raw(token_type, raw))
    }

    /// Resolve whether `token` is a wrapped representative minted by the bridge
    pub async fn get_wrapped_token_info(
        &self,
        chain_id: u64,
        token: Address,
    ) -> Result<WrappedTokenInfo, BridgeError> {
        let chain = self.registry.require(chain_id)?;
        self.wrapped_info(chain, token).await
    }

    /// Signer's ERC20 allowance for the chain's bridge contract
    pub async fn get_allowance(&self, chain_id: u64, token: Address) -> Result<U256, BridgeError> {
        let chain = self.registry.require(chain_id)?;
        let owner = self.ledger.signer_address();
        self.read("allowance", || {
            self.ledger
                .allowance(chain, token, owner, chain.loopso_address)
        })
        .await
    }

    /// Whether the bridge contract is approved for a single ERC721 token
    pub async fn is_nft_approved(
        &self,
        chain_id: u64,
        nft: Address,
        token_id: U256,
    ) -> Result<bool, BridgeError> {
        let chain = self.registry.require(chain_id)?;
        let approved = self
            .read("getApproved", || self.ledger.get_approved(chain, nft, token_id))
            .await?;
        Ok(approved == chain.loopso_address)
    }

    pub async fn get_token_uri(
        &self,
        chain_id: u64,
        nft: Address,
        token_id: U256,
    ) -> Result<String, BridgeError> {
        let chain = self.registry.require(chain_id)?;
        self.read("tokenURI", || self.ledger.token_uri(chain, nft, token_id))
            .await
    }

    // ========================================================================
    // Native wrapping
    // ========================================================================

    /// Wrap `amount` native units by calling `deposit()` on the chain's wrapped-native contract
    pub async fn wrap_native(&self, chain_id: u64, amount: U256) -> Result<TxReceipt, BridgeError> {
        let (chain, wrapped) = self.wrapped_native(chain_id)?;
        info!(chain = %chain.name, wrapped = %wrapped, amount = %amount, "Wrapping native");

        let tx_hash = with_timeout(
            "deposit",
            self.policy.submit_timeout,
            self.ledger.deposit_native(chain, wrapped, amount),
        )
        .await?;
        wait_for_receipt(&self.ledger, chain, tx_hash, &self.policy.confirmation).await
    }

    /// Unwrap `amount` base units by calling `withdraw(amount)`
    pub async fn unwrap_native(
        &self,
        chain_id: u64,
        amount: U256,
    ) -> Result<TxReceipt, BridgeError> {
        let (chain, wrapped) = self.wrapped_native(chain_id)?;
        info!(chain = %chain.name, wrapped = %wrapped, amount = %amount, "Unwrapping native");

        let tx_hash = with_timeout(
            "withdraw",
            self.policy.submit_timeout,
            self.ledger.withdraw_native(chain, wrapped, amount),
        )
        .await?;
        wait_for_receipt(&self.ledger, chain, tx_hash, &self.policy.confirmation).await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn wrapped_native(&self, chain_id: u64) -> Result<(&ChainConfig, Address), BridgeError> {
        let chain = self.registry.require(chain_id)?;
        let wrapped = chain
            .wrapped_native_address
            .ok_or(BridgeError::NoWrappedNative { chain_id })?;
        Ok((chain, wrapped))
    }

    async fn wrapped_info(
        &self,
        chain: &ChainConfig,
        token: Address,
    ) -> Result<WrappedTokenInfo, BridgeError> {
        let info = self
            .read("wrappedTokenInfo", || self.ledger.wrapped_token_info(chain, token))
            .await?;
        debug!(
            chain = %chain.name,
            token = %token,
            wrapped = info.is_wrapped(),
            origin_chain = info.token_chain,
            "Resolved wrapped token info"
        );
        Ok(info)
    }

    async fn read<T, F, Fut>(&self, operation: &str, call: F) -> Result<T, BridgeError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, BridgeError>>,
    {
        with_retry(&self.policy.read, operation, call).await
    }

    async fn submit(&self, chain: &ChainConfig, call: BridgeCall) -> Result<TxReceipt, BridgeError> {
        let method = call.method();
        let tx_hash = with_timeout(
            method,
            self.policy.submit_timeout,
            self.ledger.submit_bridge(chain, call),
        )
        .await?;

        let receipt = wait_for_receipt(&self.ledger, chain, tx_hash, &self.policy.confirmation)
            .await?;

        info!(
            tx_hash = %receipt.tx_hash,
            chain = %chain.name,
            method = method,
            transfer_id = ?receipt.transfer_id,
            "Bridge transaction confirmed"
        );
        Ok(receipt)
    }
}
