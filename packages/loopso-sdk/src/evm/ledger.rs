//! JSON-RPC ledger backed by alloy
//!
//! Each call builds a provider for the target chain from its configured RPC
//! URL. `with_recommended_fillers()` populates nonce, gas limit and EIP-1559
//! fees; without it the node rejects the transaction for missing fields.

use alloy::{
    network::EthereumWallet,
    primitives::{Address, TxHash, U256},
    providers::{Provider, ProviderBuilder},
    rpc::types::TransactionReceipt,
    signers::local::PrivateKeySigner,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info};

use super::contracts::{self, IWrappedNative, Loopso, IERC20, IERC721};
use crate::error::BridgeError;
use crate::ledger::{BridgeCall, BridgeLedger};
use crate::registry::ChainConfig;
use crate::types::{TokenAttestation, TokenType, TxReceipt, WrappedTokenInfo};

/// [`BridgeLedger`] that signs with a local private key and talks JSON-RPC
#[derive(Clone)]
pub struct AlloyLedger {
    signer: PrivateKeySigner,
    wallet: EthereumWallet,
}

/// Custom Debug that only shows the signer address.
impl fmt::Debug for AlloyLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlloyLedger")
            .field("address", &self.signer.address())
            .finish()
    }
}

impl AlloyLedger {
    pub fn new(signer: PrivateKeySigner) -> Self {
        let wallet = EthereumWallet::from(signer.clone());
        info!(address = %signer.address(), "Loopso signer initialized");
        Self { signer, wallet }
    }

    /// Create from a hex private key (with or without 0x prefix)
    pub fn from_private_key(private_key: &str) -> Result<Self, BridgeError> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| BridgeError::InvalidRequest(format!("Invalid private key: {}", e)))?;
        Ok(Self::new(signer))
    }

    fn provider(
        &self,
        chain: &ChainConfig,
    ) -> Result<impl Provider<Http<Client>> + Clone, BridgeError> {
        let url: url::Url = chain.rpc_url.parse().map_err(|e| {
            BridgeError::InvalidRequest(format!("Invalid RPC URL for {}: {}", chain.name, e))
        })?;

        Ok(ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(self.wallet.clone())
            .on_http(url))
    }
}

fn u256_to_u64(value: U256, field: &str) -> Result<u64, BridgeError> {
    u64::try_from(value)
        .map_err(|_| BridgeError::Decode(format!("{} does not fit in u64: {}", field, value)))
}

impl TryFrom<contracts::TokenAttestation> for TokenAttestation {
    type Error = BridgeError;

    fn try_from(raw: contracts::TokenAttestation) -> Result<Self, Self::Error> {
        Ok(TokenAttestation {
            token_address: raw.tokenAddress,
            token_chain: u256_to_u64(raw.tokenChain, "tokenChain")?,
            token_type: TokenType::try_from(raw.tokenType)?,
            decimals: raw.decimals,
            symbol: raw.symbol,
            name: raw.name,
            wrapped_token_address: raw.wrappedTokenAddress,
        })
    }
}

/// Convert an RPC receipt, picking up the transfer ID from `TokensBridged`
fn convert_receipt(receipt: &TransactionReceipt, bridge: Address) -> TxReceipt {
    let transfer_id = receipt
        .inner
        .logs()
        .iter()
        .filter(|log| log.address() == bridge)
        .find_map(|log| log.log_decode::<Loopso::TokensBridged>().ok())
        .map(|decoded| decoded.inner.data.transferID);

    TxReceipt {
        tx_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        success: receipt.status(),
        transfer_id,
    }
}

#[async_trait]
impl BridgeLedger for AlloyLedger {
    fn signer_address(&self) -> Address {
        self.signer.address()
    }

    async fn allowance(
        &self,
        chain: &ChainConfig,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, BridgeError> {
        let provider = self.provider(chain)?;
        let erc20 = IERC20::new(token, &provider);

        let allowance = erc20
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| BridgeError::from_contract("allowance", e))?;

        Ok(allowance._0)
    }

    async fn get_approved(
        &self,
        chain: &ChainConfig,
        nft: Address,
        token_id: U256,
    ) -> Result<Address, BridgeError> {
        let provider = self.provider(chain)?;
        let erc721 = IERC721::new(nft, &provider);

        let approved = erc721
            .getApproved(token_id)
            .call()
            .await
            .map_err(|e| BridgeError::from_contract("getApproved", e))?;

        Ok(approved._0)
    }

    async fn token_uri(
        &self,
        chain: &ChainConfig,
        nft: Address,
        token_id: U256,
    ) -> Result<String, BridgeError> {
        let provider = self.provider(chain)?;
        let erc721 = IERC721::new(nft, &provider);

        let uri = erc721
            .tokenURI(token_id)
            .call()
            .await
            .map_err(|e| BridgeError::from_contract("tokenURI", e))?;

        Ok(uri._0)
    }

    async fn is_token_supported(
        &self,
        chain: &ChainConfig,
        token: Address,
        token_chain: u64,
    ) -> Result<bool, BridgeError> {
        let provider = self.provider(chain)?;
        let loopso = Loopso::new(chain.loopso_address, &provider);

        let supported = loopso
            .isTokenSupported(token, U256::from(token_chain))
            .call()
            .await
            .map_err(|e| BridgeError::from_contract("isTokenSupported", e))?;

        Ok(supported._0)
    }

    async fn supported_tokens_len(&self, chain: &ChainConfig) -> Result<U256, BridgeError> {
        let provider = self.provider(chain)?;
        let loopso = Loopso::new(chain.loopso_address, &provider);

        let len = loopso
            .getSupportedTokensLength()
            .call()
            .await
            .map_err(|e| BridgeError::from_contract("getSupportedTokensLength", e))?;

        Ok(len._0)
    }

    async fn all_supported_tokens(
        &self,
        chain: &ChainConfig,
    ) -> Result<Vec<TokenAttestation>, BridgeError> {
        let provider = self.provider(chain)?;
        let loopso = Loopso::new(chain.loopso_address, &provider);

        let tokens = loopso
            .getAllSupportedTokens()
            .call()
            .await
            .map_err(|e| BridgeError::from_contract("getAllSupportedTokens", e))?;

        tokens._0.into_iter().map(TokenAttestation::try_from).collect()
    }

    async fn wrapped_token_info(
        &self,
        chain: &ChainConfig,
        token: Address,
    ) -> Result<WrappedTokenInfo, BridgeError> {
        let provider = self.provider(chain)?;
        let loopso = Loopso::new(chain.loopso_address, &provider);

        let info = loopso
            .wrappedTokenInfo(token)
            .call()
            .await
            .map_err(|e| BridgeError::from_contract("wrappedTokenInfo", e))?;

        Ok(WrappedTokenInfo {
            token_address: info.tokenAddress,
            token_chain: u256_to_u64(info.tokenChain, "tokenChain")?,
            token_type: info.tokenType,
            decimals: info.decimals,
            symbol: info.symbol,
            name: info.name,
            wrapped_token_address: info.wrappedTokenAddress,
        })
    }

    async fn fee(&self, chain: &ChainConfig, token_type: TokenType) -> Result<U256, BridgeError> {
        let provider = self.provider(chain)?;
        let loopso = Loopso::new(chain.loopso_address, &provider);

        let fee = match token_type {
            TokenType::Fungible => loopso
                .feeFungible()
                .call()
                .await
                .map_err(|e| BridgeError::from_contract("feeFungible", e))?
                ._0,
            TokenType::NonFungible => loopso
                .feeNonFungible()
                .call()
                .await
                .map_err(|e| BridgeError::from_contract("feeNonFungible", e))?
                ._0,
        };

        Ok(fee)
    }

    async fn approve(
        &self,
        chain: &ChainConfig,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, BridgeError> {
        let provider = self.provider(chain)?;
        let erc20 = IERC20::new(token, &provider);

        let pending = erc20
            .approve(spender, amount)
            .send()
            .await
            .map_err(|e| BridgeError::from_contract("approve", e))?;

        let tx_hash = *pending.tx_hash();
        info!(
            tx_hash = %tx_hash,
            chain = %chain.name,
            token = %token,
            spender = %spender,
            amount = %amount,
            "ERC20 approve sent"
        );
        Ok(tx_hash)
    }

    async fn approve_nft(
        &self,
        chain: &ChainConfig,
        nft: Address,
        spender: Address,
        token_id: U256,
    ) -> Result<TxHash, BridgeError> {
        let provider = self.provider(chain)?;
        let erc721 = IERC721::new(nft, &provider);

        let pending = erc721
            .approve(spender, token_id)
            .send()
            .await
            .map_err(|e| BridgeError::from_contract("approve", e))?;

        let tx_hash = *pending.tx_hash();
        info!(
            tx_hash = %tx_hash,
            chain = %chain.name,
            nft = %nft,
            token_id = %token_id,
            "ERC721 approve sent"
        );
        Ok(tx_hash)
    }

    async fn submit_bridge(
        &self,
        chain: &ChainConfig,
        call: BridgeCall,
    ) -> Result<TxHash, BridgeError> {
        let provider = self.provider(chain)?;
        let loopso = Loopso::new(chain.loopso_address, &provider);
        let method = call.method();

        debug!(chain = %chain.name, method = method, call = ?call, "Submitting bridge call");

        let sent = match call {
            BridgeCall::Tokens {
                token,
                amount,
                dst_chain,
                dst_address,
            } => {
                loopso
                    .bridgeTokens(token, amount, U256::from(dst_chain), dst_address)
                    .send()
                    .await
            }
            BridgeCall::TokensBack {
                amount,
                to,
                attestation_id,
            } => {
                loopso
                    .bridgeTokensBack(amount, to, attestation_id)
                    .send()
                    .await
            }
            BridgeCall::NonFungibleTokens {
                token,
                token_id,
                token_uri,
                dst_chain,
                dst_address,
            } => {
                loopso
                    .bridgeNonFungibleTokens(
                        token,
                        token_id,
                        token_uri,
                        U256::from(dst_chain),
                        dst_address,
                    )
                    .send()
                    .await
            }
            BridgeCall::NonFungibleTokensBack {
                token_id,
                to,
                attestation_id,
            } => {
                loopso
                    .bridgeNonFungibleTokensBack(token_id, to, attestation_id)
                    .send()
                    .await
            }
        };

        let pending = sent.map_err(|e| BridgeError::from_contract(method, e))?;
        let tx_hash = *pending.tx_hash();
        info!(tx_hash = %tx_hash, chain = %chain.name, method = method, "Bridge transaction sent");
        Ok(tx_hash)
    }

    async fn deposit_native(
        &self,
        chain: &ChainConfig,
        wrapped: Address,
        amount: U256,
    ) -> Result<TxHash, BridgeError> {
        let provider = self.provider(chain)?;
        let weth = IWrappedNative::new(wrapped, &provider);

        let pending = weth
            .deposit()
            .value(amount)
            .send()
            .await
            .map_err(|e| BridgeError::from_contract("deposit", e))?;

        let tx_hash = *pending.tx_hash();
        info!(tx_hash = %tx_hash, chain = %chain.name, amount = %amount, "Wrap native sent");
        Ok(tx_hash)
    }

    async fn withdraw_native(
        &self,
        chain: &ChainConfig,
        wrapped: Address,
        amount: U256,
    ) -> Result<TxHash, BridgeError> {
        let provider = self.provider(chain)?;
        let weth = IWrappedNative::new(wrapped, &provider);

        let pending = weth
            .withdraw(amount)
            .send()
            .await
            .map_err(|e| BridgeError::from_contract("withdraw", e))?;

        let tx_hash = *pending.tx_hash();
        info!(tx_hash = %tx_hash, chain = %chain.name, amount = %amount, "Unwrap native sent");
        Ok(tx_hash)
    }

    async fn receipt(
        &self,
        chain: &ChainConfig,
        tx_hash: TxHash,
    ) -> Result<Option<TxReceipt>, BridgeError> {
        let provider = self.provider(chain)?;

        let receipt = provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| BridgeError::from_transport("eth_getTransactionReceipt", e))?;

        Ok(receipt.map(|r| convert_receipt(&r, chain.loopso_address)))
    }
}
