//! Shared fixtures for integration tests
//!
//! `FakeLedger` keeps token and bridge state in memory and records every
//! transaction it is asked to send, so tests can assert on what the client
//! submitted.

#![allow(dead_code)]

use alloy::primitives::{Address, TxHash, B256, U256};
use async_trait::async_trait;
use loopso_sdk::{
    BridgeCall, BridgeError, BridgeLedger, CallPolicy, ChainConfig, ChainRegistry,
    ConfirmationConfig, LoopsoClient, RetryConfig, TokenAttestation, TokenType, TxReceipt,
    WrappedTokenInfo,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

pub const LUKSO: u64 = 4201;
pub const MUMBAI: u64 = 80001;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("loopso_sdk=debug")),
        )
        .with_test_writer()
        .try_init();
}

pub fn signer() -> Address {
    Address::repeat_byte(0x5e)
}

pub fn recipient() -> Address {
    Address::repeat_byte(0xbe)
}

pub fn token() -> Address {
    Address::repeat_byte(0x8c)
}

/// Policy with millisecond timeouts so failure paths finish quickly
pub fn fast_policy() -> CallPolicy {
    CallPolicy {
        read: RetryConfig {
            max_retries: 2,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            backoff_multiplier: 2.0,
            attempt_timeout: Duration::from_millis(500),
        },
        submit_timeout: Duration::from_millis(500),
        confirmation: ConfirmationConfig {
            timeout: Duration::from_millis(50),
            poll_interval: Duration::from_millis(1),
        },
    }
}

pub fn client(ledger: FakeLedger) -> LoopsoClient<FakeLedger> {
    init_tracing();
    LoopsoClient::new(ledger, ChainRegistry::builtin()).with_policy(fast_policy())
}

/// A transaction the fake was asked to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    ApproveNft {
        nft: Address,
        spender: Address,
        token_id: U256,
    },
    Bridge(BridgeCall),
    Deposit {
        wrapped: Address,
        amount: U256,
    },
    Withdraw {
        wrapped: Address,
        amount: U256,
    },
}

impl Sent {
    pub fn is_approval(&self) -> bool {
        matches!(self, Sent::Approve { .. } | Sent::ApproveNft { .. })
    }
}

#[derive(Default)]
pub struct LedgerState {
    /// (token, spender) → allowance
    pub allowances: HashMap<(Address, Address), U256>,
    pub wrapped: HashMap<Address, WrappedTokenInfo>,
    /// (token, token chain)
    pub supported: HashSet<(Address, u64)>,
    pub token_uris: HashMap<(Address, U256), String>,
    pub nft_approvals: HashMap<(Address, U256), Address>,
    pub fee_fungible: U256,
    pub fee_non_fungible: U256,
    pub attestations: Vec<TokenAttestation>,

    /// Every contract read, by method name
    pub reads: Vec<&'static str>,
    pub sent: Vec<Sent>,
    /// Sends that fail to mine (receipt status 0), by index into `sent`
    pub revert_sends: HashSet<usize>,
    /// Number of upcoming reads that fail with a transient error
    pub transient_read_failures: u32,
    /// Receipts never become available
    pub never_mine: bool,
    /// Receipt polls hang instead of answering
    pub stall_receipts: bool,
    receipts: HashMap<TxHash, TxReceipt>,
}

pub struct FakeLedger {
    signer: Address,
    state: Mutex<LedgerState>,
}

impl Default for FakeLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeLedger {
    pub fn new() -> Self {
        Self {
            signer: signer(),
            state: Mutex::new(LedgerState::default()),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap()
    }

    /// Mark `token` as bridgeable from `chain`
    pub fn support(self, token: Address, chain: u64) -> Self {
        self.state().supported.insert((token, chain));
        self
    }

    pub fn with_allowance(self, token: Address, spender: Address, amount: U256) -> Self {
        self.state().allowances.insert((token, spender), amount);
        self
    }

    /// Register `token` as a wrapped representative of `origin` on `origin_chain`
    pub fn wrapped(self, token: Address, origin: Address, origin_chain: u64) -> Self {
        self.state().wrapped.insert(
            token,
            WrappedTokenInfo {
                token_address: origin,
                token_chain: origin_chain,
                token_type: 0,
                decimals: 18,
                symbol: "wLJS".to_string(),
                name: "Wrapped Lajos".to_string(),
                wrapped_token_address: token,
            },
        );
        self
    }

    pub fn bridge_calls(&self) -> Vec<BridgeCall> {
        self.state()
            .sent
            .iter()
            .filter_map(|s| match s {
                Sent::Bridge(call) => Some(call.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn approvals(&self) -> Vec<Sent> {
        self.state()
            .sent
            .iter()
            .filter(|s| s.is_approval())
            .cloned()
            .collect()
    }

    fn read(&self, method: &'static str) -> Result<MutexGuard<'_, LedgerState>, BridgeError> {
        let mut state = self.state();
        state.reads.push(method);
        if state.transient_read_failures > 0 {
            state.transient_read_failures -= 1;
            return Err(BridgeError::NetworkError(format!(
                "{}: connection reset by peer",
                method
            )));
        }
        Ok(state)
    }

    fn send(&self, sent: Sent) -> TxHash {
        let mut state = self.state();
        let index = state.sent.len();
        let tx_hash = B256::from(U256::from(index as u64 + 1));
        let success = !state.revert_sends.contains(&index);

        if success {
            if let Sent::Approve {
                token,
                spender,
                amount,
            } = &sent
            {
                state.allowances.insert((*token, *spender), *amount);
            }
            if let Sent::ApproveNft {
                nft,
                spender,
                token_id,
            } = &sent
            {
                state.nft_approvals.insert((*nft, *token_id), *spender);
            }
        }

        let transfer_id = match &sent {
            Sent::Bridge(_) if success => Some(B256::repeat_byte(0xaa)),
            _ => None,
        };
        state.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                block_number: Some(100 + index as u64),
                success,
                transfer_id,
            },
        );
        state.sent.push(sent);
        tx_hash
    }
}

#[async_trait]
impl BridgeLedger for FakeLedger {
    fn signer_address(&self) -> Address {
        self.signer
    }

    async fn allowance(
        &self,
        _chain: &ChainConfig,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, BridgeError> {
        assert_eq!(owner, self.signer);
        let state = self.read("allowance")?;
        Ok(state
            .allowances
            .get(&(token, spender))
            .copied()
            .unwrap_or_default())
    }

    async fn get_approved(
        &self,
        _chain: &ChainConfig,
        nft: Address,
        token_id: U256,
    ) -> Result<Address, BridgeError> {
        let state = self.read("getApproved")?;
        Ok(state
            .nft_approvals
            .get(&(nft, token_id))
            .copied()
            .unwrap_or_default())
    }

    async fn token_uri(
        &self,
        _chain: &ChainConfig,
        nft: Address,
        token_id: U256,
    ) -> Result<String, BridgeError> {
        let state = self.read("tokenURI")?;
        state
            .token_uris
            .get(&(nft, token_id))
            .cloned()
            .ok_or_else(|| BridgeError::Contract("execution failed: nonexistent token".into()))
    }

    async fn is_token_supported(
        &self,
        _chain: &ChainConfig,
        token: Address,
        token_chain: u64,
    ) -> Result<bool, BridgeError> {
        let state = self.read("isTokenSupported")?;
        Ok(state.supported.contains(&(token, token_chain)))
    }

    async fn supported_tokens_len(&self, _chain: &ChainConfig) -> Result<U256, BridgeError> {
        let state = self.read("getSupportedTokensLength")?;
        Ok(U256::from(state.attestations.len()))
    }

    async fn all_supported_tokens(
        &self,
        _chain: &ChainConfig,
    ) -> Result<Vec<TokenAttestation>, BridgeError> {
        let state = self.read("getAllSupportedTokens")?;
        Ok(state.attestations.clone())
    }

    async fn wrapped_token_info(
        &self,
        _chain: &ChainConfig,
        token: Address,
    ) -> Result<WrappedTokenInfo, BridgeError> {
        let state = self.read("wrappedTokenInfo")?;
        Ok(state.wrapped.get(&token).cloned().unwrap_or_default())
    }

    async fn fee(&self, _chain: &ChainConfig, token_type: TokenType) -> Result<U256, BridgeError> {
        let state = self.read("fee")?;
        Ok(match token_type {
            TokenType::Fungible => state.fee_fungible,
            TokenType::NonFungible => state.fee_non_fungible,
        })
    }

    async fn approve(
        &self,
        _chain: &ChainConfig,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, BridgeError> {
        Ok(self.send(Sent::Approve {
            token,
            spender,
            amount,
        }))
    }

    async fn approve_nft(
        &self,
        _chain: &ChainConfig,
        nft: Address,
        spender: Address,
        token_id: U256,
    ) -> Result<TxHash, BridgeError> {
        Ok(self.send(Sent::ApproveNft {
            nft,
            spender,
            token_id,
        }))
    }

    async fn submit_bridge(
        &self,
        _chain: &ChainConfig,
        call: BridgeCall,
    ) -> Result<TxHash, BridgeError> {
        Ok(self.send(Sent::Bridge(call)))
    }

    async fn deposit_native(
        &self,
        _chain: &ChainConfig,
        wrapped: Address,
        amount: U256,
    ) -> Result<TxHash, BridgeError> {
        Ok(self.send(Sent::Deposit { wrapped, amount }))
    }

    async fn withdraw_native(
        &self,
        _chain: &ChainConfig,
        wrapped: Address,
        amount: U256,
    ) -> Result<TxHash, BridgeError> {
        Ok(self.send(Sent::Withdraw { wrapped, amount }))
    }

    async fn receipt(
        &self,
        _chain: &ChainConfig,
        tx_hash: TxHash,
    ) -> Result<Option<TxReceipt>, BridgeError> {
        let stalled = self.state().stall_receipts;
        if stalled {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }

        let state = self.state();
        if state.never_mine {
            return Ok(None);
        }
        Ok(state.receipts.get(&tx_hash).cloned())
    }
}
