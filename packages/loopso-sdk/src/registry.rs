//! Chain Registry
//!
//! Maps chain identifiers and bridge-contract addresses to the deployed Loopso
//! contract for that chain, along with the settings needed to talk to it.
//!
//! # Environment Variable Schema
//!
//! ```text
//! LOOPSO_CHAINS_COUNT=2                     # Number of chains (absent = built-in table)
//! LOOPSO_CHAIN_1_NAME=lukso-testnet         # optional, default "chain_{N}"
//! LOOPSO_CHAIN_1_CHAIN_ID=4201
//! LOOPSO_CHAIN_1_RPC_URL=https://rpc.testnet.lukso.network
//! LOOPSO_CHAIN_1_BRIDGE_ADDRESS=0x...
//! LOOPSO_CHAIN_1_DECIMALS=18                # optional, default 18
//! LOOPSO_CHAIN_1_WRAPPED_NATIVE_ADDRESS=0x... # optional
//! ```

use alloy::primitives::{address, Address};
use eyre::{eyre, Result};
use std::collections::{HashMap, HashSet};

use crate::error::BridgeError;

/// Default decimals used to scale human-readable amounts
pub const DEFAULT_DECIMALS: u8 = 18;

/// LUKSO testnet chain ID
pub const LUKSO_TESTNET_CHAIN_ID: u64 = 4201;

/// Polygon Mumbai chain ID
pub const MUMBAI_CHAIN_ID: u64 = 80001;

/// Loopso bridge on LUKSO testnet
pub const LUKSO_TESTNET_BRIDGE: Address = address!("83AE9C9cB7Db728550dC32E40cdF0cB660ba945b");

/// Loopso bridge on Polygon Mumbai
pub const MUMBAI_BRIDGE: Address = address!("f65484Cc0Ae4EBD92Cd6c4eb5fC61F17Edb9f2df");

/// WMATIC on Polygon Mumbai
pub const MUMBAI_WMATIC: Address = address!("9c3C9283D3e44854697Cd22D3Faa240Cfb032889");

// ============================================================================
// URL Validation
// ============================================================================

/// Validates that a URL uses http/https and has a host component.
pub fn validate_rpc_url(url_str: &str, name: &str) -> Result<()> {
    let parsed =
        url::Url::parse(url_str).map_err(|e| eyre!("{} must be a valid URL: {}", name, e))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(eyre!(
            "{} must use http:// or https:// scheme, got {}",
            name,
            scheme
        ));
    }

    if parsed.host_str().is_none() {
        return Err(eyre!("{} must have a host component", name));
    }

    if scheme == "http" {
        tracing::warn!("{} uses unencrypted http://, use https:// in production", name);
    }

    Ok(())
}

// ============================================================================
// Chain Configuration
// ============================================================================

/// A deployed Loopso bridge contract and the chain it lives on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// Human-readable name (e.g., "lukso-testnet", "mumbai")
    pub name: String,
    /// Native EVM chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Loopso bridge contract address
    pub loopso_address: Address,
    /// Wrapped native token contract (WETH9-style), if known
    pub wrapped_native_address: Option<Address>,
    /// Decimals used to scale human-readable amounts on this chain
    pub decimals: u8,
}

impl ChainConfig {
    pub fn lukso_testnet() -> Self {
        Self {
            name: "lukso-testnet".to_string(),
            chain_id: LUKSO_TESTNET_CHAIN_ID,
            rpc_url: "https://rpc.testnet.lukso.network".to_string(),
            loopso_address: LUKSO_TESTNET_BRIDGE,
            wrapped_native_address: None,
            decimals: DEFAULT_DECIMALS,
        }
    }

    pub fn mumbai() -> Self {
        Self {
            name: "mumbai".to_string(),
            chain_id: MUMBAI_CHAIN_ID,
            rpc_url: "https://rpc-mumbai.maticvigil.com".to_string(),
            loopso_address: MUMBAI_BRIDGE,
            wrapped_native_address: Some(MUMBAI_WMATIC),
            decimals: DEFAULT_DECIMALS,
        }
    }

    /// Validate the chain configuration
    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() {
            return Err(eyre!("RPC URL is empty for chain {}", self.name));
        }
        validate_rpc_url(&self.rpc_url, &format!("{}_RPC_URL", self.name))?;

        if self.loopso_address.is_zero() {
            return Err(eyre!("Bridge address is zero for chain {}", self.name));
        }

        if self.chain_id == 0 {
            return Err(eyre!("Chain ID is 0 for chain {}", self.name));
        }

        Ok(())
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Lookup table of deployed bridge contracts
///
/// Lookups by chain ID or bridge address never fail; unknown keys yield `None`.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: Vec<ChainConfig>,
    /// Index by native chain ID → position in `chains`
    chain_id_map: HashMap<u64, usize>,
    /// Index by bridge contract address → position in `chains`
    contract_map: HashMap<Address, usize>,
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ChainRegistry {
    /// Create a registry from a list of chains
    pub fn new(chains: Vec<ChainConfig>) -> Result<Self> {
        let mut chain_id_map = HashMap::new();
        let mut contract_map = HashMap::new();

        for (idx, chain) in chains.iter().enumerate() {
            chain_id_map.insert(chain.chain_id, idx);
            contract_map.insert(chain.loopso_address, idx);
        }

        let registry = Self {
            chains,
            chain_id_map,
            contract_map,
        };

        registry.validate()?;
        Ok(registry)
    }

    /// Registry with the chains Loopso is deployed on
    pub fn builtin() -> Self {
        let chains = vec![ChainConfig::lukso_testnet(), ChainConfig::mumbai()];
        let chain_id_map = chains
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.chain_id, idx))
            .collect();
        let contract_map = chains
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.loopso_address, idx))
            .collect();

        Self {
            chains,
            chain_id_map,
            contract_map,
        }
    }

    /// Get chain config by native EVM chain ID
    pub fn get(&self, chain_id: u64) -> Option<&ChainConfig> {
        self.chain_id_map
            .get(&chain_id)
            .map(|&idx| &self.chains[idx])
    }

    /// Get chain config by bridge contract address
    pub fn get_by_contract(&self, loopso_address: &Address) -> Option<&ChainConfig> {
        self.contract_map
            .get(loopso_address)
            .map(|&idx| &self.chains[idx])
    }

    /// Get chain config by name
    pub fn get_by_name(&self, name: &str) -> Option<&ChainConfig> {
        self.chains.iter().find(|c| c.name == name)
    }

    /// Like [`get`](Self::get), but a miss is an [`BridgeError::UnknownChain`]
    pub fn require(&self, chain_id: u64) -> Result<&ChainConfig, BridgeError> {
        self.get(chain_id)
            .ok_or(BridgeError::UnknownChain { chain_id })
    }

    pub fn chains(&self) -> &[ChainConfig] {
        &self.chains
    }

    /// Get all native chain IDs
    pub fn chain_ids(&self) -> Vec<u64> {
        self.chains.iter().map(|c| c.chain_id).collect()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    fn validate(&self) -> Result<()> {
        if self.chains.is_empty() {
            return Err(eyre!("At least one chain must be configured"));
        }

        let mut seen_ids = HashSet::new();
        let mut seen_contracts = HashSet::new();
        for chain in &self.chains {
            if !seen_ids.insert(chain.chain_id) {
                return Err(eyre!(
                    "Duplicate chain ID: {} (chain: {})",
                    chain.chain_id,
                    chain.name
                ));
            }
            if !seen_contracts.insert(chain.loopso_address) {
                return Err(eyre!(
                    "Duplicate bridge address: {} (chain: {})",
                    chain.loopso_address,
                    chain.name
                ));
            }
            chain.validate()?;
        }

        Ok(())
    }
}

// ============================================================================
// Environment Variable Loading
// ============================================================================

fn parse_address(value: &str, var: &str) -> Result<Address> {
    value
        .trim()
        .parse()
        .map_err(|e| eyre!("Invalid {}: {} ({})", var, value, e))
}

/// Load the registry from environment variables.
///
/// Returns `None` if `LOOPSO_CHAINS_COUNT` is not set or is 0, in which case
/// callers fall back to [`ChainRegistry::builtin`].
///
/// Required env vars per chain:
/// - `LOOPSO_CHAIN_{N}_CHAIN_ID`: native EVM chain ID
/// - `LOOPSO_CHAIN_{N}_RPC_URL`: RPC endpoint
/// - `LOOPSO_CHAIN_{N}_BRIDGE_ADDRESS`: Loopso contract address
///
/// Optional:
/// - `LOOPSO_CHAIN_{N}_NAME`: human-readable name (default: "chain_{N}")
/// - `LOOPSO_CHAIN_{N}_DECIMALS`: amount decimals (default: 18)
/// - `LOOPSO_CHAIN_{N}_WRAPPED_NATIVE_ADDRESS`: wrapped native token contract
pub fn load_from_env() -> Result<Option<ChainRegistry>> {
    let count: usize = match std::env::var("LOOPSO_CHAINS_COUNT") {
        Ok(s) => s
            .trim()
            .parse()
            .map_err(|_| eyre!("Invalid LOOPSO_CHAINS_COUNT, must be a number"))?,
        Err(_) => return Ok(None),
    };

    if count == 0 {
        return Ok(None);
    }

    let mut chains = Vec::with_capacity(count);

    for i in 1..=count {
        let prefix = format!("LOOPSO_CHAIN_{}", i);

        let name =
            std::env::var(format!("{}_NAME", prefix)).unwrap_or_else(|_| format!("chain_{}", i));

        let chain_id: u64 = std::env::var(format!("{}_CHAIN_ID", prefix))
            .map_err(|_| eyre!("Missing {}_CHAIN_ID", prefix))?
            .trim()
            .parse()
            .map_err(|_| eyre!("Invalid {}_CHAIN_ID, must be a u64", prefix))?;

        let rpc_url = std::env::var(format!("{}_RPC_URL", prefix))
            .map_err(|_| eyre!("Missing {}_RPC_URL", prefix))?;

        let bridge_var = format!("{}_BRIDGE_ADDRESS", prefix);
        let loopso_address = std::env::var(&bridge_var)
            .map_err(|_| eyre!("Missing {}", bridge_var))
            .and_then(|s| parse_address(&s, &bridge_var))?;

        let decimals: u8 = match std::env::var(format!("{}_DECIMALS", prefix)) {
            Ok(s) => s
                .trim()
                .parse()
                .map_err(|_| eyre!("Invalid {}_DECIMALS, must be a u8", prefix))?,
            Err(_) => DEFAULT_DECIMALS,
        };

        let wrapped_var = format!("{}_WRAPPED_NATIVE_ADDRESS", prefix);
        let wrapped_native_address = match std::env::var(&wrapped_var) {
            Ok(s) if !s.trim().is_empty() => Some(parse_address(&s, &wrapped_var)?),
            _ => None,
        };

        chains.push(ChainConfig {
            name,
            chain_id,
            rpc_url,
            loopso_address,
            wrapped_native_address,
            decimals,
        });
    }

    Ok(Some(ChainRegistry::new(chains)?))
}

// ============================================================================
// Tests
// ============================================================================
