//! Common types for bridge operations

use alloy::primitives::{Address, B256, TxHash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BridgeError;
use crate::hash::compute_attestation_id;

// ============================================================================
// Token Types
// ============================================================================

/// Token standard handled by the bridge (matches `ILoopso.TokenType`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    Fungible,
    NonFungible,
}

impl TokenType {
    /// Get the on-chain enum value
    pub fn as_u8(&self) -> u8 {
        match self {
            TokenType::Fungible => 0,
            TokenType::NonFungible => 1,
        }
    }

    /// Parse the on-chain enum value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(TokenType::Fungible),
            1 => Some(TokenType::NonFungible),
            _ => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Fungible => write!(f, "fungible"),
            TokenType::NonFungible => write!(f, "non-fungible"),
        }
    }
}

impl TryFrom<u8> for TokenType {
    type Error = BridgeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        TokenType::from_u8(value)
            .ok_or_else(|| BridgeError::Decode(format!("Unknown token type: {}", value)))
    }
}

/// Attested token as stored in the bridge contract's registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAttestation {
    /// Token address on its original chain
    pub token_address: Address,
    /// Original chain of the token
    pub token_chain: u64,
    pub token_type: TokenType,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
    /// Wrapped representative on this chain (zero for native tokens)
    pub wrapped_token_address: Address,
}

impl TokenAttestation {
    /// Attestation ID the contract uses to correlate the wrapped token with its origin
    pub fn attestation_id(&self) -> B256 {
        compute_attestation_id(self.token_address, self.token_chain)
    }
}

/// Result of resolving a token against the bridge's wrapped-token table.
///
/// The contract returns an all-zero record for tokens it did not mint, so an
/// empty `name` means the token is not a wrapped representative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedTokenInfo {
    pub token_address: Address,
    pub token_chain: u64,
    pub token_type: u8,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
    pub wrapped_token_address: Address,
}

impl WrappedTokenInfo {
    /// Whether the token is a wrapped asset from another chain
    pub fn is_wrapped(&self) -> bool {
        !self.name.is_empty()
    }

    /// Attestation ID of the original token
    pub fn attestation_id(&self) -> B256 {
        compute_attestation_id(self.token_address, self.token_chain)
    }
}

// ============================================================================
// Bridge Requests
// ============================================================================

/// Direction a token travels through the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeDirection {
    /// Lock on the native chain, mint a wrapped representative on the destination
    Forward,
    /// Burn the wrapped representative, release the original
    Back,
}

impl BridgeDirection {
    /// Pick the direction for a token from its wrapped-token record
    pub fn for_token(info: &WrappedTokenInfo) -> Self {
        if info.is_wrapped() {
            BridgeDirection::Back
        } else {
            BridgeDirection::Forward
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BridgeDirection::Forward => "forward",
            BridgeDirection::Back => "back",
        }
    }
}

impl fmt::Display for BridgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What is being bridged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeAsset {
    /// ERC20 amount as a human-readable decimal string (e.g. "1.5")
    Fungible { amount: String },
    /// ERC721 token; the URI is read from the token contract when not given
    NonFungible {
        token_id: U256,
        token_uri: Option<String>,
    },
}

impl BridgeAsset {
    pub fn token_type(&self) -> TokenType {
        match self {
            BridgeAsset::Fungible { .. } => TokenType::Fungible,
            BridgeAsset::NonFungible { .. } => TokenType::NonFungible,
        }
    }
}

/// A single bridging request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeRequest {
    pub source_chain: u64,
    pub destination_chain: u64,
    pub token_address: Address,
    pub asset: BridgeAsset,
    pub recipient: Address,
}

impl BridgeRequest {
    /// Request to bridge an ERC20 amount
    pub fn fungible(
        source_chain: u64,
        destination_chain: u64,
        token_address: Address,
        amount: impl Into<String>,
        recipient: Address,
    ) -> Self {
        Self {
            source_chain,
            destination_chain,
            token_address,
            asset: BridgeAsset::Fungible {
                amount: amount.into(),
            },
            recipient,
        }
    }

    /// Request to bridge a single ERC721 token
    pub fn non_fungible(
        source_chain: u64,
        destination_chain: u64,
        token_address: Address,
        token_id: U256,
        recipient: Address,
    ) -> Self {
        Self {
            source_chain,
            destination_chain,
            token_address,
            asset: BridgeAsset::NonFungible {
                token_id,
                token_uri: None,
            },
            recipient,
        }
    }

    /// Set the token URI forwarded to the destination chain
    pub fn with_token_uri(mut self, uri: impl Into<String>) -> Self {
        if let BridgeAsset::NonFungible { token_uri, .. } = &mut self.asset {
            *token_uri = Some(uri.into());
        }
        self
    }
}

// ============================================================================
// Fees
// ============================================================================

/// Bridge fee as configured in the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fee {
    /// Percentage of the bridged amount, in basis points
    Fungible { basis_points: U256 },
    /// Flat fee in native units (wei) per bridged token
    NonFungible { flat: U256 },
}

impl Fee {
    /// Interpret a raw contract fee value for the given token type
    pub fn from_raw(token_type: TokenType, raw: U256) -> Self {
        match token_type {
            TokenType::Fungible => Fee::Fungible { basis_points: raw },
            TokenType::NonFungible => Fee::NonFungible { flat: raw },
        }
    }

    /// Fee as a fraction of the amount (fungible) or the raw flat value (non-fungible)
    pub fn value(&self) -> f64 {
        match self {
            Fee::Fungible { basis_points } => u256_to_f64(*basis_points) / 10_000.0,
            Fee::NonFungible { flat } => u256_to_f64(*flat),
        }
    }

    /// Fee charged on `amount` base units
    pub fn apply(&self, amount: U256) -> U256 {
        match self {
            Fee::Fungible { basis_points } => {
                amount.saturating_mul(*basis_points) / U256::from(10_000u64)
            }
            Fee::NonFungible { flat } => *flat,
        }
    }
}

fn u256_to_f64(value: U256) -> f64 {
    let raw: u128 = value.try_into().unwrap_or(u128::MAX);
    raw as f64
}

// ============================================================================
// Receipts
// ============================================================================

/// Confirmed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// Receipt status (false = reverted)
    pub success: bool,
    /// Transfer ID from the `TokensBridged` event, if emitted
    pub transfer_id: Option<B256>,
}

/// Outcome of a bridging request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeReceipt {
    pub direction: BridgeDirection,
    /// Approval sent before bridging (None when the allowance was already sufficient)
    pub approval_tx: Option<TxHash>,
    pub receipt: TxReceipt,
}

impl BridgeReceipt {
    pub fn tx_hash(&self) -> TxHash {
        self.receipt.tx_hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_type_roundtrip() {
        assert_eq!(TokenType::from_u8(0), Some(TokenType::Fungible));
        assert_eq!(TokenType::from_u8(1), Some(TokenType::NonFungible));
        assert_eq!(TokenType::from_u8(2), None);
        assert_eq!(TokenType::NonFungible.as_u8(), 1);
        assert!(TokenType::try_from(9u8).is_err());
    }

    #[test]
    fn test_direction_follows_name() {
        let mut info = WrappedTokenInfo::default();
        assert!(!info.is_wrapped());
        assert_eq!(BridgeDirection::for_token(&info), BridgeDirection::Forward);

        info.name = "Wrapped Lajos".to_string();
        assert!(info.is_wrapped());
        assert_eq!(BridgeDirection::for_token(&info), BridgeDirection::Back);
    }

    #[test]
    fn test_direction_ignores_symbol_and_address() {
        // Only the name decides; a symbol or address without a name is still forward
        let info = WrappedTokenInfo {
            token_address: Address::repeat_byte(0x11),
            token_chain: 80001,
            symbol: "wLJS".to_string(),
            ..Default::default()
        };
        assert_eq!(BridgeDirection::for_token(&info), BridgeDirection::Forward);
    }

    #[test]
    fn test_fungible_fee_is_basis_points() {
        let fee = Fee::from_raw(TokenType::Fungible, U256::from(30u64));
        assert!((fee.value() - 0.003).abs() < f64::EPSILON);

        let fee = Fee::from_raw(TokenType::Fungible, U256::from(10_000u64));
        assert!((fee.value() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_fungible_fee_is_unmodified() {
        let raw = U256::from(1_000_000_000_000_000u64);
        let fee = Fee::from_raw(TokenType::NonFungible, raw);
        assert_eq!(fee, Fee::NonFungible { flat: raw });
        assert_eq!(fee.value(), 1_000_000_000_000_000f64);
        assert_eq!(fee.apply(U256::from(5u64)), raw);
    }

    #[test]
    fn test_fungible_fee_apply() {
        let fee = Fee::Fungible {
            basis_points: U256::from(25u64),
        };
        // 0.25% of 1e18
        assert_eq!(
            fee.apply(U256::from(1_000_000_000_000_000_000u128)),
            U256::from(2_500_000_000_000_000u128)
        );
    }

    #[test]
    fn test_with_token_uri_only_for_nft() {
        let token = Address::repeat_byte(0xaa);
        let to = Address::repeat_byte(0xbb);

        let nft = BridgeRequest::non_fungible(4201, 80001, token, U256::from(7u64), to)
            .with_token_uri("ipfs://meta/7");
        assert_eq!(
            nft.asset,
            BridgeAsset::NonFungible {
                token_id: U256::from(7u64),
                token_uri: Some("ipfs://meta/7".to_string()),
            }
        );

        let ft = BridgeRequest::fungible(4201, 80001, token, "1.5", to).with_token_uri("ignored");
        assert_eq!(
            ft.asset,
            BridgeAsset::Fungible {
                amount: "1.5".to_string()
            }
        );
        assert_eq!(ft.asset.token_type(), TokenType::Fungible);
    }

    #[test]
    fn test_attestation_id_uses_origin() {
        let info = WrappedTokenInfo {
            token_address: Address::repeat_byte(0x42),
            token_chain: 80001,
            name: "Wrapped".to_string(),
            ..Default::default()
        };
        assert_eq!(
            info.attestation_id(),
            compute_attestation_id(Address::repeat_byte(0x42), 80001)
        );
    }
}
