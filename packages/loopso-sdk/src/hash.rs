//! Hash computation for attestation IDs
//!
//! The bridge contract identifies an attested token by hashing its original
//! address together with its original chain:
//!
//! ```solidity
//! keccak256(abi.encodePacked(tokenAddress, tokenChain))
//! ```

use alloy::primitives::{Address, B256};
use tiny_keccak::{Hasher, Keccak};

/// Compute keccak256 hash of data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Compute the attestation ID for a token on its original chain
pub fn compute_attestation_id(token_address: Address, token_chain: u64) -> B256 {
    // abi.encodePacked layout: 20 (address) + 32 (uint256) = 52 bytes
    let mut data = [0u8; 52];

    data[0..20].copy_from_slice(token_address.as_slice());

    // uint256 big-endian, u64 occupies the last 8 bytes
    data[44..52].copy_from_slice(&token_chain.to_be_bytes());

    B256::from(keccak256(&data))
}
