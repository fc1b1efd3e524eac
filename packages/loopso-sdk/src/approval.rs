//! Allowance and approval helpers
//!
//! The bridge contract pulls tokens with `transferFrom`, so it must be allowed
//! to spend them first. ERC20 approvals are skipped when the existing
//! allowance already covers the amount; ERC721 approvals are always sent.

use alloy::primitives::{Address, TxHash, U256};
use tracing::{debug, info};

use crate::confirmation::wait_for_receipt;
use crate::error::BridgeError;
use crate::ledger::BridgeLedger;
use crate::registry::ChainConfig;
use crate::retry::{with_retry, with_timeout, CallPolicy};

fn approval_failed(token: Address, error: BridgeError) -> BridgeError {
    match error {
        BridgeError::ApprovalFailed { .. } => error,
        other => BridgeError::ApprovalFailed {
            token,
            reason: other.to_string(),
        },
    }
}

/// Make sure `spender` may pull at least `amount` of `token` from the signer
///
/// Returns the approval transaction hash, or `None` if the allowance was
/// already sufficient and nothing was sent.
pub async fn ensure_allowance<L: BridgeLedger + ?Sized>(
    ledger: &L,
    chain: &ChainConfig,
    token: Address,
    spender: Address,
    amount: U256,
    policy: &CallPolicy,
) -> Result<Option<TxHash>, BridgeError> {
    let owner = ledger.signer_address();
    let current = with_retry(&policy.read, "allowance", || {
        ledger.allowance(chain, token, owner, spender)
    })
    .await?;

    if current >= amount {
        debug!(
            token = %token,
            spender = %spender,
            allowance = %current,
            required = %amount,
            "Allowance sufficient, skipping approve"
        );
        return Ok(None);
    }

    info!(
        token = %token,
        spender = %spender,
        allowance = %current,
        required = %amount,
        "Approving bridge to spend tokens"
    );

    let tx_hash = with_timeout(
        "approve",
        policy.submit_timeout,
        ledger.approve(chain, token, spender, amount),
    )
    .await
    .map_err(|e| approval_failed(token, e))?;

    wait_for_receipt(ledger, chain, tx_hash, &policy.confirmation)
        .await
        .map_err(|e| approval_failed(token, e))?;

    Ok(Some(tx_hash))
}

/// Approve `spender` for a single ERC721 token
///
/// Always sends `approve(spender, tokenId)`; there is no pre-check.
pub async fn ensure_nft_approval<L: BridgeLedger + ?Sized>(
    ledger: &L,
    chain: &ChainConfig,
    nft: Address,
    spender: Address,
    token_id: U256,
    policy: &CallPolicy,
) -> Result<TxHash, BridgeError> {
    info!(nft = %nft, spender = %spender, token_id = %token_id, "Approving bridge for NFT");

    let tx_hash = with_timeout(
        "approve",
        policy.submit_timeout,
        ledger.approve_nft(chain, nft, spender, token_id),
    )
    .await
    .map_err(|e| approval_failed(nft, e))?;

    wait_for_receipt(ledger, chain, tx_hash, &policy.confirmation)
        .await
        .map_err(|e| approval_failed(nft, e))?;

    Ok(tx_hash)
}
