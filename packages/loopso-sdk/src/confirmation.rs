//! Transaction confirmation polling

use alloy::primitives::TxHash;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::error::BridgeError;
use crate::ledger::BridgeLedger;
use crate::registry::ChainConfig;
use crate::types::TxReceipt;

/// How long to wait for a transaction to be mined
#[derive(Debug, Clone)]
pub struct ConfirmationConfig {
    /// Overall bound on the wait
    pub timeout: Duration,
    /// Delay between receipt polls
    pub poll_interval: Duration,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Wait for a transaction to be confirmed
///
/// Returns the receipt once mined with a success status. A reverted receipt is
/// a [`BridgeError::TransactionReverted`]; no receipt before the deadline is a
/// [`BridgeError::Timeout`]. Transient RPC failures while polling are logged
/// and polling continues.
pub async fn wait_for_receipt<L: BridgeLedger + ?Sized>(
    ledger: &L,
    chain: &ChainConfig,
    tx_hash: TxHash,
    config: &ConfirmationConfig,
) -> Result<TxReceipt, BridgeError> {
    let start = Instant::now();
    let timed_out = || BridgeError::Timeout {
        operation: format!("confirmation of {}", tx_hash),
        after: config.timeout,
    };

    loop {
        // A stalled poll must not outlive the overall deadline
        let remaining = config.timeout.saturating_sub(start.elapsed());
        let polled = tokio::time::timeout(remaining, ledger.receipt(chain, tx_hash))
            .await
            .map_err(|_| timed_out())?;

        match polled {
            Ok(Some(receipt)) if receipt.success => {
                info!(
                    tx_hash = %tx_hash,
                    chain = %chain.name,
                    block = ?receipt.block_number,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Transaction confirmed"
                );
                return Ok(receipt);
            }
            Ok(Some(_)) => {
                return Err(BridgeError::TransactionReverted {
                    tx_hash: Some(tx_hash),
                    reason: format!("transaction {} reverted on {}", tx_hash, chain.name),
                });
            }
            Ok(None) => {
                debug!(tx_hash = %tx_hash, "Receipt not available yet");
            }
            Err(e) if e.is_transient() => {
                debug!(tx_hash = %tx_hash, error = %e, "Receipt poll failed, will retry");
            }
            Err(e) => return Err(e),
        }

        if start.elapsed() + config.poll_interval > config.timeout {
            return Err(timed_out());
        }
        tokio::time::sleep(config.poll_interval).await;
    }
}
