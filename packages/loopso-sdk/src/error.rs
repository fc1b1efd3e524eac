//! Error types for bridge operations
//!
//! Every SDK operation returns [`BridgeError`] so callers can tell an
//! unsupported chain apart from a reverted transaction or an unreachable node.

use std::time::Duration;

use alloy::primitives::{Address, TxHash};
use alloy::transports::{RpcError, TransportError, TransportErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    // ========================================================================
    // Request Errors
    // ========================================================================
    #[error("Unknown chain: {chain_id}")]
    UnknownChain { chain_id: u64 },

    #[error("No wrapped native token configured for chain {chain_id}")]
    NoWrappedNative { chain_id: u64 },

    #[error("Token {token} is not supported on chain {chain_id}")]
    UnsupportedToken { token: Address, chain_id: u64 },

    #[error("Invalid amount '{amount}': {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ========================================================================
    // Transaction Errors
    // ========================================================================
    #[error("Approval of {token} failed: {reason}")]
    ApprovalFailed { token: Address, reason: String },

    #[error("Transaction reverted: {reason}")]
    TransactionReverted {
        tx_hash: Option<TxHash>,
        reason: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("{operation} timed out after {after:?}")]
    Timeout { operation: String, after: Duration },

    #[error("Contract call failed: {0}")]
    Contract(String),

    #[error("Explorer returned HTTP {status}: {message}")]
    Explorer { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl BridgeError {
    /// Whether the failure may clear up on its own and the call is worth repeating
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BridgeError::NetworkError(_) | BridgeError::Timeout { .. }
        )
    }

    /// Map a contract call or send failure onto an error kind
    pub fn from_contract(context: &str, error: alloy::contract::Error) -> Self {
        match error {
            alloy::contract::Error::TransportError(e) => Self::from_transport(context, e),
            alloy::contract::Error::AbiError(e) => {
                BridgeError::Decode(format!("{}: {}", context, e))
            }
            other => Self::from_rpc(context, other),
        }
    }

    /// Map a JSON-RPC transport failure onto an error kind
    ///
    /// Transport-level failures (connection refused, DNS, HTTP timeouts) carry
    /// no useful text, so they are classified by variant. Node error responses
    /// fall back to message matching.
    pub fn from_transport(context: &str, error: TransportError) -> Self {
        let message = format!("{}: {}", context, error);
        match &error {
            RpcError::Transport(TransportErrorKind::Custom(_)) => {
                BridgeError::NetworkError(message)
            }
            RpcError::Transport(kind) if kind.is_retry_err() => BridgeError::NetworkError(message),
            RpcError::Transport(_) => BridgeError::Contract(message),
            RpcError::ErrorResp(payload) if payload.is_retry_err() => {
                BridgeError::NetworkError(message)
            }
            RpcError::SerError(_) | RpcError::DeserError { .. } => BridgeError::Decode(message),
            _ => Self::from_message(message),
        }
    }

    /// Map a provider or contract error message onto an error kind
    pub fn from_rpc(context: &str, error: impl std::fmt::Display) -> Self {
        Self::from_message(format!("{}: {}", context, error))
    }

    fn from_message(message: String) -> Self {
        match classify_error(&message) {
            ErrorClass::Transient => BridgeError::NetworkError(message),
            ErrorClass::Reverted => BridgeError::TransactionReverted {
                tx_hash: None,
                reason: message,
            },
            ErrorClass::Other => BridgeError::Contract(message),
        }
    }
}

/// Coarse classification of provider error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// RPC timeout, connection failure, rate limiting
    Transient,
    /// The node reported an execution revert
    Reverted,
    /// Anything else (decoding errors, invalid parameters, signer errors)
    Other,
}

/// Classify an error message for retry decisions
pub fn classify_error(error: &str) -> ErrorClass {
    let error_lower = error.to_lowercase();

    if error_lower.contains("timeout")
        || error_lower.contains("timed out")
        || error_lower.contains("connection")
        || error_lower.contains("network")
        || error_lower.contains("rate limit")
        || error_lower.contains("too many requests")
        || error_lower.contains("429")
        || error_lower.contains("error sending request")
        || error_lower.contains("503")
        || error_lower.contains("502")
        || error_lower.contains("temporarily unavailable")
    {
        return ErrorClass::Transient;
    }

    if error_lower.contains("reverted") || error_lower.contains("revert") {
        return ErrorClass::Reverted;
    }

    ErrorClass::Other
}
