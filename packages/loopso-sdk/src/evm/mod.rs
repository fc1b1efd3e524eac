//! EVM Chain Support Module
//!
//! ## Submodules
//!
//! - `contracts` - Loopso, ERC20, ERC721 and wrapped-native bindings using alloy sol! macro
//! - `ledger` - [`BridgeLedger`](crate::ledger::BridgeLedger) implementation over JSON-RPC

pub mod contracts;
pub mod ledger;

pub use contracts::{IWrappedNative, Loopso, IERC20, IERC721};
pub use ledger::AlloyLedger;
