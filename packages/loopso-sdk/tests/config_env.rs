//! Environment-driven configuration
//!
//! These tests mutate process environment variables, so they run serially.

use alloy::primitives::Address;
use loopso_sdk::registry::{self, MUMBAI_CHAIN_ID};
use loopso_sdk::{ExplorerClient, LoopsoClient, SdkConfig};
use serial_test::serial;
use std::time::Duration;

const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

const VARS: &[&str] = &[
    "LOOPSO_PRIVATE_KEY",
    "LOOPSO_CHAINS_COUNT",
    "LOOPSO_CHAIN_1_NAME",
    "LOOPSO_CHAIN_1_CHAIN_ID",
    "LOOPSO_CHAIN_1_RPC_URL",
    "LOOPSO_CHAIN_1_BRIDGE_ADDRESS",
    "LOOPSO_CHAIN_1_DECIMALS",
    "LOOPSO_CHAIN_1_WRAPPED_NATIVE_ADDRESS",
    "LOOPSO_CHAIN_2_CHAIN_ID",
    "LOOPSO_CHAIN_2_RPC_URL",
    "LOOPSO_CHAIN_2_BRIDGE_ADDRESS",
    "LOOPSO_EXPLORER_URL",
    "LOOPSO_RPC_TIMEOUT_MS",
    "LOOPSO_MAX_RETRIES",
    "LOOPSO_SUBMIT_TIMEOUT_MS",
    "LOOPSO_CONFIRMATION_TIMEOUT_MS",
    "LOOPSO_CONFIRMATION_POLL_MS",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_missing_private_key() {
    clear_env();
    let err = SdkConfig::load().unwrap_err();
    assert!(err.to_string().contains("LOOPSO_PRIVATE_KEY"));
}

#[test]
#[serial]
fn test_defaults_to_builtin_chains() {
    clear_env();
    std::env::set_var("LOOPSO_PRIVATE_KEY", TEST_KEY);

    let config = SdkConfig::load().unwrap();
    let mut ids = config.registry.chain_ids();
    ids.sort();
    assert_eq!(ids, vec![4201, MUMBAI_CHAIN_ID]);
    assert_eq!(config.policy.read.max_retries, 3);
    assert_eq!(
        ExplorerClient::from_config(&config).base_url(),
        loopso_sdk::explorer::DEFAULT_EXPLORER_URL
    );

    clear_env();
}

#[test]
#[serial]
fn test_chains_and_timeouts_from_env() {
    clear_env();
    std::env::set_var("LOOPSO_PRIVATE_KEY", TEST_KEY);
    std::env::set_var("LOOPSO_CHAINS_COUNT", "2");
    std::env::set_var("LOOPSO_CHAIN_1_NAME", "sepolia");
    std::env::set_var("LOOPSO_CHAIN_1_CHAIN_ID", "11155111");
    std::env::set_var("LOOPSO_CHAIN_1_RPC_URL", "https://rpc.sepolia.example");
    std::env::set_var(
        "LOOPSO_CHAIN_1_BRIDGE_ADDRESS",
        "0x1111111111111111111111111111111111111111",
    );
    std::env::set_var("LOOPSO_CHAIN_1_DECIMALS", "6");
    std::env::set_var(
        "LOOPSO_CHAIN_1_WRAPPED_NATIVE_ADDRESS",
        "0x2222222222222222222222222222222222222222",
    );
    std::env::set_var("LOOPSO_CHAIN_2_CHAIN_ID", "31337");
    std::env::set_var("LOOPSO_CHAIN_2_RPC_URL", "http://localhost:8545");
    std::env::set_var(
        "LOOPSO_CHAIN_2_BRIDGE_ADDRESS",
        "0x3333333333333333333333333333333333333333",
    );
    std::env::set_var("LOOPSO_EXPLORER_URL", "http://localhost:4000/api/v2/");
    std::env::set_var("LOOPSO_RPC_TIMEOUT_MS", "1500");
    std::env::set_var("LOOPSO_MAX_RETRIES", "5");
    std::env::set_var("LOOPSO_CONFIRMATION_TIMEOUT_MS", "90000");

    let config = SdkConfig::load().unwrap();

    let sepolia = config.registry.get(11155111).unwrap();
    assert_eq!(sepolia.name, "sepolia");
    assert_eq!(sepolia.decimals, 6);
    assert_eq!(
        sepolia.wrapped_native_address,
        Some(Address::repeat_byte(0x22))
    );

    let anvil = config.registry.get(31337).unwrap();
    assert_eq!(anvil.name, "chain_2");
    assert_eq!(anvil.decimals, 18);
    assert_eq!(anvil.wrapped_native_address, None);
    assert!(config.registry.get(MUMBAI_CHAIN_ID).is_none());
    assert_eq!(
        config
            .registry
            .get_by_contract(&Address::repeat_byte(0x33))
            .map(|c| c.chain_id),
        Some(31337)
    );

    assert_eq!(config.explorer_url, "http://localhost:4000/api/v2");
    assert_eq!(config.policy.read.attempt_timeout, Duration::from_millis(1500));
    assert_eq!(config.policy.read.max_retries, 5);
    assert_eq!(config.policy.confirmation.timeout, Duration::from_secs(90));

    let explorer = ExplorerClient::from_config(&config);
    assert_eq!(explorer.base_url(), "http://localhost:4000/api/v2");

    let client = LoopsoClient::connect(config).unwrap();
    assert_eq!(client.registry().len(), 2);

    clear_env();
}

#[test]
#[serial]
fn test_missing_chain_field() {
    clear_env();
    std::env::set_var("LOOPSO_CHAINS_COUNT", "1");
    std::env::set_var("LOOPSO_CHAIN_1_CHAIN_ID", "31337");
    std::env::set_var("LOOPSO_CHAIN_1_RPC_URL", "http://localhost:8545");

    let err = registry::load_from_env().unwrap_err();
    assert!(err.to_string().contains("LOOPSO_CHAIN_1_BRIDGE_ADDRESS"));

    clear_env();
}

#[test]
#[serial]
fn test_bad_bridge_address() {
    clear_env();
    std::env::set_var("LOOPSO_CHAINS_COUNT", "1");
    std::env::set_var("LOOPSO_CHAIN_1_CHAIN_ID", "31337");
    std::env::set_var("LOOPSO_CHAIN_1_RPC_URL", "http://localhost:8545");
    std::env::set_var("LOOPSO_CHAIN_1_BRIDGE_ADDRESS", "0x1234");

    assert!(registry::load_from_env().is_err());

    clear_env();
}

#[test]
#[serial]
fn test_zero_count_means_builtin() {
    clear_env();
    std::env::set_var("LOOPSO_CHAINS_COUNT", "0");

    assert!(registry::load_from_env().unwrap().is_none());

    clear_env();
}
