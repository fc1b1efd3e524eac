//! SDK configuration
//!
//! Everything is read from the environment (optionally seeded from a `.env`
//! file). Only `LOOPSO_PRIVATE_KEY` is required; chains default to the
//! built-in registry and timeouts to [`CallPolicy::default`].

use eyre::{eyre, Result};
use std::env;
use std::fmt;
use std::time::Duration;

use crate::explorer::DEFAULT_EXPLORER_URL;
use crate::registry::{self, ChainRegistry};
use crate::retry::CallPolicy;

/// SDK configuration
#[derive(Clone)]
pub struct SdkConfig {
    /// Signing key shared by all chains
    private_key: String,
    pub registry: ChainRegistry,
    /// Blockscout v2 API base URL for NFT lookups
    pub explorer_url: String,
    pub policy: CallPolicy,
}

/// Custom Debug that redacts private_key to prevent accidental log leakage.
impl fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkConfig")
            .field("private_key", &"<redacted>")
            .field("registry", &self.registry)
            .field("explorer_url", &self.explorer_url)
            .field("policy", &self.policy)
            .finish()
    }
}

fn validate_private_key(private_key: &str) -> Result<()> {
    let hex = private_key
        .strip_prefix("0x")
        .ok_or_else(|| eyre!("Invalid private key format (expected 0x-prefixed 66-char hex)"))?;
    if hex.len() != 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(eyre!(
            "Invalid private key format (expected 0x-prefixed 66-char hex)"
        ));
    }
    Ok(())
}

fn env_millis(var: &str, default: Duration) -> Duration {
    env::var(var)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

impl SdkConfig {
    /// Configuration with the built-in chains and default timeouts
    pub fn new(private_key: impl Into<String>) -> Result<Self> {
        let private_key = private_key.into().trim().to_string();
        validate_private_key(&private_key)?;

        Ok(Self {
            private_key,
            registry: ChainRegistry::builtin(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            policy: CallPolicy::default(),
        })
    }

    /// Load configuration from environment
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded .env from {:?}", path);
        }

        let private_key =
            env::var("LOOPSO_PRIVATE_KEY").map_err(|_| eyre!("LOOPSO_PRIVATE_KEY required"))?;
        let mut config = Self::new(private_key)?;

        if let Some(registry) = registry::load_from_env()? {
            config.registry = registry;
        }

        if let Ok(url) = env::var("LOOPSO_EXPLORER_URL") {
            url::Url::parse(&url).map_err(|e| eyre!("Invalid LOOPSO_EXPLORER_URL: {}", e))?;
            config.explorer_url = url.trim_end_matches('/').to_string();
        }

        let defaults = CallPolicy::default();
        let policy = &mut config.policy;
        policy.read.attempt_timeout =
            env_millis("LOOPSO_RPC_TIMEOUT_MS", defaults.read.attempt_timeout);
        policy.read.max_retries = env::var("LOOPSO_MAX_RETRIES")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.read.max_retries);
        policy.submit_timeout = env_millis("LOOPSO_SUBMIT_TIMEOUT_MS", defaults.submit_timeout);
        policy.confirmation.timeout = env_millis(
            "LOOPSO_CONFIRMATION_TIMEOUT_MS",
            defaults.confirmation.timeout,
        );
        policy.confirmation.poll_interval = env_millis(
            "LOOPSO_CONFIRMATION_POLL_MS",
            defaults.confirmation.poll_interval,
        );

        tracing::info!(
            chains = ?config.registry.chain_ids(),
            explorer = %config.explorer_url,
            "Loaded Loopso SDK configuration"
        );

        Ok(config)
    }

    /// Get the signing key
    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}
