//! Environment-driven configuration for both binaries.
//!
//! Each binary builds its configuration once at startup and passes it by
//! reference from there on. Loading goes through a lookup function so the same
//! parsing runs against the process environment in production and against a
//! plain map in tests.

use std::env;

use alloy_chains::NamedChain;
use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use bon::Builder;
use tracing::error;
use url::Url;

use crate::bootstrap::SettlePolicy;
use crate::chain::{UnifiedChain, SUPPORTED_CHAINS};
use crate::error::{RelayerError, Result};
use crate::monitor::DispatchConfig;

/// Default HTTP port for the health endpoint
pub const DEFAULT_PORT: u16 = 3000;

/// Set to skip `.env` hydration, e.g. in containers that inject variables directly
pub const SKIP_DOTENV_VAR: &str = "UNIFIED_RELAYER_SKIP_DOTENV";

/// One chain the monitor may watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    name: &'static str,
    chain: NamedChain,
    rpc_url: Option<Url>,
    usdc: Address,
}

impl ChainConfig {
    /// Resolves the fixed name and USDC address for `chain`.
    pub fn new(chain: NamedChain, rpc_url: Option<Url>) -> Result<Self> {
        Ok(Self {
            name: chain.monitor_name()?,
            chain,
            rpc_url,
            usdc: chain.usdc_address()?,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn chain(&self) -> NamedChain {
        self.chain
    }

    pub fn chain_id(&self) -> u64 {
        self.chain as u64
    }

    pub fn rpc_url(&self) -> Option<&Url> {
        self.rpc_url.as_ref()
    }

    pub fn usdc(&self) -> Address {
        self.usdc
    }
}

/// Deposit monitor configuration.
///
/// The unified address and relayer key are optional at load time: without them
/// no chain is monitored, but the health endpoint still runs.
#[derive(Debug, Clone, Builder)]
pub struct MonitorConfig {
    unified_address: Option<Address>,
    relayer_signer: Option<PrivateKeySigner>,
    chains: Vec<ChainConfig>,
    #[builder(default = DEFAULT_PORT)]
    port: u16,
    #[builder(default)]
    dispatch: DispatchConfig,
}

impl MonitorConfig {
    /// Loads configuration by hydrating `.env` (if present) and reading the
    /// process environment.
    pub fn from_env() -> Result<Self> {
        hydrate_env_file()?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable lookup.
    ///
    /// Absent variables leave the corresponding feature off. A malformed
    /// credential, RPC URL or dispatch knob is logged and treated as absent, so
    /// only the chains depending on it go unmonitored. Only a malformed
    /// `BACKEND_PORT` is an error, since the health listener cannot start
    /// without it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let unified_address = optional_var(&lookup, "UNIFIED_ADDRESS")
            .and_then(|value| skip_invalid(parse_address("UNIFIED_ADDRESS", &value)));
        let relayer_signer = optional_var(&lookup, "RELAYER_PRIVATE_KEY")
            .and_then(|value| skip_invalid(parse_signer("RELAYER_PRIVATE_KEY", &value)));

        let chains = SUPPORTED_CHAINS
            .iter()
            .map(|chain| {
                let key = rpc_url_var(*chain)?;
                let rpc_url = optional_var(&lookup, key)
                    .and_then(|value| skip_invalid(parse_url(key, &value)));
                ChainConfig::new(*chain, rpc_url)
            })
            .collect::<Result<Vec<_>>>()?;

        let port = optional_var(&lookup, "BACKEND_PORT")
            .map(|value| parse_number("BACKEND_PORT", &value))
            .transpose()?
            .unwrap_or(DEFAULT_PORT);

        let mut dispatch = DispatchConfig::default();
        if let Some(capacity) = optional_var(&lookup, "MONITOR_QUEUE_CAPACITY")
            .and_then(|value| skip_invalid(parse_positive("MONITOR_QUEUE_CAPACITY", &value)))
        {
            dispatch = dispatch.with_queue_capacity(capacity);
        }
        if let Some(max_in_flight) = optional_var(&lookup, "MONITOR_MAX_IN_FLIGHT")
            .and_then(|value| skip_invalid(parse_positive("MONITOR_MAX_IN_FLIGHT", &value)))
        {
            dispatch = dispatch.with_max_in_flight(max_in_flight);
        }

        Ok(Self {
            unified_address,
            relayer_signer,
            chains,
            port,
            dispatch,
        })
    }

    pub fn unified_address(&self) -> Option<Address> {
        self.unified_address
    }

    pub fn relayer_signer(&self) -> Option<&PrivateKeySigner> {
        self.relayer_signer.as_ref()
    }

    pub fn chains(&self) -> &[ChainConfig] {
        &self.chains
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn dispatch(&self) -> DispatchConfig {
        self.dispatch
    }

    /// Names of chains with an RPC URL, as reported by the health endpoint.
    pub fn monitored_chain_names(&self) -> Vec<&'static str> {
        self.chains
            .iter()
            .filter(|chain| chain.rpc_url.is_some())
            .map(ChainConfig::name)
            .collect()
    }

    /// Chains a monitor is started for, with the credentials it runs under.
    ///
    /// Empty unless both the unified address and the relayer key are set.
    pub fn monitor_targets(&self) -> Vec<(&ChainConfig, &Url, Address, &PrivateKeySigner)> {
        let (Some(unified), Some(signer)) = (self.unified_address, self.relayer_signer.as_ref())
        else {
            return Vec::new();
        };

        self.chains
            .iter()
            .filter_map(|chain| {
                chain
                    .rpc_url
                    .as_ref()
                    .map(|rpc_url| (chain, rpc_url, unified, signer))
            })
            .collect()
    }
}

/// Bootstrap script configuration. Every field is required.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    signer: PrivateKeySigner,
    rpc_url: Url,
    contract: Address,
    recipient: Address,
    chain: NamedChain,
    settle: SettlePolicy,
}

impl BootstrapConfig {
    /// Loads configuration by hydrating `.env` (if present) and reading the
    /// process environment.
    pub fn from_env() -> Result<Self> {
        hydrate_env_file()?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let signer = parse_signer("PRIVATE_KEY", &required_var(&lookup, "PRIVATE_KEY")?)?;
        let rpc_url = parse_url("SEPOLIA_RPC_URL", &required_var(&lookup, "SEPOLIA_RPC_URL")?)?;
        let contract =
            parse_address("CONTRACT_ADDRESS", &required_var(&lookup, "CONTRACT_ADDRESS")?)?;
        let recipient =
            parse_address("RECIPIENT_ADDRESS", &required_var(&lookup, "RECIPIENT_ADDRESS")?)?;

        let settle = match optional_var(&lookup, "BOOTSTRAP_SETTLE").as_deref() {
            None | Some("delay") => SettlePolicy::fixed_delay(),
            Some("confirm") => SettlePolicy::confirmation(),
            Some(other) => {
                return Err(RelayerError::InvalidEnv {
                    key: "BOOTSTRAP_SETTLE",
                    reason: format!("expected `confirm` or `delay`, got `{other}`"),
                })
            }
        };

        Ok(Self {
            signer,
            rpc_url,
            contract,
            recipient,
            chain: NamedChain::Sepolia,
            settle,
        })
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }

    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    pub fn recipient(&self) -> Address {
        self.recipient
    }

    pub fn chain(&self) -> NamedChain {
        self.chain
    }

    pub fn settle(&self) -> SettlePolicy {
        self.settle
    }
}

fn rpc_url_var(chain: NamedChain) -> Result<&'static str> {
    match chain {
        NamedChain::Sepolia => Ok("SEPOLIA_RPC_URL"),
        NamedChain::ArbitrumSepolia => Ok("ARBITRUM_SEPOLIA_RPC_URL"),
        other => Err(RelayerError::ChainNotSupported {
            chain: other.to_string(),
        }),
    }
}

fn required_var<F>(lookup: &F, key: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional_var(lookup, key).ok_or(RelayerError::MissingEnv { key })
}

fn optional_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn skip_invalid<T>(parsed: Result<T>) -> Option<T> {
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            error!(error = %e, event = "monitor_config_ignored");
            None
        }
    }
}

fn parse_address(key: &'static str, value: &str) -> Result<Address> {
    value.parse().map_err(|e| RelayerError::InvalidEnv {
        key,
        reason: format!("{e}"),
    })
}

fn parse_signer(key: &'static str, value: &str) -> Result<PrivateKeySigner> {
    // The message must not echo the key material.
    value.parse().map_err(|_| RelayerError::InvalidEnv {
        key,
        reason: "not a valid secp256k1 private key".to_string(),
    })
}

fn parse_url(key: &'static str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| RelayerError::InvalidEnv {
        key,
        reason: e.to_string(),
    })
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| RelayerError::InvalidEnv {
        key,
        reason: e.to_string(),
    })
}

fn parse_positive(key: &'static str, value: &str) -> Result<usize> {
    match parse_number::<usize>(key, value)? {
        0 => Err(RelayerError::InvalidEnv {
            key,
            reason: "must be greater than zero".to_string(),
        }),
        n => Ok(n),
    }
}

/// Loads `.env` into the process environment unless [`SKIP_DOTENV_VAR`] is set.
/// A missing `.env` file is not an error.
pub fn hydrate_env_file() -> Result<()> {
    if env::var_os(SKIP_DOTENV_VAR).is_some() {
        return Ok(());
    }
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(RelayerError::InvalidConfig(err.to_string())),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use std::collections::HashMap;
    use std::time::Duration;

    // Well-known anvil development key #0
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const UNIFIED: &str = "0x00000000000000000000000000000000000000aa";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_monitor_config_full() {
        let config = MonitorConfig::from_lookup(lookup(&[
            ("UNIFIED_ADDRESS", UNIFIED),
            ("RELAYER_PRIVATE_KEY", DEV_KEY),
            ("SEPOLIA_RPC_URL", "https://sepolia.example"),
            ("ARBITRUM_SEPOLIA_RPC_URL", "https://arb-sepolia.example"),
            ("BACKEND_PORT", "8080"),
            ("MONITOR_MAX_IN_FLIGHT", "2"),
        ]))
        .unwrap();

        assert_eq!(config.port(), 8080);
        assert_eq!(config.dispatch().max_in_flight(), 2);
        assert_eq!(config.monitored_chain_names(), vec!["sepolia", "arbitrum"]);
        assert_eq!(config.relayer_signer().unwrap().address(), DEV_ADDRESS);

        let targets = config.monitor_targets();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].0.chain_id(), 11_155_111);
        assert_eq!(targets[1].0.chain_id(), 421_614);
    }

    #[test]
    fn test_builder_defaults() {
        let config = MonitorConfig::builder()
            .chains(vec![ChainConfig::new(NamedChain::Sepolia, None).unwrap()])
            .build();

        assert_eq!(config.port(), DEFAULT_PORT);
        assert_eq!(config.dispatch(), DispatchConfig::default());
        assert!(config.monitored_chain_names().is_empty());
        assert!(config.monitor_targets().is_empty());
    }

    #[test]
    fn test_chain_without_rpc_url_is_not_monitored() {
        let config = MonitorConfig::from_lookup(lookup(&[
            ("UNIFIED_ADDRESS", UNIFIED),
            ("RELAYER_PRIVATE_KEY", DEV_KEY),
            ("ARBITRUM_SEPOLIA_RPC_URL", "https://arb-sepolia.example"),
            ("SEPOLIA_RPC_URL", "   "),
        ]))
        .unwrap();

        assert_eq!(config.monitored_chain_names(), vec!["arbitrum"]);
        let targets = config.monitor_targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].0.name(), "arbitrum");
        assert_eq!(config.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_missing_credentials_skip_every_chain() {
        let config = MonitorConfig::from_lookup(lookup(&[
            ("SEPOLIA_RPC_URL", "https://sepolia.example"),
            ("RELAYER_PRIVATE_KEY", DEV_KEY),
        ]))
        .unwrap();

        assert!(config.monitor_targets().is_empty());
        // Still reported: the health endpoint lists chains with an RPC URL.
        assert_eq!(config.monitored_chain_names(), vec!["sepolia"]);
    }

    #[test]
    fn test_malformed_unified_address_disables_monitoring_only() {
        let config = MonitorConfig::from_lookup(lookup(&[
            ("UNIFIED_ADDRESS", "0x1234"),
            ("RELAYER_PRIVATE_KEY", DEV_KEY),
            ("SEPOLIA_RPC_URL", "https://sepolia.example"),
        ]))
        .unwrap();

        assert_eq!(config.unified_address(), None);
        assert!(config.monitor_targets().is_empty());
        assert_eq!(config.monitored_chain_names(), vec!["sepolia"]);
        assert_eq!(config.port(), DEFAULT_PORT);
    }

    #[test]
    fn test_malformed_key_or_url_skips_affected_chains() {
        let config = MonitorConfig::from_lookup(lookup(&[
            ("UNIFIED_ADDRESS", UNIFIED),
            ("RELAYER_PRIVATE_KEY", "not-a-key"),
            ("SEPOLIA_RPC_URL", "https://sepolia.example"),
        ]))
        .unwrap();
        assert!(config.relayer_signer().is_none());
        assert!(config.monitor_targets().is_empty());

        let config = MonitorConfig::from_lookup(lookup(&[
            ("UNIFIED_ADDRESS", UNIFIED),
            ("RELAYER_PRIVATE_KEY", DEV_KEY),
            ("SEPOLIA_RPC_URL", "not a url"),
            ("ARBITRUM_SEPOLIA_RPC_URL", "https://arb-sepolia.example"),
        ]))
        .unwrap();
        let targets = config.monitor_targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].0.name(), "arbitrum");
    }

    #[test]
    fn test_malformed_dispatch_knobs_keep_defaults() {
        let config = MonitorConfig::from_lookup(lookup(&[
            ("MONITOR_QUEUE_CAPACITY", "0"),
            ("MONITOR_MAX_IN_FLIGHT", "many"),
        ]))
        .unwrap();

        assert_eq!(config.dispatch(), DispatchConfig::default());
    }

    #[test]
    fn test_malformed_port_is_an_error() {
        let err = MonitorConfig::from_lookup(lookup(&[("BACKEND_PORT", "http")])).unwrap_err();
        assert!(matches!(
            err,
            RelayerError::InvalidEnv {
                key: "BACKEND_PORT",
                ..
            }
        ));
    }

    #[test]
    fn test_signer_error_does_not_echo_key() {
        let err = parse_signer("RELAYER_PRIVATE_KEY", "not-a-key").unwrap_err();
        assert!(!err.to_string().contains("not-a-key"));
    }

    #[test]
    fn test_bootstrap_config_requires_every_variable() {
        let all = [
            ("PRIVATE_KEY", DEV_KEY),
            ("SEPOLIA_RPC_URL", "https://sepolia.example"),
            ("CONTRACT_ADDRESS", UNIFIED),
            ("RECIPIENT_ADDRESS", "0x00000000000000000000000000000000000000bb"),
        ];

        let config = BootstrapConfig::from_lookup(lookup(&all)).unwrap();
        assert_eq!(config.signer().address(), DEV_ADDRESS);
        assert_eq!(config.chain(), NamedChain::Sepolia);
        assert_eq!(
            config.settle(),
            SettlePolicy::FixedDelay(Duration::from_secs(15))
        );

        for skipped in 0..all.len() {
            let partial: Vec<_> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skipped)
                .map(|(_, var)| *var)
                .collect();
            let err = BootstrapConfig::from_lookup(lookup(&partial)).unwrap_err();
            match err {
                RelayerError::MissingEnv { key } => assert_eq!(key, all[skipped].0),
                other => panic!("expected MissingEnv, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_bootstrap_settle_modes() {
        let base = [
            ("PRIVATE_KEY", DEV_KEY),
            ("SEPOLIA_RPC_URL", "https://sepolia.example"),
            ("CONTRACT_ADDRESS", UNIFIED),
            ("RECIPIENT_ADDRESS", UNIFIED),
        ];

        let mut vars = base.to_vec();
        vars.push(("BOOTSTRAP_SETTLE", "delay"));
        let config = BootstrapConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(
            config.settle(),
            SettlePolicy::FixedDelay(Duration::from_secs(15))
        );

        let mut vars = base.to_vec();
        vars.push(("BOOTSTRAP_SETTLE", "confirm"));
        let config = BootstrapConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.settle(), SettlePolicy::confirmation());

        let mut vars = base.to_vec();
        vars.push(("BOOTSTRAP_SETTLE", "sometimes"));
        assert!(BootstrapConfig::from_lookup(lookup(&vars)).is_err());
    }
}
