use alloy_chains::NamedChain;
use alloy_primitives::{Address, TxHash};

use super::addresses::{ARBITRUM_SEPOLIA_USDC_ADDRESS, SEPOLIA_USDC_ADDRESS};
use crate::error::{RelayerError, Result};

/// Chains the deposit monitor knows how to watch, in the order they are configured.
pub const SUPPORTED_CHAINS: [NamedChain; 2] = [NamedChain::Sepolia, NamedChain::ArbitrumSepolia];

/// Per-chain constants for the unified deposit flow
///
/// Implemented on `alloy_chains::NamedChain` so chain IDs resolve to the fixed
/// token addresses and names used in logs and on the health endpoint.
///
/// # Example
///
/// ```rust
/// use alloy_chains::NamedChain;
/// use unified_relayer::UnifiedChain;
///
/// let chain = NamedChain::Sepolia;
/// assert_eq!(chain.monitor_name().unwrap(), "sepolia");
/// assert!(chain.usdc_address().is_ok());
/// ```
pub trait UnifiedChain {
    /// The USDC token contract whose `Transfer` events are watched on this chain
    fn usdc_address(&self) -> Result<Address>;

    /// Short name used in log lines and in the health endpoint's `monitoredChains`
    fn monitor_name(&self) -> Result<&'static str>;

    /// Block explorer link for a transaction on this chain, if one is known
    fn explorer_tx_url(&self, tx_hash: TxHash) -> Option<String>;
}

impl UnifiedChain for NamedChain {
    fn usdc_address(&self) -> Result<Address> {
        use NamedChain::*;

        match self {
            Sepolia => Ok(SEPOLIA_USDC_ADDRESS),
            ArbitrumSepolia => Ok(ARBITRUM_SEPOLIA_USDC_ADDRESS),
            _ => Err(RelayerError::ChainNotSupported {
                chain: self.to_string(),
            }),
        }
    }

    fn monitor_name(&self) -> Result<&'static str> {
        use NamedChain::*;

        match self {
            Sepolia => Ok("sepolia"),
            ArbitrumSepolia => Ok("arbitrum"),
            _ => Err(RelayerError::ChainNotSupported {
                chain: self.to_string(),
            }),
        }
    }

    fn explorer_tx_url(&self, tx_hash: TxHash) -> Option<String> {
        use NamedChain::*;

        let base = match self {
            Sepolia => "https://sepolia.etherscan.io",
            ArbitrumSepolia => "https://sepolia.arbiscan.io",
            other => other.etherscan_urls().map(|(_, base)| base)?,
        };

        Some(format!("{}/tx/{tx_hash}", base.trim_end_matches('/')))
    }
}
