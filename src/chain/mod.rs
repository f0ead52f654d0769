//! Chain registry for the deposit monitor
//!
//! Fixed USDC addresses, monitor names and explorer links for the chains that
//! carry a unified contract deployment.

mod addresses;
mod config;

pub use addresses::{
    ARBITRUM_SEPOLIA_CHAIN_ID, ARBITRUM_SEPOLIA_USDC_ADDRESS, SEPOLIA_CHAIN_ID,
    SEPOLIA_USDC_ADDRESS,
};
pub use config::{UnifiedChain, SUPPORTED_CHAINS};
