//! # unified-relayer
//!
//! Off-chain companion to the unified USDC deposit contract.
//!
//! - The **deposit monitor** watches USDC `Transfer` events into the unified
//!   contract on Sepolia and Arbitrum Sepolia and, when its account is
//!   whitelisted, calls `relayToken` to forward each deposit to the contract's
//!   recipient. A `/health` endpoint reports which chains are monitored.
//! - The **EIP-7702 bootstrap** configures a freshly deployed contract from its
//!   owner's account: `setRecipient`, `setRelayer(owner, true)` and `relayETH`,
//!   each sent as a self-call carrying a fresh authorization.
//!
//! ## Relaying a transfer
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use alloy_chains::NamedChain;
//! use alloy_primitives::address;
//! use alloy_signer_local::PrivateKeySigner;
//! use unified_relayer::config::ChainConfig;
//! use unified_relayer::monitor::ChainMonitor;
//! use unified_relayer::providers::AlloyRelayer;
//!
//! # async fn example() -> unified_relayer::Result<()> {
//! let unified = address!("00000000000000000000000000000000000000aa");
//! let relayer = AlloyRelayer::connect_http(
//!     "http://localhost:8545".parse().unwrap(),
//!     PrivateKeySigner::random(),
//!     unified,
//! );
//!
//! let monitor = ChainMonitor::builder()
//!     .contract(Arc::new(relayer))
//!     .chain(ChainConfig::new(NamedChain::Sepolia, None)?)
//!     .unified(unified)
//!     .build();
//!
//! // Runs until the node's log stream ends.
//! monitor.start().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API
//!
//! - [`config`] - environment-driven configuration for both binaries
//! - [`monitor`] - per-chain transfer watching and relaying
//! - [`bootstrap`] - the EIP-7702 owner setup sequence
//! - [`health`] - the HTTP health endpoint
//! - [`traits`], [`providers`] and [`testing`] - chain access seams, their
//!   Alloy implementations and in-memory fakes
//! - [`RelayerError`] and [`Result`] - error types for error handling

pub mod bootstrap;
mod chain;
pub mod config;
mod contracts;
mod error;
pub mod health;
pub mod monitor;
pub mod providers;
pub mod telemetry;
pub mod testing;
pub mod traits;
mod transfer;

pub use chain::{
    UnifiedChain, ARBITRUM_SEPOLIA_CHAIN_ID, ARBITRUM_SEPOLIA_USDC_ADDRESS, SEPOLIA_CHAIN_ID,
    SEPOLIA_USDC_ADDRESS, SUPPORTED_CHAINS,
};
pub use contracts::{
    erc20::{transfer_filter, Transfer},
    unified::{
        relay_eth_calldata, set_recipient_calldata, set_relayer_calldata, UnifiedDeposit,
        UnifiedDepositContract,
    },
};
pub use error::{RelayerError, Result};
pub use transfer::TransferEvent;

// Public module for advanced users who need custom instrumentation
pub mod spans;
