//! Core trait abstractions for the relayer.
//!
//! The monitor and the bootstrap flow only talk to the chain through these
//! traits, so tests can substitute fakes that count calls, inject RPC failures
//! and fast-forward time. The production implementations live in
//! [`crate::providers`].
//!
//! # Example: Implementing a Test Fake
//!
//! ```rust,ignore
//! use unified_relayer::traits::RelayerContract;
//!
//! struct AlwaysWhitelisted;
//!
//! #[async_trait::async_trait]
//! impl RelayerContract for AlwaysWhitelisted {
//!     fn relayer_address(&self) -> Address {
//!         Address::ZERO
//!     }
//!
//!     async fn is_whitelisted(&self, _relayer: Address) -> Result<bool> {
//!         Ok(true)
//!     }
//!     // ...
//! }
//! ```

use alloy_eips::eip7702::SignedAuthorization;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_rpc_types::{Filter, Log};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::time::{Duration, Instant};

use crate::error::Result;

/// Outcome of a mined transaction as reported by its receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayReceipt {
    /// Hash of the mined transaction
    pub transaction_hash: TxHash,
    /// Block the transaction was included in
    pub block_number: Option<u64>,
    /// `false` if the transaction reverted
    pub success: bool,
}

/// Unified contract operations the deposit monitor performs on one chain.
///
/// # Test Scenarios
///
/// Implementing this trait with fakes enables testing:
/// - Relayer not whitelisted
/// - Whitelist view call failing
/// - Relay submission rejected by the node
/// - Relay reverted on chain or confirmation never arriving
#[async_trait]
pub trait RelayerContract: Send + Sync {
    /// Address of the account that signs relay transactions.
    fn relayer_address(&self) -> Address;

    /// Reads `recipient()` from the unified contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the view call fails.
    async fn recipient(&self) -> Result<Address>;

    /// Reads `whitelistedRelayers(relayer)` from the unified contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the view call fails. A missing entry is `Ok(false)`.
    async fn is_whitelisted(&self, relayer: Address) -> Result<bool>;

    /// Submits `relayToken(token, amount)` and returns the transaction hash
    /// without waiting for inclusion.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be built, signed or broadcast.
    async fn submit_relay(&self, token: Address, amount: U256) -> Result<TxHash>;

    /// Waits until `tx_hash` is mined and returns its receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if the node drops the transaction or the RPC call fails.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<RelayReceipt>;
}

/// Source of logs matching a filter.
///
/// Production code polls the node's filter API; fakes replay a fixed list.
#[async_trait]
pub trait TransferLogSource: Send + Sync {
    /// Starts watching `filter` from the current chain head.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter cannot be installed.
    async fn watch_logs(&self, filter: Filter) -> Result<BoxStream<'static, Log>>;
}

/// Owner-side operations for the EIP-7702 bootstrap sequence.
///
/// Every delegated transaction is sent from the signer to itself, carrying an
/// authorization that points the signer's account at the contract code for
/// that transaction.
#[async_trait]
pub trait DelegatedExecutor: Send + Sync {
    /// Address of the owner account that signs authorizations and transactions.
    fn signer_address(&self) -> Address;

    /// Reads `owner()` from the contract at `contract`.
    async fn contract_owner(&self, contract: Address) -> Result<Address>;

    /// Signs a fresh authorization delegating the signer's account to `contract`.
    ///
    /// The authorization is meant for a transaction the signer itself sends, so
    /// its nonce is one past the account's next transaction nonce.
    async fn sign_authorization(&self, contract: Address) -> Result<SignedAuthorization>;

    /// Sends `call` to the signer's own address with `authorization` attached
    /// and returns the transaction hash.
    async fn send_delegated(
        &self,
        call: Bytes,
        authorization: SignedAuthorization,
    ) -> Result<TxHash>;

    /// Fetches the receipt for `tx_hash`, `None` while it is not yet mined.
    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<RelayReceipt>>;
}

/// Trait for time-based operations.
///
/// This trait abstracts sleep and time queries, enabling fast-forward testing
/// where tests can instantly advance through fixed delays and polling loops
/// without actually waiting.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Asynchronously sleeps for the given duration.
    async fn sleep(&self, duration: Duration);

    /// Returns the current instant in time.
    fn now(&self) -> Instant;
}
