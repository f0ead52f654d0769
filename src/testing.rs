//! Test utilities and fake implementations of the relayer traits
//!
//! These fakes let the monitor and bootstrap flows run without a node: they
//! record every call, inject RPC failures on demand and, for the clock,
//! fast-forward through delays instead of sleeping.

use alloy_eips::eip7702::{Authorization, SignedAuthorization};
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_rpc_types::{Filter, Log};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::chain::SEPOLIA_CHAIN_ID;
use crate::contracts::erc20::Transfer;
use crate::error::{RelayerError, Result};
use crate::traits::{Clock, DelegatedExecutor, RelayReceipt, RelayerContract, TransferLogSource};

/// Builds an RPC log for a USDC `Transfer` emitted by `token`.
pub fn transfer_log(token: Address, from: Address, to: Address, amount: U256) -> Log {
    let event = Transfer {
        from,
        to,
        value: amount,
    };

    Log {
        inner: alloy_primitives::Log {
            address: token,
            data: event.encode_log_data(),
        },
        block_hash: None,
        block_number: Some(1),
        block_timestamp: None,
        transaction_hash: Some(TxHash::repeat_byte(0x11)),
        transaction_index: None,
        log_index: None,
        removed: false,
    }
}

// ============================================================================
// Fake Relayer Contract
// ============================================================================

#[derive(Debug, Default)]
struct InFlight {
    current: usize,
    max: usize,
}

/// A fake unified contract and log source for one chain.
///
/// Whitelisted and successful by default. This allows testing scenarios like:
/// - Relayer not whitelisted
/// - Whitelist view call failing
/// - Submission rejected, relay reverted or receipt never arriving
/// - Slow confirmations piling up against the concurrency limit
#[derive(Clone, Debug)]
pub struct FakeRelayerContract {
    relayer: Address,
    // `None` simulates a failing view call
    whitelisted: Arc<Mutex<Option<bool>>>,
    recipient: Arc<Mutex<Option<Address>>>,
    fail_submission: Arc<Mutex<bool>>,
    fail_confirmation: Arc<Mutex<bool>>,
    revert: Arc<Mutex<bool>>,
    fail_watch: Arc<Mutex<bool>>,
    confirmation_delay: Arc<Mutex<Duration>>,
    logs: Arc<Mutex<Vec<Log>>>,
    relays: Arc<Mutex<Vec<(Address, U256)>>>,
    whitelist_checks: Arc<Mutex<usize>>,
    in_flight: Arc<Mutex<InFlight>>,
}

impl Default for FakeRelayerContract {
    fn default() -> Self {
        Self {
            relayer: Address::repeat_byte(0x7e),
            whitelisted: Arc::new(Mutex::new(Some(true))),
            recipient: Arc::new(Mutex::new(Some(Address::repeat_byte(0xbb)))),
            fail_submission: Arc::default(),
            fail_confirmation: Arc::default(),
            revert: Arc::default(),
            fail_watch: Arc::default(),
            confirmation_delay: Arc::default(),
            logs: Arc::default(),
            relays: Arc::default(),
            whitelist_checks: Arc::default(),
            in_flight: Arc::default(),
        }
    }
}

impl FakeRelayerContract {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the whitelist view call result
    pub fn set_whitelisted(&self, whitelisted: bool) {
        *self.whitelisted.lock().unwrap() = Some(whitelisted);
    }

    /// Configure the whitelist view call to return an RPC error
    pub fn fail_whitelist_check(&self) {
        *self.whitelisted.lock().unwrap() = None;
    }

    /// Configure the recipient view call to return an RPC error
    pub fn fail_recipient(&self) {
        *self.recipient.lock().unwrap() = None;
    }

    /// Configure relay submission to be rejected by the node
    pub fn fail_submission(&self) {
        *self.fail_submission.lock().unwrap() = true;
    }

    /// Configure receipt retrieval to fail after submission
    pub fn fail_confirmation(&self) {
        *self.fail_confirmation.lock().unwrap() = true;
    }

    /// Configure relays to be mined with a failed status
    pub fn revert_relays(&self) {
        *self.revert.lock().unwrap() = true;
    }

    /// Configure the log subscription to fail
    pub fn fail_watch(&self) {
        *self.fail_watch.lock().unwrap() = true;
    }

    /// Delay every confirmation by `delay` (uses tokio time, so paused tests
    /// auto-advance)
    pub fn set_confirmation_delay(&self, delay: Duration) {
        *self.confirmation_delay.lock().unwrap() = delay;
    }

    /// Queue a log to be replayed by `watch_logs`
    pub fn push_log(&self, log: Log) {
        self.logs.lock().unwrap().push(log);
    }

    /// Every `(token, amount)` passed to `submit_relay`, in order
    pub fn relay_calls(&self) -> Vec<(Address, U256)> {
        self.relays.lock().unwrap().clone()
    }

    /// Number of whitelist view calls made
    pub fn whitelist_check_count(&self) -> usize {
        *self.whitelist_checks.lock().unwrap()
    }

    /// Highest number of relays that were submitted but not yet confirmed
    pub fn max_in_flight(&self) -> usize {
        self.in_flight.lock().unwrap().max
    }
}

#[async_trait]
impl RelayerContract for FakeRelayerContract {
    fn relayer_address(&self) -> Address {
        self.relayer
    }

    async fn recipient(&self) -> Result<Address> {
        self.recipient
            .lock()
            .unwrap()
            .ok_or_else(|| RelayerError::Provider("Simulated RPC error".to_string()))
    }

    async fn is_whitelisted(&self, _relayer: Address) -> Result<bool> {
        *self.whitelist_checks.lock().unwrap() += 1;

        self.whitelisted
            .lock()
            .unwrap()
            .ok_or_else(|| RelayerError::Provider("Simulated RPC error".to_string()))
    }

    async fn submit_relay(&self, token: Address, amount: U256) -> Result<TxHash> {
        if *self.fail_submission.lock().unwrap() {
            return Err(RelayerError::Provider(
                "Simulated submission error".to_string(),
            ));
        }

        let index = {
            let mut relays = self.relays.lock().unwrap();
            relays.push((token, amount));
            relays.len()
        };

        let mut in_flight = self.in_flight.lock().unwrap();
        in_flight.current += 1;
        in_flight.max = in_flight.max.max(in_flight.current);

        Ok(TxHash::left_padding_from(&(index as u64).to_be_bytes()))
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<RelayReceipt> {
        let delay = *self.confirmation_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.lock().unwrap().current -= 1;

        if *self.fail_confirmation.lock().unwrap() {
            return Err(RelayerError::Provider(
                "Simulated receipt error".to_string(),
            ));
        }

        Ok(RelayReceipt {
            transaction_hash: tx_hash,
            block_number: Some(100),
            success: !*self.revert.lock().unwrap(),
        })
    }
}

#[async_trait]
impl TransferLogSource for FakeRelayerContract {
    async fn watch_logs(&self, _filter: Filter) -> Result<BoxStream<'static, Log>> {
        if *self.fail_watch.lock().unwrap() {
            return Err(RelayerError::Provider(
                "Simulated filter error".to_string(),
            ));
        }

        let logs = self.logs.lock().unwrap().clone();
        Ok(stream::iter(logs).boxed())
    }
}

// ============================================================================
// Fake Delegated Executor
// ============================================================================

/// A fake owner account for the bootstrap sequence.
///
/// Signs real authorizations with a random key and records every delegated
/// transaction. The account owns the contract by default. This allows testing
/// scenarios like:
/// - Signer is not the contract owner
/// - Transactions mined after a number of polls, reverted or never mined
#[derive(Clone, Debug)]
pub struct FakeDelegatedExecutor {
    signer: PrivateKeySigner,
    owner: Arc<Mutex<Address>>,
    sent: Arc<Mutex<Vec<(Bytes, SignedAuthorization)>>>,
    authorizations_signed: Arc<Mutex<usize>>,
    pending_polls: Arc<Mutex<u32>>,
    never_mined: Arc<Mutex<bool>>,
    revert: Arc<Mutex<bool>>,
    receipt_polls: Arc<Mutex<usize>>,
}

impl Default for FakeDelegatedExecutor {
    fn default() -> Self {
        let signer = PrivateKeySigner::random();
        Self {
            owner: Arc::new(Mutex::new(signer.address())),
            signer,
            sent: Arc::default(),
            authorizations_signed: Arc::default(),
            pending_polls: Arc::default(),
            never_mined: Arc::default(),
            revert: Arc::default(),
            receipt_polls: Arc::default(),
        }
    }
}

impl FakeDelegatedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the address returned by `owner()`
    pub fn set_owner(&self, owner: Address) {
        *self.owner.lock().unwrap() = owner;
    }

    /// Report each transaction as pending for `polls` receipt lookups
    pub fn set_pending_polls(&self, polls: u32) {
        *self.pending_polls.lock().unwrap() = polls;
    }

    /// Never return a receipt (for timeout testing)
    pub fn never_mine(&self) {
        *self.never_mined.lock().unwrap() = true;
    }

    /// Report every transaction as reverted
    pub fn revert_transactions(&self) {
        *self.revert.lock().unwrap() = true;
    }

    /// Every `(calldata, authorization)` sent, in order
    pub fn sent(&self) -> Vec<(Bytes, SignedAuthorization)> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of authorizations signed
    pub fn authorization_count(&self) -> usize {
        *self.authorizations_signed.lock().unwrap()
    }

    /// Number of receipt lookups made
    pub fn receipt_poll_count(&self) -> usize {
        *self.receipt_polls.lock().unwrap()
    }
}

#[async_trait]
impl DelegatedExecutor for FakeDelegatedExecutor {
    fn signer_address(&self) -> Address {
        self.signer.address()
    }

    async fn contract_owner(&self, _contract: Address) -> Result<Address> {
        Ok(*self.owner.lock().unwrap())
    }

    async fn sign_authorization(&self, contract: Address) -> Result<SignedAuthorization> {
        // Account nonce advances once per sent transaction.
        let nonce = self.sent.lock().unwrap().len() as u64;
        let authorization = Authorization {
            chain_id: U256::from(SEPOLIA_CHAIN_ID),
            address: contract,
            nonce: nonce + 1,
        };
        let signature = self
            .signer
            .sign_hash_sync(&authorization.signature_hash())?;

        *self.authorizations_signed.lock().unwrap() += 1;
        Ok(authorization.into_signed(signature))
    }

    async fn send_delegated(
        &self,
        call: Bytes,
        authorization: SignedAuthorization,
    ) -> Result<TxHash> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((call, authorization));
        Ok(TxHash::left_padding_from(&(sent.len() as u64).to_be_bytes()))
    }

    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<RelayReceipt>> {
        *self.receipt_polls.lock().unwrap() += 1;

        if *self.never_mined.lock().unwrap() {
            return Ok(None);
        }

        let mut pending = self.pending_polls.lock().unwrap();
        if *pending > 0 {
            *pending -= 1;
            return Ok(None);
        }

        Ok(Some(RelayReceipt {
            transaction_hash: tx_hash,
            block_number: Some(100),
            success: !*self.revert.lock().unwrap(),
        }))
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A fake clock that allows fast-forwarding time for testing.
///
/// Instead of actually sleeping, this clock records sleep calls and advances
/// its internal time instantly, so fixed settle delays and confirmation polling
/// finish immediately in tests.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current_time: Arc<Mutex<Instant>>,
    sleep_log: Arc<Mutex<Vec<Duration>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            current_time: Arc::new(Mutex::new(Instant::now())),
            sleep_log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fast-forward the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut time = self.current_time.lock().unwrap();
        *time += duration;
    }

    /// Every duration passed to `sleep`, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleep_log.lock().unwrap().clone()
    }

    /// Get the total time "slept" by this clock
    pub fn total_sleep_time(&self) -> Duration {
        self.sleep_log.lock().unwrap().iter().sum()
    }

    /// Get the number of times sleep was called
    pub fn sleep_count(&self) -> usize {
        self.sleep_log.lock().unwrap().len()
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleep_log.lock().unwrap().push(duration);
        self.advance(duration);
    }

    fn now(&self) -> Instant {
        *self.current_time.lock().unwrap()
    }
}
