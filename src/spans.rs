//! Span helpers for relayer operations
//!
//! Static span names, structured attributes, and error recording kept apart
//! from the monitor and bootstrap logic.
//!
//! # Example
//!
//! ```rust,no_run
//! use unified_relayer::spans;
//! use alloy_primitives::{Address, U256};
//! use tracing::Instrument;
//!
//! # async fn example() {
//! let span = spans::handle_transfer("sepolia", &Address::ZERO, &U256::from(1_000_000u64), None);
//! async {
//!     // relay decision for this transfer
//! }
//! .instrument(span)
//! .await;
//! # }
//! ```

use alloy_primitives::{Address, TxHash, U256};
use tracing::Span;

use crate::error::RelayerError;

/// Create span for the lifetime of one chain's monitor.
///
/// Parent: None (spawned task)
/// Children: unified_relayer.handle_transfer
#[inline]
pub fn monitor_chain(chain_name: &str, chain_id: u64, usdc: &Address, unified: &Address) -> Span {
    tracing::info_span!(
        "unified_relayer.monitor_chain",
        chain = chain_name,
        chain_id = chain_id,
        usdc = %usdc,
        unified = %unified,
    )
}

/// Create span for the relay decision on one inbound transfer.
///
/// Parent: unified_relayer.monitor_chain
/// Children: Provider RPC calls (whitelist check, relay submission, receipt)
#[inline]
pub fn handle_transfer(
    chain_name: &str,
    from: &Address,
    amount: &U256,
    deposit_tx_hash: Option<TxHash>,
) -> Span {
    let span = tracing::info_span!(
        "unified_relayer.handle_transfer",
        chain = chain_name,
        from = %from,
        amount = %amount,
        deposit_tx_hash = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    );
    if let Some(tx_hash) = deposit_tx_hash {
        span.record("deposit_tx_hash", tracing::field::display(tx_hash));
    }
    span
}

/// Create span for one step of the bootstrap sequence.
///
/// Parent: None (one per step of `Bootstrap::run`)
/// Children: authorization signing, transaction submission, confirmation
#[inline]
pub fn bootstrap_step(step: &str, position: usize, contract: &Address) -> Span {
    tracing::info_span!(
        "unified_relayer.bootstrap_step",
        step = step,
        position = position,
        contract = %contract,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for waiting for transaction confirmation.
///
/// Parent: unified_relayer.bootstrap_step
/// Children: Provider RPC calls (polling)
#[inline]
pub fn wait_for_confirmation(tx_hash: TxHash, max_attempts: u32, poll_interval_secs: u64) -> Span {
    tracing::debug_span!(
        "unified_relayer.wait_for_confirmation",
        tx_hash = %tx_hash,
        max_attempts = max_attempts,
        poll_interval_secs = poll_interval_secs,
    )
}

/// Record a relayer error on the current span.
///
/// Sets `error.type` to the error variant, `error.message` to its display
/// form and `error.source` to the underlying cause when there is one, and
/// marks the span as failed.
pub fn record_error(error: &RelayerError) {
    let span = Span::current();
    span.record("error.type", error.kind());
    span.record("error.message", tracing::field::display(error));
    span.record("otel.status_code", "ERROR");

    if let Some(source) = std::error::Error::source(error) {
        span.record("error.source", tracing::field::display(source));
    }
}

/// Record a failure that has no [`RelayerError`], such as a reverted receipt.
pub fn record_failure(error_type: &str, error_message: &str) {
    let span = Span::current();
    span.record("error.type", error_type);
    span.record("error.message", error_message);
    span.record("otel.status_code", "ERROR");
}
