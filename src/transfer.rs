//! Decoded USDC transfer notifications
//!
//! A [`TransferEvent`] lives only as long as one relay attempt: it is built from
//! a log notification, handed to the relay step, and dropped once the attempt
//! finishes.

use alloy_primitives::{Address, TxHash, U256};
use alloy_rpc_types::Log;
use alloy_sol_types::SolEvent;

use crate::contracts::erc20::Transfer;
use crate::error::{RelayerError, Result};

/// An ERC20 `Transfer` decoded from a log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferEvent {
    /// Indexed sender (topic 1)
    pub from: Address,
    /// Indexed receiver (topic 2)
    pub to: Address,
    /// Transferred amount in token base units (data word)
    pub amount: U256,
    /// Hash of the transaction that emitted the log, when the node reports it
    pub tx_hash: Option<TxHash>,
    /// Block the log was included in, when the node reports it
    pub block_number: Option<u64>,
}

impl TransferEvent {
    /// Decode a `Transfer` log
    ///
    /// Fails if the log is not a well-formed three-topic `Transfer` event, e.g.
    /// a wrong signature, a missing indexed topic, or a truncated data word.
    pub fn decode(log: &Log) -> Result<Self> {
        match log.topics() {
            [signature, _, _] if *signature == Transfer::SIGNATURE_HASH => {}
            topics => {
                return Err(RelayerError::InvalidLog(format!(
                    "expected 3 topics starting with {}, got {} topics",
                    Transfer::SIGNATURE_HASH,
                    topics.len()
                )))
            }
        }

        let decoded = Transfer::decode_log(&log.inner)?;

        Ok(Self {
            from: decoded.data.from,
            to: decoded.data.to,
            amount: decoded.data.value,
            tx_hash: log.transaction_hash,
            block_number: log.block_number,
        })
    }
}
