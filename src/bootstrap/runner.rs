use alloy_chains::NamedChain;
use alloy_primitives::{Address, Bytes, TxHash};
use bon::Builder;
use std::time::Duration;
use tracing::{debug, error, info, warn, Instrument};

use super::{ConfirmationPolling, SettlePolicy};
use crate::chain::UnifiedChain;
use crate::contracts::unified::{relay_eth_calldata, set_recipient_calldata, set_relayer_calldata};
use crate::error::{RelayerError, Result};
use crate::spans;
use crate::traits::{Clock, DelegatedExecutor, RelayReceipt};

/// One owner call in the bootstrap sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    /// `setRecipient(recipient)`
    SetRecipient(Address),
    /// `setRelayer(relayer, true)`
    SetRelayer(Address),
    /// `relayETH()`
    RelayEth,
}

impl BootstrapStep {
    /// Contract function name, as it appears in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetRecipient(_) => "setRecipient",
            Self::SetRelayer(_) => "setRelayer",
            Self::RelayEth => "relayETH",
        }
    }

    /// ABI-encoded call for this step.
    pub fn calldata(&self) -> Bytes {
        match self {
            Self::SetRecipient(recipient) => set_recipient_calldata(*recipient),
            Self::SetRelayer(relayer) => set_relayer_calldata(*relayer, true),
            Self::RelayEth => relay_eth_calldata(),
        }
    }
}

/// A sent bootstrap step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// The call that was sent
    pub step: BootstrapStep,
    /// Hash returned when the transaction was broadcast
    pub tx_hash: TxHash,
    /// Present when the step was settled by waiting for its receipt
    pub receipt: Option<RelayReceipt>,
}

/// Transactions sent by a completed bootstrap, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// One entry per sent step, in sending order
    pub steps: Vec<StepOutcome>,
}

impl BootstrapReport {
    /// Transaction hashes of every sent step, in sending order.
    pub fn tx_hashes(&self) -> Vec<TxHash> {
        self.steps.iter().map(|outcome| outcome.tx_hash).collect()
    }
}

/// Configures the unified contract from its owner's account through EIP-7702.
///
/// # Example
///
/// ```rust,no_run
/// use alloy_primitives::address;
/// use unified_relayer::bootstrap::{Bootstrap, SettlePolicy};
/// use unified_relayer::providers::{AlloyDelegator, TokioClock};
/// use alloy_signer_local::PrivateKeySigner;
///
/// # async fn example() -> unified_relayer::Result<()> {
/// let signer: PrivateKeySigner = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
///     .parse()
///     .unwrap();
/// let executor = AlloyDelegator::connect_http("http://localhost:8545".parse().unwrap(), signer);
///
/// let report = Bootstrap::builder()
///     .executor(executor)
///     .clock(TokioClock::new())
///     .contract(address!("00000000000000000000000000000000000000aa"))
///     .recipient(address!("00000000000000000000000000000000000000bb"))
///     .settle(SettlePolicy::fixed_delay())
///     .build()
///     .run()
///     .await?;
///
/// for hash in report.tx_hashes() {
///     println!("{hash}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Builder)]
pub struct Bootstrap<E, K>
where
    E: DelegatedExecutor,
    K: Clock,
{
    executor: E,
    clock: K,
    #[builder(default = NamedChain::Sepolia)]
    chain: NamedChain,
    contract: Address,
    recipient: Address,
    #[builder(default)]
    settle: SettlePolicy,
}

impl<E, K> Bootstrap<E, K>
where
    E: DelegatedExecutor,
    K: Clock,
{
    /// The calls made by [`run`](Self::run), in order.
    pub fn steps(&self) -> [BootstrapStep; 3] {
        [
            BootstrapStep::SetRecipient(self.recipient),
            BootstrapStep::SetRelayer(self.executor.signer_address()),
            BootstrapStep::RelayEth,
        ]
    }

    /// Verifies ownership, then sends each step and settles it before the next.
    ///
    /// # Errors
    ///
    /// Returns [`RelayerError::NotOwner`] without sending anything if the signer
    /// does not own the contract. Any failure after that stops the sequence;
    /// steps already mined stay applied.
    pub async fn run(&self) -> Result<BootstrapReport> {
        let signer = self.executor.signer_address();
        info!(
            signer = %signer,
            contract = %self.contract,
            recipient = %self.recipient,
            settle = ?self.settle,
            event = "bootstrap_started"
        );

        self.ensure_owner(signer).await?;

        let steps = self.steps();
        let mut report = BootstrapReport {
            steps: Vec::with_capacity(steps.len()),
        };

        for (index, step) in steps.iter().enumerate() {
            let is_last = index + 1 == steps.len();
            let span = spans::bootstrap_step(step.name(), index + 1, &self.contract);

            let outcome = async {
                let result = self.execute_step(*step, is_last).await;
                if let Err(e) = &result {
                    spans::record_error(e);
                    error!(step = step.name(), error = %e, event = "bootstrap_step_failed");
                }
                result
            }
            .instrument(span)
            .await?;

            report.steps.push(outcome);
        }

        info!(contract = %self.contract, event = "bootstrap_completed");
        Ok(report)
    }

    async fn ensure_owner(&self, signer: Address) -> Result<()> {
        let owner = self.executor.contract_owner(self.contract).await?;
        if owner != signer {
            error!(
                signer = %signer,
                owner = %owner,
                event = "bootstrap_not_owner"
            );
            return Err(RelayerError::NotOwner { signer, owner });
        }

        debug!(owner = %owner, event = "bootstrap_owner_verified");
        Ok(())
    }

    async fn execute_step(&self, step: BootstrapStep, is_last: bool) -> Result<StepOutcome> {
        let authorization = self.executor.sign_authorization(self.contract).await?;
        let tx_hash = self
            .executor
            .send_delegated(step.calldata(), authorization)
            .await?;

        info!(
            step = step.name(),
            tx_hash = %tx_hash,
            explorer_url = self.chain.explorer_tx_url(tx_hash).as_deref().unwrap_or(""),
            event = "bootstrap_transaction_sent"
        );

        let receipt = match self.settle {
            SettlePolicy::FixedDelay(delay) => {
                if !is_last {
                    debug!(delay_secs = delay.as_secs(), "Waiting before next step");
                    self.clock.sleep(delay).await;
                }
                None
            }
            SettlePolicy::Confirmation(polling) => {
                Some(self.wait_for_confirmation(tx_hash, polling).await?)
            }
        };

        Ok(StepOutcome {
            step,
            tx_hash,
            receipt,
        })
    }

    async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
        polling: ConfirmationPolling,
    ) -> Result<RelayReceipt> {
        let span = spans::wait_for_confirmation(
            tx_hash,
            polling.max_attempts,
            polling.poll_interval_secs,
        );

        async {
            let interval = Duration::from_secs(polling.poll_interval_secs);

            for attempt in 1..=polling.max_attempts {
                match self.executor.transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) if receipt.success => {
                        info!(
                            tx_hash = %tx_hash,
                            block_number = ?receipt.block_number,
                            attempt = attempt,
                            event = "bootstrap_transaction_confirmed"
                        );
                        return Ok(receipt);
                    }
                    Ok(Some(_)) => {
                        return Err(RelayerError::TransactionFailed {
                            reason: format!("transaction {tx_hash} reverted"),
                        });
                    }
                    Ok(None) => {
                        debug!(attempt = attempt, "Transaction not yet mined");
                    }
                    Err(e) => {
                        warn!(attempt = attempt, error = %e, "Receipt lookup failed, retrying");
                    }
                }

                if attempt < polling.max_attempts {
                    self.clock.sleep(interval).await;
                }
            }

            Err(RelayerError::ConfirmationTimeout {
                tx_hash,
                attempts: polling.max_attempts,
            })
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::unified::UnifiedDeposit::{relayETHCall, setRecipientCall, setRelayerCall};
    use crate::testing::{FakeClock, FakeDelegatedExecutor};
    use alloy_primitives::address;
    use alloy_sol_types::SolCall;
    use rstest::rstest;

    const CONTRACT: Address = address!("00000000000000000000000000000000000000aa");
    const RECIPIENT: Address = address!("00000000000000000000000000000000000000bb");

    #[rstest]
    #[case(BootstrapStep::SetRecipient(RECIPIENT), "setRecipient", setRecipientCall::SELECTOR)]
    #[case(BootstrapStep::SetRelayer(RECIPIENT), "setRelayer", setRelayerCall::SELECTOR)]
    #[case(BootstrapStep::RelayEth, "relayETH", relayETHCall::SELECTOR)]
    fn test_step_name_and_selector(
        #[case] step: BootstrapStep,
        #[case] name: &str,
        #[case] selector: [u8; 4],
    ) {
        assert_eq!(step.name(), name);
        assert_eq!(&step.calldata()[..4], &selector[..]);
    }

    #[test]
    fn test_set_relayer_step_enables_relayer() {
        let relayer = address!("00000000000000000000000000000000000000cc");
        let decoded =
            setRelayerCall::abi_decode(&BootstrapStep::SetRelayer(relayer).calldata()).unwrap();

        assert_eq!(decoded.relayer, relayer);
        assert!(decoded.status);
    }

    #[tokio::test]
    async fn test_steps_target_signer_as_relayer() {
        let executor = FakeDelegatedExecutor::new();
        let signer = executor.signer_address();
        let bootstrap = Bootstrap::builder()
            .executor(executor)
            .clock(FakeClock::new())
            .contract(CONTRACT)
            .recipient(RECIPIENT)
            .build();

        assert_eq!(
            bootstrap.steps(),
            [
                BootstrapStep::SetRecipient(RECIPIENT),
                BootstrapStep::SetRelayer(signer),
                BootstrapStep::RelayEth,
            ]
        );
    }

    #[tokio::test]
    async fn test_confirmation_waits_for_pending_receipts() {
        let executor = FakeDelegatedExecutor::new();
        executor.set_pending_polls(2);
        let clock = FakeClock::new();

        let report = Bootstrap::builder()
            .executor(executor.clone())
            .clock(clock.clone())
            .contract(CONTRACT)
            .recipient(RECIPIENT)
            .settle(SettlePolicy::confirmation())
            .build()
            .run()
            .await
            .unwrap();

        assert_eq!(report.steps.len(), 3);
        assert!(report.steps.iter().all(|outcome| outcome.receipt.is_some()));
        // Two pending lookups on the first step, then each step mines at once.
        assert_eq!(executor.receipt_poll_count(), 5);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(3); 2]);
    }

    #[tokio::test]
    async fn test_reverted_step_stops_sequence() {
        let executor = FakeDelegatedExecutor::new();
        executor.revert_transactions();

        let err = Bootstrap::builder()
            .executor(executor.clone())
            .clock(FakeClock::new())
            .contract(CONTRACT)
            .recipient(RECIPIENT)
            .settle(SettlePolicy::confirmation())
            .build()
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, RelayerError::TransactionFailed { .. }));
        assert_eq!(executor.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_default_settle_ignores_receipts() {
        let executor = FakeDelegatedExecutor::new();
        executor.revert_transactions();
        executor.never_mine();
        let clock = FakeClock::new();

        let report = Bootstrap::builder()
            .executor(executor.clone())
            .clock(clock.clone())
            .contract(CONTRACT)
            .recipient(RECIPIENT)
            .build()
            .run()
            .await
            .unwrap();

        assert_eq!(report.tx_hashes().len(), 3);
        assert_eq!(executor.sent().len(), 3);
        assert_eq!(executor.receipt_poll_count(), 0);
        assert_eq!(clock.sleeps(), vec![Duration::from_secs(15); 2]);
    }
}
