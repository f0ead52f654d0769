use std::sync::Arc;

use alloy_primitives::Address;
use alloy_rpc_types::{Filter, Log};
use bon::Builder;
use futures::stream::{BoxStream, StreamExt};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn, Instrument};

use super::DispatchConfig;
use crate::chain::UnifiedChain;
use crate::config::{ChainConfig, MonitorConfig};
use crate::contracts::erc20::transfer_filter;
use crate::providers::AlloyRelayer;
use crate::spans;
use crate::traits::{RelayReceipt, RelayerContract, TransferLogSource};
use crate::transfer::TransferEvent;

/// How the monitor disposed of one inbound transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// `relayToken` was mined successfully
    Relayed(RelayReceipt),
    /// `relayToken` was mined but reverted
    Reverted(RelayReceipt),
    /// The relayer account is not on the contract's whitelist
    NotWhitelisted,
    /// The whitelist view call failed; nothing was submitted
    WhitelistCheckFailed,
    /// The relay transaction could not be signed or broadcast
    SubmissionFailed,
    /// The relay transaction was broadcast but its receipt never arrived
    ConfirmationFailed,
}

/// Watches one chain's USDC transfers into the unified contract and relays them.
///
/// The monitor is cheap to clone; clones share the same contract handle.
///
/// # Example
///
/// ```rust,no_run
/// use alloy_chains::NamedChain;
/// use alloy_primitives::address;
/// use std::sync::Arc;
/// use unified_relayer::config::ChainConfig;
/// use unified_relayer::monitor::ChainMonitor;
/// use unified_relayer::testing::FakeRelayerContract;
///
/// # async fn example() -> unified_relayer::Result<()> {
/// let monitor = ChainMonitor::builder()
///     .contract(Arc::new(FakeRelayerContract::new()))
///     .chain(ChainConfig::new(NamedChain::Sepolia, None)?)
///     .unified(address!("00000000000000000000000000000000000000aa"))
///     .build();
///
/// monitor.start().await;
/// # Ok(())
/// # }
/// ```
#[derive(Builder)]
pub struct ChainMonitor<C>
where
    C: RelayerContract + TransferLogSource + 'static,
{
    contract: Arc<C>,
    chain: ChainConfig,
    unified: Address,
    #[builder(default)]
    dispatch: DispatchConfig,
}

impl<C> Clone for ChainMonitor<C>
where
    C: RelayerContract + TransferLogSource + 'static,
{
    fn clone(&self) -> Self {
        Self {
            contract: Arc::clone(&self.contract),
            chain: self.chain.clone(),
            unified: self.unified,
            dispatch: self.dispatch,
        }
    }
}

impl<C> ChainMonitor<C>
where
    C: RelayerContract + TransferLogSource + 'static,
{
    /// Log filter for USDC `Transfer` events whose `to` is the unified contract.
    pub fn filter(&self) -> Filter {
        transfer_filter(self.chain.usdc(), self.unified)
    }

    /// Subscribes to transfers and relays them until the log stream ends.
    ///
    /// Failing to subscribe is logged and ends this chain's monitor; other
    /// chains keep running.
    pub async fn start(&self) {
        let span = spans::monitor_chain(
            self.chain.name(),
            self.chain.chain_id(),
            &self.chain.usdc(),
            &self.unified,
        );

        async {
            self.log_recipient().await;

            let logs = match self.contract.watch_logs(self.filter()).await {
                Ok(logs) => logs,
                Err(e) => {
                    error!(
                        chain = self.chain.name(),
                        error = %e,
                        event = "transfer_subscription_failed"
                    );
                    return;
                }
            };

            info!(
                chain = self.chain.name(),
                usdc = %self.chain.usdc(),
                event = "monitor_started"
            );

            self.run(logs).await;

            warn!(chain = self.chain.name(), event = "transfer_stream_ended");
        }
        .instrument(span)
        .await
    }

    /// Decodes `logs` and relays every transfer into the unified contract.
    ///
    /// Transfers flow through a bounded queue: once `queue_capacity` transfers
    /// are waiting, reading pauses until a relay worker takes one. Returns after
    /// the stream ends and every queued transfer has been handled.
    ///
    /// Delivery is best effort: nothing is persisted, so transfers seen before
    /// a restart are not replayed. Logs the node marks as removed by a reorg
    /// are skipped rather than relayed a second time.
    pub async fn run(&self, logs: BoxStream<'static, Log>) {
        let (queue_tx, queue_rx) = mpsc::channel(self.dispatch.queue_capacity());

        tokio::join!(
            self.read_transfers(logs, queue_tx),
            self.dispatch_transfers(queue_rx)
        );
    }

    async fn read_transfers(
        &self,
        mut logs: BoxStream<'static, Log>,
        queue: mpsc::Sender<TransferEvent>,
    ) {
        while let Some(log) = logs.next().await {
            if log.removed {
                debug!(
                    chain = self.chain.name(),
                    tx_hash = ?log.transaction_hash,
                    event = "transfer_log_removed"
                );
                continue;
            }

            let transfer = match TransferEvent::decode(&log) {
                Ok(transfer) => transfer,
                Err(e) => {
                    error!(
                        chain = self.chain.name(),
                        tx_hash = ?log.transaction_hash,
                        error = %e,
                        event = "transfer_decode_failed"
                    );
                    continue;
                }
            };

            // The node already filters on `to`; this guards against a
            // misbehaving endpoint.
            if transfer.to != self.unified {
                continue;
            }

            info!(
                chain = self.chain.name(),
                from = %transfer.from,
                amount = %transfer.amount,
                tx_hash = ?transfer.tx_hash,
                event = "usdc_transfer_received"
            );

            if queue.send(transfer).await.is_err() {
                break;
            }
        }
    }

    async fn dispatch_transfers(&self, mut queue: mpsc::Receiver<TransferEvent>) {
        let permits = Arc::new(Semaphore::new(self.dispatch.max_in_flight()));
        let mut workers = JoinSet::new();

        loop {
            let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
                break;
            };
            let Some(transfer) = queue.recv().await else {
                break;
            };

            let monitor = self.clone();
            workers.spawn(async move {
                let _permit = permit;
                monitor.handle_transfer(&transfer).await
            });

            while let Some(finished) = workers.try_join_next() {
                self.reap(finished);
            }
        }

        while let Some(finished) = workers.join_next().await {
            self.reap(finished);
        }
    }

    fn reap(&self, finished: Result<RelayOutcome, tokio::task::JoinError>) {
        match finished {
            Ok(outcome) => debug!(
                chain = self.chain.name(),
                outcome = ?outcome,
                event = "relay_worker_finished"
            ),
            Err(e) => error!(
                chain = self.chain.name(),
                error = %e,
                event = "relay_worker_panicked"
            ),
        }
    }

    /// Relays one transfer if the relayer is whitelisted.
    ///
    /// Every failure is logged here and reported through the returned outcome;
    /// none of them stop the monitor.
    pub async fn handle_transfer(&self, transfer: &TransferEvent) -> RelayOutcome {
        let span = spans::handle_transfer(
            self.chain.name(),
            &transfer.from,
            &transfer.amount,
            transfer.tx_hash,
        );

        self.relay(transfer).instrument(span).await
    }

    async fn relay(&self, transfer: &TransferEvent) -> RelayOutcome {
        let relayer = self.contract.relayer_address();

        match self.contract.is_whitelisted(relayer).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(
                    chain = self.chain.name(),
                    relayer = %relayer,
                    event = "relayer_not_whitelisted"
                );
                return RelayOutcome::NotWhitelisted;
            }
            Err(e) => {
                spans::record_error(&e);
                error!(
                    chain = self.chain.name(),
                    relayer = %relayer,
                    error = %e,
                    event = "whitelist_check_failed"
                );
                return RelayOutcome::WhitelistCheckFailed;
            }
        }

        let tx_hash = match self
            .contract
            .submit_relay(self.chain.usdc(), transfer.amount)
            .await
        {
            Ok(tx_hash) => tx_hash,
            Err(e) => {
                spans::record_error(&e);
                error!(
                    chain = self.chain.name(),
                    amount = %transfer.amount,
                    error = %e,
                    event = "relay_submission_failed"
                );
                return RelayOutcome::SubmissionFailed;
            }
        };

        info!(
            chain = self.chain.name(),
            tx_hash = %tx_hash,
            explorer_url = self.chain.chain().explorer_tx_url(tx_hash).as_deref().unwrap_or(""),
            event = "relay_transaction_sent"
        );

        match self.contract.wait_for_receipt(tx_hash).await {
            Ok(receipt) if receipt.success => {
                info!(
                    chain = self.chain.name(),
                    tx_hash = %receipt.transaction_hash,
                    block_number = ?receipt.block_number,
                    event = "relay_transaction_confirmed"
                );
                RelayOutcome::Relayed(receipt)
            }
            Ok(receipt) => {
                spans::record_failure("TransactionReverted", "relayToken reverted");
                error!(
                    chain = self.chain.name(),
                    tx_hash = %receipt.transaction_hash,
                    block_number = ?receipt.block_number,
                    event = "relay_transaction_reverted"
                );
                RelayOutcome::Reverted(receipt)
            }
            Err(e) => {
                spans::record_error(&e);
                error!(
                    chain = self.chain.name(),
                    tx_hash = %tx_hash,
                    error = %e,
                    event = "relay_confirmation_failed"
                );
                RelayOutcome::ConfirmationFailed
            }
        }
    }

    async fn log_recipient(&self) {
        match self.contract.recipient().await {
            Ok(recipient) => info!(
                chain = self.chain.name(),
                recipient = %recipient,
                event = "relay_recipient"
            ),
            Err(e) => warn!(
                chain = self.chain.name(),
                error = %e,
                event = "recipient_lookup_failed"
            ),
        }
    }
}

/// Spawns a monitor task for every chain with an RPC URL.
///
/// Returns no handles when the unified address or relayer key is missing; the
/// health endpoint still runs in that case.
pub fn start_chain_monitors(config: &MonitorConfig) -> Vec<JoinHandle<()>> {
    for chain in config.chains().iter().filter(|chain| chain.rpc_url().is_none()) {
        debug!(chain = chain.name(), event = "chain_not_configured");
    }

    let targets = config.monitor_targets();
    if targets.is_empty() {
        warn!(
            unified_address_set = config.unified_address().is_some(),
            relayer_key_set = config.relayer_signer().is_some(),
            event = "monitoring_disabled"
        );
    }

    targets
        .into_iter()
        .map(|(chain, rpc_url, unified, signer)| {
            let contract = AlloyRelayer::connect_http(rpc_url.clone(), signer.clone(), unified);
            let monitor = ChainMonitor::builder()
                .contract(Arc::new(contract))
                .chain(chain.clone())
                .unified(unified)
                .dispatch(config.dispatch())
                .build();

            tokio::spawn(async move { monitor.start().await })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{transfer_log, FakeRelayerContract};
    use alloy_chains::NamedChain;
    use alloy_primitives::{address, U256};

    const UNIFIED: Address = address!("00000000000000000000000000000000000000aa");
    const DEPOSITOR: Address = address!("00000000000000000000000000000000000000d1");

    fn monitor(contract: &FakeRelayerContract) -> ChainMonitor<FakeRelayerContract> {
        ChainMonitor::builder()
            .contract(Arc::new(contract.clone()))
            .chain(ChainConfig::new(NamedChain::ArbitrumSepolia, None).unwrap())
            .unified(UNIFIED)
            .build()
    }

    fn transfer(amount: u64) -> TransferEvent {
        let log = transfer_log(
            crate::chain::ARBITRUM_SEPOLIA_USDC_ADDRESS,
            DEPOSITOR,
            UNIFIED,
            U256::from(amount),
        );
        TransferEvent::decode(&log).unwrap()
    }

    #[test]
    fn test_filter_targets_chain_usdc_and_unified() {
        let contract = FakeRelayerContract::new();
        let filter = monitor(&contract).filter();

        assert!(filter
            .address
            .matches(&crate::chain::ARBITRUM_SEPOLIA_USDC_ADDRESS));
        assert!(filter.topics[2].matches(&UNIFIED.into_word()));
    }

    #[tokio::test]
    async fn test_whitelisted_relayer_relays_usdc() {
        let contract = FakeRelayerContract::new();

        let outcome = monitor(&contract).handle_transfer(&transfer(250)).await;

        assert!(matches!(outcome, RelayOutcome::Relayed(receipt) if receipt.success));
        assert_eq!(
            contract.relay_calls(),
            vec![(crate::chain::ARBITRUM_SEPOLIA_USDC_ADDRESS, U256::from(250u64))]
        );
    }

    #[tokio::test]
    async fn test_relay_failures_are_reported_not_raised() {
        let contract = FakeRelayerContract::new();
        contract.fail_submission();
        assert_eq!(
            monitor(&contract).handle_transfer(&transfer(1)).await,
            RelayOutcome::SubmissionFailed
        );

        let contract = FakeRelayerContract::new();
        contract.fail_confirmation();
        assert_eq!(
            monitor(&contract).handle_transfer(&transfer(1)).await,
            RelayOutcome::ConfirmationFailed
        );

        let contract = FakeRelayerContract::new();
        contract.revert_relays();
        assert!(matches!(
            monitor(&contract).handle_transfer(&transfer(1)).await,
            RelayOutcome::Reverted(receipt) if !receipt.success
        ));
    }

    #[tokio::test]
    async fn test_start_survives_subscription_failure() {
        let contract = FakeRelayerContract::new();
        contract.fail_watch();

        monitor(&contract).start().await;

        assert!(contract.relay_calls().is_empty());
    }
}
