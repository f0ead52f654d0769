//! Alloy-based relayer implementation.

use alloy_network::{Ethereum, EthereumWallet, ReceiptResponse};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy_rpc_types::{Filter, Log};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, instrument, trace};
use url::Url;

use crate::contracts::unified::UnifiedDepositContract;
use crate::error::{RelayerError, Result};
use crate::traits::{RelayReceipt, RelayerContract, TransferLogSource};

/// Production relayer wrapping an Alloy [`Provider`] that signs with the
/// relayer key.
///
/// One instance serves one chain: it reads the unified contract, submits
/// `relayToken` transactions and watches the chain's USDC transfer logs.
///
/// # Examples
///
/// ```rust,no_run
/// use unified_relayer::providers::AlloyRelayer;
/// use alloy_primitives::address;
/// use alloy_signer_local::PrivateKeySigner;
///
/// let signer = PrivateKeySigner::random();
/// let unified = address!("00000000000000000000000000000000000000aa");
/// let relayer = AlloyRelayer::connect_http(
///     "http://localhost:8545".parse().unwrap(),
///     signer,
///     unified,
/// );
/// ```
pub struct AlloyRelayer<P>
where
    P: Provider<Ethereum> + Clone,
{
    provider: P,
    contract: UnifiedDepositContract<P>,
    relayer: Address,
}

impl AlloyRelayer<DynProvider<Ethereum>> {
    /// Connects to `rpc_url` over HTTP with a wallet for `signer`.
    pub fn connect_http(rpc_url: Url, signer: PrivateKeySigner, unified: Address) -> Self {
        let relayer = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url)
            .erased();

        Self::new(provider, unified, relayer)
    }
}

impl<P> AlloyRelayer<P>
where
    P: Provider<Ethereum> + Clone,
{
    /// Creates a relayer for the unified contract at `unified`.
    ///
    /// `provider` must be able to sign transactions for `relayer`.
    pub fn new(provider: P, unified: Address, relayer: Address) -> Self {
        Self {
            contract: UnifiedDepositContract::new(unified, provider.clone()),
            provider,
            relayer,
        }
    }

    /// Returns a reference to the underlying Alloy provider.
    pub fn inner(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P> RelayerContract for AlloyRelayer<P>
where
    P: Provider<Ethereum> + Clone + Send + Sync,
{
    fn relayer_address(&self) -> Address {
        self.relayer
    }

    #[instrument(skip(self))]
    async fn recipient(&self) -> Result<Address> {
        Ok(self.contract.recipient().await?)
    }

    #[instrument(skip(self), fields(relayer = %relayer))]
    async fn is_whitelisted(&self, relayer: Address) -> Result<bool> {
        Ok(self.contract.is_whitelisted(relayer).await?)
    }

    #[instrument(skip(self), fields(token = %token, amount = %amount))]
    async fn submit_relay(&self, token: Address, amount: U256) -> Result<TxHash> {
        let tx_request = self
            .contract
            .relay_token_transaction(self.relayer, token, amount);

        let pending_tx = self.provider.send_transaction(tx_request).await?;
        let tx_hash = *pending_tx.tx_hash();

        debug!(tx_hash = %tx_hash, "Relay transaction broadcast");
        Ok(tx_hash)
    }

    #[instrument(skip(self), fields(tx_hash = %tx_hash))]
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> Result<RelayReceipt> {
        trace!("Waiting for relay transaction receipt");
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(|e| RelayerError::Provider(format!("Receipt retrieval failed: {e}")))?;

        Ok(RelayReceipt {
            transaction_hash: ReceiptResponse::transaction_hash(&receipt),
            block_number: ReceiptResponse::block_number(&receipt),
            success: ReceiptResponse::status(&receipt),
        })
    }
}

#[async_trait]
impl<P> TransferLogSource for AlloyRelayer<P>
where
    P: Provider<Ethereum> + Clone + Send + Sync,
{
    #[instrument(skip(self, filter))]
    async fn watch_logs(&self, filter: Filter) -> Result<BoxStream<'static, Log>> {
        let poller = self.provider.watch_logs(&filter).await?;
        debug!("Log filter installed");

        Ok(poller.into_stream().flat_map(stream::iter).boxed())
    }
}
