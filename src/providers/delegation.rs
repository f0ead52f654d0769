//! Alloy-based EIP-7702 delegated execution.

use alloy_eips::eip7702::{Authorization, SignedAuthorization};
use alloy_network::{
    Ethereum, EthereumWallet, ReceiptResponse, TransactionBuilder, TransactionBuilder7702,
};
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::{debug, instrument};
use url::Url;

use crate::contracts::unified::UnifiedDepositContract;
use crate::error::Result;
use crate::traits::{DelegatedExecutor, RelayReceipt};

/// Owner account that executes contract logic in its own context through
/// EIP-7702 authorizations.
pub struct AlloyDelegator<P>
where
    P: Provider<Ethereum> + Clone,
{
    provider: P,
    signer: PrivateKeySigner,
}

impl AlloyDelegator<DynProvider<Ethereum>> {
    /// Connects to `rpc_url` over HTTP with a wallet for `signer`.
    pub fn connect_http(rpc_url: Url, signer: PrivateKeySigner) -> Self {
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(rpc_url)
            .erased();

        Self::new(provider, signer)
    }
}

impl<P> AlloyDelegator<P>
where
    P: Provider<Ethereum> + Clone,
{
    /// `provider` must sign transactions with `signer`.
    pub fn new(provider: P, signer: PrivateKeySigner) -> Self {
        Self { provider, signer }
    }
}

#[async_trait]
impl<P> DelegatedExecutor for AlloyDelegator<P>
where
    P: Provider<Ethereum> + Clone + Send + Sync,
{
    fn signer_address(&self) -> Address {
        self.signer.address()
    }

    #[instrument(skip(self), fields(contract = %contract))]
    async fn contract_owner(&self, contract: Address) -> Result<Address> {
        let contract = UnifiedDepositContract::new(contract, self.provider.clone());
        Ok(contract.owner().await?)
    }

    #[instrument(skip(self), fields(contract = %contract))]
    async fn sign_authorization(&self, contract: Address) -> Result<SignedAuthorization> {
        let chain_id = self.provider.get_chain_id().await?;
        let nonce = self
            .provider
            .get_transaction_count(self.signer.address())
            .pending()
            .await?;

        // The delegating transaction consumes `nonce` before the authorization
        // list is processed.
        let authorization = Authorization {
            chain_id: U256::from(chain_id),
            address: contract,
            nonce: nonce + 1,
        };
        let signature = self
            .signer
            .sign_hash_sync(&authorization.signature_hash())?;

        debug!(
            chain_id = chain_id,
            authorization_nonce = nonce + 1,
            "Authorization signed"
        );

        Ok(authorization.into_signed(signature))
    }

    #[instrument(skip(self, call, authorization))]
    async fn send_delegated(
        &self,
        call: Bytes,
        authorization: SignedAuthorization,
    ) -> Result<TxHash> {
        let eoa = self.signer.address();
        let tx_request = TransactionRequest::default()
            .with_from(eoa)
            .with_to(eoa)
            .with_input(call)
            .with_authorization_list(vec![authorization]);

        let pending_tx = self.provider.send_transaction(tx_request).await?;
        Ok(*pending_tx.tx_hash())
    }

    #[instrument(skip(self), fields(tx_hash = %tx_hash))]
    async fn transaction_receipt(&self, tx_hash: TxHash) -> Result<Option<RelayReceipt>> {
        let receipt = self.provider.get_transaction_receipt(tx_hash).await?;

        Ok(receipt.map(|receipt| RelayReceipt {
            transaction_hash: ReceiptResponse::transaction_hash(&receipt),
            block_number: ReceiptResponse::block_number(&receipt),
            success: ReceiptResponse::status(&receipt),
        }))
    }
}
