//! Unified deposit contract bindings and wrapper
//!
//! The unified contract aggregates USDC deposits on every chain it is deployed
//! to. Whitelisted relayers call `relayToken` to forward the received balance
//! to the configured recipient; the owner configures the recipient and the
//! relayer whitelist.

use alloy_network::Ethereum;
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use tracing::{debug, info};

use UnifiedDeposit::{relayETHCall, setRecipientCall, setRelayerCall, UnifiedDepositInstance};

/// The unified deposit contract wrapper
///
/// # Example
///
/// ```rust,no_run
/// use unified_relayer::UnifiedDepositContract;
/// use alloy_primitives::address;
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = ProviderBuilder::new().connect("http://localhost:8545").await?;
/// let unified = address!("00000000000000000000000000000000000000aa");
///
/// let contract = UnifiedDepositContract::new(unified, provider);
/// let recipient = contract.recipient().await?;
/// # Ok(())
/// # }
/// ```
pub struct UnifiedDepositContract<P: Provider<Ethereum>> {
    instance: UnifiedDepositInstance<P>,
}

impl<P: Provider<Ethereum>> UnifiedDepositContract<P> {
    /// Create a new UnifiedDepositContract.
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "unified_contract_initialized"
        );
        Self {
            instance: UnifiedDepositInstance::new(address, provider),
        }
    }

    /// Read the address relayed funds are forwarded to
    pub async fn recipient(&self) -> Result<Address, alloy_contract::Error> {
        let recipient = self.instance.recipient().call().await?;

        debug!(
            recipient = %recipient,
            contract_address = %self.instance.address(),
            event = "recipient_retrieved"
        );

        Ok(recipient)
    }

    /// Check the relayer whitelist for `relayer`
    pub async fn is_whitelisted(&self, relayer: Address) -> Result<bool, alloy_contract::Error> {
        let whitelisted = self.instance.whitelistedRelayers(relayer).call().await?;

        debug!(
            relayer = %relayer,
            whitelisted = whitelisted,
            contract_address = %self.instance.address(),
            event = "whitelist_status_retrieved"
        );

        Ok(whitelisted)
    }

    /// Read the contract owner
    pub async fn owner(&self) -> Result<Address, alloy_contract::Error> {
        let owner = self.instance.owner().call().await?;

        debug!(
            owner = %owner,
            contract_address = %self.instance.address(),
            event = "owner_retrieved"
        );

        Ok(owner)
    }

    /// Create the transaction request for `relayToken(token, amount)`.
    ///
    /// This creates but does not send the transaction.
    pub fn relay_token_transaction(
        &self,
        from: Address,
        token: Address,
        amount: U256,
    ) -> TransactionRequest {
        info!(
            from = %from,
            token = %token,
            amount = %amount,
            contract_address = %self.instance.address(),
            event = "relay_token_transaction_created"
        );

        self.instance
            .relayToken(token, amount)
            .from(from)
            .into_transaction_request()
    }

    /// Returns the contract address
    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

/// Calldata for `setRecipient(newRecipient)`
pub fn set_recipient_calldata(new_recipient: Address) -> Bytes {
    setRecipientCall {
        newRecipient: new_recipient,
    }
    .abi_encode()
    .into()
}

/// Calldata for `setRelayer(relayer, status)`
pub fn set_relayer_calldata(relayer: Address, status: bool) -> Bytes {
    setRelayerCall { relayer, status }.abi_encode().into()
}

/// Calldata for `relayETH()`
pub fn relay_eth_calldata() -> Bytes {
    relayETHCall {}.abi_encode().into()
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract UnifiedDeposit {
        function recipient() external view returns (address);
        function whitelistedRelayers(address) external view returns (bool);
        function owner() external view returns (address);
        function relayToken(address token, uint256 amount) external;
        function setRecipient(address newRecipient) external;
        function setRelayer(address relayer, bool status) external;
        function relayETH() external;
    }
);
