use alloy_primitives::{Address, TxHash};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayerError {
    #[error("Chain not supported: {chain}")]
    ChainNotSupported { chain: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Contract call failed: {0}")]
    ContractCall(#[from] alloy_contract::Error),

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Timed out waiting for confirmation of {tx_hash} after {attempts} attempts")]
    ConfirmationTimeout { tx_hash: TxHash, attempts: u32 },

    #[error("Account {signer} is not the contract owner (owner is {owner})")]
    NotOwner { signer: Address, owner: Address },

    #[error("Missing required environment variable `{key}`")]
    MissingEnv { key: &'static str },

    #[error("Invalid value in `{key}`: {reason}")]
    InvalidEnv { key: &'static str, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Signer error: {0}")]
    Signer(#[from] alloy_signer::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>),

    #[error("Malformed log: {0}")]
    InvalidLog(String),

    #[error("ABI encoding/decoding error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("Telemetry error: {0}")]
    Telemetry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayerError {
    /// Stable variant name, recorded as `error.type` on spans.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ChainNotSupported { .. } => "ChainNotSupported",
            Self::Provider(_) => "Provider",
            Self::ContractCall(_) => "ContractCall",
            Self::TransactionFailed { .. } => "TransactionFailed",
            Self::ConfirmationTimeout { .. } => "ConfirmationTimeout",
            Self::NotOwner { .. } => "NotOwner",
            Self::MissingEnv { .. } => "MissingEnv",
            Self::InvalidEnv { .. } => "InvalidEnv",
            Self::InvalidConfig(_) => "InvalidConfig",
            Self::Signer(_) => "Signer",
            Self::Rpc(_) => "Rpc",
            Self::InvalidLog(_) => "InvalidLog",
            Self::Abi(_) => "Abi",
            Self::Telemetry(_) => "Telemetry",
            Self::Io(_) => "Io",
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayerError>;
