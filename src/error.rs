//! Error types for the token airdrop submitter

use thiserror::Error;

/// Main error type for the airdrop workflow
#[derive(Error, Debug)]
pub enum AirdropError {
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    #[error("Invalid account address {address:?}: {message}")]
    InvalidAddress { address: String, message: String },

    #[error("Invalid entry point {entry_point:?}: {message}")]
    InvalidEntryPoint { entry_point: String, message: String },

    #[error("Failed to build transaction: {0}")]
    Build(String),

    #[error("Transaction submission rejected: {0}")]
    Submission(String),

    #[error("Timeout waiting for {operation}")]
    Timeout { operation: String },

    #[error("Transaction {hash} failed on-chain: {vm_status}")]
    TransactionFailed { hash: String, vm_status: String },

    #[error("Network connection error: {0}")]
    ChainConnection(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AirdropError {
    /// Whether the error happened before anything was sent to the network
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AirdropError::InvalidKey(_)
                | AirdropError::InvalidAddress { .. }
                | AirdropError::InvalidEntryPoint { .. }
                | AirdropError::Config(_)
        )
    }
}

/// Result type for airdrop operations
pub type AirdropResult<T> = Result<T, AirdropError>;
