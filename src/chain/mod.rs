//! Chain module - the network collaborator of the airdrop workflow
//!
//! This module provides:
//! - Network selection (mainnet, testnet, devnet, local fullnode)
//! - The `NetworkClient` seam the submitter is written against
//! - A REST implementation against the Aptos fullnode API
//! - Local BCS encoding of the bytes a sender signs
//! - Bounded finality polling

pub mod finality;
pub mod rest;
pub mod signing;

pub use finality::WaitOptions;
pub use rest::RestClient;

use crate::error::AirdropResult;
use crate::types::{
    AccountAddress, EntryFunctionArgument, EntryPoint, FinalityResult, SubmissionReceipt,
    TransactionRequest,
};
use crate::wallet::SigningIdentity;

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

/// Target network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
    Local,
}

impl Network {
    /// Public fullnode REST endpoint for the network
    pub fn default_rest_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://api.mainnet.aptoslabs.com/v1",
            Network::Testnet => "https://api.testnet.aptoslabs.com/v1",
            Network::Devnet => "https://api.devnet.aptoslabs.com/v1",
            Network::Local => "http://127.0.0.1:8080/v1",
        }
    }

    /// Chain id the network is known to carry. Devnet is reset with new ids
    /// and a local node may be started with any id.
    pub fn chain_id(&self) -> Option<u8> {
        match self {
            Network::Mainnet => Some(1),
            Network::Testnet => Some(2),
            Network::Devnet | Network::Local => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Local => "local",
        };
        f.write_str(name)
    }
}

/// Operations the airdrop workflow needs from a network
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// Resolve sequence number, gas price and chain id into an unsigned transaction
    async fn build_simple_transaction(
        &self,
        sender: AccountAddress,
        entry_point: &EntryPoint,
        arguments: Vec<EntryFunctionArgument>,
    ) -> AirdropResult<TransactionRequest>;

    /// Sign the request and submit it in one step
    async fn sign_and_submit(
        &self,
        identity: &SigningIdentity,
        request: &TransactionRequest,
    ) -> AirdropResult<SubmissionReceipt>;

    /// Block until the transaction is committed or the wait times out
    async fn wait_for_transaction(
        &self,
        hash: &str,
        options: WaitOptions,
    ) -> AirdropResult<FinalityResult>;
}
