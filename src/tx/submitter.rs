//! Builds, signs and submits the airdrop transaction, then waits for finality

use crate::chain::{NetworkClient, WaitOptions};
use crate::error::{AirdropError, AirdropResult};
use crate::types::{AccountAddress, EntryFunctionArgument, EntryPoint};
use crate::wallet::SigningIdentity;

use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Fully qualified `airdrop_and_register` entry point of the deployed token contract
pub const DEFAULT_ENTRY_POINT: &str =
    "0xc900cff263488493c8b442a4ceb42c947f690230324f40047f644c8ab81d50e9::custom_token::airdrop_and_register";

/// Tokens sent per airdrop, in base units
pub const AIRDROP_AMOUNT: u64 = 100_000_000_000_000;

/// Knobs for one submission
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    pub submit_timeout: Duration,
    pub wait: WaitOptions,
    /// Raise `TransactionFailed` instead of returning `false` for a failed execution
    pub check_success: bool,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            submit_timeout: Duration::from_secs(30),
            wait: WaitOptions::default(),
            check_success: true,
        }
    }
}

/// Runs the airdrop workflow against a network client
pub struct TransactionSubmitter<'a, C: NetworkClient + ?Sized> {
    client: &'a C,
    entry_point: EntryPoint,
    options: SubmitOptions,
}

impl<'a, C: NetworkClient + ?Sized> TransactionSubmitter<'a, C> {
    /// Submitter calling the default entry point
    pub fn new(client: &'a C) -> AirdropResult<Self> {
        Ok(Self::with_entry_point(client, DEFAULT_ENTRY_POINT.parse()?))
    }

    pub fn with_entry_point(client: &'a C, entry_point: EntryPoint) -> Self {
        Self {
            client,
            entry_point,
            options: SubmitOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SubmitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn entry_point(&self) -> &EntryPoint {
        &self.entry_point
    }

    /// Airdrop `AIRDROP_AMOUNT` to `recipient`, signed by `sender_secret`.
    ///
    /// Returns whether the committed transaction succeeded. The secret and the
    /// recipient are validated before anything is sent to the network.
    pub async fn submit(&self, sender_secret: &str, recipient: &str) -> AirdropResult<bool> {
        let identity = SigningIdentity::from_secret(sender_secret)?;
        let recipient: AccountAddress = recipient.parse()?;
        let sender = identity.address();

        info!(
            "Airdropping {} base units from {} to {} via {}",
            AIRDROP_AMOUNT, sender, recipient, self.entry_point
        );

        let arguments = vec![
            EntryFunctionArgument::Address(recipient),
            EntryFunctionArgument::U64(AIRDROP_AMOUNT),
        ];
        let request = self
            .client
            .build_simple_transaction(sender, &self.entry_point, arguments)
            .await?;
        debug!("Transaction built with sequence number {}", request.sequence_number);

        let receipt = timeout(
            self.options.submit_timeout,
            self.client.sign_and_submit(&identity, &request),
        )
        .await
        .map_err(|_| AirdropError::Timeout {
            operation: "transaction submission".to_string(),
        })??;
        drop(identity);

        let result = self
            .client
            .wait_for_transaction(&receipt.hash, self.options.wait)
            .await?;

        if !result.success {
            warn!(
                "Transaction {} executed but failed: {}",
                receipt.hash, result.vm_status
            );
            if self.options.check_success {
                return Err(AirdropError::TransactionFailed {
                    hash: receipt.hash,
                    vm_status: result.vm_status,
                });
            }
        }

        Ok(result.success)
    }
}
