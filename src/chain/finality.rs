//! Finality polling for submitted transactions
//!
//! Aptos has instant finality once a transaction is committed to the ledger,
//! so "final" means the fullnode reports the transaction with a version and
//! a success flag. Until then the node answers 404 or `pending_transaction`.

use crate::error::{AirdropError, AirdropResult};
use crate::types::FinalityResult;

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info};

/// Bounds for a finality wait
///
/// The delay between lookups starts at `poll_interval` and grows by
/// `backoff_multiplier` after every pending answer, up to `max_poll_interval`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub backoff_multiplier: f64,
    pub max_poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            poll_interval: Duration::from_millis(200),
            backoff_multiplier: 1.5,
            max_poll_interval: Duration::from_secs(5),
        }
    }
}

impl WaitOptions {
    /// Delay to use after `current` has been slept once
    pub fn next_poll_interval(&self, current: Duration) -> Duration {
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return current.min(self.max_poll_interval);
        }
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff_multiplier)
            .unwrap_or(self.max_poll_interval)
            .min(self.max_poll_interval)
    }
}

/// What a single lookup saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    /// Unknown to the node or still in the mempool
    Pending,
    Committed(FinalityResult),
}

/// Poll `lookup` until it reports a committed transaction or `options.timeout` elapses
pub async fn wait_for_finality<F, Fut>(
    hash: &str,
    options: WaitOptions,
    mut lookup: F,
) -> AirdropResult<FinalityResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AirdropResult<TransactionStatus>>,
{
    let started = Instant::now();

    let poll = async {
        let mut attempts = 0u32;
        let mut delay = options.poll_interval.min(options.max_poll_interval);
        loop {
            attempts += 1;
            match lookup().await? {
                TransactionStatus::Committed(result) => {
                    info!(
                        "Transaction {} committed at version {} after {} polls in {}ms (success: {})",
                        hash,
                        result.version,
                        attempts,
                        started.elapsed().as_millis(),
                        result.success
                    );
                    return Ok(result);
                }
                TransactionStatus::Pending => {
                    debug!(
                        "Transaction {} still pending (poll {}), next lookup in {}ms",
                        hash,
                        attempts,
                        delay.as_millis()
                    );
                    sleep(delay).await;
                    delay = options.next_poll_interval(delay);
                }
            }
        }
    };

    timeout(options.timeout, poll)
        .await
        .map_err(|_| AirdropError::Timeout {
            operation: format!(
                "transaction {} to commit ({}s)",
                hash,
                options.timeout.as_secs()
            ),
        })?
}
