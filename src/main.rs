//! Token airdrop submitter
//!
//! Signs and submits one `airdrop_and_register` call to an Aptos network on
//! behalf of the contract wallet, then waits for the transaction to commit.

use anyhow::Result;
use std::process::ExitCode;
use tokio::signal;
use tracing::{error, info, warn};

mod chain;
mod config;
mod error;
mod tx;
mod types;
mod wallet;

use chain::rest::BuildOptions;
use chain::RestClient;
use config::{LoggingConfig, Settings};
use tx::{SubmitOptions, TransactionSubmitter};

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingConfig::default());
            error!("Failed to load configuration: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&settings.logging);

    info!("Starting token airdrop v{}", env!("CARGO_PKG_VERSION"));

    tokio::select! {
        outcome = run(&settings) => match outcome {
            Ok(true) => {
                info!("Airdrop committed successfully");
                ExitCode::SUCCESS
            }
            Ok(false) => {
                warn!("Airdrop committed but did not succeed");
                ExitCode::FAILURE
            }
            Err(e) => {
                error!("Airdrop failed: {:#}", e);
                ExitCode::FAILURE
            }
        },
        _ = shutdown_signal() => {
            warn!("Shutdown signal received, abandoning in-flight airdrop");
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &Settings) -> Result<bool> {
    let client = RestClient::new(
        &settings.rest_url(),
        std::time::Duration::from_secs(settings.network.request_timeout_secs),
    )?
    .with_build_options(BuildOptions {
        max_gas_amount: settings.submission.max_gas_amount,
        gas_unit_price: settings.submission.gas_unit_price,
        expiration_secs: settings.submission.expiration_secs,
    })
    .with_expected_chain_id(settings.network.name.chain_id());
    info!(
        "Using {} fullnode at {}",
        settings.network.name,
        client.base_url()
    );

    let submitter = TransactionSubmitter::with_entry_point(&client, settings.entry_point()?)
        .with_options(SubmitOptions {
            submit_timeout: settings.submission.submit_timeout(),
            wait: settings.submission.wait_options(),
            check_success: settings.submission.check_success,
        });
    info!(
        "Calling {} with {} base units",
        submitter.entry_point(),
        tx::AIRDROP_AMOUNT
    );

    let private_key = settings.private_key()?;
    match submitter
        .submit(&private_key, &settings.airdrop.recipient)
        .await
    {
        Ok(success) => Ok(success),
        Err(e) => {
            if e.is_local() {
                warn!("Nothing was sent to the network");
            }
            Err(e.into())
        }
    }
}

fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,token_airdrop=debug,hyper=warn,reqwest=warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
