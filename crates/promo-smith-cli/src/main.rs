#![doc = include_str!("../README.md")]

mod config;
mod input;
mod report;
mod telemetry;

use clap::Parser;
use config::{CliArgs, Config, StoreTarget};
use input::load_users;
use promo_smith::{Allocator, BatchReport, MemoryStore, ThreadRandom, UserId};
use promo_smith_parse::ParseStore;
use report::Summary;
use std::process::ExitCode;
use telemetry::init_telemetry;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry()?;

    let users = load_users(&config.users).await?;
    log_startup_info(&config, users.len());

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    let report = run_batch(&config, &users, &cancel).await?;
    print!("{}", Summary::new(&report, config.notes.as_deref()));

    if report.error_count() == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn run_batch(
    config: &Config,
    users: &[UserId],
    cancel: &CancellationToken,
) -> anyhow::Result<BatchReport> {
    let allocator = Allocator::new(config.allocator, ThreadRandom);
    let report = match &config.store {
        StoreTarget::Memory => {
            let store = MemoryStore::new();
            allocator
                .allocate_batch_until(users, &config.scheme, &store, cancel)
                .await
        }
        StoreTarget::Parse(parse) => {
            let store = ParseStore::new(parse)?;
            allocator
                .allocate_batch_until(users, &config.scheme, &store, cancel)
                .await
        }
    };
    Ok(report)
}

fn log_startup_info(_config: &Config, _users: usize) {
    #[cfg(feature = "tracing")]
    {
        match &_config.store {
            StoreTarget::Memory => tracing::info!(
                users = _users,
                "Dry run with {} against an in-memory store",
                _config.scheme
            ),
            StoreTarget::Parse(parse) => tracing::info!(
                users = _users,
                class = %parse.class_name,
                "Issuing codes with {} into {}",
                _config.scheme,
                parse.api_root
            ),
        }
    }
}

/// Cancels the batch on Ctrl+C or SIGTERM. The user in flight finishes, the
/// rest are reported as cancelled.
async fn shutdown_signal(cancel: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("failed to install SIGTERM handler: {_err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(_err) = signal::ctrl_c().await {
            #[cfg(feature = "tracing")]
            tracing::warn!("failed to install Ctrl+C handler: {_err}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received SIGTERM signal");
        },
    }

    #[cfg(feature = "tracing")]
    tracing::info!("Finishing the current user, remaining users will be skipped");
    cancel.cancel();
}
