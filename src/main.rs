//! Headless Lock-fi dashboard runner.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 VAULT ENGINE                  │
//!                    │                                               │
//!   RPC endpoint     │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│  chain  │──▶│  reader  │──▶│   view    │  │
//!                    │  │boundary │   │  cache   │   │  model    │  │
//!                    │  └────▲────┘   └────▲─────┘   └─────▲─────┘  │
//!                    │       │             │               │        │
//!   User intent      │  ┌────┴────┐  invalidation     ┌────┴────┐   │
//!   ─────────────────┼─▶│   tx    │──on confirm──────▶│  clock  │   │
//!                    │  │orchestr.│                   │  1 Hz   │   │
//!                    │  └─────────┘                   └─────────┘   │
//!                    │                                               │
//!                    │  Cross-cutting: config, lifecycle, notify,    │
//!                    │  tracing                                      │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! Wires configuration, an RPC-backed boundary (optionally carrying a
//! signer from `LOCKFI_PRIVATE_KEY`), the clock and the vault poller, then
//! logs the dashboard snapshot once per tick until Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use lockfi_engine::config::loader::load_config;
use lockfi_engine::engine::DashboardSnapshot;
use lockfi_engine::reader::VaultPoller;
use lockfi_engine::view::status::VaultStatus;
use lockfi_engine::{clock, EngineConfig, RpcVaultChain, Shutdown, VaultEngine};

/// Environment variable holding an optional hex private key. When set, the
/// provider signs writes and the session connects as the derived address.
const PRIVATE_KEY_ENV_VAR: &str = "LOCKFI_PRIVATE_KEY";

#[derive(Parser, Debug)]
#[command(name = "lockfi-engine", about = "Headless time-locked vault dashboard engine")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "lockfi.toml")]
    config: PathBuf,

    /// Watch-only account address; ignored when LOCKFI_PRIVATE_KEY is set.
    #[arg(long)]
    account: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lockfi_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("lockfi-engine v0.1.0 starting");

    let args = Args::parse();
    let config = if args.config.exists() {
        load_config(&args.config)?
    } else {
        tracing::warn!(path = %args.config.display(), "config file not found, using defaults");
        EngineConfig::default()
    };

    tracing::info!(
        rpc_url = %config.chain.rpc_url,
        chain_id = config.chain.chain_id,
        vault_poll_secs = config.reader.vault_poll_interval_secs,
        "configuration loaded"
    );

    let rpc_url: Url = config.chain.rpc_url.parse()?;
    let mut connected: Option<Address> = None;

    let provider: DynProvider = match std::env::var(PRIVATE_KEY_ENV_VAR) {
        Ok(raw) => {
            let raw = raw.trim().to_string();
            let key = raw.strip_prefix("0x").unwrap_or(&raw);
            let signer: PrivateKeySigner = key.parse()?;
            connected = Some(signer.address());
            ProviderBuilder::new()
                .wallet(signer)
                .connect_http(rpc_url)
                .erased()
        }
        Err(_) => ProviderBuilder::new().connect_http(rpc_url).erased(),
    };

    if connected.is_none() {
        if let Some(text) = &args.account {
            connected = Some(text.parse()?);
        }
    }

    let vault_address: Address = config.chain.vault_address.parse().map_err(|_| {
        format!("chain.vault_address is not a valid address: {:?}", config.chain.vault_address)
    })?;
    let chain = Arc::new(RpcVaultChain::new(provider, &config.chain)?);

    let shutdown = Shutdown::new();
    let clock = clock::spawn(shutdown.subscribe());
    let engine = VaultEngine::new(chain, vault_address, clock.clone());

    match connected {
        Some(account) => engine.session().connect(account),
        None => tracing::warn!("no account supplied, all account-scoped queries are disabled"),
    }

    // Initial population, then the poller keeps vault records fresh.
    engine.reader().refresh_all().await;
    let poller = VaultPoller::new(
        engine.reader().clone(),
        config.reader.vault_poll_interval_secs,
    );
    tokio::spawn(poller.run(shutdown.subscribe()));

    let mut ticks = clock.clone();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                shutdown.trigger();
                break;
            }
            changed = ticks.changed() => {
                if changed.is_err() {
                    break;
                }
                log_snapshot(&engine.snapshot());
            }
        }
    }

    tracing::info!("shutdown complete");
    Ok(())
}

fn log_snapshot(snapshot: &DashboardSnapshot) {
    for note in &snapshot.notifications {
        tracing::info!(kind = ?note.kind, "{}", note.message);
    }

    tracing::info!(
        account = snapshot.account_label.as_deref().unwrap_or("-"),
        balance = %snapshot.formatted_balance,
        vaults = snapshot.vaults.len(),
        in_flight = ?snapshot.in_flight,
        "dashboard"
    );

    for card in &snapshot.vaults {
        let status = match &card.status {
            VaultStatus::Withdrawn => "Withdrawn",
            VaultStatus::Unlocked => "Unlocked",
            VaultStatus::Locked { label } => label.as_str(),
        };
        tracing::info!(
            vault = card.vault_id,
            amount = %card.amount_label,
            unlocks = %card.unlock_label,
            status = %status,
            withdrawable = card.can_withdraw,
            "vault"
        );
    }
}
