use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::domain::format_ether;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing_subscriber::EnvFilter;
use wallet_core::{config::load_settings, WalletEvent, WalletSessionController};

#[derive(Parser, Debug)]
#[command(about = "Mint or burn NFTs through a wallet provider")]
struct Args {
    /// Settings file; defaults to ./minter.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Show the already-authorized account, if any.
    Status,
    /// Request account access from the wallet.
    Connect,
    /// Mint with the configured quantity and price.
    Mint,
    /// Burn the caller's tokens.
    Burn,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = settings.controller_config()?;
    tracing::info!(
        contract = %config.contract_address,
        artifact = config.artifact.contract_name().unwrap_or("unnamed"),
        mint_price = %format_ether(config.mint_price),
        "contract configured"
    );
    let controller = WalletSessionController::new(settings.detect_wallet()?, config);
    let mut events = controller.subscribe_events();
    tracing::debug!(command = ?args.command, has_provider = controller.has_provider(), "starting");

    for line in run(&controller, args.command).await {
        println!("{line}");
    }
    for alert in drain_alerts(&mut events) {
        eprintln!("alert: {alert}");
    }
    if let Some(account) = controller.session().account() {
        println!("account: {account}");
    }
    Ok(())
}

/// Startup discovery always runs first, then the requested command.
async fn run(controller: &WalletSessionController, command: Command) -> Vec<String> {
    let mut lines = vec![controller.check_wallet_is_connected().await.to_string()];
    match command {
        Command::Status => {}
        Command::Connect => lines.push(controller.connect_wallet().await.to_string()),
        Command::Mint => lines.push(controller.mint_token().await.to_string()),
        Command::Burn => lines.push(controller.burn_token().await.to_string()),
    }
    lines
}

fn drain_alerts(events: &mut broadcast::Receiver<WalletEvent>) -> Vec<String> {
    let mut alerts = Vec::new();
    loop {
        match events.try_recv() {
            Ok(WalletEvent::Alert(message)) => alerts.push(message),
            Ok(_) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
    alerts
}
