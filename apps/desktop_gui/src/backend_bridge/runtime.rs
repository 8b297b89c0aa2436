//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use tokio::sync::broadcast::error::RecvError;
use wallet_core::{
    config::Settings, Action, ActionOutcome, ConnectionOutcome, WalletSessionController,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::startup(format!(
                    "failed to build runtime: {err}"
                ))));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let controller = match build_controller(&settings) {
                Ok(controller) => controller,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::startup(format!("{err:#}"))));
                    tracing::error!("failed to build wallet controller: {err:#}");
                    return;
                }
            };

            forward_wallet_events(&controller, ui_tx.clone());
            forward_session_changes(&controller, ui_tx.clone());
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                let controller = Arc::clone(&controller);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    tracing::debug!(command = cmd.name(), "handling ui command");
                    for event in run_command(&controller, cmd).await {
                        // blocks while the ui queue is full; `ActionFinished` must not be lost
                        if ui_tx.send(event).is_err() {
                            tracing::warn!("ui event queue closed; dropping command result");
                        }
                    }
                });
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

fn build_controller(settings: &Settings) -> anyhow::Result<Arc<WalletSessionController>> {
    let provider = settings.detect_wallet()?;
    let config = settings.controller_config()?;
    Ok(WalletSessionController::new(provider, config))
}

fn forward_wallet_events(controller: &WalletSessionController, ui_tx: Sender<UiEvent>) {
    let mut events = controller.subscribe_events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if ui_tx.try_send(UiEvent::Wallet(event)).is_err() {
                        tracing::warn!("ui event queue unavailable; dropping wallet event");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "wallet event forwarder lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn forward_session_changes(controller: &WalletSessionController, ui_tx: Sender<UiEvent>) {
    let mut account = controller.session().subscribe();
    tokio::spawn(async move {
        while account.changed().await.is_ok() {
            let current = *account.borrow_and_update();
            let _ = ui_tx.try_send(UiEvent::SessionChanged(current));
        }
    });
}

/// Connection outcomes are reported here; action progress already reaches the
/// UI through the forwarded wallet events, so actions only add `ActionFinished`.
async fn run_command(controller: &WalletSessionController, cmd: BackendCommand) -> Vec<UiEvent> {
    match cmd {
        BackendCommand::CheckWallet => vec![connection_event(
            controller.check_wallet_is_connected().await,
            UiErrorContext::General,
        )],
        BackendCommand::ConnectWallet => vec![connection_event(
            controller.connect_wallet().await,
            UiErrorContext::Connect,
        )],
        BackendCommand::MintToken => action_events(Action::Mint, controller.mint_token().await),
        BackendCommand::BurnToken => action_events(Action::Burn, controller.burn_token().await),
    }
}

fn connection_event(outcome: ConnectionOutcome, context: UiErrorContext) -> UiEvent {
    match outcome {
        ConnectionOutcome::Failed(err) => UiEvent::Error(UiError::new(
            err.kind().into(),
            context,
            err.to_string(),
        )),
        other => UiEvent::Info(other.to_string()),
    }
}

fn action_event(outcome: ActionOutcome) -> Option<UiEvent> {
    match outcome {
        ActionOutcome::WalletMissing => Some(UiEvent::Info(
            "Wallet provider does not exist".to_string(),
        )),
        ActionOutcome::Busy | ActionOutcome::Confirmed(_) | ActionOutcome::Failed(_) => None,
    }
}

fn action_events(action: Action, outcome: ActionOutcome) -> Vec<UiEvent> {
    action_event(outcome)
        .into_iter()
        .chain(std::iter::once(UiEvent::ActionFinished(action)))
        .collect()
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
