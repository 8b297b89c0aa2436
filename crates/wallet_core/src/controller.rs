use std::{fmt, sync::Arc, time::Duration};

use shared::domain::{Address, TxHash, U256};
use tokio::sync::broadcast;
use tracing::{error, info, warn};
use url::Url;

use crate::{
    abi::ContractArtifact,
    contract::{ContractHandle, Signer},
    error::{ErrorKind, WalletError},
    guard::ActionGuard,
    rpc,
    session::Session,
    Action, WalletEvent, WalletProvider,
};

pub const MISSING_WALLET_ALERT: &str = "Please install a wallet provider!";

/// Everything the controller needs to bind and call the minting contract.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub contract_address: Address,
    pub artifact: Arc<ContractArtifact>,
    pub mint_quantity: U256,
    pub mint_price: U256,
    pub explorer_tx_url: Url,
    pub receipt_poll_interval: Duration,
    pub confirmation_timeout: Option<Duration>,
}

#[derive(Debug)]
pub enum ConnectionOutcome {
    WalletMissing,
    Connected(Address),
    NoAuthorizedAccount,
    Failed(WalletError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedTransaction {
    pub action: Action,
    pub hash: TxHash,
    pub block_number: Option<u64>,
    pub explorer_url: String,
}

#[derive(Debug)]
pub enum ActionOutcome {
    WalletMissing,
    Busy,
    Confirmed(ConfirmedTransaction),
    Failed(WalletError),
}

impl fmt::Display for ConnectionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WalletMissing => f.write_str("no wallet provider available"),
            Self::Connected(account) => write!(f, "connected as {account}"),
            Self::NoAuthorizedAccount => f.write_str("no authorized account found"),
            Self::Failed(err) => write!(f, "wallet connection failed: {err}"),
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WalletMissing => f.write_str("no wallet provider available"),
            Self::Busy => f.write_str("a previous request is still in flight"),
            Self::Confirmed(tx) => write!(
                f,
                "{}, see transaction: {}",
                tx.action.done_label(),
                tx.explorer_url
            ),
            Self::Failed(err) => write!(f, "transaction failed: {err}"),
        }
    }
}

/// Appends the hash as a new path segment, whether or not `base` ends in `/`.
pub fn explorer_link(base: &Url, hash: TxHash) -> String {
    let hash = hash.to_string();
    let mut url = base.clone();
    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.pop_if_empty().push(&hash);
        }
        Err(()) => return format!("{base}{hash}"),
    }
    url.to_string()
}

/// Tracks the connected account and runs the connect/mint/burn flows.
///
/// Every handler contains its own failure path: errors are logged, broadcast
/// as [`WalletEvent`]s, and returned inside an outcome value, never as `Err`.
pub struct WalletSessionController {
    provider: Option<Arc<dyn WalletProvider>>,
    config: ControllerConfig,
    session: Session,
    mint_guard: ActionGuard,
    burn_guard: ActionGuard,
    events: broadcast::Sender<WalletEvent>,
}

impl WalletSessionController {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, config: ControllerConfig) -> Arc<Self> {
        Self::with_session(provider, config, Session::new())
    }

    pub fn with_session(
        provider: Option<Arc<dyn WalletProvider>>,
        config: ControllerConfig,
        session: Session,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            provider,
            config,
            session,
            mint_guard: ActionGuard::default(),
            burn_guard: ActionGuard::default(),
            events,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    pub fn is_busy(&self, action: Action) -> bool {
        self.guard(action).is_busy()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }

    /// Startup discovery of an already-authorized account. Never prompts.
    pub async fn check_wallet_is_connected(&self) -> ConnectionOutcome {
        let Some(provider) = &self.provider else {
            info!("no wallet provider configured; make sure a wallet is installed");
            return ConnectionOutcome::WalletMissing;
        };
        info!("wallet provider found");

        match rpc::accounts(provider.as_ref()).await {
            Ok(accounts) => match accounts.first() {
                Some(&account) => {
                    info!(%account, "found an authorized account");
                    self.session.set_account(account);
                    ConnectionOutcome::Connected(account)
                }
                None => {
                    info!("no authorized account found");
                    ConnectionOutcome::NoAuthorizedAccount
                }
            },
            Err(err) => {
                warn!(error = %err, "failed to list authorized accounts");
                ConnectionOutcome::Failed(err)
            }
        }
    }

    /// Requests account access; the wallet may prompt the user.
    pub async fn connect_wallet(&self) -> ConnectionOutcome {
        let Some(provider) = &self.provider else {
            warn!("connect requested without a wallet provider");
            self.emit(WalletEvent::Alert(MISSING_WALLET_ALERT.to_string()));
            return ConnectionOutcome::WalletMissing;
        };

        match rpc::request_accounts(provider.as_ref()).await {
            Ok(accounts) => match accounts.first() {
                Some(&account) => {
                    info!(%account, "found an account");
                    self.session.set_account(account);
                    ConnectionOutcome::Connected(account)
                }
                None => {
                    warn!("wallet granted access but returned no accounts");
                    ConnectionOutcome::NoAuthorizedAccount
                }
            },
            Err(err) => {
                warn!(error = %err, "wallet connection request failed");
                ConnectionOutcome::Failed(err)
            }
        }
    }

    pub async fn mint_token(&self) -> ActionOutcome {
        self.run_action(Action::Mint).await
    }

    pub async fn burn_token(&self) -> ActionOutcome {
        self.run_action(Action::Burn).await
    }

    fn guard(&self, action: Action) -> &ActionGuard {
        match action {
            Action::Mint => &self.mint_guard,
            Action::Burn => &self.burn_guard,
        }
    }

    fn emit(&self, event: WalletEvent) {
        // no subscribers is fine; events are advisory
        let _ = self.events.send(event);
    }

    async fn run_action(&self, action: Action) -> ActionOutcome {
        let Some(provider) = self.provider.clone() else {
            warn!(%action, "wallet provider does not exist");
            return ActionOutcome::WalletMissing;
        };
        let Some(_permit) = self.guard(action).try_acquire() else {
            warn!(%action, "request ignored; previous one still in flight");
            self.emit(WalletEvent::ActionRejectedBusy(action));
            return ActionOutcome::Busy;
        };
        self.emit(WalletEvent::ActionStarted(action));

        match self.submit_and_confirm(action, provider).await {
            Ok(confirmed) => {
                info!(
                    %action,
                    hash = %confirmed.hash,
                    link = %confirmed.explorer_url,
                    "{}, see transaction", confirmed.action.done_label()
                );
                self.emit(WalletEvent::TransactionConfirmed {
                    action,
                    hash: confirmed.hash,
                    explorer_url: confirmed.explorer_url.clone(),
                });
                ActionOutcome::Confirmed(confirmed)
            }
            Err(err) => {
                let kind = err.kind();
                match kind {
                    ErrorKind::UserRejected => warn!(%action, error = %err, "request rejected"),
                    _ => error!(%action, error = %err, "transaction failed"),
                }
                self.emit(WalletEvent::ActionFailed {
                    action,
                    kind,
                    reason: err.to_string(),
                });
                ActionOutcome::Failed(err)
            }
        }
    }

    async fn submit_and_confirm(
        &self,
        action: Action,
        provider: Arc<dyn WalletProvider>,
    ) -> Result<ConfirmedTransaction, WalletError> {
        // the handle is rebuilt per call so it always signs with the current account
        let signer = Signer::from_provider(provider).await?;
        let contract = ContractHandle::new(
            self.config.contract_address,
            Arc::clone(&self.config.artifact),
            signer,
        );

        info!(%action, contract = %contract.address(), "initialize payment");
        let pending = match action {
            Action::Mint => {
                contract
                    .mint_nfts(self.config.mint_quantity, self.config.mint_price)
                    .await?
            }
            Action::Burn => contract.burn_nfts().await?,
        };
        let hash = pending.hash();
        self.emit(WalletEvent::TransactionSubmitted { action, hash });
        info!(%action, %hash, "{}... please wait", action.progress_label());

        let receipt = pending
            .wait(
                self.config.receipt_poll_interval,
                self.config.confirmation_timeout,
            )
            .await?;

        Ok(ConfirmedTransaction {
            action,
            hash,
            block_number: receipt.block_number,
            explorer_url: explorer_link(&self.config.explorer_tx_url, hash),
        })
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
