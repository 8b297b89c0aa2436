//! UI/backend events and error modeling for the minter GUI.

use shared::domain::Address;
use wallet_core::{Action, ErrorKind, WalletEvent};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    Wallet(WalletEvent),
    SessionChanged(Option<Address>),
    /// The backend finished handling a mint or burn command, whatever the outcome.
    ActionFinished(Action),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Rejected,
    OnChain,
    Transport,
    Local,
    Startup,
}

impl From<ErrorKind> for UiErrorCategory {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::UserRejected => UiErrorCategory::Rejected,
            ErrorKind::Reverted => UiErrorCategory::OnChain,
            ErrorKind::Transport => UiErrorCategory::Transport,
            ErrorKind::Local => UiErrorCategory::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Connect,
    Mint,
    Burn,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(
        category: UiErrorCategory,
        context: UiErrorContext,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    pub fn startup(message: impl Into<String>) -> Self {
        Self::new(
            UiErrorCategory::Startup,
            UiErrorContext::BackendStartup,
            message,
        )
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status line shown in the activity log.
    pub fn status_line(&self) -> String {
        let prefix = match self.category {
            UiErrorCategory::Rejected => "Rejected in wallet",
            UiErrorCategory::OnChain => "Transaction failed",
            UiErrorCategory::Transport => "Wallet unreachable",
            UiErrorCategory::Local => "Request error",
            UiErrorCategory::Startup => "Backend worker startup failure",
        };
        format!("{prefix}: {}", self.message)
    }
}
