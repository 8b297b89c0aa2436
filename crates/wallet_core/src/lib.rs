use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use shared::{domain::TxHash, protocol::RequestArguments};

pub mod abi;
pub mod config;
pub mod contract;
mod controller;
pub mod error;
mod guard;
pub mod rpc;
mod session;
pub mod transport;

pub use controller::{
    explorer_link, ActionOutcome, ConfirmedTransaction, ConnectionOutcome, ControllerConfig,
    WalletSessionController,
};
pub use error::{ErrorKind, WalletError};
pub use guard::{ActionGuard, ActionPermit};
pub use session::Session;
pub use transport::HttpWalletProvider;

/// An EIP-1193 style wallet: one generic request entry point.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request(&self, args: RequestArguments) -> Result<Value, WalletError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Mint,
    Burn,
}

impl Action {
    pub fn progress_label(self) -> &'static str {
        match self {
            Action::Mint => "mining",
            Action::Burn => "burning",
        }
    }

    pub fn done_label(self) -> &'static str {
        match self {
            Action::Mint => "mined",
            Action::Burn => "burned",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Mint => f.write_str("mint"),
            Action::Burn => f.write_str("burn"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// User-facing alert; the only feedback that is not just a log line.
    Alert(String),
    ActionStarted(Action),
    ActionRejectedBusy(Action),
    TransactionSubmitted {
        action: Action,
        hash: TxHash,
    },
    TransactionConfirmed {
        action: Action,
        hash: TxHash,
        explorer_url: String,
    },
    ActionFailed {
        action: Action,
        kind: ErrorKind,
        reason: String,
    },
}
