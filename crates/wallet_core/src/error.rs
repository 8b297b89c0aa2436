use std::time::Duration;

use shared::{
    domain::TxHash,
    error::{ProviderErrorCode, RpcErrorObject},
};
use thiserror::Error;

use crate::abi::{AbiError, ArtifactError};

/// Coarse buckets used to decide how a failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UserRejected,
    Reverted,
    Transport,
    Local,
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("user rejected the request: {0}")]
    UserRejected(String),
    #[error("wallet has not authorized this site: {0}")]
    Unauthorized(String),
    #[error("transaction would revert: {0}")]
    ExecutionReverted(String),
    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("wallet has no authorized account to sign with")]
    NoSignerAccount,
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error(transparent)]
    Abi(#[from] AbiError),
    #[error("transaction {hash} reverted")]
    Reverted { hash: TxHash },
    #[error("transaction {hash} not confirmed after {waited:?}")]
    ConfirmationTimeout { hash: TxHash, waited: Duration },
}

impl WalletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserRejected(_) | Self::Unauthorized(_) => ErrorKind::UserRejected,
            Self::ExecutionReverted(_) | Self::Reverted { .. } => ErrorKind::Reverted,
            Self::Rpc { code, .. } => match ProviderErrorCode::from_code(*code) {
                ProviderErrorCode::UnsupportedMethod => ErrorKind::Local,
                _ => ErrorKind::Transport,
            },
            Self::Transport(_) | Self::InvalidResponse(_) | Self::ConfirmationTimeout { .. } => {
                ErrorKind::Transport
            }
            Self::NoSignerAccount | Self::Artifact(_) | Self::Abi(_) => ErrorKind::Local,
        }
    }
}

impl From<RpcErrorObject> for WalletError {
    fn from(value: RpcErrorObject) -> Self {
        if value.is_execution_revert() {
            return Self::ExecutionReverted(value.message);
        }
        match value.kind() {
            ProviderErrorCode::UserRejectedRequest => Self::UserRejected(value.message),
            ProviderErrorCode::Unauthorized => Self::Unauthorized(value.message),
            _ => Self::Rpc {
                code: value.code,
                message: value.message,
            },
        }
    }
}
