use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Provider error codes defined by EIP-1193, plus the execution-revert code
/// nodes return for failed calls and the generic JSON-RPC range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorCode {
    ExecutionReverted,
    UserRejectedRequest,
    Unauthorized,
    UnsupportedMethod,
    Disconnected,
    ChainDisconnected,
    Other(i64),
}

impl ProviderErrorCode {
    pub fn from_code(code: i64) -> Self {
        match code {
            3 => Self::ExecutionReverted,
            4001 => Self::UserRejectedRequest,
            4100 => Self::Unauthorized,
            4200 => Self::UnsupportedMethod,
            4900 => Self::Disconnected,
            4901 => Self::ChainDisconnected,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::ExecutionReverted => 3,
            Self::UserRejectedRequest => 4001,
            Self::Unauthorized => 4100,
            Self::UnsupportedMethod => 4200,
            Self::Disconnected => 4900,
            Self::ChainDisconnected => 4901,
            Self::Other(code) => code,
        }
    }

    pub fn is_user_rejection(self) -> bool {
        self == Self::UserRejectedRequest
    }

    pub fn is_connectivity(self) -> bool {
        matches!(self, Self::Disconnected | Self::ChainDisconnected)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("provider error {code}: {message}")]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcErrorObject {
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
            data: None,
        }
    }

    pub fn kind(&self) -> ProviderErrorCode {
        ProviderErrorCode::from_code(self.code)
    }

    /// Geth-style nodes report reverts as a generic server error (-32000)
    /// whose message starts with "execution reverted".
    pub fn is_execution_revert(&self) -> bool {
        match self.kind() {
            ProviderErrorCode::ExecutionReverted => true,
            ProviderErrorCode::Other(-32000) => self
                .message
                .to_ascii_lowercase()
                .contains("execution reverted"),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_eip1193_codes() {
        assert!(ProviderErrorCode::from_code(4001).is_user_rejection());
        assert!(ProviderErrorCode::from_code(4900).is_connectivity());
        assert_eq!(
            ProviderErrorCode::from_code(-32603),
            ProviderErrorCode::Other(-32603)
        );
    }

    #[test]
    fn recognizes_execution_reverts() {
        assert!(RpcErrorObject::new(ProviderErrorCode::ExecutionReverted, "execution reverted")
            .is_execution_revert());
        assert!(RpcErrorObject::new(
            ProviderErrorCode::Other(-32000),
            "Execution reverted: sold out"
        )
        .is_execution_revert());
        assert!(!RpcErrorObject::new(
            ProviderErrorCode::Other(-32000),
            "insufficient funds for gas * price + value"
        )
        .is_execution_revert());
        assert!(!RpcErrorObject::new(ProviderErrorCode::Unauthorized, "unauthorized")
            .is_execution_revert());
    }

    #[test]
    fn error_object_parses_without_data() {
        let err: RpcErrorObject =
            serde_json::from_str(r#"{"code":4001,"message":"User rejected the request."}"#)
                .expect("error object");
        assert_eq!(err.kind(), ProviderErrorCode::UserRejectedRequest);
        assert_eq!(
            err.to_string(),
            "provider error 4001: User rejected the request."
        );
    }
}
