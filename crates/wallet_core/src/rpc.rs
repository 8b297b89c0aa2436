//! Typed wrappers over the raw provider `request` call.

use alloy_rpc_types_eth::{TransactionReceipt, TransactionRequest};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared::{
    domain::{Address, TxHash},
    protocol::{methods, RequestArguments},
};

use crate::{error::WalletError, WalletProvider};

fn decode<T: DeserializeOwned>(method: &str, value: Value) -> Result<T, WalletError> {
    serde_json::from_value(value)
        .map_err(|err| WalletError::InvalidResponse(format!("{method}: {err}")))
}

/// Accounts the user already authorized; never prompts.
pub async fn accounts(provider: &dyn WalletProvider) -> Result<Vec<Address>, WalletError> {
    let value = provider
        .request(RequestArguments::new(methods::ETH_ACCOUNTS))
        .await?;
    decode(methods::ETH_ACCOUNTS, value)
}

/// Asks the wallet for account access, which may prompt the user.
pub async fn request_accounts(provider: &dyn WalletProvider) -> Result<Vec<Address>, WalletError> {
    let value = provider
        .request(RequestArguments::new(methods::ETH_REQUEST_ACCOUNTS))
        .await?;
    decode(methods::ETH_REQUEST_ACCOUNTS, value)
}

pub async fn send_transaction(
    provider: &dyn WalletProvider,
    tx: &TransactionRequest,
) -> Result<TxHash, WalletError> {
    let tx = serde_json::to_value(tx)
        .map_err(|err| WalletError::InvalidResponse(format!("transaction request: {err}")))?;
    let value = provider
        .request(RequestArguments::with_params(
            methods::ETH_SEND_TRANSACTION,
            vec![tx],
        ))
        .await?;
    decode(methods::ETH_SEND_TRANSACTION, value)
}

/// `None` while the transaction is still pending.
pub async fn transaction_receipt(
    provider: &dyn WalletProvider,
    hash: TxHash,
) -> Result<Option<TransactionReceipt>, WalletError> {
    let value = provider
        .request(RequestArguments::with_params(
            methods::ETH_GET_TRANSACTION_RECEIPT,
            vec![json!(hash)],
        ))
        .await?;
    decode(methods::ETH_GET_TRANSACTION_RECEIPT, value)
}
