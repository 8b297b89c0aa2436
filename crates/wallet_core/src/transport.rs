use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use shared::protocol::{RequestArguments, RpcRequest, RpcResponse};
use tracing::debug;
use url::Url;

use crate::{error::WalletError, WalletProvider};

/// Wallet provider reached over JSON-RPC 2.0 via HTTP POST.
pub struct HttpWalletProvider {
    http: Client,
    endpoint: Url,
    next_id: AtomicU64,
}

impl HttpWalletProvider {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl WalletProvider for HttpWalletProvider {
    async fn request(&self, args: RequestArguments) -> Result<Value, WalletError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method = %args.method, id, "wallet rpc request");

        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&RpcRequest::new(id, args))
            .send()
            .await
            .map_err(|err| WalletError::Transport(err.to_string()))?;

        let status = res.status();
        let body = match res.json::<RpcResponse>().await {
            Ok(body) => body,
            Err(err) if !status.is_success() => {
                return Err(WalletError::Transport(format!(
                    "provider returned http {status}: {err}"
                )))
            }
            Err(err) => return Err(WalletError::InvalidResponse(err.to_string())),
        };

        body.into_result().map_err(WalletError::from)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
