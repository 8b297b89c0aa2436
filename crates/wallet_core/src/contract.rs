use std::{sync::Arc, time::Duration};

use alloy_dyn_abi::DynSolValue;
use alloy_rpc_types_eth::{TransactionInput, TransactionReceipt, TransactionRequest};
use shared::domain::{Address, Bytes, TxHash, TxKind, U256};
use tokio::time::Instant;
use tracing::debug;

use crate::{abi::ContractArtifact, error::WalletError, rpc, WalletProvider};

pub const MINT_METHOD: &str = "mintNFTs";
pub const BURN_METHOD: &str = "burnNFTs";

/// Signs on behalf of the first account the provider exposes.
#[derive(Clone)]
pub struct Signer {
    provider: Arc<dyn WalletProvider>,
    address: Address,
}

impl Signer {
    pub async fn from_provider(provider: Arc<dyn WalletProvider>) -> Result<Self, WalletError> {
        let address = rpc::accounts(provider.as_ref())
            .await?
            .first()
            .copied()
            .ok_or(WalletError::NoSignerAccount)?;
        Ok(Self { provider, address })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn send_transaction(
        &self,
        to: Address,
        calldata: Bytes,
        value: U256,
    ) -> Result<PendingTransaction, WalletError> {
        // wallets differ on `data` vs `input`, so both are sent
        let tx = TransactionRequest {
            from: Some(self.address),
            to: Some(TxKind::Call(to)),
            value: (!value.is_zero()).then_some(value),
            input: TransactionInput::both(calldata),
            ..Default::default()
        };
        let hash = rpc::send_transaction(self.provider.as_ref(), &tx).await?;
        Ok(PendingTransaction {
            hash,
            provider: Arc::clone(&self.provider),
        })
    }
}

/// A deployed contract bound to an interface description and a signer.
pub struct ContractHandle {
    address: Address,
    artifact: Arc<ContractArtifact>,
    signer: Signer,
}

impl ContractHandle {
    pub fn new(address: Address, artifact: Arc<ContractArtifact>, signer: Signer) -> Self {
        Self {
            address,
            artifact,
            signer,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn send(
        &self,
        method: &str,
        args: &[DynSolValue],
        value: U256,
    ) -> Result<PendingTransaction, WalletError> {
        let calldata = self.artifact.encode_call(method, args, value)?;
        debug!(
            contract = %self.address,
            from = %self.signer.address(),
            method,
            %value,
            "submitting contract call"
        );
        self.signer.send_transaction(self.address, calldata, value).await
    }

    pub async fn mint_nfts(
        &self,
        quantity: U256,
        payment: U256,
    ) -> Result<PendingTransaction, WalletError> {
        self.send(MINT_METHOD, &[DynSolValue::Uint(quantity, 256)], payment).await
    }

    pub async fn burn_nfts(&self) -> Result<PendingTransaction, WalletError> {
        self.send(BURN_METHOD, &[], U256::ZERO).await
    }
}

/// A submitted transaction whose receipt has not been observed yet.
pub struct PendingTransaction {
    hash: TxHash,
    provider: Arc<dyn WalletProvider>,
}

impl PendingTransaction {
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Polls for the receipt until it appears. Without a timeout this waits
    /// for as long as the chain takes.
    pub async fn wait(
        &self,
        poll_interval: Duration,
        timeout: Option<Duration>,
    ) -> Result<TransactionReceipt, WalletError> {
        let started = Instant::now();
        loop {
            if let Some(receipt) =
                rpc::transaction_receipt(self.provider.as_ref(), self.hash).await?
            {
                if !receipt.status() {
                    return Err(WalletError::Reverted { hash: self.hash });
                }
                return Ok(receipt);
            }

            let waited = started.elapsed();
            if let Some(limit) = timeout {
                if waited >= limit {
                    return Err(WalletError::ConfirmationTimeout {
                        hash: self.hash,
                        waited,
                    });
                }
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}
