use super::*;
use crate::{error::ErrorKind, rpc};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use shared::{
    domain::{Address, TxHash},
    protocol::methods,
};
use tokio::net::TcpListener;

const ALICE: &str = "0x00000000000000000000000000000000000000a1";

async fn mock_wallet_rpc(Json(req): Json<RpcRequest>) -> Response {
    match req.method.as_str() {
        methods::ETH_ACCOUNTS => Json(json!({
            "jsonrpc": "2.0",
            "id": req.id,
            "result": [ALICE]
        }))
        .into_response(),
        methods::ETH_REQUEST_ACCOUNTS => Json(json!({
            "jsonrpc": "2.0",
            "id": req.id,
            "error": {"code": 4001, "message": "User rejected the request."}
        }))
        .into_response(),
        methods::ETH_GET_TRANSACTION_RECEIPT => Json(json!({
            "jsonrpc": "2.0",
            "id": req.id,
            "result": null
        }))
        .into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "wallet backend crashed").into_response(),
    }
}

async fn spawn_mock_wallet() -> anyhow::Result<Url> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().route("/", post(mock_wallet_rpc));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(Url::parse(&format!("http://{addr}/"))?)
}

#[tokio::test]
async fn accounts_are_decoded_from_jsonrpc_result() {
    let endpoint = spawn_mock_wallet().await.expect("spawn wallet");
    let provider = HttpWalletProvider::new(endpoint);

    let accounts = rpc::accounts(&provider).await.expect("accounts");
    assert_eq!(accounts, vec![ALICE.parse::<Address>().expect("address")]);
}

#[tokio::test]
async fn user_rejection_error_object_maps_to_user_rejected() {
    let endpoint = spawn_mock_wallet().await.expect("spawn wallet");
    let provider = HttpWalletProvider::new(endpoint);

    let err = rpc::request_accounts(&provider)
        .await
        .expect_err("should be rejected");
    assert!(matches!(err, WalletError::UserRejected(_)));
}

#[tokio::test]
async fn null_receipt_means_pending() {
    let endpoint = spawn_mock_wallet().await.expect("spawn wallet");
    let provider = HttpWalletProvider::new(endpoint);

    let receipt = rpc::transaction_receipt(&provider, TxHash::repeat_byte(7))
        .await
        .expect("receipt query");
    assert!(receipt.is_none());
}

#[tokio::test]
async fn non_json_http_failure_is_a_transport_error() {
    let endpoint = spawn_mock_wallet().await.expect("spawn wallet");
    let provider = HttpWalletProvider::new(endpoint);

    let err = provider
        .request(RequestArguments::new("eth_chainId"))
        .await
        .expect_err("server error");
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let provider =
        HttpWalletProvider::new(Url::parse(&format!("http://{addr}/")).expect("endpoint url"));
    let err = rpc::accounts(&provider).await.expect_err("connection refused");
    assert!(matches!(err, WalletError::Transport(_)));
}
