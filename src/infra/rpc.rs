use async_trait::async_trait;
use color_eyre::eyre::{Result, eyre};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;
use crate::domain::filter::FilterId;
use crate::domain::transaction::{TransactionDetail, TransactionSummary};

use super::source::WalletBackend;

/// JSON-RPC client for the Atrium wallet daemon's history endpoints.
pub struct RpcBackend {
    client: reqwest::Client,
    url: String,
    required_confirmations: i64,
    spend_unconfirmed: bool,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct WalletSettings {
    required_confirmations: i64,
    spend_unconfirmed: bool,
}

impl RpcBackend {
    /// Connect to the daemon and read the wallet settings the history view
    /// depends on. The settings are session-stable, so they are fetched
    /// once here rather than per call.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = reqwest::Client::new();
        let url = config.network.rpc_url.clone();
        let settings: WalletSettings = call(&client, &url, "wallet_getSettings", json!([])).await?;
        Ok(Self {
            client,
            url,
            required_confirmations: settings.required_confirmations,
            spend_unconfirmed: settings.spend_unconfirmed,
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: serde_json::Value) -> Result<T> {
        call(&self.client, &self.url, method, params).await
    }
}

async fn call<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    method: &str,
    params: serde_json::Value,
) -> Result<T> {
    let request = RpcRequest {
        jsonrpc: "2.0",
        id: 1,
        method,
        params,
    };
    let response: RpcResponse<T> = client
        .post(url)
        .json(&request)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if let Some(err) = response.error {
        return Err(eyre!("{method} failed: {} (code {})", err.message, err.code));
    }
    response
        .result
        .ok_or_else(|| eyre!("{method} returned neither result nor error"))
}

fn filter_param(filter: FilterId) -> &'static str {
    match filter {
        FilterId::All => "all",
        FilterId::Sent => "sent",
        FilterId::Received => "received",
        FilterId::Transferred => "transferred",
        FilterId::Coinbase => "coinbase",
        FilterId::Staking => "staking",
    }
}

#[async_trait]
impl WalletBackend for RpcBackend {
    async fn count_transactions(&self, filter: FilterId) -> Result<u64> {
        self.call("wallet_countTransactions", json!([filter_param(filter)]))
            .await
    }

    async fn fetch_history(
        &self,
        offset: usize,
        count: usize,
        filter: FilterId,
    ) -> Result<Vec<TransactionSummary>> {
        self.call(
            "wallet_listTransactions",
            json!([offset, count, filter_param(filter)]),
        )
        .await
    }

    async fn fetch_detail(&self, hash: &str) -> Result<TransactionDetail> {
        self.call("wallet_getTransaction", json!([hash])).await
    }

    fn required_confirmations(&self) -> i64 {
        self.required_confirmations
    }

    fn spend_unconfirmed_enabled(&self) -> bool {
        self.spend_unconfirmed
    }
}
