//! HTTP implementation of [`NodeRpc`] on top of `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use nastip_transactions::RawTransaction;
use nastip_types::Address;
use reqwest::{redirect, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RpcError;
use crate::types::{
    AccountState, AccountStateRequest, AccountStateResult, CallRequest, CallRequestBody,
    CallResult, Envelope, ErrorBody, SubmitReceipt, SubmitResult,
};
use crate::NodeRpc;

const ACCOUNT_STATE_PATH: &str = "/v1/user/accountstate";
const CALL_PATH: &str = "/v1/user/call";
const RAW_TRANSACTION_PATH: &str = "/v1/user/rawtransaction";

/// HTTP client for a Nebulas node.
///
/// Redirects are never followed: a redirect is reported as an HTTP error so
/// signed transactions are only ever sent to the configured host.
#[derive(Clone, Debug)]
pub struct HttpNodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpNodeClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RpcError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        tracing::trace!(%url, %status, len = bytes.len(), "node response");

        decode_response(status, &bytes)
    }
}

/// Decode a node response body given its status.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<T, RpcError> {
    if !status.is_success() {
        let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
        if !parsed.execute_err.is_empty() {
            return Err(RpcError::Execution(parsed.execute_err));
        }
        if !parsed.error.is_empty() {
            return Err(RpcError::Remote(parsed.error));
        }
        return Err(RpcError::Http {
            status: status.as_u16(),
            body: String::from_utf8_lossy(body).into_owned(),
        });
    }

    let envelope: Envelope<T> =
        serde_json::from_slice(body).map_err(|e| RpcError::Decode(e.to_string()))?;
    envelope.into_result()
}

#[async_trait]
impl NodeRpc for HttpNodeClient {
    async fn account_state(&self, address: &Address) -> Result<AccountState, RpcError> {
        let body = AccountStateRequest {
            address: address.to_string(),
        };
        let result: AccountStateResult = self.post(ACCOUNT_STATE_PATH, &body).await?;
        Ok(result.into())
    }

    async fn call(&self, request: &CallRequest) -> Result<CallResult, RpcError> {
        let body = CallRequestBody::from(request);
        let result: CallResult = self.post(CALL_PATH, &body).await?;
        result.into_checked()
    }

    async fn send_raw_transaction(&self, raw: &RawTransaction) -> Result<SubmitReceipt, RpcError> {
        let result: SubmitResult = self.post(RAW_TRANSACTION_PATH, raw).await?;
        let receipt = SubmitReceipt::try_from(result)?;
        tracing::debug!(tx_hash = %receipt.tx_hash, "transaction submitted");
        Ok(receipt)
    }
}
