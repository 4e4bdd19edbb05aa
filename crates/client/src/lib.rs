//! HTTP client for the Nomen node RPC surface.
//!
//! The claim flow needs exactly two node behaviors: submitting a signed alias
//! transaction and querying a transaction's confirmation status. Everything
//! else a node exposes is out of scope here.

mod error;

pub use crate::error::ClientError;
use async_trait::async_trait;
use nomen_types::{AliasId, SignedTransaction, TxId};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Well-known public node used when the wallet supplies no endpoint.
pub const DEFAULT_NODE_URL: &str = "https://node.nomen.network/api/";

/// Blocks after which an alias record is considered fully available.
pub const CONFIRMATION_DEPTH: u64 = 2;

/// Resolve the fallback node endpoint.
pub fn default_endpoint() -> Url {
    Url::parse(DEFAULT_NODE_URL).expect("default node URL is valid")
}

/// Transaction settlement state as reported by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    /// Accepted into the mempool, not yet in a block.
    Pending,
    /// Included in at least one block.
    Confirmed,
}

/// Node response to a submitted alias transaction.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub tx_id: TxId,
    /// Present for alias registrations: the id assigned to the new alias.
    pub alias_id: Option<AliasId>,
    pub status: TxStatus,
}

/// Confirmation state of a previously submitted transaction.
#[derive(Debug, Clone)]
pub struct TxConfirmation {
    pub tx_id: TxId,
    pub status: TxStatus,
    pub confirmations: u64,
}

/// The node operations the claim flow depends on.
///
/// `NodeClient` is the production implementation; tests substitute mocks.
#[async_trait]
pub trait NodeApi {
    async fn submit_transaction(&self, tx: &SignedTransaction)
        -> Result<SubmitReceipt, ClientError>;
    async fn get_transaction(&self, tx_id: &TxId) -> Result<TxConfirmation, ClientError>;
}

/// Convenience HTTP client for interacting with Nomen nodes.
#[derive(Clone, Debug)]
pub struct NodeClient {
    base_url: Url,
    http: Client,
}

impl NodeClient {
    /// Create a new client with the provided base URL (e.g. `http://localhost:8081/api/`).
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        Self::with_http_client(
            base_url,
            Client::builder().timeout(Duration::from_secs(10)).build()?,
        )
    }

    /// Use an existing reqwest client (useful for custom TLS or middleware).
    pub fn with_http_client(base_url: impl AsRef<str>, http: Client) -> Result<Self, ClientError> {
        let mut url = Url::parse(base_url.as_ref())
            .map_err(|_| ClientError::InvalidBaseUrl(base_url.as_ref().to_string()))?;
        if !url.path().ends_with('/') {
            let mut path = url.path().trim_end_matches('/').to_owned();
            path.push('/');
            url.set_path(&path);
        }
        Ok(Self {
            base_url: url,
            http,
        })
    }

    /// Expose the underlying base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Poll the node until the transaction reaches `depth` confirmations.
    pub async fn wait_for_confirmation(
        &self,
        tx_id: &TxId,
        depth: u64,
        poll_interval: Duration,
    ) -> Result<TxConfirmation, ClientError> {
        loop {
            let confirmation = self.get_transaction(tx_id).await?;
            if confirmation.confirmations >= depth {
                return Ok(confirmation);
            }
            debug!(
                tx_id = %tx_id,
                confirmations = confirmation.confirmations,
                depth,
                "transaction not yet settled"
            );
            tokio::time::sleep(poll_interval).await;
        }
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        let response = self.http.get(url).send().await?;
        Self::map_response(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        let response = self.http.post(url).json(body).send().await?;
        Self::map_response(response).await
    }

    async fn map_response<T>(response: Response) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        if !response.status().is_success() {
            return Err(Self::map_api_error(response).await);
        }
        Ok(response.json::<T>().await?)
    }

    async fn map_api_error(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let bytes = response.bytes().await.unwrap_or_default();
        if let Ok(api_error) = serde_json::from_slice::<ApiErrorResponse>(&bytes) {
            return ClientError::server_error(
                status,
                api_error.code.unwrap_or_else(|| "unknown".into()),
                api_error.message.unwrap_or_else(|| "request failed".into()),
            );
        }
        let text = String::from_utf8_lossy(&bytes).to_string();
        ClientError::server_error(status, "http_error", text)
    }
}

#[async_trait]
impl NodeApi for NodeClient {
    /// Submit a signed alias transaction to `/tx/alias`.
    async fn submit_transaction(
        &self,
        tx: &SignedTransaction,
    ) -> Result<SubmitReceipt, ClientError> {
        self.post_json::<_, SubmitResponse>("tx/alias", tx)
            .await?
            .try_into()
    }

    /// Fetch a transaction's confirmation state by id.
    async fn get_transaction(&self, tx_id: &TxId) -> Result<TxConfirmation, ClientError> {
        let path = format!("tx/{}", tx_id.as_str());
        self.get_json::<TransactionView>(&path).await?.try_into()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
struct SubmitResponse {
    tx_id: String,
    #[serde(default)]
    alias_id: Option<String>,
    status: TxStatusView,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
struct TransactionView {
    tx_id: String,
    status: TxStatusView,
    #[serde(default)]
    confirmations: u64,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
enum TxStatusView {
    Pending,
    Confirmed,
}

impl TryFrom<SubmitResponse> for SubmitReceipt {
    type Error = ClientError;

    fn try_from(value: SubmitResponse) -> Result<Self, Self::Error> {
        if value.tx_id.is_empty() {
            return Err(ClientError::parse_error("node returned an empty tx_id"));
        }
        Ok(Self {
            tx_id: TxId::new(value.tx_id),
            alias_id: value.alias_id.map(AliasId::new),
            status: value.status.into(),
        })
    }
}

impl TryFrom<TransactionView> for TxConfirmation {
    type Error = ClientError;

    fn try_from(value: TransactionView) -> Result<Self, Self::Error> {
        if value.tx_id.is_empty() {
            return Err(ClientError::parse_error("node returned an empty tx_id"));
        }
        Ok(Self {
            tx_id: TxId::new(value.tx_id),
            status: value.status.into(),
            confirmations: value.confirmations,
        })
    }
}

impl From<TxStatusView> for TxStatus {
    fn from(value: TxStatusView) -> Self {
        match value {
            TxStatusView::Pending => TxStatus::Pending,
            TxStatusView::Confirmed => TxStatus::Confirmed,
        }
    }
}
