//! Algorand node REST client for fetching block headers and transaction proofs with retry logic.

pub mod models;

use std::time::Duration;

use algo_spv_verify::{BlockHeader, BlockProvider, HashAlgorithm, ProofProvider, ProofResponse};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{BlockResponse, ErrorResponse, NodeStatus, TransactionProofResponse};

/// Header carrying the algod API token
pub const API_TOKEN_HEADER: &str = "X-Algo-API-Token";

/// Default HTTP request timeout
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error types for algod client operations
#[derive(Error, Debug)]
pub enum AlgodClientError {
    /// Transport, timeout or body decoding errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx response
    #[error("Failed to get {context}: {status} - {message}")]
    Status {
        context: String,
        status: StatusCode,
        message: String,
    },
    /// Invalid HTTP header value
    #[error("Invalid HTTP header value")]
    InvalidHeader,
}

/// Algorand node (algod) REST client
pub struct AlgodClient {
    client: reqwest::Client,
    base_url: String,
    backoff: backoff::ExponentialBackoff,
}

impl AlgodClient {
    /// Create a new algod client with default retry settings (exponential backoff)
    pub fn new(url: String, token: Option<String>) -> Result<Self, AlgodClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            headers.insert(
                API_TOKEN_HEADER,
                HeaderValue::from_str(&token).map_err(|_| AlgodClientError::InvalidHeader)?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            backoff: backoff::ExponentialBackoff::default(),
        })
    }

    /// Replace the retry policy
    pub fn with_backoff(mut self, backoff: backoff::ExponentialBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        context: &str,
    ) -> Result<T, AlgodClientError> {
        let url = format!("{}{}", self.base_url, path);
        request_with_retry(self.backoff.clone(), || async {
            debug!("GET {}", url);
            let response = self.client.get(&url).query(query).send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorResponse>(&body)
                    .map(|e| e.message)
                    .unwrap_or(body);
                return Err(AlgodClientError::Status {
                    context: context.to_string(),
                    status,
                    message,
                });
            }
            Ok(response.json().await?)
        })
        .await
    }

    /// Get the header of the block at `round`
    pub async fn get_block_header(&self, round: u64) -> Result<BlockHeader, AlgodClientError> {
        let response: BlockResponse = self
            .get(
                &format!("/v2/blocks/{}", round),
                &[("header-only", "true")],
                "block header",
            )
            .await?;
        Ok(response.block.into())
    }

    /// Get the inclusion proof of `txid` in the block at `round`
    pub async fn get_transaction_proof(
        &self,
        round: u64,
        txid: &str,
        algorithm: HashAlgorithm,
    ) -> Result<ProofResponse, AlgodClientError> {
        let response: TransactionProofResponse = self
            .get(
                &format!("/v2/blocks/{}/transactions/{}/proof", round, txid),
                &[("hashtype", algorithm.id())],
                "transaction proof",
            )
            .await?;
        Ok(response.into())
    }

    /// Get the node status
    pub async fn get_status(&self) -> Result<NodeStatus, AlgodClientError> {
        self.get("/v2/status", &[], "node status").await
    }
}

#[async_trait]
impl BlockProvider for AlgodClient {
    async fn block_header(&self, round: u64) -> anyhow::Result<BlockHeader> {
        Ok(self.get_block_header(round).await?)
    }
}

#[async_trait]
impl ProofProvider for AlgodClient {
    async fn transaction_proof(
        &self,
        round: u64,
        txid: &str,
        algorithm: HashAlgorithm,
    ) -> anyhow::Result<ProofResponse> {
        Ok(self.get_transaction_proof(round, txid, algorithm).await?)
    }
}

/// Execute a request with retry logic using exponential backoff
/// Only retries transport failures, rate limiting and server errors
async fn request_with_retry<F, Fut, T>(
    backoff: backoff::ExponentialBackoff,
    operation: F,
) -> Result<T, AlgodClientError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T, AlgodClientError>>,
{
    use backoff::{future::retry_notify, Error};

    retry_notify(
        backoff,
        || async {
            match operation().await {
                Ok(result) => Ok(result),
                Err(err) => {
                    if is_retryable_error(&err) {
                        Err(Error::transient(err))
                    } else {
                        Err(Error::permanent(err))
                    }
                }
            }
        },
        |err, duration| {
            info!("Request failed, retrying in {:?}: {}", duration, err);
        },
    )
    .await
}

/// Determines if an error should be retried
fn is_retryable_error(err: &AlgodClientError) -> bool {
    match err {
        AlgodClientError::Http(http_err) => {
            http_err.is_timeout() || http_err.is_connect() || http_err.is_request()
        }
        AlgodClientError::Status { status, .. } => {
            status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
        }
        AlgodClientError::InvalidHeader => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: StatusCode) -> AlgodClientError {
        AlgodClientError::Status {
            context: "transaction proof".to_string(),
            status,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_error(&status_error(StatusCode::SERVICE_UNAVAILABLE)));
        assert!(is_retryable_error(&status_error(StatusCode::INTERNAL_SERVER_ERROR)));
        assert!(is_retryable_error(&status_error(StatusCode::TOO_MANY_REQUESTS)));
        assert!(!is_retryable_error(&status_error(StatusCode::NOT_FOUND)));
        assert!(!is_retryable_error(&status_error(StatusCode::BAD_REQUEST)));
        assert!(!is_retryable_error(&status_error(StatusCode::UNAUTHORIZED)));
        assert!(!is_retryable_error(&AlgodClientError::InvalidHeader));
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(
            status_error(StatusCode::NOT_FOUND).to_string(),
            "Failed to get transaction proof: 404 Not Found - boom"
        );
    }

    #[test]
    fn test_invalid_token_rejected() {
        let result = AlgodClient::new(
            "http://localhost:4001".to_string(),
            Some("bad\ntoken".to_string()),
        );
        assert!(matches!(result, Err(AlgodClientError::InvalidHeader)));
    }
}
