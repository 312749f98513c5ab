use reqwest::Client;
use std::time::Duration;

use crate::avimex::models::ForwardReport;
use crate::config::{Config, ForwardMethod};
use crate::error::{AppError, AppResult};

/// Name of the form field / query parameter carrying the chain
const CHAIN_PARAM: &str = "recibo";

pub struct AvimexClient {
    http_client: Client,
    url: String,
    method: ForwardMethod,
}

impl AvimexClient {
    /// Build a client for the configured Avimex endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.avimex_timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            url: config.avimex_url.clone(),
            method: config.avimex_method,
        })
    }

    /// Send one chain to Avimex. No retries.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Upstream` if the request fails or returns an error status.
    pub async fn send_chain(&self, chain: &str) -> AppResult<u16> {
        let request = match self.method {
            ForwardMethod::Post => self
                .http_client
                .post(&self.url)
                .form(&[(CHAIN_PARAM, chain)]),
            ForwardMethod::Get => self
                .http_client
                .get(&self.url)
                .query(&[(CHAIN_PARAM, chain)]),
        };

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream {
                status: None,
                message: format!("Request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                status: Some(status.as_u16()),
                message: format!(
                    "HTTP {}: {}",
                    status,
                    response.text().await.unwrap_or_default()
                ),
            });
        }

        Ok(status.as_u16())
    }

    /// Send a chain and turn the outcome into a report for the response body.
    pub async fn forward(&self, chain: &str) -> ForwardReport {
        match self.send_chain(chain).await {
            Ok(status) => {
                tracing::info!(status, bytes = chain.len(), "Chain forwarded to Avimex");
                ForwardReport::delivered(status)
            }
            Err(AppError::Upstream { status, message }) => {
                tracing::warn!(error = %message, "Failed to forward chain to Avimex");
                ForwardReport::failed(status, message)
            }
            Err(e) => ForwardReport::failed(None, e.to_string()),
        }
    }
}
