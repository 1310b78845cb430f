//! Terraform Cloud/Enterprise API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, header};
use tracing::{debug, error};

use crate::error::{ApiError, Result};
use crate::plan::Plan;

use super::platform::RunTaskPlatform;
use super::types::TaskResult;

const SERVICE: &str = "Terraform Cloud";

/// Content type of JSON:API documents.
const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Terraform Cloud/Enterprise API client.
#[derive(Debug, Clone)]
pub struct TfeClient {
    /// HTTP client.
    client: Client,
}

impl TfeClient {
    /// Creates a new client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(SERVICE, format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fails on non-2xx responses.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        error!("Unexpected status was returned: {}", status.as_u16());
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::status(SERVICE, status.as_u16(), body).into())
    }
}

#[async_trait]
impl RunTaskPlatform for TfeClient {
    async fn fetch_plan(&self, url: &str, token: &str) -> Result<Plan> {
        debug!("Fetching plan from {url}");

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::network(SERVICE, format!("Plan request failed: {e}")))?;
        let response = Self::check_status(response).await?;

        let bytes = response.bytes().await.map_err(|e| {
            ApiError::invalid_response(SERVICE, format!("Failed to read plan: {e}"))
        })?;

        Plan::from_slice(&bytes)
    }

    async fn send_result(&self, callback_url: &str, token: &str, result: &TaskResult) -> Result<()> {
        let body = serde_json::to_vec(result).map_err(|e| {
            ApiError::invalid_response(SERVICE, format!("Failed to encode task result: {e}"))
        })?;

        let response = self
            .client
            .patch(callback_url)
            .bearer_auth(token)
            .header(header::CONTENT_TYPE, JSON_API_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| ApiError::network(SERVICE, format!("Callback request failed: {e}")))?;
        Self::check_status(response).await?;

        debug!("Sent task result: {}", result.data.attributes.message);
        Ok(())
    }
}
