// PostgREST-style gateway for the hosted submissions table

use async_trait::async_trait;
use reqwest::{Method, Response};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::gateway::{GatewayError, UploadGateway};
use crate::http::{RateLimitSettings, RateLimitedHttpClient};
use crate::review::types::{Submission, SubmissionFilter, SubmissionUpdate};

#[derive(Debug)]
pub struct RestUploadGateway {
    http: RateLimitedHttpClient,
    table: String,
}

impl RestUploadGateway {
    pub fn new(http: RateLimitedHttpClient, table: impl Into<String>) -> Self {
        Self {
            http,
            table: table.into(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, GatewayError> {
        let url = config.url.as_deref().ok_or_else(|| {
            GatewayError::Config(
                "backend URL is not set (backend.url, TERRAPRICE__BACKEND__URL or SUPABASE_URL)"
                    .to_string(),
            )
        })?;
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            GatewayError::Config(
                "backend API key is not set (backend.api_key, TERRAPRICE__BACKEND__API_KEY or SUPABASE_ANON_KEY)"
                    .to_string(),
            )
        })?;

        let http = RateLimitedHttpClient::new(
            url,
            api_key,
            RateLimitSettings {
                requests_per_second: config.requests_per_second,
                burst_capacity: config.burst_capacity,
            },
            Duration::from_millis(config.request_timeout_ms),
        )?;
        Ok(Self::new(http, config.table.clone()))
    }

    fn table_path(&self) -> String {
        format!("rest/v1/{}", self.table)
    }

    /// Turn a non-2xx response into `GatewayError::Api`, preferring the body's `message`
    async fn check(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or(body);
        warn!(status = status.as_u16(), %message, "Backend request failed");
        Err(GatewayError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows(response: Response) -> Result<Vec<Submission>, GatewayError> {
        let response = Self::check(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn single_row(response: Response, id: &str) -> Result<Submission, GatewayError> {
        Self::rows(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl UploadGateway for RestUploadGateway {
    async fn list(&self, filter: &SubmissionFilter) -> Result<Vec<Submission>, GatewayError> {
        let mut query: Vec<(&str, String)> = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if let Some(status) = filter.status {
            query.push(("status", format!("eq.{status}")));
        }

        let request = self.http.request(Method::GET, &self.table_path()).query(&query);
        let submissions = Self::rows(self.http.execute(request).await?).await?;
        debug!(count = submissions.len(), table = %self.table, "Fetched submissions");
        Ok(submissions)
    }

    async fn get_by_id(&self, id: &str) -> Result<Submission, GatewayError> {
        let request = self
            .http
            .request(Method::GET, &self.table_path())
            .query(&[("select", "*".to_string()), ("id", format!("eq.{id}"))]);
        Self::single_row(self.http.execute(request).await?, id).await
    }

    async fn update(&self, id: &str, update: &SubmissionUpdate) -> Result<(), GatewayError> {
        let request = self
            .http
            .request(Method::PATCH, &self.table_path())
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(update);
        let stored = Self::single_row(self.http.execute(request).await?, id).await?;
        debug!(submission_id = %stored.id, status = %stored.status, "Backend accepted status update");
        Ok(())
    }

    async fn insert(&self, submission: &Submission) -> Result<Submission, GatewayError> {
        let request = self
            .http
            .request(Method::POST, &self.table_path())
            .header("Prefer", "return=representation")
            .json(submission);
        Self::single_row(self.http.execute(request).await?, &submission.id).await
    }
}
