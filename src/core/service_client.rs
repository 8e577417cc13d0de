// src/core/service_client.rs
//! HTTP client for the job analysis API. Every call takes the bearer token
//! explicitly and reports failures as a [`ClientError`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::core::config_manager::ServiceConfig;
use crate::error::ClientError;
use crate::types::{
    analysis::AnalysisRecord,
    response::{
        AnalysesResponse, AnalyzeRequest, AnalyzeResponse, LoginRequest, LoginResponse,
        MessageResponse, RegisterRequest, StatsResponse, UserProfile,
    },
};
use crate::utils::prepare_job_description;

const ANALYSES_ENDPOINT: &str = "analyses";
const STATS_ENDPOINT: &str = "stats";
const ANALYZE_ENDPOINT: &str = "analyze";
const HISTORY_ENDPOINT: &str = "history";
const USER_ENDPOINT: &str = "user";
const LOGIN_ENDPOINT: &str = "login";
const REGISTER_ENDPOINT: &str = "register";

/// The calls the analysis list depends on.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    async fn list_analyses(&self, token: &str) -> Result<Vec<AnalysisRecord>, ClientError>;
    async fn fetch_stats(&self, token: &str) -> Result<StatsResponse, ClientError>;
    async fn delete_analysis(&self, token: &str, id: &str) -> Result<(), ClientError>;
}

pub struct ServiceClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ServiceClient {
    /// Create new service client with configuration
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        let base_url = Url::parse(&config.api_base_url)
            .with_context(|| format!("Invalid API base URL: {}", config.api_base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot carry paths: {}", config.api_base_url);
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /login` - exchanges credentials for an access token
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        let url = self.endpoint(&[LOGIN_ENDPOINT])?;
        info!("Logging in as {}", request.username);

        let response = self.client.post(url).json(request).send().await?;
        Self::decode(response, "Login failed").await
    }

    /// `POST /register`
    pub async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ClientError> {
        let url = self.endpoint(&[REGISTER_ENDPOINT])?;
        info!("Registering user {}", request.username);

        let response = self.client.post(url).json(request).send().await?;
        Self::decode(response, "Registration failed").await
    }

    /// `GET /user`
    pub async fn current_user(&self, token: &str) -> Result<UserProfile, ClientError> {
        self.get_json(&[USER_ENDPOINT], token, "Failed to fetch user details")
            .await
    }

    /// `POST /analyze` - the description is trimmed to the submit limit first
    pub async fn analyze(
        &self,
        token: &str,
        job_description: &str,
    ) -> Result<AnalyzeResponse, ClientError> {
        let payload = AnalyzeRequest {
            job_description: prepare_job_description(job_description)?,
        };
        self.post_json(
            &[ANALYZE_ENDPOINT],
            token,
            &payload,
            "Analysis failed. Please try again.",
        )
        .await
    }

    /// `GET /history` - the ten most recent analyses
    pub async fn history(&self, token: &str) -> Result<Vec<AnalysisRecord>, ClientError> {
        self.get_json(&[HISTORY_ENDPOINT], token, "Failed to fetch history")
            .await
    }

    /// Generic authenticated GET
    pub async fn get_json<R>(
        &self,
        segments: &[&str],
        token: &str,
        fallback: &str,
    ) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        info!("GET {}", url);

        let response = self.client.get(url).bearer_auth(token).send().await?;
        Self::decode(response, fallback).await
    }

    /// Generic authenticated POST with JSON
    pub async fn post_json<T, R>(
        &self,
        segments: &[&str],
        token: &str,
        payload: &T,
        fallback: &str,
    ) -> Result<R, ClientError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        info!("POST {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;
        Self::decode(response, fallback).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidInput(format!("Invalid API base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode<R>(response: Response, fallback: &str) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await?;
        if status.is_success() {
            serde_json::from_str(&body).map_err(|err| {
                error!("Failed to parse response body: {}", err);
                ClientError::Decode(err.to_string())
            })
        } else {
            error!("Analysis service error {}: {}", status, body);
            Err(ClientError::from_response(status.as_u16(), &body, fallback))
        }
    }
}

#[async_trait]
impl AnalysisApi for ServiceClient {
    /// `GET /analyses`
    async fn list_analyses(&self, token: &str) -> Result<Vec<AnalysisRecord>, ClientError> {
        let response: AnalysesResponse = self
            .get_json(&[ANALYSES_ENDPOINT], token, "Failed to fetch analyses")
            .await?;
        debug!("Fetched {} analyses", response.analyses.len());
        Ok(response.analyses)
    }

    /// `GET /stats`
    async fn fetch_stats(&self, token: &str) -> Result<StatsResponse, ClientError> {
        self.get_json(&[STATS_ENDPOINT], token, "Failed to fetch stats")
            .await
    }

    /// `DELETE /analyses/{id}` - any 2xx is success, the body is ignored
    async fn delete_analysis(&self, token: &str, id: &str) -> Result<(), ClientError> {
        if id.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "Analysis id is required".to_string(),
            ));
        }

        let url = self.endpoint(&[ANALYSES_ENDPOINT, id])?;
        info!("DELETE {}", url);

        let response = self.client.delete(url).bearer_auth(token).send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ClientError::from_response(
                status.as_u16(),
                &body,
                "Failed to delete analysis",
            ))
        }
    }
}
