use anyhow::{Context, Result};
use reqwest::header::{self, HeaderValue};
use reqwest::{Client, Method, Request, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::RefreshCoordinator;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::store::CredentialStore;

/// Authenticated HTTP transport for the news service API.
///
/// Attaches the current access token to every outbound request and makes
/// token expiry invisible to callers: a 401 response triggers one shared
/// refresh exchange and a single replay of the original request. Resource
/// modules route everything through here and never handle tokens or 401s
/// themselves.
pub struct ApiClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// Base URL of the API, without trailing slash
    base_url: String,

    /// Shared credential store
    store: Arc<CredentialStore>,

    /// Single-flight refresh coordinator
    refresher: RefreshCoordinator,
}

impl ApiClient {
    /// Create a new transport over the given credential store
    pub fn new(config: &ClientConfig, store: Arc<CredentialStore>) -> Result<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.max_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        let refresher = RefreshCoordinator::new(config, Arc::clone(&store))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            store,
            refresher,
        })
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start building a request against an API path
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Execute a request with transparent token renewal.
    ///
    /// A 401 response leads to at most one refresh exchange (shared across
    /// concurrently failing requests) and at most one replay of this
    /// request. Requests to the login and registration endpoints never
    /// trigger renewal. Every other status passes through untouched.
    pub async fn execute(&self, request: Request) -> Result<Response, ApiError> {
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(method = %method, url = %url, "Sending API request");

        // Cloned up front so the original request can be replayed once
        // after a renewal
        let mut replay = request
            .try_clone()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("Request body is not cloneable")))?;

        let mut request = request;
        if let Some(token) = self.store.access() {
            request
                .headers_mut()
                .insert(header::AUTHORIZATION, bearer_value(&token)?);
        }

        let response = self.client.execute(request).await?;
        let status = response.status();

        if status != StatusCode::UNAUTHORIZED || is_auth_exchange(&url) {
            return finalize(response).await;
        }

        tracing::debug!(url = %url, "Received 401, requesting token renewal");
        match self.refresher.request_refresh().await {
            Some(token) => {
                replay
                    .headers_mut()
                    .insert(header::AUTHORIZATION, bearer_value(&token)?);
                tracing::debug!(url = %url, "Replaying request once with renewed token");
                let response = self.client.execute(replay).await?;
                finalize(response).await
            }
            None => {
                tracing::debug!(url = %url, "Token renewal unavailable, surfacing original 401");
                finalize(response).await
            }
        }
    }

    /// Execute a built request and discard the response body
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder.build()?;
        self.execute(request).await
    }

    /// Execute a built request and decode the JSON response body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        Ok(response.json().await?)
    }

    /// Execute a built request, keeping only the success/failure outcome
    pub async fn send_unit(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        self.send(builder).await.map(|_| ())
    }
}

/// Whether the URL targets a credential-establishment endpoint.
/// A 401 from these must not trigger a refresh attempt.
fn is_auth_exchange(url: &Url) -> bool {
    let path = url.path();
    path.contains("/auth/login") || path.contains("/auth/register")
}

fn bearer_value(token: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| ApiError::Auth("Stored access token is not a valid header value".to_string()))
}

/// Map non-success statuses to `ApiError::Api`, untouched otherwise
async fn finalize(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    tracing::warn!(
        status = status.as_u16(),
        message = %message,
        "API returned error response"
    );
    Err(ApiError::Api {
        status: status.as_u16(),
        message,
    })
}
