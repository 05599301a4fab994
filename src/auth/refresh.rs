// Token refresh coordination
// Collapses concurrent refresh demand into exactly one outbound exchange.

use anyhow::{Context, Result};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};

use super::types::{RefreshRequest, TokenPair};
use crate::config::ClientConfig;
use crate::store::CredentialStore;

/// Result handle shared by every caller that joins a pending exchange
type InflightRefresh = Shared<BoxFuture<'static, Option<String>>>;

/// Single-flight coordinator for the refresh exchange.
///
/// At most one exchange is in flight at any time; callers that arrive while
/// one is pending receive the same result handle. The exchange itself runs
/// on a spawned task, so a caller that stops awaiting does not cancel a
/// renewal other callers are waiting on.
pub struct RefreshCoordinator {
    /// Bare HTTP client; the refresh exchange must not route through the
    /// authenticated transport or a 401 here would recurse into renewal
    client: Client,

    /// Absolute URL of the refresh endpoint
    refresh_url: String,

    /// Shared credential store
    store: Arc<CredentialStore>,

    /// Pending exchange, if any
    inflight: Arc<Mutex<Option<InflightRefresh>>>,
}

impl RefreshCoordinator {
    pub fn new(config: &ClientConfig, store: Arc<CredentialStore>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .context("Failed to create HTTP client for token refresh")?;

        Ok(Self {
            client,
            refresh_url: format!("{}/auth/refresh", config.base_url.trim_end_matches('/')),
            store,
            inflight: Arc::new(Mutex::new(None)),
        })
    }

    /// Renew the access token, sharing a pending exchange when one exists.
    ///
    /// Resolves with the new access token, or `None` when no refresh token
    /// is stored or the exchange failed (the store is cleared in that case).
    /// The coordinator is idle again by the time the result is observed, so
    /// a later 401 can trigger a fresh attempt.
    pub async fn request_refresh(&self) -> Option<String> {
        let pending = {
            let mut inflight = self.inflight.lock().await;

            if let Some(pending) = inflight.as_ref() {
                tracing::debug!("Refresh exchange already in flight, joining it");
                pending.clone()
            } else {
                let Some(refresh_token) = self.store.refresh() else {
                    tracing::debug!("No refresh token stored, renewal unavailable");
                    return None;
                };

                let client = self.client.clone();
                let url = self.refresh_url.clone();
                let store = Arc::clone(&self.store);
                let slot = Arc::clone(&self.inflight);

                let (tx, rx) = oneshot::channel();
                tokio::spawn(async move {
                    let outcome = execute_exchange(&client, &url, &store, refresh_token).await;
                    // Back to idle before any waiter observes the outcome
                    *slot.lock().await = None;
                    let _ = tx.send(outcome);
                });

                let shared: InflightRefresh = rx.map(|result| result.ok().flatten()).boxed().shared();
                *inflight = Some(shared.clone());
                shared
            }
        };

        pending.await
    }
}

/// Run one exchange and apply its outcome to the store
async fn execute_exchange(
    client: &Client,
    url: &str,
    store: &CredentialStore,
    refresh_token: String,
) -> Option<String> {
    match exchange(client, url, refresh_token).await {
        Ok(pair) => {
            store.save(&pair);
            tracing::info!("Access token refreshed");
            Some(pair.access_token)
        }
        Err(e) => {
            tracing::warn!("Token refresh failed, clearing stored credentials: {:#}", e);
            store.clear();
            None
        }
    }
}

/// Exchange a refresh token for a new pair at the refresh endpoint
async fn exchange(client: &Client, url: &str, refresh_token: String) -> Result<TokenPair> {
    let response = client
        .post(url)
        .json(&RefreshRequest { refresh_token })
        .send()
        .await
        .context("Failed to send refresh request")?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        anyhow::bail!("Refresh endpoint returned {}: {}", status, error_text);
    }

    let pair: TokenPair = response
        .json()
        .await
        .context("Failed to parse refresh response")?;

    if pair.access_token.is_empty() || pair.refresh_token.is_empty() {
        anyhow::bail!("Refresh response is missing token fields");
    }

    Ok(pair)
}
